//! Site configuration: base URL, locale table and default locale
//!
//! The defaults describe the production site. Every value can be overridden from
//! the environment:
//!
//! | Variable             | Example                    | Default                          |
//! |----------------------|----------------------------|----------------------------------|
//! | `GEO_BASE_URL`       | `https://staging.example`  | `https://develop.matrixlab.work` |
//! | `GEO_LOCALES`        | `zh=zh-CN,en=en-US,ja=ja-JP` | `zh=zh-CN,en=en-US`            |
//! | `GEO_DEFAULT_LOCALE` | `en`                       | first locale of the table        |

use crate::error::{GeoError, GeoResult};
use icu_locale::Locale;
use tracing::debug;
use url::Url;

/// Base URL of the production site
pub const BASE_URL: &str = "https://develop.matrixlab.work";

/// Host of [`BASE_URL`]
pub const BASE_HOST: &str = "develop.matrixlab.work";

/// The hreflang fallback value
pub const X_DEFAULT: &str = "x-default";

/// Ordered mapping of site locale codes (URL prefixes) to BCP-47 tags
///
/// Order matters: it is the default locale order for hreflang generation and
/// the order in which sitemap sections are emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleTable {
    entries: Vec<(String, String)>,
}

impl LocaleTable {
    /// Create an empty table
    pub fn new() -> Self {
        LocaleTable {
            entries: Vec::new(),
        }
    }

    /// Add or replace the tag for `locale`
    ///
    /// # Errors
    /// `InvalidLocaleTag` if `tag` is not well-formed BCP-47 or if either side is empty.
    pub fn with_locale(&mut self, locale: &str, tag: &str) -> GeoResult<&mut Self> {
        let locale = locale.trim();
        let tag = tag.trim();
        if locale.is_empty() || tag.parse::<Locale>().is_err() {
            return Err(GeoError::InvalidLocaleTag {
                locale: locale.to_string(),
                tag: tag.to_string(),
            });
        }

        match self.entries.iter_mut().find(|(code, _)| code == locale) {
            Some(entry) => entry.1 = tag.to_string(),
            None => self.entries.push((locale.to_string(), tag.to_string())),
        }
        Ok(self)
    }

    /// Parse a `code=tag` list separated by commas, e.g. `zh=zh-CN,en=en-US`
    pub fn parse(spec: &str) -> GeoResult<Self> {
        let mut table = LocaleTable::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (locale, tag) = pair.split_once('=').ok_or_else(|| {
                GeoError::Config(format!("Locale mapping '{}' must look like code=tag", pair))
            })?;
            table.with_locale(locale, tag)?;
        }
        if table.is_empty() {
            return Err(GeoError::Config("Locale table is empty".to_string()));
        }
        Ok(table)
    }

    /// BCP-47 tag configured for `locale`
    ///
    /// # Errors
    /// `UnknownLocale` when the locale is not in the table. Unmapped locales are
    /// never silently given another locale's tag.
    pub fn tag_for(&self, locale: &str) -> GeoResult<&str> {
        self.entries
            .iter()
            .find(|(code, _)| code == locale)
            .map(|(_, tag)| tag.as_str())
            .ok_or_else(|| GeoError::UnknownLocale(locale.to_string()))
    }

    /// Locale codes in table order
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    /// BCP-47 tags in table order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, tag)| tag.as_str())
    }

    /// True if `code` is a configured locale code or tag
    pub fn contains_code(&self, code: &str) -> bool {
        self.entries
            .iter()
            .any(|(locale, tag)| locale == code || tag == code)
    }

    pub fn contains_locale(&self, locale: &str) -> bool {
        self.entries.iter().any(|(code, _)| code == locale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        LocaleTable {
            entries: vec![
                ("zh".to_string(), "zh-CN".to_string()),
                ("en".to_string(), "en-US".to_string()),
            ],
        }
    }
}

/// Where canonical and alternate URLs point, and which locales exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    // Kept without a trailing slash so URLs are built as `{base_url}/{locale}`
    base_url: String,
    host: String,
    locales: LocaleTable,
    default_locale: String,
}

impl SiteConfig {
    /// Create a site configuration
    ///
    /// # Errors
    /// - `InvalidBaseUrl` if `base_url` is not an absolute http(s) URL with a host
    /// - `UnknownLocale` if `default_locale` is not in `locales`
    pub fn new(base_url: &str, locales: LocaleTable, default_locale: &str) -> GeoResult<Self> {
        let parsed =
            Url::parse(base_url).map_err(|_| GeoError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GeoError::InvalidBaseUrl(base_url.to_string()));
        }
        let host = parsed
            .host_str()
            .ok_or_else(|| GeoError::InvalidBaseUrl(base_url.to_string()))?
            .to_string();
        if !locales.contains_locale(default_locale) {
            return Err(GeoError::UnknownLocale(default_locale.to_string()));
        }

        Ok(SiteConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            locales,
            default_locale: default_locale.to_string(),
        })
    }

    /// Build from `GEO_*` environment variables, falling back to the defaults
    pub fn from_env() -> GeoResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (the environment in production)
    pub fn from_vars<F>(var: F) -> GeoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = var("GEO_BASE_URL").unwrap_or_else(|| BASE_URL.to_string());
        let locales = match var("GEO_LOCALES") {
            Some(spec) => LocaleTable::parse(&spec)?,
            None => LocaleTable::default(),
        };
        let default_locale = match var("GEO_DEFAULT_LOCALE") {
            Some(locale) => locale,
            None => locales
                .locales()
                .next()
                .ok_or_else(|| GeoError::Config("Locale table is empty".to_string()))?
                .to_string(),
        };

        debug!(%base_url, ?locales, %default_locale, "Resolved site configuration");
        Self::new(&base_url, locales, &default_locale)
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base_url: BASE_URL.to_string(),
            host: BASE_HOST.to_string(),
            locales: LocaleTable::default(),
            default_locale: "zh".to_string(),
        }
    }
}
