//! Canonical URL and hreflang alternate generation
//!
//! Every function here is a pure string construction over a [`SiteConfig`].
//! URLs have the shape `{base_url}/{locale}` or `{base_url}/{locale}/{path}`;
//! paths are expected to be sanitized by the caller (one leading slash is
//! tolerated, nothing else is normalized).
//!
//! # Example
//!
//! ```
//! use geo_i18n::config::SiteConfig;
//! use geo_i18n::hreflang::{HreflangConfig, generate_hreflang_alternates};
//!
//! let site = SiteConfig::default();
//! let alternates = generate_hreflang_alternates(&site, &HreflangConfig::new("blog")).unwrap();
//! assert_eq!(alternates["en-US"], "https://develop.matrixlab.work/en/blog");
//! assert_eq!(alternates["x-default"], "https://develop.matrixlab.work/zh/blog");
//! ```

use crate::config::{SiteConfig, X_DEFAULT};
use crate::error::GeoResult;
use crate::manifest::Article;
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Input for hreflang generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HreflangConfig {
    /// Page path without locale prefix, e.g. `blog` or `/products/trace`
    pub path: String,
    /// Locales to emit, in order. `None` means the site's locale table order.
    pub locales: Option<Vec<String>>,
    /// Whether to emit the `x-default` entry
    pub include_default: bool,
}

impl HreflangConfig {
    pub fn new(path: &str) -> Self {
        HreflangConfig {
            path: path.to_string(),
            locales: None,
            include_default: true,
        }
    }

    pub fn with_locales(mut self, locales: &[&str]) -> Self {
        self.locales = Some(locales.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn with_default(mut self, include_default: bool) -> Self {
        self.include_default = include_default;
        self
    }
}

/// One `<link rel="alternate" hreflang=".." href="..">` worth of data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HreflangAlternate {
    pub hreflang: String,
    pub href: String,
}

impl HreflangAlternate {
    fn new(hreflang: &str, href: String) -> Self {
        HreflangAlternate {
            hreflang: hreflang.to_string(),
            href,
        }
    }
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Canonical URL of `path` in `locale`
///
/// One leading slash is stripped from `path`; an empty path yields the locale
/// root without a trailing slash.
pub fn generate_canonical_url(site: &SiteConfig, locale: &str, path: &str) -> String {
    let clean_path = strip_leading_slash(path);
    if clean_path.is_empty() {
        format!("{}/{}", site.base_url(), locale)
    } else {
        format!("{}/{}/{}", site.base_url(), locale, clean_path)
    }
}

/// Hreflang alternates as an ordered list: locales in input order, `x-default` last
///
/// # Errors
/// `UnknownLocale` if a requested locale has no BCP-47 tag in the site's table.
pub fn generate_hreflang_links(
    site: &SiteConfig,
    config: &HreflangConfig,
) -> GeoResult<Vec<HreflangAlternate>> {
    let locales: Vec<&str> = match &config.locales {
        Some(locales) => locales.iter().map(String::as_str).collect(),
        None => site.locales().locales().collect(),
    };

    let mut links = Vec::with_capacity(locales.len() + 1);
    for locale in &locales {
        let tag = site.locales().tag_for(locale)?;
        links.push(HreflangAlternate::new(
            tag,
            generate_canonical_url(site, locale, &config.path),
        ));
    }

    if config.include_default {
        let default_locale = locales.first().copied().unwrap_or(site.default_locale());
        links.push(HreflangAlternate::new(
            X_DEFAULT,
            generate_canonical_url(site, default_locale, &config.path),
        ));
    }

    Ok(links)
}

/// Hreflang alternates keyed by language code (`zh-CN`, `en-US`, `x-default`)
pub fn generate_hreflang_alternates(
    site: &SiteConfig,
    config: &HreflangConfig,
) -> GeoResult<BTreeMap<String, String>> {
    Ok(generate_hreflang_links(site, config)?
        .into_iter()
        .map(|link| (link.hreflang, link.href))
        .collect())
}

/// Alternates for a blog article whose slug may differ per locale
///
/// Locales without a slug are skipped. `x-default` points at the site default
/// locale when the article exists there, otherwise at the first version emitted.
pub fn article_alternates(site: &SiteConfig, article: &Article) -> GeoResult<Vec<HreflangAlternate>> {
    let mut links = Vec::new();
    let mut default_href = None;

    for locale in site.locales().locales() {
        let Some(slug) = article.slug(locale) else {
            continue;
        };
        let href = generate_canonical_url(site, locale, &format!("blog/{}", slug));
        if locale == site.default_locale() || default_href.is_none() {
            default_href = Some(href.clone());
        }
        links.push(HreflangAlternate::new(site.locales().tag_for(locale)?, href));
    }

    if let Some(href) = default_href {
        links.push(HreflangAlternate::new(X_DEFAULT, href));
    }
    Ok(links)
}

/// True only for an absolute `https` URL on the site's host. Never fails.
pub fn validate_hreflang_url(site: &SiteConfig, url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.scheme() == "https" && parsed.host_str() == Some(site.host()),
        Err(_) => false,
    }
}

/// Allow-list check: a configured locale code, a configured tag, or `x-default`
///
/// This is not a BCP-47 syntax check; `fr-FR` is rejected unless configured.
pub fn validate_hreflang_code(site: &SiteConfig, lang_code: &str) -> bool {
    lang_code == X_DEFAULT || site.locales().contains_code(lang_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleTable;
    use crate::error::GeoError;
    use proptest::prelude::*;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn test_canonical_url() {
        let site = site();
        assert_eq!(
            generate_canonical_url(&site, "en", "/products/trace"),
            "https://develop.matrixlab.work/en/products/trace"
        );
        assert_eq!(
            generate_canonical_url(&site, "zh", ""),
            "https://develop.matrixlab.work/zh"
        );
        assert_eq!(
            generate_canonical_url(&site, "zh", "/"),
            "https://develop.matrixlab.work/zh"
        );
        // Only one slash is stripped and trailing slashes are kept
        assert_eq!(
            generate_canonical_url(&site, "en", "//blog/"),
            "https://develop.matrixlab.work/en//blog/"
        );
    }

    #[test]
    fn test_alternates_for_blog() {
        let alternates = generate_hreflang_alternates(&site(), &HreflangConfig::new("blog")).unwrap();
        assert_eq!(alternates.len(), 3);
        assert_eq!(alternates["zh-CN"], "https://develop.matrixlab.work/zh/blog");
        assert_eq!(alternates["en-US"], "https://develop.matrixlab.work/en/blog");
        assert_eq!(alternates["x-default"], "https://develop.matrixlab.work/zh/blog");
    }

    #[test]
    fn test_alternates_for_home_page() {
        let alternates = generate_hreflang_alternates(&site(), &HreflangConfig::new("")).unwrap();
        assert_eq!(alternates["zh-CN"], "https://develop.matrixlab.work/zh");
        assert_eq!(alternates["en-US"], "https://develop.matrixlab.work/en");
        assert_eq!(alternates["x-default"], "https://develop.matrixlab.work/zh");
    }

    #[test]
    fn test_links_are_ordered() {
        let config = HreflangConfig::new("/terms").with_locales(&["en", "zh"]);
        let links = generate_hreflang_links(&site(), &config).unwrap();
        let codes: Vec<&str> = links.iter().map(|l| l.hreflang.as_str()).collect();
        assert_eq!(codes, vec!["en-US", "zh-CN", "x-default"]);
        // x-default follows the first requested locale
        assert_eq!(links[2].href, "https://develop.matrixlab.work/en/terms");
    }

    #[test]
    fn test_without_default() {
        let config = HreflangConfig::new("blog").with_default(false);
        let alternates = generate_hreflang_alternates(&site(), &config).unwrap();
        assert!(!alternates.contains_key("x-default"));
        assert_eq!(alternates.len(), 2);
    }

    #[test]
    fn test_empty_locale_list_defaults_to_site_default() {
        let config = HreflangConfig::new("blog").with_locales(&[]);
        let links = generate_hreflang_links(&site(), &config).unwrap();
        assert_eq!(
            links,
            vec![HreflangAlternate::new(
                "x-default",
                "https://develop.matrixlab.work/zh/blog".to_string()
            )]
        );
    }

    #[test]
    fn test_unmapped_locale_is_rejected() {
        let config = HreflangConfig::new("blog").with_locales(&["zh", "fr"]);
        assert_eq!(
            generate_hreflang_links(&site(), &config),
            Err(GeoError::UnknownLocale("fr".to_string()))
        );
    }

    #[test]
    fn test_extra_locale_from_table() {
        let mut table = LocaleTable::default();
        table.with_locale("ja", "ja-JP").unwrap();
        let site = SiteConfig::new("https://develop.matrixlab.work", table, "zh").unwrap();
        let alternates = generate_hreflang_alternates(&site, &HreflangConfig::new("blog")).unwrap();
        assert_eq!(alternates["ja-JP"], "https://develop.matrixlab.work/ja/blog");
        assert!(validate_hreflang_code(&site, "ja-JP"));
    }

    #[test]
    fn test_article_alternates_with_localized_slugs() {
        let article = Article::from_pairs(&[
            ("zh", "otc的尽头是合规化-反洗钱正成为行业亟须"),
            ("en", "otc-compliance-aml-imperative"),
        ]);
        let links = article_alternates(&site(), &article).unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].hreflang, "zh-CN");
        assert_eq!(
            links[0].href,
            "https://develop.matrixlab.work/zh/blog/otc的尽头是合规化-反洗钱正成为行业亟须"
        );
        assert_eq!(
            links[1].href,
            "https://develop.matrixlab.work/en/blog/otc-compliance-aml-imperative"
        );
        assert_eq!(links[2].hreflang, "x-default");
        assert_eq!(links[2].href, links[0].href);
    }

    #[test]
    fn test_article_alternates_single_locale() {
        let article = Article::from_pairs(&[("en", "how-on-chain-data-can-deceive-you")]);
        let links = article_alternates(&site(), &article).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].hreflang, "x-default");
        assert_eq!(links[1].href, links[0].href);
    }

    #[test]
    fn test_validate_url() {
        let site = site();
        assert!(validate_hreflang_url(&site, "https://develop.matrixlab.work/en/terms"));
        assert!(!validate_hreflang_url(&site, "http://develop.matrixlab.work/en/terms"));
        assert!(!validate_hreflang_url(&site, "https://evil.example/en"));
        assert!(!validate_hreflang_url(&site, "not a url"));
        assert!(!validate_hreflang_url(&site, ""));
        assert!(!validate_hreflang_url(&site, "/en/terms"));
    }

    #[test]
    fn test_validate_code() {
        let site = site();
        for code in ["zh-CN", "en-US", "x-default", "zh", "en"] {
            assert!(validate_hreflang_code(&site, code), "{code}");
        }
        assert!(!validate_hreflang_code(&site, "fr-FR"));
        assert!(!validate_hreflang_code(&site, "zh-cn"));
        assert!(!validate_hreflang_code(&site, ""));
    }

    #[test]
    fn test_generated_output_passes_validators() {
        let site = site();
        for path in ["", "blog", "/products/exchange", "privacy"] {
            for link in generate_hreflang_links(&site, &HreflangConfig::new(path)).unwrap() {
                assert!(validate_hreflang_code(&site, &link.hreflang));
                assert!(validate_hreflang_url(&site, &link.href));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_leading_slash_is_idempotent(
            path in "[a-z0-9][a-z0-9/_-]{0,30}",
            locale in prop::sample::select(vec!["zh", "en"]),
        ) {
            let site = SiteConfig::default();
            prop_assert_eq!(
                generate_canonical_url(&site, locale, &path),
                generate_canonical_url(&site, locale, &format!("/{}", path))
            );
        }
    }
}
