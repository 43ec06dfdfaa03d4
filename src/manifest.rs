//! Site manifest: the pages and blog articles that get hreflang tags and sitemap entries
//!
//! The manifest JSON has the following structure:
//! ```json
//! {
//!     "pages": [
//!         { "path": "blog", "name": "Blog List", "priority": 0.9, "changeFrequency": "daily" }
//!     ],
//!     "articles": [
//!         { "zh": "otc的尽头是合规化-反洗钱正成为行业亟须", "en": "otc-compliance-aml-imperative" }
//!     ]
//! }
//! ```
//! Articles map locale codes to slugs, so an article may be published under a
//! different slug (or not at all) in each locale.

use crate::error::{GeoError, GeoResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// How often a page is expected to change, as understood by sitemap consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// A static page available in every locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    /// Path without locale prefix; empty for the home page
    pub path: String,
    /// Human readable name used in reports
    pub name: String,
    pub priority: f32,
    pub change_frequency: ChangeFrequency,
}

/// A blog article: locale code -> slug
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Article(BTreeMap<String, String>);

impl Article {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Article(
            pairs
                .iter()
                .map(|(locale, slug)| (locale.to_string(), slug.to_string()))
                .collect(),
        )
    }

    /// Slug of this article in `locale`, if published there
    pub fn slug(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// True if any locale version uses `slug`
    pub fn has_slug(&self, slug: &str) -> bool {
        self.0.values().any(|s| s == slug)
    }

    /// `(locale, slug)` pairs sorted by locale code
    pub fn slugs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, s)| (l.as_str(), s.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pages and articles of the site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteManifest {
    #[serde(default)]
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

const BUILTIN_MANIFEST: &str = include_str!("../data/site.json");

lazy_static! {
    static ref BUILTIN: GeoResult<SiteManifest> = SiteManifest::from_json_str(BUILTIN_MANIFEST);
}

impl SiteManifest {
    /// The manifest shipped with the crate, parsed once per process
    pub fn builtin() -> GeoResult<&'static SiteManifest> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Parse and check a manifest
    ///
    /// # Errors
    /// - `Json` for syntax or shape errors
    /// - `Config` for duplicate page paths, priorities outside `0.0..=1.0`,
    ///   empty articles, or one slug used by two articles in the same locale
    pub fn from_json_str(json: &str) -> GeoResult<Self> {
        let manifest: SiteManifest = serde_json::from_str(json)?;
        manifest.check()?;
        Ok(manifest)
    }

    fn check(&self) -> GeoResult<()> {
        let mut problems = Vec::new();

        let mut paths = HashSet::new();
        for (index, page) in self.pages.iter().enumerate() {
            let path = page.path.trim_start_matches('/');
            if !paths.insert(path) {
                problems.push(format!("Page {}: duplicate path '{}'", index, page.path));
            }
            if !(0.0..=1.0).contains(&page.priority) {
                problems.push(format!(
                    "Page {}: priority {} outside 0.0..=1.0",
                    index, page.priority
                ));
            }
        }

        let mut slugs = HashSet::new();
        for (index, article) in self.articles.iter().enumerate() {
            if article.is_empty() {
                problems.push(format!("Article {}: no slugs", index));
            }
            for (locale, slug) in article.slugs() {
                if slug.is_empty() {
                    problems.push(format!("Article {}: empty slug for '{}'", index, locale));
                } else if !slugs.insert((locale, slug)) {
                    problems.push(format!(
                        "Article {}: slug '{}' already used in '{}'",
                        index, slug, locale
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GeoError::Config(problems.join(", ")))
        }
    }

    /// Article that uses `slug` in any locale
    pub fn article_by_slug(&self, slug: &str) -> Option<&Article> {
        self.articles.iter().find(|article| article.has_slug(slug))
    }

    /// Slug of the same article in `target_locale`
    ///
    /// Returns `current_slug` unchanged when the article is unknown or has no
    /// version in the target locale.
    pub fn mapped_slug<'a>(&'a self, current_slug: &'a str, target_locale: &str) -> &'a str {
        self.article_by_slug(current_slug)
            .and_then(|article| article.slug(target_locale))
            .unwrap_or(current_slug)
    }
}
