//! GEO (Generative Engine Optimization) tooling for a bilingual site
//!
//! - [`hreflang`]: canonical URLs, hreflang alternates and their validators
//! - [`terminology`]: the terminology dictionary and content consistency checks
//! - [`quality`]: content quality scoring (paragraphs, vague wording, citations)
//! - [`qa`]: Q&A pair generation and coverage validation
//! - [`sitemap`]: sitemap entries and XML
//! - [`validation`]: site-wide pass/fail reports

pub mod config;
pub mod error;
pub mod hreflang;
pub mod loader;
pub mod manifest;
pub mod qa;
pub mod quality;
pub mod sitemap;
pub mod terminology;
pub mod validation;

// Re-export the common types for convenient access
pub use config::{BASE_URL, LocaleTable, SiteConfig, X_DEFAULT};
pub use error::{GeoError, GeoResult};
pub use hreflang::{
    HreflangAlternate, HreflangConfig, article_alternates, generate_canonical_url,
    generate_hreflang_alternates, generate_hreflang_links, validate_hreflang_code,
    validate_hreflang_url,
};
pub use loader::{load_dictionary_from_file, load_manifest_from_file};
pub use manifest::{Article, ChangeFrequency, PageSpec, SiteManifest};
pub use qa::{ArticleInput, QaCategory, QaPair, QuestionCoverageMatrix, generate_qa};
pub use quality::{ArticleSignals, QualityIssue, QualityReport, validate_content};
pub use sitemap::{SitemapEntry, generate_sitemap, render_sitemap_xml};
pub use terminology::{
    ConflictReport, ContentChecker, Lang, TermCategory, TerminologyDictionary, TerminologyEntry,
};
pub use validation::{DictionaryReport, PageReport, SiteReport, validate_page, validate_site};
