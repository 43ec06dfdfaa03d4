//! Site-wide batch validation
//!
//! Builds pass/fail reports for the hreflang tags of every page and article,
//! and a statistics report for the terminology dictionary. The reports are
//! plain data; printing them and choosing an exit code is up to the caller.

use crate::config::{SiteConfig, X_DEFAULT};
use crate::hreflang::{
    HreflangAlternate, HreflangConfig, article_alternates, generate_hreflang_links,
    validate_hreflang_code, validate_hreflang_url,
};
use crate::manifest::{Article, SiteManifest};
use crate::terminology::{DictionaryMetadata, TermCategory, TerminologyDictionary};
use serde::Serialize;
use std::collections::HashSet;

/// Terms looked up in the dictionary report
pub const SAMPLE_TERMS: [&str; 4] = ["智能合约", "Smart Contract", "DeFi", "去中心化金融"];

/// Result of validating one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReport {
    pub page: String,
    pub path: String,
    pub passed: bool,
    pub issues: Vec<String>,
}

impl PageReport {
    fn new(page: &str, path: &str, issues: Vec<String>) -> Self {
        PageReport {
            page: page.to_string(),
            path: path.to_string(),
            passed: issues.is_empty(),
            issues,
        }
    }
}

// Checks shared by pages and articles
fn check_links(site: &SiteConfig, links: &[HreflangAlternate], path: &str, issues: &mut Vec<String>) {
    if !links.iter().any(|l| l.hreflang == X_DEFAULT) {
        issues.push("Missing x-default hreflang tag".to_string());
    }

    let base_prefix = format!("{}/", site.base_url());
    for link in links {
        if !validate_hreflang_code(site, &link.hreflang) {
            issues.push(format!("Invalid language code: {}", link.hreflang));
        }
        if !validate_hreflang_url(site, &link.href) {
            issues.push(format!("Invalid URL format for {}: {}", link.hreflang, link.href));
        }
        if !link.href.starts_with(&base_prefix) {
            issues.push(format!("URL doesn't start with base URL: {}", link.href));
        }
    }

    let localized: Vec<&str> = links
        .iter()
        .filter(|l| l.hreflang != X_DEFAULT)
        .map(|l| l.href.as_str())
        .collect();
    let distinct: HashSet<&str> = localized.iter().copied().collect();
    if !path.trim_start_matches('/').is_empty() && distinct.len() < localized.len() {
        issues.push("Localized URLs are identical".to_string());
    }
}

/// Validate the hreflang alternates generated for a static page
pub fn validate_page(site: &SiteConfig, path: &str, name: &str) -> PageReport {
    let mut issues = Vec::new();

    match generate_hreflang_links(site, &HreflangConfig::new(path)) {
        Ok(links) => {
            for tag in site.locales().tags() {
                if !links.iter().any(|l| l.hreflang == tag) {
                    issues.push(format!("Missing {} hreflang tag", tag));
                }
            }
            check_links(site, &links, path, &mut issues);
        }
        Err(e) => issues.push(format!("Failed to generate alternates: {}", e)),
    }

    PageReport::new(name, path, issues)
}

/// Validate the alternates of a blog article with per-locale slugs
pub fn validate_article(site: &SiteConfig, article: &Article) -> PageReport {
    let slug = article
        .slug(site.default_locale())
        .or_else(|| article.slugs().next().map(|(_, slug)| slug))
        .unwrap_or_default();
    let path = format!("blog/{}", slug);
    let mut issues = Vec::new();

    match article_alternates(site, article) {
        Ok(links) => check_links(site, &links, &path, &mut issues),
        Err(e) => issues.push(format!("Failed to generate alternates: {}", e)),
    }

    PageReport::new(&format!("Blog Article: {}", slug), &path, issues)
}

/// Reports for every page and article of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
    pub pages: Vec<PageReport>,
}

impl SiteReport {
    pub fn total(&self) -> usize {
        self.pages.len()
    }

    pub fn passed(&self) -> usize {
        self.pages.iter().filter(|p| p.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    /// Share of passing pages in percent; 100 for an empty site
    pub fn success_rate(&self) -> f64 {
        if self.pages.is_empty() {
            return 100.0;
        }
        self.passed() as f64 * 100.0 / self.total() as f64
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub fn validate_site(site: &SiteConfig, manifest: &SiteManifest) -> SiteReport {
    let pages = manifest
        .pages
        .iter()
        .map(|page| validate_page(site, &page.path, &page.name))
        .chain(
            manifest
                .articles
                .iter()
                .map(|article| validate_article(site, article)),
        )
        .collect();
    SiteReport { pages }
}

/// Outcome of one sample lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupSample {
    pub input: String,
    pub canonical: Option<String>,
    pub is_alias: bool,
}

/// Summary of a loaded dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryReport {
    pub metadata: DictionaryMetadata,
    pub total: usize,
    /// Categories with at least one entry, in declaration order
    pub by_category: Vec<(TermCategory, usize)>,
    /// `(entry, related name)` pairs that do not resolve
    pub unresolved_related: Vec<(String, String)>,
    pub samples: Vec<LookupSample>,
}

impl DictionaryReport {
    pub fn build(dictionary: &TerminologyDictionary, sample_terms: &[&str]) -> Self {
        let by_category = TermCategory::ALL
            .into_iter()
            .map(|category| (category, dictionary.entries_in_category(category).len()))
            .filter(|(_, count)| *count > 0)
            .collect();

        let unresolved_related = dictionary
            .entries()
            .iter()
            .flat_map(|entry| {
                entry
                    .related_terms
                    .iter()
                    .filter(|name| dictionary.lookup_canonical(name).is_none())
                    .map(|name| (entry.canonical_name.clone(), name.clone()))
            })
            .collect();

        let samples = sample_terms
            .iter()
            .map(|input| {
                let found = dictionary.lookup(input);
                LookupSample {
                    input: input.to_string(),
                    canonical: found.map(|e| e.canonical_name.clone()),
                    is_alias: found.is_some_and(|e| dictionary.is_alias(input, e)),
                }
            })
            .collect();

        DictionaryReport {
            metadata: dictionary.metadata(),
            total: dictionary.len(),
            by_category,
            unresolved_related,
            samples,
        }
    }

    /// True when every sample resolved
    pub fn all_samples_found(&self) -> bool {
        self.samples.iter().all(|s| s.canonical.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleTable;

    #[test]
    fn test_page_passes() {
        let site = SiteConfig::default();
        let report = validate_page(&site, "products/exchange", "Exchange Product");
        assert!(report.passed, "{:?}", report.issues);
        assert_eq!(validate_page(&site, "", "Home").issues, Vec::<String>::new());
    }

    #[test]
    fn test_builtin_site_passes() {
        let site = SiteConfig::default();
        let manifest = SiteManifest::builtin().unwrap();
        let report = validate_site(&site, manifest);
        assert_eq!(report.total(), manifest.pages.len() + manifest.articles.len());
        assert!(report.is_success(), "{:?}", report.pages.iter().filter(|p| !p.passed).collect::<Vec<_>>());
        assert_eq!(report.success_rate(), 100.0);
    }

    #[test]
    fn test_http_base_url_fails_validation() {
        let site = SiteConfig::new("http://develop.matrixlab.work", LocaleTable::default(), "zh").unwrap();
        let report = validate_page(&site, "blog", "Blog");
        assert!(!report.passed);
        assert!(
            report
                .issues
                .contains(&"Invalid URL format for zh-CN: http://develop.matrixlab.work/zh/blog".to_string())
        );
    }

    #[test]
    fn test_identical_localized_urls() {
        let site = SiteConfig::default();
        let article = Article::from_pairs(&[("zh", "same"), ("en", "same")]);
        // Different locale prefixes keep the URLs apart
        assert!(validate_article(&site, &article).passed);

        let links = vec![
            HreflangAlternate { hreflang: "zh-CN".into(), href: "https://develop.matrixlab.work/zh/x".into() },
            HreflangAlternate { hreflang: "en-US".into(), href: "https://develop.matrixlab.work/zh/x".into() },
            HreflangAlternate { hreflang: "x-default".into(), href: "https://develop.matrixlab.work/zh/x".into() },
        ];
        let mut issues = Vec::new();
        check_links(&site, &links, "x", &mut issues);
        assert_eq!(issues, vec!["Localized URLs are identical"]);

        let mut home_issues = Vec::new();
        check_links(&site, &links, "", &mut home_issues);
        assert!(home_issues.is_empty());
    }

    #[test]
    fn test_missing_default_and_bad_code() {
        let site = SiteConfig::default();
        let links = vec![HreflangAlternate {
            hreflang: "fr-FR".into(),
            href: "https://evil.example/fr".into(),
        }];
        let mut issues = Vec::new();
        check_links(&site, &links, "x", &mut issues);
        assert_eq!(
            issues,
            vec![
                "Missing x-default hreflang tag",
                "Invalid language code: fr-FR",
                "Invalid URL format for fr-FR: https://evil.example/fr",
                "URL doesn't start with base URL: https://evil.example/fr",
            ]
        );
    }

    #[test]
    fn test_site_report_counts() {
        let report = SiteReport {
            pages: vec![
                PageReport::new("a", "a", vec![]),
                PageReport::new("b", "b", vec!["broken".to_string()]),
            ],
        };
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.success_rate(), 50.0);
        assert!(!report.is_success());
        assert!(SiteReport { pages: vec![] }.is_success());
    }

    #[test]
    fn test_dictionary_report() {
        let dictionary = TerminologyDictionary::builtin().unwrap();
        let report = DictionaryReport::build(dictionary, &SAMPLE_TERMS);
        assert_eq!(report.total, dictionary.len());
        assert_eq!(
            report.by_category.iter().map(|(_, n)| n).sum::<usize>(),
            dictionary.len()
        );
        assert!(report.unresolved_related.is_empty());
        assert!(report.all_samples_found());

        let smart_contract = &report.samples[1];
        assert_eq!(smart_contract.canonical.as_deref(), Some("智能合约"));
        assert!(smart_contract.is_alias);
        assert!(!report.samples[0].is_alias);
    }
}
