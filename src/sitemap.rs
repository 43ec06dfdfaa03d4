//! Sitemap generation
//!
//! Every page is listed once per locale, followed by every blog article in
//! every locale it is published in. Article slugs are percent-encoded since
//! many of them are Chinese.

use crate::config::SiteConfig;
use crate::error::{GeoError, GeoResult};
use crate::hreflang::generate_canonical_url;
use crate::manifest::{ChangeFrequency, SiteManifest};
use serde::Serialize;
use url::Url;

/// Priority of blog articles
pub const ARTICLE_PRIORITY: f32 = 0.8;

/// Change frequency of blog articles
pub const ARTICLE_CHANGE_FREQUENCY: ChangeFrequency = ChangeFrequency::Weekly;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// URL of a blog article with its slug percent-encoded as one path segment
pub fn article_url(site: &SiteConfig, locale: &str, slug: &str) -> GeoResult<String> {
    let blog = generate_canonical_url(site, locale, "blog");
    let mut url = Url::parse(&blog).map_err(|_| GeoError::InvalidBaseUrl(blog.clone()))?;
    url.path_segments_mut()
        .map_err(|_| GeoError::InvalidBaseUrl(blog.clone()))?
        .push(slug);
    Ok(url.into())
}

/// All sitemap entries for `manifest`, pages first, then articles
pub fn generate_sitemap(site: &SiteConfig, manifest: &SiteManifest) -> GeoResult<Vec<SitemapEntry>> {
    let mut entries = Vec::new();

    for locale in site.locales().locales() {
        for page in &manifest.pages {
            entries.push(SitemapEntry {
                url: generate_canonical_url(site, locale, &page.path),
                change_frequency: page.change_frequency,
                priority: page.priority,
            });
        }
    }

    for locale in site.locales().locales() {
        for slug in manifest.articles.iter().filter_map(|a| a.slug(locale)) {
            entries.push(SitemapEntry {
                url: article_url(site, locale, slug)?,
                change_frequency: ARTICLE_CHANGE_FREQUENCY,
                priority: ARTICLE_PRIORITY,
            });
        }
    }

    Ok(entries)
}

/// Render entries as a sitemaps.org `urlset` document
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", html_escape::encode_text(&entry.url)));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.2}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}
