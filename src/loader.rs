use crate::error::{GeoError, GeoResult};
use crate::manifest::SiteManifest;
use crate::qa::{ArticleInput, BilingualQa};
use crate::terminology::TerminologyDictionary;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

fn read_file(path: &Path) -> GeoResult<String> {
    fs::read_to_string(path)
        .map_err(|e| GeoError::Io(format!("Failed to read file '{}': {}", path.display(), e)))
}

/// Load a terminology dictionary from a JSON file
///
/// The JSON file should have the following structure:
/// ```json
/// {
///     "version": "1.2.0",
///     "lastUpdated": "2025-01-15T00:00:00Z",
///     "entries": [
///         {
///             "term": "智能合约",
///             "canonicalName": "智能合约",
///             "aliases": ["Smart Contract"],
///             "definition": "...",
///             "relatedTerms": ["区块链"],
///             "category": "blockchain"
///         }
///     ]
/// }
/// ```
///
/// # Arguments
/// * `path` - Path to the JSON file
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON
/// - Missing required fields (every problem is listed with its entry index)
/// - Names shared between two entries
pub fn load_dictionary_from_file(path: &Path) -> GeoResult<TerminologyDictionary> {
    let content = read_file(path)?;
    let dictionary = TerminologyDictionary::from_json_str(&content).map_err(|e| match e {
        GeoError::Json(msg) => {
            GeoError::Json(format!("Failed to parse JSON from '{}': {}", path.display(), msg))
        }
        other => other,
    })?;
    info!(path = %path.display(), entries = dictionary.len(), "Loaded dictionary file");
    Ok(dictionary)
}

/// Load a site manifest (pages and articles) from a JSON file
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON or unknown change frequency
/// - Duplicate page paths or article slugs
pub fn load_manifest_from_file(path: &Path) -> GeoResult<SiteManifest> {
    let content = read_file(path)?;
    let manifest = SiteManifest::from_json_str(&content)?;
    info!(
        path = %path.display(),
        pages = manifest.pages.len(),
        articles = manifest.articles.len(),
        "Loaded site manifest"
    );
    Ok(manifest)
}

fn parse_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> GeoResult<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| {
        GeoError::Json(format!("Failed to parse JSON from '{}': {}", path.display(), e))
    })
}

/// Load an article (id, title, content, optional AI summary) for Q&A generation
pub fn load_article_from_file(path: &Path) -> GeoResult<ArticleInput> {
    parse_json_file(path)
}

/// Load hand-written Q&A data keyed by article slug
///
/// ```json
/// {
///     "defi-risk-management": {
///         "zh": [{"question": "...", "answer": "...", "category": "definition"}],
///         "en": [{"question": "...", "answer": "...", "category": "definition"}]
///     }
/// }
/// ```
pub fn load_qa_from_file(path: &Path) -> GeoResult<BTreeMap<String, BilingualQa>> {
    let qa: BTreeMap<String, BilingualQa> = parse_json_file(path)?;
    info!(path = %path.display(), articles = qa.len(), "Loaded Q&A data");
    Ok(qa)
}

/// Dictionary from `path`, or the built-in one when no path is given
pub fn dictionary_or_builtin(path: Option<&Path>) -> GeoResult<TerminologyDictionary> {
    match path {
        Some(path) => load_dictionary_from_file(path),
        None => TerminologyDictionary::builtin().cloned(),
    }
}

/// Manifest from `path`, or the built-in one when no path is given
pub fn manifest_or_builtin(path: Option<&Path>) -> GeoResult<SiteManifest> {
    match path {
        Some(path) => load_manifest_from_file(path),
        None => SiteManifest::builtin().cloned(),
    }
}
