//! Terminology consistency checks for authored content
//!
//! Articles should use the canonical name of every dictionary term. These
//! checks find aliases in place of canonical names, definitions that drift from
//! the dictionary, and terms present in only one language version of an article.
//!
//! # Term matching
//!
//! Latin terms are matched on ASCII word boundaries, case-insensitively, so
//! `LP` does not match inside `help` but does match in `提供LP代币`. Terms
//! containing CJK ideographs are matched as plain substrings.

use crate::terminology::dictionary::{Lang, TerminologyDictionary, TerminologyEntry};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::warn;

/// Share of CJK characters above which content is considered Chinese
const ZH_THRESHOLD: f64 = 0.1;

lazy_static! {
    static ref DEFINITION_PUNCTUATION: Regex =
        Regex::new(r"[.,;:!?。，；：！？]").expect("valid punctuation pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace pattern");
}

/// A terminology problem found in an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    /// The term at fault (alias found, or canonical name)
    pub term: String,
    /// What the dictionary says
    pub canonical_definition: String,
    /// What the article does instead
    pub article_definition: String,
    /// Set by the caller once the article is known
    pub article_id: Option<String>,
}

impl ConflictReport {
    pub fn new(term: &str, canonical_definition: &str, article_definition: String) -> Self {
        ConflictReport {
            term: term.to_string(),
            canonical_definition: canonical_definition.to_string(),
            article_definition,
            article_id: None,
        }
    }

    pub fn with_article(mut self, article_id: &str) -> Self {
        self.article_id = Some(article_id.to_string());
        self
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Guess the content language from its share of CJK ideographs
///
/// Empty content is treated as English.
pub fn detect_locale(content: &str) -> Lang {
    let total = content.chars().count();
    if total == 0 {
        return Lang::En;
    }
    let cjk = content.chars().filter(|&c| is_cjk(c)).count();
    if cjk as f64 / total as f64 > ZH_THRESHOLD {
        Lang::Zh
    } else {
        Lang::En
    }
}

/// Lower-case, drop sentence punctuation and collapse whitespace
pub fn normalize_definition(definition: &str) -> String {
    let lowered = definition.to_lowercase();
    let stripped = DEFINITION_PUNCTUATION.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

pub(crate) fn term_pattern(term: &str, case_insensitive: bool) -> Option<Regex> {
    if term.trim().is_empty() {
        return None;
    }
    let escaped = regex::escape(term);
    let flags = if case_insensitive { "(?i)" } else { "" };
    let pattern = if term.chars().any(is_cjk) {
        format!("{}{}", flags, escaped)
    } else {
        format!(r"{}(?-u:\b){}(?-u:\b)", flags, escaped)
    };
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            warn!(%term, error = %e, "Skipping term that does not compile to a pattern");
            None
        }
    }
}

/// Number of occurrences of `term` in `content`
pub fn count_occurrences(content: &str, term: &str, case_insensitive: bool) -> usize {
    term_pattern(term, case_insensitive)
        .map(|re| re.find_iter(content).count())
        .unwrap_or(0)
}

fn contains_term(content: &str, term: &str) -> bool {
    count_occurrences(content, term, true) > 0
}

/// Runs terminology checks against one dictionary
pub struct ContentChecker<'a> {
    dictionary: &'a TerminologyDictionary,
}

impl<'a> ContentChecker<'a> {
    pub fn new(dictionary: &'a TerminologyDictionary) -> Self {
        ContentChecker { dictionary }
    }

    fn alias_report(entry: &TerminologyEntry, alias: &str) -> ConflictReport {
        ConflictReport::new(
            alias,
            &entry.definition,
            format!(
                "Using alias \"{}\" instead of canonical name \"{}\"",
                alias, entry.canonical_name
            ),
        )
    }

    /// Report every alias used in `content` in place of a canonical name
    ///
    /// For entries with a translation block, the term appropriate for the
    /// content language is accepted even when it is listed as an alias, and an
    /// entry whose canonical name is the appropriate term is skipped entirely.
    /// The language is detected when `locale` is `None`.
    pub fn validate_consistency(&self, content: &str, locale: Option<Lang>) -> Vec<ConflictReport> {
        let locale = locale.unwrap_or_else(|| detect_locale(content));
        let mut conflicts = Vec::new();

        for entry in self.dictionary.entries() {
            let appropriate = entry
                .translation
                .as_ref()
                .map(|t| t.term(locale));
            if let Some(appropriate) = appropriate {
                if appropriate == Some(entry.canonical_name.as_str()) {
                    continue;
                }
            }

            for alias in &entry.aliases {
                if appropriate.flatten() == Some(alias.as_str()) {
                    continue;
                }
                if contains_term(content, alias) {
                    conflicts.push(Self::alias_report(entry, alias));
                }
            }
        }

        conflicts
    }

    /// Compare an article's definition of `term` with the dictionary's
    ///
    /// Returns `None` for unknown terms and for definitions that only differ in
    /// case, punctuation or spacing.
    pub fn check_definition_conflict(&self, term: &str, definition: &str) -> Option<ConflictReport> {
        let entry = self.dictionary.lookup(term)?;
        if normalize_definition(&entry.definition) == normalize_definition(definition) {
            return None;
        }
        Some(ConflictReport::new(
            &entry.canonical_name,
            &entry.definition,
            definition.to_string(),
        ))
    }

    /// Entries whose canonical name occurs in `content`
    pub fn extract_terms(&self, content: &str) -> Vec<&'a TerminologyEntry> {
        self.dictionary
            .entries()
            .iter()
            .filter(|entry| contains_term(content, &entry.canonical_name))
            .collect()
    }

    /// Flag translated terms that appear in only one language version
    ///
    /// Chinese terms are matched case-sensitively, English terms ignore case.
    pub fn validate_translation_consistency(
        &self,
        zh_content: &str,
        en_content: &str,
    ) -> Vec<ConflictReport> {
        let mut issues = Vec::new();

        for entry in self.dictionary.entries() {
            let Some(translation) = &entry.translation else {
                continue;
            };
            let zh_term = translation.term(Lang::Zh).unwrap_or(&entry.canonical_name);
            let en_term = translation.term(Lang::En).unwrap_or(&entry.canonical_name);

            let zh_count = count_occurrences(zh_content, zh_term, false);
            let en_count = count_occurrences(en_content, en_term, true);

            let issue = match (zh_count, en_count) {
                (0, 0) => None,
                (zh, 0) => Some(ConflictReport::new(
                    zh_term,
                    &format!("Term appears in Chinese ({} times) but not in English", zh),
                    format!("Missing English translation: {}", en_term),
                )),
                (0, en) => Some(ConflictReport::new(
                    en_term,
                    &format!("Term appears in English ({} times) but not in Chinese", en),
                    format!("Missing Chinese translation: {}", zh_term),
                )),
                _ => None,
            };
            issues.extend(
                issue.map(|report| report.with_article("translation-consistency-check")),
            );
        }

        issues
    }
}
