//! Terminology dictionary: loading, validation and lookup
//!
//! The dictionary is a versioned, immutable snapshot. Lookups are
//! case-insensitive exact matches on the canonical name, the authored term,
//! or any alias, scanned in array order.

use crate::error::{GeoError, GeoResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Classification of a dictionary entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermCategory {
    Web3,
    Defi,
    Security,
    Blockchain,
    General,
}

impl TermCategory {
    pub const ALL: [TermCategory; 5] = [
        TermCategory::Web3,
        TermCategory::Defi,
        TermCategory::Security,
        TermCategory::Blockchain,
        TermCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermCategory::Web3 => "web3",
            TermCategory::Defi => "defi",
            TermCategory::Security => "security",
            TermCategory::Blockchain => "blockchain",
            TermCategory::General => "general",
        }
    }
}

impl FromStr for TermCategory {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TermCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| GeoError::Config(format!("Unknown term category '{}'", s)))
    }
}

impl fmt::Display for TermCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content language for bilingual term handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Zh,
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Zh => "zh",
            Lang::En => "en",
        }
    }
}

impl FromStr for Lang {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" => Ok(Lang::Zh),
            "en" | "en-us" => Ok(Lang::En),
            _ => Err(GeoError::UnknownLocale(s.to_string())),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional bilingual forms of an entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermTranslation {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub zh: Option<String>,
    #[serde(default)]
    pub en_definition: Option<String>,
    #[serde(default)]
    pub zh_definition: Option<String>,
}

impl TermTranslation {
    pub fn term(&self, lang: Lang) -> Option<&str> {
        match lang {
            Lang::Zh => self.zh.as_deref(),
            Lang::En => self.en.as_deref(),
        }
    }

    pub fn definition(&self, lang: Lang) -> Option<&str> {
        match lang {
            Lang::Zh => self.zh_definition.as_deref(),
            Lang::En => self.en_definition.as_deref(),
        }
    }
}

/// A single dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyEntry {
    /// The term as authored
    pub term: String,
    /// The one display form content should use
    pub canonical_name: String,
    /// Alternative names that content should avoid
    pub aliases: Vec<String>,
    pub definition: String,
    #[serde(default)]
    pub context: String,
    /// Canonical names of related entries; resolved by lookup, never owned
    pub related_terms: Vec<String>,
    /// URL of the article that first defined the term
    #[serde(default)]
    pub first_defined_in: Option<String>,
    pub category: TermCategory,
    #[serde(default)]
    pub translation: Option<TermTranslation>,
}

/// Dictionary version information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMetadata {
    pub version: String,
    pub last_updated: String,
}

/// A term and definition in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedTerm {
    pub term: String,
    pub definition: String,
}

/// Chinese and English forms of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BilingualPair {
    pub zh: String,
    pub en: String,
    pub zh_definition: String,
    pub en_definition: String,
}

/// The complete, immutable terminology dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyDictionary {
    version: String,
    last_updated: String,
    entries: Vec<TerminologyEntry>,
}

const BUILTIN_DICTIONARY: &str = include_str!("../../data/terminology.json");

lazy_static! {
    static ref BUILTIN: GeoResult<TerminologyDictionary> =
        TerminologyDictionary::from_json_str(BUILTIN_DICTIONARY);
}

/// Trim and lower-case a term for comparison
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

fn is_non_empty_str(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

/// Check the raw JSON shape of a dictionary
///
/// Returns every problem found, each naming the field and, for entries, the
/// entry index. An empty list means the document can be deserialized.
pub fn validate_dictionary(data: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if !data.is_object() {
        errors.push("Dictionary root must be an object".to_string());
        return errors;
    }
    if !is_non_empty_str(data.get("version")) {
        errors.push("Missing required field: version".to_string());
    }
    if !is_non_empty_str(data.get("lastUpdated")) {
        errors.push("Missing required field: lastUpdated".to_string());
    }

    let Some(entries) = data.get("entries").and_then(Value::as_array) else {
        errors.push("Missing or invalid field: entries (must be an array)".to_string());
        return errors;
    };

    for (index, entry) in entries.iter().enumerate() {
        for field in ["term", "canonicalName", "definition"] {
            if !is_non_empty_str(entry.get(field)) {
                errors.push(format!("Entry {}: Missing required field: {}", index, field));
            }
        }
        for field in ["aliases", "relatedTerms"] {
            if !entry.get(field).is_some_and(Value::is_array) {
                errors.push(format!("Entry {}: Field '{}' must be an array", index, field));
            }
        }
        match entry.get("category").and_then(Value::as_str) {
            Some(category) if !category.is_empty() => {
                if category.parse::<TermCategory>().is_err() {
                    errors.push(format!("Entry {}: Invalid category '{}'", index, category));
                }
            }
            _ => errors.push(format!("Entry {}: Missing required field: category", index)),
        }
    }

    errors
}

impl TerminologyDictionary {
    /// The dictionary shipped with the crate, loaded and validated once per process
    pub fn builtin() -> GeoResult<&'static TerminologyDictionary> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Create a dictionary from already-built entries
    ///
    /// # Errors
    /// `DuplicateTerm` if two entries share a canonical name, term or alias.
    pub fn new(
        version: &str,
        last_updated: &str,
        entries: Vec<TerminologyEntry>,
    ) -> GeoResult<Self> {
        let dictionary = TerminologyDictionary {
            version: version.to_string(),
            last_updated: last_updated.to_string(),
            entries,
        };
        dictionary.check_unique_names()?;
        Ok(dictionary)
    }

    /// Parse, validate and load a dictionary from JSON text
    ///
    /// # Errors
    /// - `Json` if the text is not JSON or an entry field has the wrong type
    /// - `InvalidDictionary` listing every missing or malformed required field
    /// - `DuplicateTerm` if a name resolves to two different entries
    pub fn from_json_str(json: &str) -> GeoResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> GeoResult<Self> {
        let errors = validate_dictionary(&value);
        if !errors.is_empty() {
            return Err(GeoError::InvalidDictionary(errors));
        }

        let dictionary: TerminologyDictionary = serde_json::from_value(value)?;
        dictionary.check_unique_names()?;
        info!(
            version = %dictionary.version,
            entries = dictionary.entries.len(),
            "Loaded terminology dictionary"
        );
        Ok(dictionary)
    }

    // Canonical names, terms and aliases share one namespace. A name may repeat
    // inside its own entry (term == canonicalName is common) but not across entries.
    fn check_unique_names(&self) -> GeoResult<()> {
        let mut owners: HashMap<String, usize> = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let names = [&entry.canonical_name, &entry.term]
                .into_iter()
                .chain(entry.aliases.iter());
            for name in names {
                let key = normalize_term(name);
                match owners.get(&key) {
                    Some(&first) if first != index => {
                        return Err(GeoError::DuplicateTerm {
                            key,
                            first,
                            second: index,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(key, index);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            version: self.version.clone(),
            last_updated: self.last_updated.clone(),
        }
    }

    /// All entries in source order
    pub fn entries(&self) -> &[TerminologyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `input` to its entry by canonical name, authored term or alias
    ///
    /// Input is trimmed and lower-cased; comparison is case-insensitive and
    /// exact. The first matching entry in source order wins.
    pub fn lookup(&self, input: &str) -> Option<&TerminologyEntry> {
        let needle = normalize_term(input);
        self.entries.iter().find(|entry| {
            normalize_term(&entry.canonical_name) == needle
                || normalize_term(&entry.term) == needle
                || entry
                    .aliases
                    .iter()
                    .any(|alias| normalize_term(alias) == needle)
        })
    }

    /// Resolve by canonical name only
    pub fn lookup_canonical(&self, name: &str) -> Option<&TerminologyEntry> {
        let needle = normalize_term(name);
        self.entries
            .iter()
            .find(|entry| normalize_term(&entry.canonical_name) == needle)
    }

    /// True if `input` is one of `entry`'s aliases
    pub fn is_alias(&self, input: &str, entry: &TerminologyEntry) -> bool {
        let needle = normalize_term(input);
        entry
            .aliases
            .iter()
            .any(|alias| normalize_term(alias) == needle)
    }

    /// True if `input` is an alias of any entry
    pub fn is_any_alias(&self, input: &str) -> bool {
        self.entries.iter().any(|entry| self.is_alias(input, entry))
    }

    /// Canonical name for `input`, or `input` unchanged when unknown
    pub fn canonical_name(&self, input: &str) -> String {
        self.lookup(input)
            .map(|entry| entry.canonical_name.clone())
            .unwrap_or_else(|| input.to_string())
    }

    /// Entries named by `entry.related_terms`; unresolved names are dropped
    pub fn related_entries(&self, entry: &TerminologyEntry) -> Vec<&TerminologyEntry> {
        entry
            .related_terms
            .iter()
            .filter_map(|name| {
                let related = self.lookup_canonical(name);
                if related.is_none() {
                    debug!(
                        term = %entry.canonical_name,
                        related = %name,
                        "Dropping unresolved related term"
                    );
                }
                related
            })
            .collect()
    }

    /// Related terms of the entry `input` resolves to; empty when unknown
    pub fn related_terms_of(&self, input: &str) -> Vec<&TerminologyEntry> {
        self.lookup(input)
            .map(|entry| self.related_entries(entry))
            .unwrap_or_default()
    }

    pub fn entries_in_category(&self, category: TermCategory) -> Vec<&TerminologyEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }

    /// Term and definition of `input` in `lang`
    ///
    /// Only entries carrying a translation block have one. Missing parts of the
    /// block fall back to the canonical name and definition.
    pub fn translation(&self, input: &str, lang: Lang) -> Option<LocalizedTerm> {
        let entry = self.lookup(input)?;
        let translation = entry.translation.as_ref()?;
        Some(LocalizedTerm {
            term: translation
                .term(lang)
                .unwrap_or(&entry.canonical_name)
                .to_string(),
            definition: translation
                .definition(lang)
                .unwrap_or(&entry.definition)
                .to_string(),
        })
    }

    pub fn has_translation(&self, input: &str) -> bool {
        self.lookup(input)
            .is_some_and(|entry| entry.translation.is_some())
    }

    pub fn bilingual_pair(&self, input: &str) -> Option<BilingualPair> {
        let zh = self.translation(input, Lang::Zh)?;
        let en = self.translation(input, Lang::En)?;
        Some(BilingualPair {
            zh: zh.term,
            en: en.term,
            zh_definition: zh.definition,
            en_definition: en.definition,
        })
    }

    /// Append the English form in full-width parentheses: `智能合约（Smart Contract）`
    ///
    /// `input` is returned unchanged when there is no English form, or when the
    /// English form is `input` itself or the canonical name.
    pub fn format_with_english(&self, input: &str) -> String {
        let english = self.lookup(input).and_then(|entry| {
            let en = entry.translation.as_ref()?.en.as_deref()?;
            (en != input && en != entry.canonical_name).then_some(en)
        });
        match english {
            Some(en) => format!("{}（{}）", input, en),
            None => input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn entry(canonical: &str, aliases: &[&str], related: &[&str]) -> TerminologyEntry {
        TerminologyEntry {
            term: canonical.to_string(),
            canonical_name: canonical.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            definition: format!("Definition of {}", canonical),
            context: String::new(),
            related_terms: related.iter().map(|r| r.to_string()).collect(),
            first_defined_in: None,
            category: TermCategory::General,
            translation: None,
        }
    }

    fn small_dictionary() -> TerminologyDictionary {
        let mut contract = entry("智能合约", &["Smart Contract"], &["区块链", "不存在的术语"]);
        contract.category = TermCategory::Blockchain;
        contract.translation = Some(TermTranslation {
            en: Some("Smart Contract".to_string()),
            zh: Some("智能合约".to_string()),
            en_definition: Some("Self-executing code".to_string()),
            zh_definition: None,
        });
        let mut chain = entry("区块链", &["Blockchain"], &[]);
        chain.category = TermCategory::Blockchain;
        let defi = entry("去中心化金融", &["DeFi"], &["智能合约"]);
        TerminologyDictionary::new("1.0.0", "2025-01-01", vec![contract, chain, defi]).unwrap()
    }

    #[test]
    fn test_lookup_alias_any_case() {
        let dict = small_dictionary();
        let found = dict.lookup("  smart CONTRACT ").unwrap();
        assert_eq!(found.canonical_name, "智能合约");
        assert!(dict.is_alias("smart contract", found));
        assert!(!dict.is_alias("智能合约", found));
    }

    #[test]
    fn test_lookup_not_found() {
        let dict = small_dictionary();
        assert!(dict.lookup("nonexistent-term").is_none());
        assert!(dict.lookup("").is_none());
        assert_eq!(dict.canonical_name("nonexistent-term"), "nonexistent-term");
    }

    #[test]
    fn test_lookup_by_term_field() {
        let mut custom = entry("Web3", &[], &[]);
        custom.term = "web3.0".to_string();
        let dict = TerminologyDictionary::new("1", "2025", vec![custom]).unwrap();
        assert_eq!(dict.lookup("WEB3.0").unwrap().canonical_name, "Web3");
        assert_eq!(dict.lookup("web3").unwrap().canonical_name, "Web3");
    }

    #[test]
    fn test_canonical_identity() {
        let dict = small_dictionary();
        for entry in dict.entries() {
            assert_eq!(dict.lookup(&entry.canonical_name), Some(entry));
        }
        let builtin = TerminologyDictionary::builtin().unwrap();
        for entry in builtin.entries() {
            assert_eq!(builtin.lookup(&entry.canonical_name), Some(entry));
            assert_eq!(builtin.lookup_canonical(&entry.canonical_name), Some(entry));
        }
    }

    #[test]
    fn test_padded_names_still_resolve() {
        let mut defi = entry("DeFi ", &[" Decentralized Finance"], &[]);
        defi.term = " 去中心化金融".to_string();
        let chain = entry("区块链", &[], &["DeFi"]);
        let dict = TerminologyDictionary::new("1.0.0", "2025-01-01", vec![defi, chain]).unwrap();
        let defi = &dict.entries()[0];
        assert_eq!(dict.lookup(&defi.canonical_name), Some(defi));
        assert_eq!(dict.lookup("defi"), Some(defi));
        assert_eq!(dict.lookup("去中心化金融"), Some(defi));
        assert!(dict.is_alias("decentralized finance", defi));
        assert_eq!(dict.lookup_canonical("DEFI"), Some(defi));
        assert_eq!(dict.related_entries(&dict.entries()[1]), vec![defi]);
    }

    #[test]
    fn test_related_entries_drop_unresolved() {
        let dict = small_dictionary();
        let contract = dict.lookup("智能合约").unwrap();
        let related: Vec<&str> = dict
            .related_entries(contract)
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(related, vec!["区块链"]);
        assert_eq!(dict.related_terms_of("defi").len(), 1);
        assert!(dict.related_terms_of("unknown").is_empty());
    }

    #[test]
    fn test_is_any_alias() {
        let dict = small_dictionary();
        assert!(dict.is_any_alias("defi"));
        assert!(!dict.is_any_alias("去中心化金融"));
    }

    #[test]
    fn test_categories() {
        let dict = small_dictionary();
        assert_eq!(dict.entries_in_category(TermCategory::Blockchain).len(), 2);
        assert_eq!(dict.entries_in_category(TermCategory::General).len(), 1);
        assert!(dict.entries_in_category(TermCategory::Security).is_empty());
        assert_eq!("defi".parse::<TermCategory>().unwrap(), TermCategory::Defi);
        assert!("crypto".parse::<TermCategory>().is_err());
    }

    #[test]
    fn test_translation_and_fallbacks() {
        let dict = small_dictionary();
        let en = dict.translation("智能合约", Lang::En).unwrap();
        assert_eq!(en.term, "Smart Contract");
        assert_eq!(en.definition, "Self-executing code");
        let zh = dict.translation("smart contract", Lang::Zh).unwrap();
        assert_eq!(zh.term, "智能合约");
        assert_eq!(zh.definition, "Definition of 智能合约");

        assert!(dict.translation("区块链", Lang::En).is_none());
        assert!(dict.has_translation("智能合约"));
        assert!(!dict.has_translation("区块链"));

        let pair = dict.bilingual_pair("智能合约").unwrap();
        assert_eq!(pair.zh, "智能合约");
        assert_eq!(pair.en, "Smart Contract");
    }

    #[test]
    fn test_format_with_english() {
        let dict = small_dictionary();
        assert_eq!(dict.format_with_english("智能合约"), "智能合约（Smart Contract）");
        assert_eq!(dict.format_with_english("Smart Contract"), "Smart Contract");
        assert_eq!(dict.format_with_english("区块链"), "区块链");
        assert_eq!(dict.format_with_english("unknown"), "unknown");
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let data = json!({
            "version": "1.0.0",
            "entries": [
                { "term": "a", "canonicalName": "A", "definition": "d",
                  "aliases": [], "relatedTerms": [], "category": "general" },
                { "canonicalName": "B", "definition": "",
                  "aliases": "not-a-list", "category": "general" },
                { "term": "c", "canonicalName": "C", "definition": "d",
                  "aliases": [], "relatedTerms": [], "category": "crypto" }
            ]
        });
        let Err(GeoError::InvalidDictionary(errors)) = TerminologyDictionary::from_value(data)
        else {
            panic!("expected an invalid dictionary error");
        };
        assert_eq!(
            errors,
            vec![
                "Missing required field: lastUpdated",
                "Entry 1: Missing required field: term",
                "Entry 1: Missing required field: definition",
                "Entry 1: Field 'aliases' must be an array",
                "Entry 1: Field 'relatedTerms' must be an array",
                "Entry 2: Invalid category 'crypto'",
            ]
        );
    }

    #[test]
    fn test_entries_must_be_a_list() {
        let errors = validate_dictionary(&json!({ "version": "1", "lastUpdated": "x", "entries": {} }));
        assert_eq!(errors, vec!["Missing or invalid field: entries (must be an array)"]);
        assert_eq!(
            validate_dictionary(&json!([])),
            vec!["Dictionary root must be an object"]
        );
    }

    #[test]
    fn test_duplicate_alias_across_entries() {
        let result = TerminologyDictionary::new(
            "1",
            "2025",
            vec![entry("智能合约", &["SC"], &[]), entry("稳定币", &["sc"], &[])],
        );
        assert_eq!(
            result,
            Err(GeoError::DuplicateTerm {
                key: "sc".to_string(),
                first: 0,
                second: 1
            })
        );
    }

    #[test]
    fn test_alias_colliding_with_canonical_name() {
        let result = TerminologyDictionary::new(
            "1",
            "2025",
            vec![entry("DeFi", &[], &[]), entry("去中心化金融", &["defi"], &[])],
        );
        assert!(matches!(result, Err(GeoError::DuplicateTerm { first: 0, second: 1, .. })));
    }

    #[test]
    fn test_repeated_name_inside_one_entry_is_fine() {
        let result = TerminologyDictionary::new("1", "2025", vec![entry("DeFi", &["defi"], &[])]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_builtin_dictionary() {
        let dict = TerminologyDictionary::builtin().unwrap();
        assert!(!dict.is_empty());
        assert_eq!(dict.metadata().version, "1.2.0");
        for term in ["智能合约", "Smart Contract", "DeFi", "去中心化金融"] {
            assert!(dict.lookup(term).is_some(), "{term}");
        }
        assert_eq!(dict.canonical_name("DeFi"), "去中心化金融");
        for entry in dict.entries() {
            assert_eq!(
                dict.related_entries(entry).len(),
                entry.related_terms.len(),
                "unresolved related term in {}",
                entry.canonical_name
            );
        }
    }

    proptest! {
        #[test]
        fn prop_lookup_ignores_case_and_padding(
            index in 0usize..3,
            left in "[ \t]{0,3}",
            right in "[ \t]{0,3}",
            upper in any::<bool>(),
        ) {
            let dict = small_dictionary();
            let entry = &dict.entries()[index];
            let alias = &entry.aliases[0];
            let cased = if upper { alias.to_uppercase() } else { alias.to_lowercase() };
            let input = format!("{}{}{}", left, cased, right);
            prop_assert_eq!(dict.lookup(&input), Some(entry));
        }

        #[test]
        fn prop_builtin_names_resolve_to_their_entry(
            index in any::<prop::sample::Index>(),
            left in "[ \t]{0,2}",
            right in "[ \t]{0,2}",
            upper in any::<bool>(),
        ) {
            let dict = TerminologyDictionary::builtin().unwrap();
            let entry = index.get(dict.entries());
            let names = [&entry.canonical_name, &entry.term]
                .into_iter()
                .chain(entry.aliases.iter());
            for name in names {
                let cased = if upper { name.to_uppercase() } else { name.to_lowercase() };
                let input = format!("{}{}{}", left, cased, right);
                prop_assert_eq!(dict.lookup(&input), Some(entry));
            }
        }
    }
}
