/// Terminology Module
///
/// Keeps the vocabulary of the site's articles consistent. A versioned
/// dictionary maps every technical term to one canonical name; content that
/// uses an alias, redefines a term, or translates it inconsistently is reported.
///
/// # Components
///
/// 1. **Dictionary** - Loads and validates the JSON dictionary, resolves names and aliases
/// 2. **Content Checker** - Scans authored text for terminology problems
///
/// # Example
///
/// ```
/// use geo_i18n::terminology::{ContentChecker, Lang, TerminologyDictionary};
///
/// let dictionary = TerminologyDictionary::builtin().unwrap();
/// let entry = dictionary.lookup(" smart contract ").unwrap();
/// assert_eq!(entry.canonical_name, "智能合约");
///
/// let checker = ContentChecker::new(dictionary);
/// let conflicts = checker.validate_consistency("An AMM sets prices.", Some(Lang::En));
/// assert_eq!(conflicts[0].term, "AMM");
/// ```
pub mod content;
pub mod dictionary;

pub use content::{ConflictReport, ContentChecker, count_occurrences, detect_locale, normalize_definition};
pub use dictionary::{
    BilingualPair, DictionaryMetadata, Lang, LocalizedTerm, TermCategory, TermTranslation,
    TerminologyDictionary, TerminologyEntry, normalize_term, validate_dictionary,
};
