use thiserror::Error;

/// Error types for site configuration, dictionary loading and URL generation
///
/// Call-time validators (`validate_hreflang_url`, `validate_hreflang_code`) never
/// produce these; they answer with a boolean. Errors are reserved for malformed
/// static data and for configuration the generator cannot honor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    /// One or more required dictionary fields are missing or have the wrong shape.
    /// Each problem is listed separately, e.g. `Entry 3: Missing required field: term`.
    #[error("Invalid terminology dictionary: {}", .0.join(", "))]
    InvalidDictionary(Vec<String>),

    /// The same name resolves to two different dictionary entries
    #[error("Duplicate term '{key}' in entries {first} and {second}")]
    DuplicateTerm {
        key: String,
        first: usize,
        second: usize,
    },

    /// A locale code with no entry in the locale table
    #[error("Unknown locale '{0}': no BCP-47 tag configured")]
    UnknownLocale(String),

    /// A locale table entry whose tag is not well-formed BCP-47
    #[error("Invalid BCP-47 tag '{tag}' for locale '{locale}'")]
    InvalidLocaleTag { locale: String, tag: String },

    /// Base URL is not an absolute http(s) URL with a host
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Environment or manifest configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File read errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON syntax or shape errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Json(err.to_string())
    }
}

/// Result type for GEO operations
pub type GeoResult<T> = Result<T, GeoError>;
