//! Error types for the orderlog-core library.

use thiserror::Error;

/// Errors related to invoice field extraction.
///
/// A field that is simply not present in the text is never an error; only
/// the order date rule can fail once it has matched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The timezone abbreviation is not in the abbreviation table.
    #[error("unknown timezone abbreviation: {0}")]
    UnknownTimezone(String),

    /// The matched date literal does not describe a real instant.
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
}

/// Errors reading or writing JSON configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
