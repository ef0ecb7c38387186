//! Error types for the spreadsheet client.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Sheets API answered with a non-success status.
    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// No usable token is available; the user has to sign in.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The OAuth endpoint or redirect reported a failure.
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Bad spreadsheet target or client secrets.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
