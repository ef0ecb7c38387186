//! Configuration for extraction, the spreadsheet target and the user profile.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for orderlog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderlogConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spreadsheet append target and credentials.
    pub sheets: SheetsConfig,

    /// Remembered user profile.
    pub profile: ProfileConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Substrings that disqualify a line from being the customer name.
    /// Matched against the uppercased line.
    pub noise_phrases: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            noise_phrases: default_noise_phrases(),
        }
    }
}

/// Noise phrases found in the CUSTOMER block of typical order exports.
pub fn default_noise_phrases() -> Vec<String> {
    ["PAYMENT TERMS", "N/A", "LICENSE", "LICENSE NAME", "LOCATION EMAIL"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Spreadsheet target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Target spreadsheet ID.
    pub spreadsheet_id: String,

    /// Sheet (tab) name; rows are appended to columns A:H.
    pub sheet_name: String,

    /// Base URL of the Sheets API.
    pub api_base: String,

    /// OAuth client secrets file for the installed-app flow.
    pub credentials_file: PathBuf,

    /// Where the authorized-user token is cached.
    pub token_file: PathBuf,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: "Sheet1".to_string(),
            api_base: "https://sheets.googleapis.com".to_string(),
            credentials_file: PathBuf::from("credentials.json"),
            token_file: data_dir().join("token.json"),
        }
    }
}

/// User profile configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// File holding the remembered uploader name.
    pub user_file: PathBuf,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user_file: data_dir().join("user.json"),
        }
    }
}

/// Per-user data directory (`~/.orderlog`).
fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".orderlog")
}

impl OrderlogConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}
