//! Appends order rows to a Google Sheet.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use orderlog_core::models::config::SheetsConfig;
use orderlog_core::SheetRow;

use crate::error::{Result, SheetsError};
use crate::session::TokenSource;

/// Which spreadsheet and tab rows go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsTarget {
    pub api_base: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl SheetsTarget {
    pub fn from_config(config: &SheetsConfig) -> Result<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::Config(
                "sheets.spreadsheet_id is not set".to_string(),
            ));
        }

        Ok(Self {
            api_base: config.api_base.clone(),
            spreadsheet_id: config.spreadsheet_id.trim().to_string(),
            sheet_name: config.sheet_name.clone(),
        })
    }

    /// A1 range covering the eight order columns.
    pub fn range(&self) -> String {
        format!("{}!A:H", self.sheet_name)
    }

    /// `values.append` endpoint with the insert options set.
    pub fn append_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SheetsError::Config(format!("invalid api_base {}: {}", self.api_base, e)))?;

        let append = format!("{}:append", self.range());
        url.path_segments_mut()
            .map_err(|_| SheetsError::Config(format!("api_base {} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                append.as_str(),
            ]);

        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED")
            .append_pair("insertDataOption", "INSERT_ROWS");

        Ok(url)
    }
}

/// Summary of an append call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    #[serde(default)]
    pub table_range: Option<String>,
    #[serde(default)]
    pub updates: Option<AppendUpdates>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendUpdates {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: Option<u32>,
}

impl AppendResponse {
    pub fn updated_range(&self) -> Option<&str> {
        self.updates.as_ref().and_then(|u| u.updated_range.as_deref())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Sheets API client with an injected token source.
pub struct SheetsClient<T> {
    http: Client,
    target: SheetsTarget,
    tokens: T,
}

impl<T: TokenSource> SheetsClient<T> {
    pub fn new(target: SheetsTarget, tokens: T) -> Self {
        Self::with_client(Client::new(), target, tokens)
    }

    pub fn with_client(http: Client, target: SheetsTarget, tokens: T) -> Self {
        Self { http, target, tokens }
    }

    pub fn target(&self) -> &SheetsTarget {
        &self.target
    }

    /// Append one row below the last row of the table in columns A:H.
    pub async fn append_row(&mut self, row: &SheetRow) -> Result<AppendResponse> {
        let url = self.target.append_url()?;
        let token = self.tokens.access_token().await?;

        info!(
            "Appending invoice {} to {}",
            row.invoice_number,
            self.target.range()
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "values": [row.values()] }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let appended: AppendResponse = serde_json::from_str(&body)?;
        debug!("Append response: {:?}", appended);
        Ok(appended)
    }
}
