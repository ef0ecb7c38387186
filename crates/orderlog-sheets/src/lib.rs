//! Spreadsheet append service for orderlog.
//!
//! This crate provides:
//! - `SheetsClient` appending a `SheetRow` to columns A:H of a sheet
//! - `TokenStore` for the cached authorized-user token file
//! - `OAuthSession` refreshing expired access tokens
//! - `InstalledAppFlow` for the desktop sign-in via a loopback redirect
//!
//! Token state is always passed in explicitly through a `TokenSource`.

pub mod error;
pub mod token;
pub mod session;
pub mod flow;
pub mod client;

#[cfg(test)]
mod test_support;

pub use error::{Result, SheetsError};
pub use token::{AuthorizedUserToken, TokenStore};
pub use session::{OAuthSession, StaticToken, TokenSource};
pub use flow::{ClientSecrets, InstalledAppFlow};
pub use client::{AppendResponse, SheetsClient, SheetsTarget};

/// OAuth scope for reading and writing spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
