//! Core library for sales-ops order logging.
//!
//! This crate provides:
//! - Invoice field extraction from pasted text (invoice number, customer,
//!   license, total due, order date, state, payee)
//! - Presence validation of the fields an upload requires
//! - Mapping of a submission onto the fixed spreadsheet row layout
//! - Configuration and the remembered user profile

pub mod error;
pub mod models;
pub mod invoice;

pub use error::{ConfigError, ExtractionError};
pub use models::invoice::{Client, EditsRequired, ExtractedInvoice, InvoiceSubmission, RequiredField};
pub use models::row::SheetRow;
pub use models::profile::UserProfile;
pub use models::config::OrderlogConfig;
pub use invoice::{extract, ExtractionResult, InvoiceParser, InvoiceTextParser};
