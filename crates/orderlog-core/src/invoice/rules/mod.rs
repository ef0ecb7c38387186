//! Rule-based field extractors for pasted order invoices.
//!
//! Each rule scans the whole text on its own and keeps the first match, so
//! rules can run in any order. A rule that finds nothing returns `None`.

pub mod identifiers;
pub mod customer;
pub mod client;
pub mod amounts;
pub mod dates;
pub mod patterns;

pub use identifiers::{InvoiceNumberExtractor, LicenseNumberExtractor, StateExtractor};
pub use customer::CustomerNameExtractor;
pub use client::ClientExtractor;
pub use amounts::{parse_dollar_amount, TotalDueExtractor};
pub use dates::{OrderDateExtractor, OrderDateLiteral, ZoneTable};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
