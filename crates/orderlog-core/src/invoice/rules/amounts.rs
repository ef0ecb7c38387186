//! Total due amount.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::TOTAL_DUE;
use super::FieldExtractor;

/// Amount following `Total Due $`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalDueExtractor;

impl FieldExtractor for TotalDueExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Decimal> {
        TOTAL_DUE
            .captures(text)
            .and_then(|caps| parse_dollar_amount(&caps[1]))
    }
}

/// Parse a US-formatted amount (e.g. "1,234.56"), dropping thousands separators.
///
/// The scale of the input is kept, so "1,234.50" formats back as "1234.50".
pub fn parse_dollar_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().trim_start_matches('$').replace(',', "");
    Decimal::from_str(&cleaned).ok()
}
