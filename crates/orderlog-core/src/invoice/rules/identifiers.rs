//! Invoice number, license number and state code.

use super::patterns::{INVOICE_NUMBER, LICENSE_NUMBER, STATE_ZIP};
use super::FieldExtractor;

/// Digits following the first `#` with at least six digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvoiceNumberExtractor;

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        INVOICE_NUMBER.captures(text).map(|caps| caps[1].to_string())
    }
}

/// Token following `License #:`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LicenseNumberExtractor;

impl FieldExtractor for LicenseNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        LICENSE_NUMBER.captures(text).map(|caps| caps[1].to_string())
    }
}

/// Two-letter state code preceding a five-digit zip.
///
/// Shipping and billing blocks are not told apart; whichever address comes
/// first wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateExtractor;

impl FieldExtractor for StateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        STATE_ZIP.captures(text).map(|caps| caps[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_needs_six_digits() {
        let extractor = InvoiceNumberExtractor;

        assert_eq!(extractor.extract("Invoice #12345"), None);
        assert_eq!(extractor.extract("Invoice #123456"), Some("123456".to_string()));
        assert_eq!(
            extractor.extract("Ref #99 then Invoice #0098765432 and #111111"),
            Some("0098765432".to_string())
        );
    }

    #[test]
    fn test_invoice_number_absent() {
        assert_eq!(InvoiceNumberExtractor.extract("Order 1234567 has no hash"), None);
    }

    #[test]
    fn test_license_number() {
        let extractor = LicenseNumberExtractor;

        assert_eq!(
            extractor.extract("License #: AU-R-000123\nNext line"),
            Some("AU-R-000123".to_string())
        );
        assert_eq!(
            extractor.extract("LICENSE#:C10-0000123.LIC"),
            Some("C10-0000123.LIC".to_string())
        );
        assert_eq!(extractor.extract("License Name: Foo"), None);
    }

    #[test]
    fn test_state_takes_first_address() {
        let text = "Shipping\n12 Main St, Springfield, IL 62701\nBilling\n1 Elm, Austin, TX 73301";

        assert_eq!(StateExtractor.extract(text), Some("IL".to_string()));
        assert_eq!(StateExtractor.extract("Los Angeles, CA 90210"), Some("CA".to_string()));
    }

    #[test]
    fn test_state_requires_uppercase_and_zip() {
        assert_eq!(StateExtractor.extract("Boston, ma 02110"), None);
        assert_eq!(StateExtractor.extract("Boston, MA 021"), None);
    }
}
