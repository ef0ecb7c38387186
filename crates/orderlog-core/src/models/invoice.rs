//! Invoice data extracted from pasted text and the submission built on top of it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fields pulled out of a single pasted invoice.
///
/// Every field is optional: a rule that finds nothing leaves its field as
/// `None`, and the JSON form omits it. There is no cross-field consistency
/// guarantee; `state`, for instance, comes from whichever address block
/// appears first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    /// Invoice number (six or more digits, without the leading `#`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Customer name from the CUSTOMER block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Cannabis license number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,

    /// Total due with two fraction digits, no separators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_due: Option<Decimal>,

    /// Order placed date converted to UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date_utc: Option<DateTime<Utc>>,

    /// Two-letter state code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Canonical payee from the "Pay to the order of" block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl ExtractedInvoice {
    /// Returns true when no rule produced a value.
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.customer_name.is_none()
            && self.license_number.is_none()
            && self.total_due.is_none()
            && self.order_date_utc.is_none()
            && self.state.is_none()
            && self.client.is_none()
    }

    /// Order date as ISO-8601 with a `Z` suffix.
    pub fn order_date_iso(&self) -> Option<String> {
        self.order_date_utc
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Total due rendered with exactly two decimals.
    pub fn total_due_display(&self) -> Option<String> {
        self.total_due.map(|amount| format!("{:.2}", amount))
    }

    /// Canonical client name, or an empty string when no payee was recognized.
    pub fn client_label(&self) -> &'static str {
        self.client.map(Client::as_str).unwrap_or("")
    }
}

/// Recognized payee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Client {
    #[serde(rename = "GTI")]
    Gti,
    #[serde(rename = "Ascend")]
    Ascend,
}

impl Client {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gti => "GTI",
            Self::Ascend => "Ascend",
        }
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the uploaded order needs edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EditsRequired {
    Yes,
    No,
}

impl EditsRequired {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }
}

impl fmt::Display for EditsRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditsRequired {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "YES" | "Y" => Ok(Self::Yes),
            "NO" | "N" => Ok(Self::No),
            other => Err(format!("expected YES or NO, got {:?}", other)),
        }
    }
}

/// Fields that must be present before a row can be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    InvoiceNumber,
    CustomerName,
    LicenseNumber,
    TotalDue,
    State,
    EditsRequired,
    UploadedBy,
}

impl RequiredField {
    /// All required fields in reporting order.
    pub const ALL: [RequiredField; 7] = [
        Self::InvoiceNumber,
        Self::CustomerName,
        Self::LicenseNumber,
        Self::TotalDue,
        Self::State,
        Self::EditsRequired,
        Self::UploadedBy,
    ];

    /// Machine key, matching the JSON field name.
    pub fn key(self) -> &'static str {
        match self {
            Self::InvoiceNumber => "invoice_number",
            Self::CustomerName => "customer_name",
            Self::LicenseNumber => "license_number",
            Self::TotalDue => "total_due",
            Self::State => "state",
            Self::EditsRequired => "edits_required",
            Self::UploadedBy => "uploaded_by",
        }
    }

    /// Human-readable label shown to the uploader.
    pub fn label(self) -> &'static str {
        match self {
            Self::InvoiceNumber => "Invoice Number",
            Self::CustomerName => "Customer Name",
            Self::LicenseNumber => "License Number",
            Self::TotalDue => "Total Due",
            Self::State => "State",
            Self::EditsRequired => "Edits Required",
            Self::UploadedBy => "Uploaded By",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An extracted invoice plus the values the uploader supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSubmission {
    #[serde(flatten)]
    pub invoice: ExtractedInvoice,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub edits_required: Option<EditsRequired>,

    #[serde(default)]
    pub uploaded_by: String,
}

impl InvoiceSubmission {
    pub fn new(invoice: ExtractedInvoice) -> Self {
        Self {
            invoice,
            edits_required: None,
            uploaded_by: String::new(),
        }
    }

    pub fn with_edits_required(mut self, edits: EditsRequired) -> Self {
        self.edits_required = Some(edits);
        self
    }

    pub fn with_uploaded_by(mut self, user: impl Into<String>) -> Self {
        self.uploaded_by = user.into();
        self
    }

    /// Whether a required field holds a non-blank value.
    pub fn has(&self, field: RequiredField) -> bool {
        fn filled(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        match field {
            RequiredField::InvoiceNumber => filled(&self.invoice.invoice_number),
            RequiredField::CustomerName => filled(&self.invoice.customer_name),
            RequiredField::LicenseNumber => filled(&self.invoice.license_number),
            RequiredField::TotalDue => self.invoice.total_due.is_some(),
            RequiredField::State => filled(&self.invoice.state),
            RequiredField::EditsRequired => self.edits_required.is_some(),
            RequiredField::UploadedBy => !self.uploaded_by.trim().is_empty(),
        }
    }

    /// Required fields that are absent or blank, in reporting order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| !self.has(*field))
            .collect()
    }

    /// Labels of the missing required fields.
    pub fn missing_labels(&self) -> Vec<&'static str> {
        self.missing_fields().into_iter().map(RequiredField::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn complete_invoice() -> ExtractedInvoice {
        ExtractedInvoice {
            invoice_number: Some("1234567".to_string()),
            customer_name: Some("Acme Corp".to_string()),
            license_number: Some("MMD-0042".to_string()),
            total_due: Some("1234.56".parse().unwrap()),
            order_date_utc: None,
            state: Some("CA".to_string()),
            client: Some(Client::Gti),
        }
    }

    #[test]
    fn test_complete_submission_has_nothing_missing() {
        let submission = InvoiceSubmission::new(complete_invoice())
            .with_edits_required(EditsRequired::No)
            .with_uploaded_by("Dana");

        assert!(submission.missing_fields().is_empty());
    }

    #[test]
    fn test_empty_submission_lists_every_label_in_order() {
        let submission = InvoiceSubmission::default();

        assert_eq!(
            submission.missing_labels(),
            vec![
                "Invoice Number",
                "Customer Name",
                "License Number",
                "Total Due",
                "State",
                "Edits Required",
                "Uploaded By",
            ]
        );
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut invoice = complete_invoice();
        invoice.customer_name = Some("   ".to_string());

        let submission = InvoiceSubmission::new(invoice)
            .with_edits_required(EditsRequired::Yes)
            .with_uploaded_by(" ");

        assert_eq!(
            submission.missing_fields(),
            vec![RequiredField::CustomerName, RequiredField::UploadedBy]
        );
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let invoice = ExtractedInvoice {
            invoice_number: Some("123456".to_string()),
            total_due: Some("99.50".parse().unwrap()),
            ..Default::default()
        };

        let json = serde_json::to_value(&invoice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "invoice_number": "123456", "total_due": "99.50" })
        );
    }

    #[test]
    fn test_client_label() {
        let mut invoice = ExtractedInvoice::default();
        assert_eq!(invoice.client_label(), "");

        invoice.client = Some(Client::Ascend);
        assert_eq!(invoice.client_label(), "Ascend");
        assert_eq!(serde_json::to_string(&Client::Gti).unwrap(), "\"GTI\"");
    }

    #[test]
    fn test_parse_edits_required() {
        assert_eq!("yes".parse::<EditsRequired>(), Ok(EditsRequired::Yes));
        assert_eq!(" NO ".parse::<EditsRequired>(), Ok(EditsRequired::No));
        assert!("maybe".parse::<EditsRequired>().is_err());
    }
}
