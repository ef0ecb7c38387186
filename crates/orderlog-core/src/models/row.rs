//! Fixed spreadsheet row layout (columns A through H).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::invoice::InvoiceSubmission;

/// One row appended to the order log sheet.
///
/// Absent values become empty cells so the column positions never shift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// A: Invoice Number
    pub invoice_number: String,
    /// B: State
    pub state: String,
    /// C: Customer Name
    pub customer_name: String,
    /// D: Edits Required
    pub edits_required: String,
    /// E: Uploaded By
    pub uploaded_by: String,
    /// F: Timestamp UTC
    pub timestamp_utc: String,
    /// G: Total Due
    pub total_due: String,
    /// H: License Number
    pub license_number: String,
}

impl SheetRow {
    /// Column headers in sheet order.
    pub const HEADERS: [&'static str; 8] = [
        "Invoice Number",
        "State",
        "Customer Name",
        "Edits Required",
        "Uploaded By",
        "Timestamp UTC",
        "Total Due",
        "License Number",
    ];

    /// Build the row for a submission uploaded at `uploaded_at`.
    pub fn from_submission(submission: &InvoiceSubmission, uploaded_at: DateTime<Utc>) -> Self {
        let invoice = &submission.invoice;

        Self {
            invoice_number: invoice.invoice_number.clone().unwrap_or_default(),
            state: invoice.state.clone().unwrap_or_default(),
            customer_name: invoice.customer_name.clone().unwrap_or_default(),
            edits_required: submission
                .edits_required
                .map(|e| e.as_str().to_string())
                .unwrap_or_default(),
            uploaded_by: submission.uploaded_by.trim().to_string(),
            timestamp_utc: uploaded_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_due: invoice.total_due_display().unwrap_or_default(),
            license_number: invoice.license_number.clone().unwrap_or_default(),
        }
    }

    /// Cell values in column order.
    pub fn values(&self) -> Vec<String> {
        vec![
            self.invoice_number.clone(),
            self.state.clone(),
            self.customer_name.clone(),
            self.edits_required.clone(),
            self.uploaded_by.clone(),
            self.timestamp_utc.clone(),
            self.total_due.clone(),
            self.license_number.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{EditsRequired, ExtractedInvoice};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_row_column_order() {
        let invoice = ExtractedInvoice {
            invoice_number: Some("5550123".to_string()),
            customer_name: Some("Green Leaf Dispensary".to_string()),
            license_number: Some("DCR-000123".to_string()),
            total_due: Some("1234.5".parse().unwrap()),
            state: Some("IL".to_string()),
            ..Default::default()
        };
        let submission = InvoiceSubmission::new(invoice)
            .with_edits_required(EditsRequired::Yes)
            .with_uploaded_by("  Sam ");
        let uploaded_at = Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap();

        let row = SheetRow::from_submission(&submission, uploaded_at);

        assert_eq!(
            row.values(),
            vec![
                "5550123",
                "IL",
                "Green Leaf Dispensary",
                "YES",
                "Sam",
                "2024-03-01T15:04:05Z",
                "1234.50",
                "DCR-000123",
            ]
        );
    }

    #[test]
    fn test_absent_values_are_empty_cells() {
        let submission = InvoiceSubmission::default();
        let uploaded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let values = SheetRow::from_submission(&submission, uploaded_at).values();

        assert_eq!(values.len(), SheetRow::HEADERS.len());
        assert_eq!(values[5], "2024-01-01T00:00:00Z");
        assert!(values.iter().enumerate().all(|(i, v)| i == 5 || v.is_empty()));
    }
}
