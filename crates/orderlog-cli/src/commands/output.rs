//! Rendering extracted invoices as JSON, CSV or a text summary.

use orderlog_core::ExtractedInvoice;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// CSV columns for an extracted invoice.
pub const CSV_HEADERS: [&str; 7] = [
    "invoice_number",
    "customer_name",
    "license_number",
    "total_due",
    "order_date_utc",
    "state",
    "client",
];

/// CSV cells for an extracted invoice, empty where absent.
pub fn csv_record(invoice: &ExtractedInvoice) -> [String; 7] {
    [
        invoice.invoice_number.clone().unwrap_or_default(),
        invoice.customer_name.clone().unwrap_or_default(),
        invoice.license_number.clone().unwrap_or_default(),
        invoice.total_due_display().unwrap_or_default(),
        invoice.order_date_iso().unwrap_or_default(),
        invoice.state.clone().unwrap_or_default(),
        invoice.client_label().to_string(),
    ]
}

pub fn format_invoice(invoice: &ExtractedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ExtractedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADERS)?;
    wtr.write_record(csv_record(invoice))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &ExtractedInvoice) -> String {
    fn or_dash(value: Option<&str>) -> &str {
        value.filter(|v| !v.is_empty()).unwrap_or("-")
    }

    let total_due = invoice.total_due_display().map(|t| format!("${}", t));
    let order_date = invoice.order_date_iso();

    let mut output = String::new();
    output.push_str(&format!("Invoice:   {}\n", or_dash(invoice.invoice_number.as_deref())));
    output.push_str(&format!("Customer:  {}\n", or_dash(invoice.customer_name.as_deref())));
    output.push_str(&format!("License:   {}\n", or_dash(invoice.license_number.as_deref())));
    output.push_str(&format!("State:     {}\n", or_dash(invoice.state.as_deref())));
    output.push_str(&format!("Total due: {}\n", or_dash(total_due.as_deref())));
    output.push_str(&format!("Ordered:   {}\n", or_dash(order_date.as_deref())));
    output.push_str(&format!("Client:    {}\n", or_dash(Some(invoice.client_label()))));
    output
}
