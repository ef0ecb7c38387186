//! Rule-based parser turning pasted invoice text into an `ExtractedInvoice`.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::ExtractedInvoice;

use super::rules::{
    ClientExtractor, CustomerNameExtractor, FieldExtractor, InvoiceNumberExtractor,
    LicenseNumberExtractor, OrderDateExtractor, StateExtractor, TotalDueExtractor, ZoneTable,
};
use super::Result;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: ExtractedInvoice,
    /// One entry per field that was not found.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Runs every field rule independently over the normalized text.
#[derive(Debug, Clone, Default)]
pub struct InvoiceTextParser {
    customer: CustomerNameExtractor,
    zones: ZoneTable,
}

impl InvoiceTextParser {
    /// Create a parser with the default noise blacklist and zone table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_noise_phrases(&config.noise_phrases)
    }

    /// Replace the customer-name noise blacklist.
    pub fn with_noise_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.customer = CustomerNameExtractor::with_noise_phrases(phrases);
        self
    }

    /// Replace the timezone abbreviation table.
    pub fn with_zone_table(mut self, zones: ZoneTable) -> Self {
        self.zones = zones;
        self
    }

    /// Extract only the invoice fields.
    pub fn extract(&self, text: &str) -> Result<ExtractedInvoice> {
        self.parse(text).map(|result| result.invoice)
    }
}

impl InvoiceParser for InvoiceTextParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Extracting invoice fields from {} characters of text", text.len());

        let clean = normalize(text);

        let order_date_utc = match OrderDateExtractor.extract(&clean) {
            Some(literal) => {
                let literal = literal?;
                debug!("Resolving order date {:?}", literal.source);
                Some(literal.to_utc(&self.zones)?)
            }
            None => None,
        };

        let invoice = ExtractedInvoice {
            invoice_number: InvoiceNumberExtractor.extract(&clean),
            customer_name: self.customer.extract(&clean),
            license_number: LicenseNumberExtractor.extract(&clean),
            total_due: TotalDueExtractor.extract(&clean),
            order_date_utc,
            state: StateExtractor.extract(&clean),
            client: ClientExtractor.extract(&clean),
        };

        let warnings = missing_field_warnings(&invoice);
        for warning in &warnings {
            debug!("{}", warning);
        }

        Ok(ExtractionResult {
            invoice,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Extract invoice fields with the default parser.
pub fn extract(text: &str) -> Result<ExtractedInvoice> {
    InvoiceTextParser::new().extract(text)
}

/// Drop carriage returns so CRLF and LF pastes match the same patterns.
fn normalize(text: &str) -> String {
    text.replace('\r', "")
}

fn missing_field_warnings(invoice: &ExtractedInvoice) -> Vec<String> {
    [
        ("invoice number", invoice.invoice_number.is_none()),
        ("customer name", invoice.customer_name.is_none()),
        ("license number", invoice.license_number.is_none()),
        ("total due", invoice.total_due.is_none()),
        ("order placed date", invoice.order_date_utc.is_none()),
        ("state", invoice.state.is_none()),
        ("client", invoice.client.is_none()),
    ]
    .into_iter()
    .filter(|(_, missing)| *missing)
    .map(|(field, _)| format!("Could not extract {}", field))
    .collect()
}
