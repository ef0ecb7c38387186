//! Regex patterns for order invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `#` followed by six or more digits
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"#(\d{6,})"
    ).unwrap();

    // Everything between CUSTOMER and the first license/shipping/billing marker
    pub static ref CUSTOMER_BLOCK: Regex = Regex::new(
        r"(?is)CUSTOMER\s+(.*?)(?:LICENSE\s*#:|LICENSE NAME:|SHIPPING|BILLING)"
    ).unwrap();

    // Payee line on the next line after the remittance header
    pub static ref PAY_TO_THE_ORDER_OF: Regex = Regex::new(
        r"(?i)PAY TO THE ORDER OF\s*\n\s*([A-Za-z ]+)"
    ).unwrap();

    pub static ref LICENSE_NUMBER: Regex = Regex::new(
        r"(?i)License\s*#:\s*([A-Z0-9\-.]+)"
    ).unwrap();

    // Dollar amount with thousands separators and exactly two decimals
    pub static ref TOTAL_DUE: Regex = Regex::new(
        r"(?i)Total\s+Due\s*\$([\d,]+\.\d{2})"
    ).unwrap();

    // "Order Placed Date Jan. 5, 2024 3:15:00 p.m. EST"
    pub static ref ORDER_PLACED_DATE: Regex = Regex::new(
        r"(?i)Order\s+Placed\s+Date\s+(([A-Za-z]{3})\.\s+(\d{1,2}),\s+(\d{4})\s+(\d{1,2}):(\d{2}):(\d{2})\s+([ap])\.m\.\s+([A-Z]{3}))"
    ).unwrap();

    // ", CA 90210" in a shipping or billing address
    pub static ref STATE_ZIP: Regex = Regex::new(
        r",\s*([A-Z]{2})\s+\d{5}"
    ).unwrap();
}
