//! Canonical payee from the "Pay to the order of" block.

use super::patterns::PAY_TO_THE_ORDER_OF;
use super::FieldExtractor;
use crate::models::invoice::Client;

#[derive(Debug, Default, Clone, Copy)]
pub struct ClientExtractor;

impl FieldExtractor for ClientExtractor {
    type Output = Client;

    fn extract(&self, text: &str) -> Option<Client> {
        let caps = PAY_TO_THE_ORDER_OF.captures(text)?;
        canonical_client(caps[1].trim())
    }
}

/// Map a free-text payee onto a known client by prefix.
pub fn canonical_client(payee: &str) -> Option<Client> {
    let upper = payee.to_uppercase();

    if upper.starts_with("GTI") {
        Some(Client::Gti)
    } else if upper.starts_with("ASCEND") {
        Some(Client::Ascend)
    } else {
        None
    }
}
