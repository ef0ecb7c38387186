//! Customer name from the CUSTOMER block.

use super::patterns::CUSTOMER_BLOCK;
use super::FieldExtractor;
use crate::models::config::default_noise_phrases;

/// Picks the first meaningful line between `CUSTOMER` and the next
/// license, shipping or billing marker.
#[derive(Debug, Clone)]
pub struct CustomerNameExtractor {
    /// Uppercased noise phrases.
    noise_phrases: Vec<String>,
}

impl CustomerNameExtractor {
    /// Extractor with the default noise blacklist.
    pub fn new() -> Self {
        Self::with_noise_phrases(default_noise_phrases())
    }

    /// Use a custom noise blacklist. Phrases are compared case-insensitively.
    pub fn with_noise_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            noise_phrases: phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_uppercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// The uppercased noise phrases in use.
    pub fn noise_phrases(&self) -> &[String] {
        &self.noise_phrases
    }

    fn is_noise(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.noise_phrases.iter().any(|phrase| upper.contains(phrase.as_str()))
    }
}

impl Default for CustomerNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CustomerNameExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        let caps = CUSTOMER_BLOCK.captures(text)?;

        caps[1]
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| !self.is_noise(line))
            .map(str::to_string)
    }
}
