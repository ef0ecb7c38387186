//! System clipboard as a source of invoice text.

use tracing::debug;

/// Anything that can hand over the current clipboard text.
pub trait Clipboard {
    /// The clipboard text, or `None` when it holds no text.
    fn get_text(&mut self) -> anyhow::Result<Option<String>>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> anyhow::Result<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| anyhow::anyhow!("Clipboard is not available: {}", e))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> anyhow::Result<Option<String>> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Failed to read clipboard: {}", e)),
        }
    }
}

/// Take invoice text from the clipboard. Blank or non-text contents are an error.
pub fn read_text(clipboard: &mut impl Clipboard) -> anyhow::Result<String> {
    match clipboard.get_text()? {
        Some(text) if !text.trim().is_empty() => {
            debug!("Pasted {} characters from clipboard", text.len());
            Ok(text)
        }
        _ => anyhow::bail!("Clipboard does not contain text."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeClipboard(Option<String>);

    impl Clipboard for FakeClipboard {
        fn get_text(&mut self) -> anyhow::Result<Option<String>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_reads_clipboard_text() {
        let mut clipboard = FakeClipboard(Some("Invoice #4410982".to_string()));
        assert_eq!(read_text(&mut clipboard).unwrap(), "Invoice #4410982");
    }

    #[test]
    fn test_empty_clipboard_is_an_error() {
        for contents in [None, Some(String::new()), Some("  \n".to_string())] {
            let err = read_text(&mut FakeClipboard(contents)).unwrap_err();
            assert_eq!(err.to_string(), "Clipboard does not contain text.");
        }
    }
}
