//! CLI subcommands and the input helpers they share.

pub mod auth;
pub mod batch;
pub mod clipboard;
pub mod config;
pub mod extract;
pub mod output;
pub mod upload;

use std::io::{self, BufRead, IsTerminal, Read};
use std::path::{Path, PathBuf};

use console::Term;
use tracing::debug;

use orderlog_core::OrderlogConfig;

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OrderlogConfig> {
    if let Some(path) = config_path {
        return Ok(OrderlogConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(OrderlogConfig::from_file(&default_path)?)
    } else {
        Ok(OrderlogConfig::default())
    }
}

/// Read invoice text from the clipboard, a file, or stdin when no file (or
/// `-`) is given.
///
/// An interactive terminal reads pasted lines until the first empty line.
pub fn read_invoice_text(input: Option<&PathBuf>, from_clipboard: bool) -> anyhow::Result<String> {
    if from_clipboard {
        return clipboard::read_text(&mut clipboard::SystemClipboard::new()?);
    }

    if let Some(path) = input.filter(|p| p.as_os_str() != "-") {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste invoice text below. Press ENTER twice when done:\n");

        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    } else {
        let mut text = String::new();
        stdin.lock().read_to_string(&mut text)?;
        Ok(text)
    }
}

/// Ask a question on the terminal. Returns `None` when not interactive or
/// the answer is blank.
pub fn prompt(question: &str) -> anyhow::Result<Option<String>> {
    let term = Term::stderr();
    if !term.is_term() || !io::stdin().is_terminal() {
        return Ok(None);
    }

    term.write_str(question)?;
    let answer = term.read_line()?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}
