//! Upload command - extract, validate and append one invoice to the order sheet.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use orderlog_core::invoice::InvoiceTextParser;
use orderlog_core::{EditsRequired, InvoiceSubmission, SheetRow, UserProfile};
use orderlog_sheets::{OAuthSession, SheetsClient, SheetsError, SheetsTarget, TokenStore};

use super::{load_config, prompt, read_invoice_text};

/// Arguments for the upload command.
#[derive(Args)]
pub struct UploadArgs {
    /// Input text file (default: stdin)
    input: Option<PathBuf>,

    /// Read the invoice text from the system clipboard
    #[arg(long, conflicts_with = "input")]
    clipboard: bool,

    /// Whether the order needs edits (YES or NO)
    #[arg(short, long)]
    edits: Option<EditsRequired>,

    /// Uploader name (default: the remembered user)
    #[arg(short, long)]
    user: Option<String>,

    /// Print the row instead of appending it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: UploadArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = read_invoice_text(args.input.as_ref(), args.clipboard)?;
    if text.trim().is_empty() {
        anyhow::bail!("Please paste invoice text.");
    }

    let profile = UserProfile::load(&config.profile.user_file)?;
    let user = match args.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => Some(user.to_string()),
        None => match profile.user() {
            Some(user) => Some(user.to_string()),
            None => prompt("Logged by: ")?,
        },
    };
    let Some(user) = user else {
        anyhow::bail!("Please select or enter your name (--user).");
    };

    if profile.user() != Some(user.as_str()) {
        UserProfile::new(&user).save(&config.profile.user_file)?;
        info!("Remembered user {}", user);
    }

    let invoice = InvoiceTextParser::from_config(&config.extraction).extract(&text)?;
    if invoice.is_empty() {
        anyhow::bail!("No invoice data could be extracted.");
    }

    let edits = match args.edits {
        Some(edits) => Some(edits),
        None => prompt("Edits required? [yes/no]: ")?
            .map(|answer| answer.parse::<EditsRequired>())
            .transpose()
            .map_err(|e| anyhow::anyhow!(e))?,
    };

    let mut submission = InvoiceSubmission::new(invoice).with_uploaded_by(user);
    submission.edits_required = edits;

    let missing = submission.missing_labels();
    if !missing.is_empty() {
        eprintln!("{}", style("The following fields are missing:").red());
        eprintln!();
        for label in &missing {
            eprintln!("  • {}", label);
        }
        anyhow::bail!("{} required field(s) missing", missing.len());
    }

    let row = SheetRow::from_submission(&submission, Utc::now());

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&row)?);
        return Ok(());
    }

    let target = SheetsTarget::from_config(&config.sheets)?;
    let session = OAuthSession::new(TokenStore::new(&config.sheets.token_file));
    let mut client = SheetsClient::new(target, session);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Uploading invoice {}...", row.invoice_number));

    match client.append_row(&row).await {
        Ok(response) => {
            pb.finish_and_clear();
            println!(
                "{} Uploaded invoice {}",
                style("✓").green(),
                row.invoice_number
            );
            if let Some(range) = response.updated_range() {
                info!("Appended to {}", range);
            }
            Ok(())
        }
        Err(err) => {
            pb.finish_and_clear();
            eprintln!("{} Upload failed", style("✗").red());
            if let SheetsError::NotAuthorized(_) = err {
                warn!("No usable token at {}", config.sheets.token_file.display());
                anyhow::bail!("{}\n\nRun 'orderlog auth login' to sign in.", err);
            }
            Err(err.into())
        }
    }
}
