//! Extract command - pull invoice fields out of pasted text.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use orderlog_core::invoice::{InvoiceParser, InvoiceTextParser};
use orderlog_core::{InvoiceSubmission, RequiredField};

use super::output::{format_invoice, OutputFormat};
use super::{load_config, read_invoice_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (default: stdin)
    input: Option<PathBuf>,

    /// Read the invoice text from the system clipboard
    #[arg(long, conflicts_with = "input")]
    clipboard: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report required invoice fields that were not found
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_invoice_text(args.input.as_ref(), args.clipboard)?;
    info!("Read {} characters of invoice text", text.len());

    let parser = InvoiceTextParser::from_config(&config.extraction);
    let result = parser.parse(&text)?;
    debug!(
        "Extraction took {}ms with {} fields missing",
        result.processing_time_ms,
        result.warnings.len()
    );
    let invoice = result.invoice;

    if args.validate {
        // Edits and uploader come from the person uploading, not the text
        let missing: Vec<RequiredField> = InvoiceSubmission::new(invoice.clone())
            .missing_fields()
            .into_iter()
            .filter(|f| !matches!(f, RequiredField::EditsRequired | RequiredField::UploadedBy))
            .collect();

        if !missing.is_empty() {
            eprintln!("{}", style("Missing fields:").yellow());
            for field in &missing {
                eprintln!("  • {}", field);
            }
        }
    }

    let output = format_invoice(&invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output.trim_end());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
