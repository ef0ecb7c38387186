//! Batch command - extract fields from many text files into one CSV summary.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use orderlog_core::invoice::{InvoiceParser, InvoiceTextParser};
use orderlog_core::ExtractedInvoice;

use super::load_config;
use super::output::{csv_record, CSV_HEADERS};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Summary CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    invoice: Option<ExtractedInvoice>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = InvoiceTextParser::from_config(&config.extraction);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let outcome = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|text| Ok(parser.parse(&text)?));

        match outcome {
            Ok(result) => {
                debug!(
                    "{}: {} fields missing",
                    path.display(),
                    result.warnings.len()
                );
                results.push(FileResult {
                    path,
                    invoice: Some(result.invoice),
                    error: None,
                });
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e.context(format!("failed to process {}", path.display())));
                }
                results.push(FileResult {
                    path,
                    invoice: None,
                    error: Some(e.to_string()),
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let summary = write_summary(&results)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, summary)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", summary);
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} Processed {} files: {} succeeded, {} failed in {:.1}s",
        style("ℹ").blue(),
        results.len(),
        results.len() - failed,
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn write_summary(results: &[FileResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["file"];
    header.extend(CSV_HEADERS);
    header.push("error");
    wtr.write_record(&header)?;

    for result in results {
        let mut record = vec![result.path.display().to_string()];
        match &result.invoice {
            Some(invoice) => record.extend(csv_record(invoice)),
            None => record.extend(CSV_HEADERS.iter().map(|_| String::new())),
        }
        record.push(result.error.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
