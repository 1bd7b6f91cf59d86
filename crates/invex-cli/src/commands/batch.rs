//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::{stream, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invex_core::models::document::{ExtractionResult, TotalKind};
use invex_core::source::DocumentFormat;

use super::process::{format_result, OutputFormat};
use super::{extract_file, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of documents processed concurrently (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Run rule-based OCR cleanup on each result
    #[arg(long)]
    cleanup: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DocumentFormat::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let continue_on_error = args.continue_on_error || config.batch.continue_on_error;

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let cleanup = args.cleanup;
    let mut pending = stream::iter(files.into_iter().map(|path| {
        let config = Arc::clone(&config);
        async move {
            let file_start = Instant::now();
            let outcome = extract_file(path.clone(), config, cleanup).await;
            (path, outcome, file_start.elapsed().as_millis() as u64)
        }
    }))
    .buffered(jobs);

    let mut results = Vec::new();
    while let Some((path, outcome, processing_time_ms)) = pending.next().await {
        match outcome {
            Ok(result) => results.push(ProcessResult {
                path,
                result: Some(result),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    overall_pb.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for entry in &successful {
            if let Some(result) = &entry.result {
                let output_name = entry
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_result(result, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let mismatched = successful
        .iter()
        .filter(|r| r.result.as_ref().is_some_and(|r| r.reconciliation.mismatch))
        .count();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} with reconciliation mismatch",
        style(successful.len()).green(),
        style(failed.len()).red(),
        style(mismatched).yellow()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!(
                "  - {}: {}",
                entry.path.display(),
                entry.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "invoice_number",
        "date",
        "strategy",
        "line_items",
        "line_items_total",
        "subtotal",
        "total",
        "mismatch",
        "processing_time_ms",
        "error",
    ])?;

    for entry in results {
        let filename = entry.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(result) = &entry.result {
            let amount = |kind| {
                result
                    .totals
                    .get(kind)
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            };
            wtr.write_record([
                filename,
                "success",
                result.document_type.as_str(),
                result.header.get("invoice_number").unwrap_or(""),
                result.header.get("date").unwrap_or(""),
                result.strategy.as_str(),
                &result.line_items.len().to_string(),
                &result.reconciliation.line_items_total.to_string(),
                &amount(TotalKind::Subtotal),
                &amount(TotalKind::Total),
                &result.reconciliation.mismatch.to_string(),
                &entry.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &entry.processing_time_ms.to_string(),
                entry.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
