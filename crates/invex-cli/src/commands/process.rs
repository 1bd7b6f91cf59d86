//! Process command - extract data from a single document.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use invex_core::models::document::{ExtractionResult, FieldValue, TotalKind};

use super::{extract_file, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (text, PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Run rule-based OCR cleanup on the result
    #[arg(long)]
    cleanup: bool,

    /// Show line items vs. subtotal verification
    #[arg(long)]
    show_reconciliation: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV of line items
    Csv,
    /// Plain text report
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting...");

    let result = extract_file(args.input.clone(), config, args.cleanup).await;
    pb.finish_and_clear();
    let result = result?;

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_reconciliation {
        println!();
        let rec = &result.reconciliation;
        match rec.stated_subtotal {
            Some(subtotal) if rec.mismatch => println!(
                "{} Line items total {} does not match subtotal {}",
                style("⚠").yellow(),
                rec.line_items_total,
                subtotal
            ),
            Some(subtotal) => println!(
                "{} Line items total {} matches subtotal {}",
                style("✓").green(),
                rec.line_items_total,
                subtotal
            ),
            None => println!(
                "{} Line items total {} (no subtotal stated)",
                style("ℹ").blue(),
                rec.line_items_total
            ),
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a result in the requested format.
pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["#", "Quantity", "Description", "Product Code", "Unit Price", "Total"])?;

    for (i, item) in result.line_items.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string().as_str(),
            &item.quantity.to_string(),
            &item.description,
            item.product_code.as_deref().unwrap_or(""),
            &item.unit_price.to_string(),
            &item.total.to_string(),
        ])?;
    }

    wtr.write_record([
        "",
        "",
        "Line Items Total",
        "",
        "",
        &result.line_items_total().to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Document: {} ({})\n",
        result.source_id,
        result.document_type.as_str()
    ));
    output.push_str(&format!(
        "Generated: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    output.push('\n');

    if !result.header.is_empty() {
        output.push_str("Header:\n");
        for (name, value) in result.header.iter() {
            match value {
                FieldValue::Scalar(v) => output.push_str(&format!("  {}: {}\n", name, v)),
                FieldValue::Confident { value, confidence } => output.push_str(&format!(
                    "  {}: {} ({:.0}%)\n",
                    name,
                    value,
                    confidence * 100.0
                )),
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Line Items ({}, {} strategy):\n",
        result.line_items.len(),
        result.strategy.as_str()
    ));
    for (i, item) in result.line_items.iter().enumerate() {
        output.push_str(&format!(
            "  {:>3}. {:>4} x {}{}  @ {}  = {}\n",
            i + 1,
            item.quantity,
            item.description,
            item.product_code
                .as_ref()
                .map(|c| format!(" [{}]", c))
                .unwrap_or_default(),
            item.unit_price,
            item.total
        ));
    }
    output.push('\n');

    if !result.totals.is_empty() {
        output.push_str("Totals:\n");
        for (kind, amount) in result.totals.iter() {
            output.push_str(&format!("  {:<10} {}\n", format!("{}:", kind.label()), amount));
        }
        output.push('\n');
    }

    let rec = &result.reconciliation;
    output.push_str("Verification:\n");
    output.push_str(&format!("  Line items total: {}\n", rec.line_items_total));
    match (rec.stated_subtotal, rec.difference) {
        (Some(subtotal), Some(difference)) => {
            output.push_str(&format!("  Stated subtotal:  {}\n", subtotal));
            output.push_str(&format!("  Difference:       {}\n", difference));
            output.push_str(&format!(
                "  Status:           {}\n",
                if rec.mismatch { "MISMATCH" } else { "OK" }
            ));
        }
        _ => output.push_str("  Stated subtotal:  not found\n"),
    }
    if let Some(total) = result.totals.get(TotalKind::Total) {
        let tax = result.totals.get(TotalKind::Tax).unwrap_or(Decimal::ZERO);
        let shipping = result.totals.get(TotalKind::Shipping).unwrap_or(Decimal::ZERO);
        let expected = rec
            .line_items_total
            .checked_add(tax)
            .and_then(|sum| sum.checked_add(shipping))
            .unwrap_or(Decimal::MAX);
        output.push_str(&format!(
            "  Items + tax + shipping: {} (stated total {})\n",
            expected, total
        ));
    }

    if !result.warnings.is_empty() {
        output.push('\n');
        output.push_str("Warnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
