use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_tolerance, OutputFormat};
use crate::core::types::TableKind;
use crate::diff::cells::DEFAULT_TOLERANCE;
use crate::diff::engine::{run_tabular_comparison, ComparisonConfig, TabularDiff};
use crate::diff::structural::{run_json_comparison, run_yaml_comparison};
use crate::utils::validation::{parse_column_list, validate_columns};

#[derive(Args)]
pub struct TableArgs {
    /// Table from the first run
    #[arg(required = true)]
    pub file1: PathBuf,

    /// Table from the second run
    #[arg(required = true)]
    pub file2: PathBuf,

    /// Report file the differences are appended to
    #[arg(required = true)]
    pub output: PathBuf,

    /// Comma-separated columns to compare (defaults depend on the table kind)
    #[arg(long)]
    pub columns: Option<String>,

    /// Maximum absolute difference for numeric values to be considered equal
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, value_parser = parse_tolerance)]
    pub tolerance: f64,

    /// Compare rows on a single thread
    #[arg(long)]
    pub no_parallel: bool,
}

#[derive(Args)]
pub struct DocumentArgs {
    /// Document from the first run
    #[arg(required = true)]
    pub file1: PathBuf,

    /// Document from the second run
    #[arg(required = true)]
    pub file2: PathBuf,

    /// Report file the differences are appended to
    #[arg(required = true)]
    pub output: PathBuf,
}

pub fn run_table(kind: TableKind, args: TableArgs, format: OutputFormat) -> anyhow::Result<()> {
    let settings = kind.settings();
    let columns = args
        .columns
        .as_deref()
        .map_or_else(|| settings.default_column_list(), parse_column_list);
    validate_columns(&settings, &columns)?;

    let config = ComparisonConfig {
        tolerance: args.tolerance,
        parallel: !args.no_parallel,
    };

    let diff = run_tabular_comparison(kind, &args.file1, &args.file2, &args.output, &columns, &config)?;

    match format {
        OutputFormat::Text => print_text_summary(&diff),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&diff.summary())?);
        }
    }
    Ok(())
}

fn print_text_summary(diff: &TabularDiff) {
    let summary = diff.summary();

    println!("{} Comparison", diff.kind.title());
    println!("{}", "=".repeat(60));
    println!("  Total variants: {}", summary.total_variants);
    println!("  Common variants: {}", summary.common_variants);
    println!("  Unique to file 1: {}", summary.unique_to_file1);
    println!("  Unique to file 2: {}", summary.unique_to_file2);
    for count in &summary.column_differences {
        println!("  Differences in {}: {}", count.column, count.differences);
    }
    if summary.hit_differences > 0 {
        println!("  Unmatched hits: {}", summary.hit_differences);
    }
    if diff.is_identical() {
        println!("\nNo differences found.");
    }
}

pub fn run_yml(args: DocumentArgs, format: OutputFormat) -> anyhow::Result<()> {
    let changes = run_yaml_comparison(&args.file1, &args.file2, &args.output)?;

    match format {
        OutputFormat::Text => println!("Input YML differences: {}", changes.len()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
    }
    Ok(())
}

pub fn run_json(args: DocumentArgs, format: OutputFormat) -> anyhow::Result<()> {
    let diff = run_json_comparison(&args.file1, &args.file2, &args.output)?;

    match format {
        OutputFormat::Text => {
            println!("Metrics JSON Comparison");
            println!("{}", "=".repeat(60));
            println!("  Shared fields: {}", diff.shared.len());
            println!("  Unique to file 1: {}", diff.unique_to_file1.len());
            println!("  Unique to file 2: {}", diff.unique_to_file2.len());
            println!("  Values changed: {}", diff.changed.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
    }
    Ok(())
}
