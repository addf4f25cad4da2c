//! Command-line interface for pvac-compare.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run**: Compare every supported file of two pVACtools results folders
//! - **aggregated**, **unaggregated**, **reference-matches**: Compare one pair of tables
//! - **yml**, **json**: Compare one pair of input YAML or metrics JSON files
//!
//! ## Usage
//!
//! ```text
//! # Compare two pvactools release results folders, both MHC classes
//! pvac-compare run results_v4 results_v5 report --pvactools-release
//!
//! # Only class I, comparing a custom set of aggregated columns
//! pvac-compare run old new report --immuno-release --mhc-class 1 \
//!     --aggregated-columns "Tier,Best Peptide"
//!
//! # One pair of aggregated tables, summary as JSON
//! pvac-compare aggregated a.tsv b.tsv report.tsv --format json
//! ```

use clap::{Parser, Subcommand};

pub mod compare;
pub mod run;

#[derive(Parser)]
#[command(name = "pvac-compare")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Compare the outputs of two pVACtools runs")]
#[command(
    long_about = "pvac-compare reports the differences between the results folders of two pVACtools runs.\n\nFor each MHC class it compares:\n- The run inputs (inputs.yml and the aggregated metrics JSON)\n- The aggregated and unaggregated epitope tables\n- The reference proteome matches\n\nDifferences are written to one text report per class."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of the summary printed to stdout
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two pVACtools results folders
    Run(run::RunArgs),

    /// Compare two aggregated epitope tables
    Aggregated(compare::TableArgs),

    /// Compare two unaggregated epitope tables
    Unaggregated(compare::TableArgs),

    /// Compare two reference match tables
    ReferenceMatches(compare::TableArgs),

    /// Compare two inputs.yml files
    Yml(compare::DocumentArgs),

    /// Compare two aggregated metrics JSON files
    Json(compare::DocumentArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parse a numeric tolerance, rejecting negative and non-finite values
pub(crate) fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("tolerance must be a non-negative number, got {s}"))
    }
}
