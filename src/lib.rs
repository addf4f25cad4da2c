//! # pvac-compare
//!
//! A library for reporting the differences between two pVACtools runs.
//!
//! Re-running a neoantigen prediction pipeline with a new release, new
//! inputs or new prediction algorithms changes its results in ways that are
//! hard to spot by eye: a tier flips, a best peptide changes, a few variants
//! appear or vanish. `pvac-compare` matches the rows of two result tables by
//! variant identity and reports exactly what changed.
//!
//! ## Features
//!
//! - **Row matching**: Rows are keyed by their variant coordinates, falling
//!   back to `Gene (AA Change)` when coordinates are unavailable
//! - **Tolerant numeric comparison**: Numeric values within a tolerance are equal
//! - **Column drift**: Legacy column spellings are mapped to their current names
//! - **Multi-hit rows**: Reference matches with several hits per key are
//!   compared as multisets
//! - **Run inputs**: `inputs.yml` and metrics JSON files are diffed structurally
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pvac_compare::{run_tabular_comparison, ComparisonConfig, TableKind};
//!
//! let kind = TableKind::Aggregated;
//! let diff = run_tabular_comparison(
//!     kind,
//!     Path::new("v1/MHC_Class_I/sample.all_epitopes.aggregated.tsv"),
//!     Path::new("v2/MHC_Class_I/sample.all_epitopes.aggregated.tsv"),
//!     Path::new("report.tsv"),
//!     &kind.settings().default_column_list(),
//!     &ComparisonConfig::default(),
//! )
//! .unwrap();
//!
//! println!("{} variants unique to file 1", diff.summary().unique_to_file1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Tables, row keys and per-kind settings
//! - [`parsing`]: Loaders for TSV, YAML and JSON files
//! - [`diff`]: The comparison engine
//! - [`report`]: Report rendering and writing
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Column validation and file discovery

pub mod cli;
pub mod core;
pub mod diff;
pub mod parsing;
pub mod report;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::table::{ColumnKind, Table};
pub use core::types::*;
pub use diff::engine::{
    compare_tables, run_tabular_comparison, ComparisonConfig, ComparisonError, TabularDiff,
};
pub use diff::structural::{run_json_comparison, run_yaml_comparison};
