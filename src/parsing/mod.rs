//! Loaders for pVACtools result files.
//!
//! - **TSV tables**: aggregated, unaggregated and reference-match tables
//! - **YAML**: the `inputs.yml` run configuration snapshot
//! - **JSON**: aggregated metrics documents
//!
//! YAML and JSON are both loaded into [`serde_json::Value`] so a single
//! structural diff handles them.

pub mod structured;
pub mod tsv;

pub use tsv::ParseError;
