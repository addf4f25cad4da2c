//! Comparison engine.
//!
//! Tabular comparisons run as a pipeline over two loaded tables:
//!
//! 1. [`normalize`]: rename legacy column spellings
//! 2. [`schema`]: choose the key mode and reconcile the requested columns
//! 3. [`identity`]: build row keys
//! 4. [`partition`]: split keys into common and unique sets
//! 5. [`cells`] and [`hits`]: compare values of the common rows
//!
//! [`engine`] drives the pipeline and [`structural`] handles the YAML and
//! JSON documents.

pub mod cells;
pub mod engine;
pub mod hits;
pub mod identity;
pub mod normalize;
pub mod partition;
pub mod schema;
pub mod structural;

pub use engine::{
    compare_tables, run_tabular_comparison, ComparisonConfig, ComparisonError, TabularDiff,
};
