//! Core data types for comparing pVACtools results.
//!
//! - [`Table`](table::Table): a tab-separated table of raw text cells
//! - [`ColumnKind`](table::ColumnKind): numeric vs. textual column semantics
//! - [`RowKey`](types::RowKey), [`KeyMode`](types::KeyMode): row identity
//! - [`TableKind`](types::TableKind), [`TableSettings`](types::TableSettings): per-kind settings
//!
//! ## Row identity
//!
//! | Table kind      | Key columns                                                    |
//! |-----------------|----------------------------------------------------------------|
//! | Aggregated      | `ID`                                                           |
//! | Unaggregated    | Chromosome .. Variant, Transcript, HLA Allele, MT Epitope Seq, Index |
//! | Reference match | Chromosome .. Variant, Transcript, MT Epitope Seq, Hit ID, Match Start/Stop |
//!
//! When the key columns are missing from either table, `Gene (AA Change)` is
//! used instead if both tables carry those columns.

pub mod columns;
pub mod table;
pub mod types;
