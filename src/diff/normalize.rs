use std::collections::HashMap;

use crate::core::columns::canonical_name;
use crate::core::table::{ColumnKind, Table};

/// A column renamed from a historical alias to its canonical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// Rename alias columns to their canonical names.
///
/// An alias is left alone when the canonical column is already present, so
/// a table never ends up with two columns of the same name.
pub fn normalize_columns(table: &mut Table) -> Vec<Rename> {
    let mut renames = Vec::new();
    let columns: Vec<String> = table.columns().to_vec();

    for col in columns {
        let Some(canonical) = canonical_name(&col) else {
            continue;
        };
        if table.has_column(canonical) {
            continue;
        }
        if table.rename_column(&col, canonical) {
            renames.push(Rename {
                from: col,
                to: canonical.to_string(),
            });
        }
    }

    renames
}

/// Classify each present column once so the cell differ does not have to
/// re-infer types per cell
#[must_use]
pub fn classify_columns(table: &Table, columns: &[String]) -> HashMap<String, ColumnKind> {
    columns
        .iter()
        .filter_map(|c| table.classify_column(c).map(|kind| (c.clone(), kind)))
        .collect()
}
