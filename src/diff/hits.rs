use std::collections::HashMap;

use serde::Serialize;

use crate::core::table::is_missing;
use crate::core::types::RowKey;
use crate::diff::identity::KeyedTable;

/// Which input file a hit was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSide {
    File1,
    File2,
}

impl std::fmt::Display for FileSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File1 => write!(f, "File 1"),
            Self::File2 => write!(f, "File 2"),
        }
    }
}

/// A hit of a shared key whose content has no counterpart in the other file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitDifference {
    pub key: RowKey,
    pub side: FileSide,
    /// Compared column values, tab-separated
    pub content: String,
}

/// Content signature of one row over the compared columns.
///
/// Missing values collapse to an empty field so `NA` and `NaN` hits match.
#[must_use]
pub fn hit_signature(table: &KeyedTable, row: usize, columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| {
            let value = table.table.value(row, c).unwrap_or_default();
            if is_missing(value) {
                ""
            } else {
                value.trim()
            }
        })
        .collect::<Vec<_>>()
        .join("\t")
}

/// Keys shared by both tables that carry more than one hit on either side
#[must_use]
pub fn multi_hit_keys(common: &[RowKey], table1: &KeyedTable, table2: &KeyedTable) -> Vec<RowKey> {
    common
        .iter()
        .filter(|k| table1.hit_count(k) > 1 || table2.hit_count(k) > 1)
        .cloned()
        .collect()
}

/// Compare the hits of each key as multisets of content signatures.
///
/// Hits are indexed by signature per key, so matching is linear in the
/// number of hits rather than a row-by-row cross check.
#[must_use]
pub fn compare_hits(
    keys: &[RowKey],
    table1: &KeyedTable,
    table2: &KeyedTable,
    columns: &[String],
) -> Vec<HitDifference> {
    let mut differences = Vec::new();

    for key in keys {
        let sigs1: Vec<String> = table1
            .rows_for(key)
            .iter()
            .map(|&r| hit_signature(table1, r, columns))
            .collect();
        let sigs2: Vec<String> = table2
            .rows_for(key)
            .iter()
            .map(|&r| hit_signature(table2, r, columns))
            .collect();

        differences.extend(unmatched(key, &sigs1, &sigs2, FileSide::File1));
        differences.extend(unmatched(key, &sigs2, &sigs1, FileSide::File2));
    }

    differences
}

/// Signatures in `ours` left over once each is paired with one in `theirs`
fn unmatched(key: &RowKey, ours: &[String], theirs: &[String], side: FileSide) -> Vec<HitDifference> {
    let mut available: HashMap<&str, usize> = HashMap::new();
    for sig in theirs {
        *available.entry(sig.as_str()).or_default() += 1;
    }

    ours.iter()
        .filter(|sig| match available.get_mut(sig.as_str()) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .map(|sig| HitDifference {
            key: key.clone(),
            side,
            content: sig.clone(),
        })
        .collect()
}
