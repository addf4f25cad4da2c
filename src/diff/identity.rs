//! Row identity: building row keys and the order they are reported in.
//!
//! Composite keys join the identity columns with `-`, so variant keys look
//! like `chr1-100-101-A-T-...`. Those are ordered by chromosome, start and
//! stop, with numeric chromosomes ascending and all other contigs after
//! them. Coordinates too large for `u64` saturate. Replaced keys
//! (`Gene (AAChange)`) are ordered by gene, then by the part of the AA
//! change before its first hyphen. Keys matching neither shape sort last.

use std::collections::HashMap;

use crate::core::table::Table;
use crate::core::types::{KeyMode, RowKey, TableSettings};
use crate::diff::engine::ComparisonError;

pub const KEY_SEPARATOR: &str = "-";

/// A table whose rows have been assigned row keys.
///
/// The identity columns are removed from `table` once they are folded into
/// the key.
#[derive(Debug, Clone)]
pub struct KeyedTable {
    pub table: Table,

    /// Key of each row, in row order
    pub keys: Vec<RowKey>,

    /// Distinct keys in the order they first appear
    pub order: Vec<RowKey>,

    rows_by_key: HashMap<RowKey, Vec<usize>>,
}

impl KeyedTable {
    fn new(table: Table, keys: Vec<RowKey>) -> Self {
        let mut rows_by_key: HashMap<RowKey, Vec<usize>> = HashMap::new();
        let mut order = Vec::new();
        for (row, key) in keys.iter().enumerate() {
            let rows = rows_by_key.entry(key.clone()).or_default();
            if rows.is_empty() {
                order.push(key.clone());
            }
            rows.push(row);
        }

        Self {
            table,
            keys,
            order,
            rows_by_key,
        }
    }

    /// All rows carrying `key`
    #[must_use]
    pub fn rows_for(&self, key: &RowKey) -> &[usize] {
        self.rows_by_key.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of rows carrying `key`
    #[must_use]
    pub fn hit_count(&self, key: &RowKey) -> usize {
        self.rows_for(key).len()
    }

    /// Rows beyond the first for every key
    #[must_use]
    pub fn duplicate_rows(&self) -> usize {
        self.keys.len() - self.order.len()
    }

    /// Cell of the first row carrying `key`
    #[must_use]
    pub fn value(&self, key: &RowKey, column: &str) -> Option<&str> {
        let row = *self.rows_for(key).first()?;
        self.table.value(row, column)
    }
}

/// Build a row key for every row and drop the columns the key was built from.
///
/// # Errors
///
/// Returns `ComparisonError::IdentityUnresolvable` if a column needed for
/// `mode` is missing from the table.
pub fn build_keys(
    mut table: Table,
    settings: &TableSettings,
    mode: KeyMode,
) -> Result<KeyedTable, ComparisonError> {
    let source_columns = key_source_columns(settings, mode);
    let missing = missing_columns(&table, &source_columns);
    if source_columns.is_empty() || !missing.is_empty() {
        return Err(ComparisonError::IdentityUnresolvable {
            kind: settings.kind,
            missing,
        });
    }

    let indices: Vec<usize> = source_columns
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect();

    let keys: Vec<RowKey> = table
        .rows()
        .iter()
        .map(|row| {
            let parts: Vec<&str> = indices.iter().map(|&i| row[i].as_str()).collect();
            match mode {
                KeyMode::Composite => RowKey::new(parts.join(KEY_SEPARATOR)),
                KeyMode::Replaced => RowKey::new(format!("{} ({})", parts[0], parts[1])),
            }
        })
        .collect();

    table.drop_columns(&source_columns);
    Ok(KeyedTable::new(table, keys))
}

/// Columns folded into the row key under `mode`
#[must_use]
pub fn key_source_columns(settings: &TableSettings, mode: KeyMode) -> Vec<&'static str> {
    match mode {
        KeyMode::Composite => settings.identity_columns.to_vec(),
        KeyMode::Replaced => match settings.fallback_columns {
            Some((gene, aa_change)) => vec![gene, aa_change],
            None => Vec::new(),
        },
    }
}

/// Columns from `columns` that are not present in `table`
#[must_use]
pub fn missing_columns(table: &Table, columns: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| (*c).to_string())
        .collect()
}

/// Chromosome part of a coordinate key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Chromosome {
    Numeric(u64),
    /// X, Y, MT, unplaced contigs, ...: all sort after numeric chromosomes
    Other,
}

/// Ordering key extracted from a row key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Coordinate {
        chrom: Chromosome,
        start: u64,
        stop: u64,
    },
    Replaced {
        gene: String,
        aa_change: String,
    },
    Malformed,
}

/// Extract the ordering key for `key` under `mode`
#[must_use]
pub fn sort_key(key: &RowKey, mode: KeyMode) -> SortKey {
    let parsed = match mode {
        KeyMode::Composite => coordinate_sort_key(key.as_str()),
        KeyMode::Replaced => replaced_sort_key(key.as_str()),
    };
    parsed.unwrap_or(SortKey::Malformed)
}

/// Parse `chr<chrom>-<start>-<stop>-...`
fn coordinate_sort_key(key: &str) -> Option<SortKey> {
    let rest = key.strip_prefix("chr")?;
    let mut parts = rest.splitn(4, '-');
    let chrom = parts.next()?;
    let start = parts.next()?;
    let stop = parts.next()?;
    // The stop coordinate must be followed by another separator
    parts.next()?;

    let is_word = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_');
    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_word(chrom) || !is_digits(start) || !is_digits(stop) {
        return None;
    }

    let chrom = if chrom.chars().all(|c| c.is_ascii_digit()) {
        Chromosome::Numeric(saturating_number(chrom))
    } else {
        Chromosome::Other
    };

    Some(SortKey::Coordinate {
        chrom,
        start: saturating_number(start),
        stop: saturating_number(stop),
    })
}

/// Parse an all-digit string, saturating at `u64::MAX` on overflow
fn saturating_number(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Parse `Gene (AAChange)`, keeping the AA change up to its first hyphen
fn replaced_sort_key(key: &str) -> Option<SortKey> {
    let mut parts = key.split(" (");
    let gene = parts.next()?;
    let rest = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let aa_change = rest
        .split('-')
        .next()
        .unwrap_or_default()
        .trim_end_matches(')');

    Some(SortKey::Replaced {
        gene: gene.to_string(),
        aa_change: aa_change.to_string(),
    })
}

/// Stable sort by row-key order; ties keep their encounter order
pub fn sort_by_row_key<T>(items: &mut [T], mode: KeyMode, key_of: impl Fn(&T) -> &RowKey) {
    items.sort_by_cached_key(|item| sort_key(key_of(item), mode));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TableKind;

    fn keys(list: &[&str]) -> Vec<RowKey> {
        list.iter().map(|k| RowKey::new(*k)).collect()
    }

    #[test]
    fn test_coordinate_sort_key() {
        assert_eq!(
            sort_key(&RowKey::new("chr10-5-6-A-T"), KeyMode::Composite),
            SortKey::Coordinate {
                chrom: Chromosome::Numeric(10),
                start: 5,
                stop: 6
            }
        );
        assert_eq!(
            sort_key(&RowKey::new("chrX-1-2-G-C"), KeyMode::Composite),
            SortKey::Coordinate {
                chrom: Chromosome::Other,
                start: 1,
                stop: 2
            }
        );
        assert_eq!(
            sort_key(&RowKey::new("chr1-100-101"), KeyMode::Composite),
            SortKey::Malformed
        );
        assert_eq!(
            sort_key(&RowKey::new("1-100-101-A-T"), KeyMode::Composite),
            SortKey::Malformed
        );
    }

    #[test]
    fn test_replaced_sort_key() {
        assert_eq!(
            sort_key(&RowKey::new("KRAS (G12D-x)"), KeyMode::Replaced),
            SortKey::Replaced {
                gene: "KRAS".into(),
                aa_change: "G12D".into()
            }
        );
        assert_eq!(
            sort_key(&RowKey::new("TP53 (R175H)"), KeyMode::Replaced),
            SortKey::Replaced {
                gene: "TP53".into(),
                aa_change: "R175H".into()
            }
        );
        assert_eq!(
            sort_key(&RowKey::new("no parenthesis"), KeyMode::Replaced),
            SortKey::Malformed
        );
    }

    #[test]
    fn test_chromosome_order() {
        let mut list = keys(&["chrX-1-2-A-T", "chr10-5-6-A-T", "chr2-100-200-A-T"]);
        sort_by_row_key(&mut list, KeyMode::Composite, |k| k);
        assert_eq!(
            list,
            keys(&["chr2-100-200-A-T", "chr10-5-6-A-T", "chrX-1-2-A-T"])
        );
    }

    #[test]
    fn test_oversized_coordinates_saturate() {
        assert_eq!(
            sort_key(&RowKey::new("chr1-99999999999999999999-5-A-T"), KeyMode::Composite),
            SortKey::Coordinate {
                chrom: Chromosome::Numeric(1),
                start: u64::MAX,
                stop: 5
            }
        );

        let mut list = keys(&["chr1-99999999999999999999-5-A-T", "chr2-1-2-A-T", "odd"]);
        sort_by_row_key(&mut list, KeyMode::Composite, |k| k);
        assert_eq!(
            list,
            keys(&["chr1-99999999999999999999-5-A-T", "chr2-1-2-A-T", "odd"])
        );
    }

    #[test]
    fn test_malformed_keys_sort_last_in_encounter_order() {
        let mut list = keys(&["zeta", "chr3-1-2-A-T", "alpha", "chr1-1-2-A-T"]);
        sort_by_row_key(&mut list, KeyMode::Composite, |k| k);
        assert_eq!(
            list,
            keys(&["chr1-1-2-A-T", "chr3-1-2-A-T", "zeta", "alpha"])
        );
    }

    #[test]
    fn test_build_composite_keys() {
        let settings = TableKind::Aggregated.settings();
        let table = Table::new(
            vec!["ID".into(), "Tier".into()],
            vec![
                vec!["chr1-1-2-A-T".into(), "Pass".into()],
                vec!["chr1-1-2-A-T".into(), "Reject".into()],
                vec!["chr2-1-2-A-T".into(), "Pass".into()],
            ],
        );

        let keyed = build_keys(table, &settings, KeyMode::Composite).unwrap();
        assert!(!keyed.table.has_column("ID"));
        assert_eq!(keyed.order, keys(&["chr1-1-2-A-T", "chr2-1-2-A-T"]));
        assert_eq!(keyed.duplicate_rows(), 1);
        assert_eq!(keyed.hit_count(&RowKey::new("chr1-1-2-A-T")), 2);
        assert_eq!(
            keyed.value(&RowKey::new("chr1-1-2-A-T"), "Tier"),
            Some("Pass")
        );
    }

    #[test]
    fn test_build_replaced_keys() {
        let settings = TableKind::Aggregated.settings();
        let table = Table::new(
            vec!["Gene".into(), "AA Change".into(), "Tier".into()],
            vec![vec!["KRAS".into(), "G12D".into(), "Pass".into()]],
        );

        let keyed = build_keys(table, &settings, KeyMode::Replaced).unwrap();
        assert_eq!(keyed.order, keys(&["KRAS (G12D)"]));
        assert_eq!(keyed.table.columns(), &["Tier".to_string()]);
    }

    #[test]
    fn test_build_keys_missing_column() {
        let settings = TableKind::Unaggregated.settings();
        let table = Table::new(vec!["Chromosome".into()], Vec::new());
        let err = build_keys(table, &settings, KeyMode::Composite).unwrap_err();
        assert!(matches!(err, ComparisonError::IdentityUnresolvable { .. }));
    }
}
