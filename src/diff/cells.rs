//! Per-column value comparison for rows shared by both tables.
//!
//! Equality policy for a pair of cells:
//!
//! 1. both missing: equal
//! 2. exactly one missing: different
//! 3. numeric column: different iff `|v1 - v2| > tolerance`
//! 4. otherwise: different iff the trimmed text differs
//!
//! The numeric rule applies only to columns classified numeric in both
//! tables; a column numeric in one table and textual in the other is
//! compared as text.

use rayon::prelude::*;
use serde::Serialize;

use crate::core::table::{is_missing, parse_number, ColumnKind};
use crate::core::types::RowKey;
use crate::diff::identity::KeyedTable;

/// Default maximum absolute difference for numeric values to be equal
pub const DEFAULT_TOLERANCE: f64 = 0.1;

/// Slack for floating-point error so a difference of exactly the tolerance
/// (e.g. 5.00 vs 5.10) is not reported
const TOLERANCE_EPSILON: f64 = 1e-9;

/// A value that differs between the two files for one row key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferenceRecord {
    pub key: RowKey,
    /// Raw text from file 1
    pub value1: String,
    /// Raw text from file 2
    pub value2: String,
}

/// All differences found in one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDifferences {
    pub column: String,
    pub kind: ColumnKind,
    pub records: Vec<DifferenceRecord>,
}

/// Decide whether two raw cell values differ
#[must_use]
pub fn values_differ(value1: &str, value2: &str, kind: ColumnKind, tolerance: f64) -> bool {
    match (is_missing(value1), is_missing(value2)) {
        (true, true) => return false,
        (true, false) | (false, true) => return true,
        (false, false) => {}
    }

    if kind == ColumnKind::Numeric {
        if let (Some(a), Some(b)) = (parse_number(value1), parse_number(value2)) {
            return (a - b).abs() - tolerance > TOLERANCE_EPSILON;
        }
    }

    value1.trim() != value2.trim()
}

/// Compare `column` for every key in `keys`, using the first row per key.
///
/// With `parallel`, keys are compared across the rayon pool; the returned
/// records keep the order of `keys` either way.
#[must_use]
pub fn diff_column(
    column: &str,
    kind: ColumnKind,
    keys: &[RowKey],
    table1: &KeyedTable,
    table2: &KeyedTable,
    tolerance: f64,
    parallel: bool,
) -> ColumnDifferences {
    let compare = |key: &RowKey| -> Option<DifferenceRecord> {
        let value1 = table1.value(key, column)?;
        let value2 = table2.value(key, column)?;
        values_differ(value1, value2, kind, tolerance).then(|| DifferenceRecord {
            key: key.clone(),
            value1: value1.to_string(),
            value2: value2.to_string(),
        })
    };

    let records = if parallel {
        keys.par_iter().filter_map(&compare).collect()
    } else {
        keys.iter().filter_map(&compare).collect()
    };

    ColumnDifferences {
        column: column.to_string(),
        kind,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::Table;
    use crate::core::types::{KeyMode, TableKind};
    use crate::diff::identity::build_keys;

    #[test]
    fn test_numeric_tolerance_boundary() {
        let n = ColumnKind::Numeric;
        assert!(!values_differ("5.00", "5.10", n, DEFAULT_TOLERANCE));
        assert!(!values_differ("1.0", "1.1", n, DEFAULT_TOLERANCE));
        assert!(values_differ("5.00", "5.11", n, DEFAULT_TOLERANCE));
        assert!(!values_differ("5", "5.0", n, DEFAULT_TOLERANCE));
        assert!(values_differ("5", "6", n, 0.5));
    }

    #[test]
    fn test_missing_values() {
        for kind in [ColumnKind::Numeric, ColumnKind::Text] {
            assert!(!values_differ("NA", "", kind, DEFAULT_TOLERANCE));
            assert!(values_differ("3.2", "NA", kind, DEFAULT_TOLERANCE));
            assert!(values_differ("", "Pass", kind, DEFAULT_TOLERANCE));
        }
    }

    #[test]
    fn test_text_comparison_ignores_surrounding_whitespace() {
        let t = ColumnKind::Text;
        assert!(!values_differ(" Pass", "Pass ", t, DEFAULT_TOLERANCE));
        assert!(values_differ("Pass", "Reject", t, DEFAULT_TOLERANCE));
        // Text columns are never compared with a tolerance
        assert!(values_differ("5.00", "5.05", t, DEFAULT_TOLERANCE));
    }

    fn keyed(rows: &[(&str, &str)]) -> KeyedTable {
        let table = Table::new(
            vec!["ID".into(), "Score".into()],
            rows.iter()
                .map(|(k, v)| vec![(*k).to_string(), (*v).to_string()])
                .collect(),
        );
        build_keys(table, &TableKind::Aggregated.settings(), KeyMode::Composite).unwrap()
    }

    #[test]
    fn test_diff_column_keeps_key_order() {
        let t1 = keyed(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        let t2 = keyed(&[("d", "9"), ("c", "3"), ("b", "7"), ("a", "0")]);
        let keys: Vec<RowKey> = t1.order.clone();

        for parallel in [false, true] {
            let diffs = diff_column("Score", ColumnKind::Numeric, &keys, &t1, &t2, 0.1, parallel);
            let found: Vec<&str> = diffs.records.iter().map(|r| r.key.as_str()).collect();
            assert_eq!(found, vec!["a", "b", "d"]);
            assert_eq!(diffs.records[1].value1, "2");
            assert_eq!(diffs.records[1].value2, "7");
        }
    }
}
