use serde::Serialize;

use crate::core::table::Table;
use crate::core::types::{KeyMode, TableSettings};
use crate::diff::engine::ComparisonError;
use crate::diff::identity::missing_columns;

/// Why a requested column was excluded from the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    OnlyInFile1,
    OnlyInFile2,
    AbsentFromBoth,
    UsedAsRowId,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OnlyInFile1 => write!(f, "is only present in file 1"),
            Self::OnlyInFile2 => write!(f, "is only present in file 2"),
            Self::AbsentFromBoth => write!(f, "is not present in either file"),
            Self::UsedAsRowId => write!(f, "is used to build the row ID"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedColumn {
    pub column: String,
    pub reason: DropReason,
}

impl std::fmt::Display for DroppedColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Column dropped: '{}' {}", self.column, self.reason)
    }
}

/// Requested columns split into those that can be compared and those that can't
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    /// Columns present in both tables, in request order
    pub columns: Vec<String>,
    pub dropped: Vec<DroppedColumn>,
}

/// Intersect the requested columns with the columns of both tables.
///
/// Columns listed in `key_columns` are folded into the row key and are never
/// compared as cells.
#[must_use]
pub fn reconcile_columns(
    requested: &[String],
    table1: &Table,
    table2: &Table,
    key_columns: &[&str],
) -> ColumnSet {
    let mut set = ColumnSet::default();

    for col in requested {
        if set.columns.contains(col) || set.dropped.iter().any(|d| &d.column == col) {
            continue;
        }

        let reason = match (table1.has_column(col), table2.has_column(col)) {
            (true, true) if key_columns.contains(&col.as_str()) => DropReason::UsedAsRowId,
            (true, true) => {
                set.columns.push(col.clone());
                continue;
            }
            (true, false) => DropReason::OnlyInFile1,
            (false, true) => DropReason::OnlyInFile2,
            (false, false) => DropReason::AbsentFromBoth,
        };
        set.dropped.push(DroppedColumn {
            column: col.clone(),
            reason,
        });
    }

    set
}

/// Decide how rows of both tables are keyed.
///
/// Identity columns must be present in both tables; otherwise both tables
/// fall back to `Gene (AA Change)` keys, which requires those columns in both.
///
/// # Errors
///
/// Returns `ComparisonError::IdentityUnresolvable` when neither the identity
/// columns nor the fallback columns are available in both tables.
pub fn resolve_key_mode(
    settings: &TableSettings,
    table1: &Table,
    table2: &Table,
) -> Result<KeyMode, ComparisonError> {
    let mut missing = missing_columns(table1, settings.identity_columns);
    for col in missing_columns(table2, settings.identity_columns) {
        if !missing.contains(&col) {
            missing.push(col);
        }
    }
    if missing.is_empty() {
        return Ok(KeyMode::Composite);
    }

    if let Some((gene, aa_change)) = settings.fallback_columns {
        let fallback = [gene, aa_change];
        if missing_columns(table1, &fallback).is_empty()
            && missing_columns(table2, &fallback).is_empty()
        {
            return Ok(KeyMode::Replaced);
        }
        for col in fallback {
            if !table1.has_column(col) || !table2.has_column(col) {
                missing.push(col.to_string());
            }
        }
    }

    Err(ComparisonError::IdentityUnresolvable {
        kind: settings.kind,
        missing,
    })
}
