//! Validation of user-supplied column lists.

use crate::core::types::{TableKind, TableSettings};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "Unrecognized {kind} column(s): {}. Valid choices are: {}",
        columns.join(", "),
        valid.join(", ")
    )]
    UnrecognizedColumns {
        kind: TableKind,
        columns: Vec<String>,
        valid: Vec<String>,
    },

    #[error("No {kind} columns given to compare")]
    EmptyColumnList { kind: TableKind },
}

/// Split a comma-separated column list, trimming whitespace and skipping
/// empty entries
#[must_use]
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check every requested column against the whitelist of its table kind.
///
/// # Errors
///
/// Returns `ValidationError::EmptyColumnList` when `columns` is empty, or
/// `ValidationError::UnrecognizedColumns` naming every column that is not on
/// the whitelist.
pub fn validate_columns(settings: &TableSettings, columns: &[String]) -> Result<(), ValidationError> {
    if columns.is_empty() {
        return Err(ValidationError::EmptyColumnList { kind: settings.kind });
    }

    let unknown: Vec<String> = columns
        .iter()
        .filter(|c| !settings.valid_columns.contains(&c.as_str()))
        .cloned()
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnrecognizedColumns {
            kind: settings.kind,
            columns: unknown,
            valid: settings.valid_columns.iter().map(|c| (*c).to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_list() {
        assert_eq!(
            parse_column_list("Tier, Best Peptide,,IC50 MT "),
            vec!["Tier", "Best Peptide", "IC50 MT"]
        );
        assert!(parse_column_list("").is_empty());
    }

    #[test]
    fn test_default_columns_are_valid() {
        for kind in [
            TableKind::Aggregated,
            TableKind::Unaggregated,
            TableKind::ReferenceMatch,
        ] {
            let settings = kind.settings();
            assert!(validate_columns(&settings, &settings.default_column_list()).is_ok());
        }
    }

    #[test]
    fn test_unrecognized_columns_are_listed() {
        let settings = TableKind::Aggregated.settings();
        let cols = vec!["Tier".to_string(), "Bogus".to_string(), "Peptide".to_string()];
        let err = validate_columns(&settings, &cols).unwrap_err();

        match &err {
            ValidationError::UnrecognizedColumns { columns, .. } => {
                assert_eq!(columns, &vec!["Bogus".to_string(), "Peptide".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Unrecognized Aggregated TSV column(s): Bogus, Peptide"));
    }

    #[test]
    fn test_empty_column_list() {
        let settings = TableKind::ReferenceMatch.settings();
        assert!(matches!(
            validate_columns(&settings, &[]),
            Err(ValidationError::EmptyColumnList { .. })
        ));
    }
}
