use serde::{Deserialize, Serialize};

/// Cell contents treated as a missing value
pub const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Whether a raw cell value represents a missing value
#[must_use]
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Parse a raw cell as a number, ignoring surrounding whitespace
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Value semantics of a column, decided once per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing cell parses as a number
    Numeric,
    /// At least one cell is not a number
    Text,
}

impl ColumnKind {
    /// Kind used when comparing a column present in two tables.
    ///
    /// A column is only compared numerically when it is numeric on both sides.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Numeric, Self::Numeric) => Self::Numeric,
            _ => Self::Text,
        }
    }
}

/// A tab-separated table held as raw text cells.
///
/// Cells keep their original text so reported values match the input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table, padding short rows to the header width
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`
    #[must_use]
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Rename a column in place. Returns false if `from` is not present.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove the named columns, ignoring names that are not present
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self
            .columns
            .iter()
            .map(|c| !names.contains(&c.as_str()))
            .collect();

        let mut kept_columns = Vec::with_capacity(self.columns.len());
        for (col, &k) in self.columns.drain(..).zip(&keep) {
            if k {
                kept_columns.push(col);
            }
        }
        self.columns = kept_columns;

        for row in &mut self.rows {
            let mut i = 0;
            row.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }
    }

    /// Classify a column by its contents. An all-missing column is numeric.
    #[must_use]
    pub fn classify_column(&self, name: &str) -> Option<ColumnKind> {
        let idx = self.column_index(name)?;
        let numeric = self
            .rows
            .iter()
            .map(|r| r[idx].as_str())
            .filter(|v| !is_missing(v))
            .all(|v| parse_number(v).is_some());
        Some(if numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec!["ID".into(), "Score".into(), "Tier".into()],
            vec![
                vec!["a".into(), "1.5".into(), "Pass".into()],
                vec!["b".into(), "NA".into(), "Reject".into()],
                vec!["c".into(), "3".into()],
            ],
        )
    }

    #[test]
    fn test_missing_values() {
        assert!(is_missing(""));
        assert!(is_missing("  NA "));
        assert!(is_missing("nan"));
        assert!(!is_missing("0"));
        assert!(!is_missing("Pass"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let t = table();
        assert_eq!(t.value(2, "Tier"), Some(""));
        assert_eq!(t.num_rows(), 3);
    }

    #[test]
    fn test_classify_column() {
        let t = table();
        assert_eq!(t.classify_column("Score"), Some(ColumnKind::Numeric));
        assert_eq!(t.classify_column("Tier"), Some(ColumnKind::Text));
        assert_eq!(t.classify_column("Missing"), None);
    }

    #[test]
    fn test_drop_and_rename() {
        let mut t = table();
        assert!(t.rename_column("Tier", "Status"));
        assert!(!t.rename_column("Tier", "Status"));
        t.drop_columns(&["Score", "Absent"]);
        assert_eq!(t.columns(), &["ID".to_string(), "Status".to_string()]);
        assert_eq!(t.rows()[1], vec!["b".to_string(), "Reject".to_string()]);
    }

    #[test]
    fn test_combine_kinds() {
        assert_eq!(
            ColumnKind::Numeric.combine(ColumnKind::Numeric),
            ColumnKind::Numeric
        );
        assert_eq!(ColumnKind::Numeric.combine(ColumnKind::Text), ColumnKind::Text);
    }
}
