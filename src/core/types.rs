use serde::{Deserialize, Serialize};

use crate::core::columns;

/// Identity string used to match a row in one table to a row in the other
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey(pub String);

impl RowKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How row keys were built for a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// Identity columns joined with `-` (e.g. `chr1-100-101-A-T`)
    Composite,
    /// Gene and AA change combined as `Gene (AAChange)` because the identity
    /// columns were unavailable
    Replaced,
}

impl KeyMode {
    #[must_use]
    pub fn is_replaced(self) -> bool {
        matches!(self, Self::Replaced)
    }
}

/// The kinds of pVACtools tables that can be compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// One row per variant (`*all_epitopes.aggregated.tsv`)
    Aggregated,
    /// One row per transcript/peptide candidate (`*all_epitopes.tsv`)
    Unaggregated,
    /// Candidate peptide matches against a reference proteome (`*.reference_matches`)
    ReferenceMatch,
}

impl TableKind {
    /// Title used in report headers and log lines
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Aggregated => "Aggregated TSV",
            Self::Unaggregated => "Unaggregated TSV",
            Self::ReferenceMatch => "Reference Matches TSV",
        }
    }

    /// Comparison settings for this table kind
    #[must_use]
    pub fn settings(self) -> TableSettings {
        match self {
            Self::Aggregated => TableSettings {
                kind: self,
                identity_columns: columns::AGGREGATED_IDENTITY_COLUMNS,
                fallback_columns: Some(columns::FALLBACK_IDENTITY_COLUMNS),
                default_columns: columns::DEFAULT_AGGREGATED_COLUMNS,
                valid_columns: columns::VALID_AGGREGATED_COLUMNS,
                multi_hit: false,
            },
            Self::Unaggregated => TableSettings {
                kind: self,
                identity_columns: columns::UNAGGREGATED_IDENTITY_COLUMNS,
                fallback_columns: Some(columns::FALLBACK_IDENTITY_COLUMNS),
                default_columns: columns::DEFAULT_UNAGGREGATED_COLUMNS,
                valid_columns: columns::VALID_UNAGGREGATED_COLUMNS,
                multi_hit: false,
            },
            Self::ReferenceMatch => TableSettings {
                kind: self,
                identity_columns: columns::REFERENCE_MATCH_IDENTITY_COLUMNS,
                fallback_columns: Some(columns::FALLBACK_IDENTITY_COLUMNS),
                default_columns: columns::DEFAULT_REFERENCE_MATCH_COLUMNS,
                valid_columns: columns::VALID_REFERENCE_MATCH_COLUMNS,
                multi_hit: true,
            },
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Per-kind comparison settings.
///
/// Only the identity columns and the column lists differ between table
/// kinds; the comparison pipeline itself is shared.
#[derive(Debug, Clone, Copy)]
pub struct TableSettings {
    pub kind: TableKind,

    /// Ordered columns joined into the row key
    pub identity_columns: &'static [&'static str],

    /// `(gene, aa_change)` columns used when identity columns are missing
    pub fallback_columns: Option<(&'static str, &'static str)>,

    /// Columns compared when the caller does not request any
    pub default_columns: &'static [&'static str],

    /// Columns a caller may request
    pub valid_columns: &'static [&'static str],

    /// Whether several rows per key ("hits") are expected
    pub multi_hit: bool,
}

impl TableSettings {
    #[must_use]
    pub fn default_column_list(&self) -> Vec<String> {
        self.default_columns.iter().map(|c| (*c).to_string()).collect()
    }
}

/// MHC class of a pVACseq run
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MhcClass {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

/// Layout of the results folders being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// Results produced by the immuno pipeline (`pVACseq/mhc_i`, ...)
    Immuno,
    /// Results produced by a pvactools release (`MHC_Class_I`, ...)
    Pvactools,
}

impl ReleaseKind {
    /// Sub-folder holding the results for an MHC class
    #[must_use]
    pub fn prefix(self, class: MhcClass) -> &'static str {
        match (self, class) {
            (Self::Pvactools, MhcClass::One) => "MHC_Class_I",
            (Self::Pvactools, MhcClass::Two) => "MHC_Class_II",
            (Self::Immuno, MhcClass::One) => "pVACseq/mhc_i",
            (Self::Immuno, MhcClass::Two) => "pVACseq/mhc_ii",
        }
    }

    /// Whether the results folders carry a `log/inputs.yml`
    #[must_use]
    pub fn has_input_yml(self) -> bool {
        matches!(self, Self::Pvactools)
    }
}
