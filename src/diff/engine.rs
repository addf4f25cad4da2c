use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::table::{ColumnKind, Table};
use crate::core::types::{KeyMode, RowKey, TableKind, TableSettings};
use crate::diff::cells::{diff_column, ColumnDifferences, DEFAULT_TOLERANCE};
use crate::diff::hits::{compare_hits, multi_hit_keys, HitDifference};
use crate::diff::identity::{build_keys, key_source_columns, KeyedTable};
use crate::diff::normalize::{classify_columns, normalize_columns, Rename};
use crate::diff::partition::Partition;
use crate::diff::schema::{reconcile_columns, resolve_key_mode, DroppedColumn};
use crate::parsing::tsv::{parse_tsv_file, ParseError};
use crate::report::tabular::render_tabular;
use crate::report::writer::{append_block, ReportError};

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Cannot identify rows of the {kind} files: missing column(s) {missing:?}")]
    IdentityUnresolvable {
        kind: TableKind,
        missing: Vec<String>,
    },
}

/// Settings shared by every tabular comparison
#[derive(Debug, Clone, Copy)]
pub struct ComparisonConfig {
    /// Maximum absolute difference for numeric values to be considered equal
    pub tolerance: f64,
    /// Compare shared rows across the rayon thread pool
    pub parallel: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            parallel: true,
        }
    }
}

/// Hit counts of keys unique to one file, kept when either file has
/// several rows per key
#[derive(Debug, Clone, Default)]
pub struct HitCounts {
    pub file1: HashMap<RowKey, usize>,
    pub file2: HashMap<RowKey, usize>,
}

/// Result of comparing two tables of the same kind
#[derive(Debug, Clone)]
pub struct TabularDiff {
    pub kind: TableKind,
    pub key_mode: KeyMode,
    pub renames1: Vec<Rename>,
    pub renames2: Vec<Rename>,
    pub dropped: Vec<DroppedColumn>,
    /// Requested columns present in both tables
    pub compared_columns: Vec<String>,
    pub partition: Partition,
    /// Columns with at least one difference, in request order
    pub differences: Vec<ColumnDifferences>,
    pub hit_differences: Vec<HitDifference>,
    pub hit_counts: Option<HitCounts>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCount {
    pub column: String,
    pub differences: usize,
}

/// Counts derived from a [`TabularDiff`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferencesSummary {
    pub total_variants: usize,
    pub common_variants: usize,
    pub unique_to_file1: usize,
    pub unique_to_file2: usize,
    pub column_differences: Vec<ColumnCount>,
    pub hit_differences: usize,
    pub replaced_id: bool,
}

impl TabularDiff {
    /// No differing values, no unique keys and no unmatched hits
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.differences.iter().all(|d| d.records.is_empty())
            && !self.partition.has_unique()
            && self.hit_differences.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> DifferencesSummary {
        DifferencesSummary {
            total_variants: self.partition.total(),
            common_variants: self.partition.common.len(),
            unique_to_file1: self.partition.unique_to_1.len(),
            unique_to_file2: self.partition.unique_to_2.len(),
            column_differences: self
                .differences
                .iter()
                .filter(|d| !d.records.is_empty())
                .map(|d| ColumnCount {
                    column: d.column.clone(),
                    differences: d.records.len(),
                })
                .collect(),
            hit_differences: self.hit_differences.len(),
            replaced_id: self.key_mode.is_replaced(),
        }
    }
}

/// Compare two loaded tables of the same kind.
///
/// Runs normalization, column reconciliation, keying, partitioning and the
/// cell comparison in that order; nothing is written.
///
/// # Errors
///
/// Returns `ComparisonError::IdentityUnresolvable` when rows cannot be keyed.
pub fn compare_tables(
    settings: &TableSettings,
    mut table1: Table,
    mut table2: Table,
    requested: &[String],
    config: &ComparisonConfig,
) -> Result<TabularDiff, ComparisonError> {
    let renames1 = normalize_columns(&mut table1);
    let renames2 = normalize_columns(&mut table2);
    for (file, renames) in [(1, &renames1), (2, &renames2)] {
        for r in renames {
            info!("\u{2022} Renamed '{}' to '{}' in file {file}", r.from, r.to);
        }
    }

    let key_mode = resolve_key_mode(settings, &table1, &table2)?;
    if key_mode.is_replaced() {
        info!("\u{2022} Replaced ID with Gene and AA Change");
    }

    let key_columns = key_source_columns(settings, key_mode);
    let columns = reconcile_columns(requested, &table1, &table2, &key_columns);
    for dropped in &columns.dropped {
        info!("\u{2022} {dropped}");
    }

    let keyed1 = build_keys(table1, settings, key_mode)?;
    let keyed2 = build_keys(table2, settings, key_mode)?;
    if !settings.multi_hit {
        for (file, keyed) in [(1, &keyed1), (2, &keyed2)] {
            let duplicates = keyed.duplicate_rows();
            if duplicates > 0 {
                warn!(
                    "{duplicates} duplicate row(s) in file {file}; comparing the first row per ID"
                );
            }
        }
    }

    let kinds1 = classify_columns(&keyed1.table, &columns.columns);
    let kinds2 = classify_columns(&keyed2.table, &columns.columns);

    let partition = Partition::new(&keyed1.order, &keyed2.order);
    debug!(
        common = partition.common.len(),
        unique1 = partition.unique_to_1.len(),
        unique2 = partition.unique_to_2.len(),
        "Partitioned row keys"
    );

    let (single_keys, hit_differences, hit_counts) = if settings.multi_hit {
        split_hits(&partition, &keyed1, &keyed2, &columns.columns)
    } else {
        (partition.common.clone(), Vec::new(), None)
    };

    let differences = columns
        .columns
        .iter()
        .map(|col| {
            let kind = match (kinds1.get(col), kinds2.get(col)) {
                (Some(a), Some(b)) => a.combine(*b),
                _ => ColumnKind::Text,
            };
            diff_column(
                col,
                kind,
                &single_keys,
                &keyed1,
                &keyed2,
                config.tolerance,
                config.parallel,
            )
        })
        .filter(|d| !d.records.is_empty())
        .collect();

    Ok(TabularDiff {
        kind: settings.kind,
        key_mode,
        renames1,
        renames2,
        dropped: columns.dropped,
        compared_columns: columns.columns,
        partition,
        differences,
        hit_differences,
        hit_counts,
    })
}

/// Separate keys with a single row on both sides from multi-hit keys and
/// compare the latter by hit content
fn split_hits(
    partition: &Partition,
    keyed1: &KeyedTable,
    keyed2: &KeyedTable,
    columns: &[String],
) -> (Vec<RowKey>, Vec<HitDifference>, Option<HitCounts>) {
    let has_duplicates = keyed1.duplicate_rows() > 0 || keyed2.duplicate_rows() > 0;
    if !has_duplicates {
        return (partition.common.clone(), Vec::new(), None);
    }

    for (file, keyed) in [(1, keyed1), (2, keyed2)] {
        if keyed.duplicate_rows() > 0 {
            info!("\u{2022} Multiple hits per ID found in file {file}; comparing hits by content");
        }
    }

    let multi = multi_hit_keys(&partition.common, keyed1, keyed2);
    let multi_set: HashSet<&RowKey> = multi.iter().collect();
    let single = partition
        .common
        .iter()
        .filter(|k| !multi_set.contains(k))
        .cloned()
        .collect();
    let hit_differences = compare_hits(&multi, keyed1, keyed2, columns);

    let hit_counts = HitCounts {
        file1: partition
            .unique_to_1
            .iter()
            .map(|k| (k.clone(), keyed1.hit_count(k)))
            .collect(),
        file2: partition
            .unique_to_2
            .iter()
            .map(|k| (k.clone(), keyed2.hit_count(k)))
            .collect(),
    };

    (single, hit_differences, Some(hit_counts))
}

/// Load, compare and report a pair of tables.
///
/// When the tables are identical nothing is written and the identity is
/// logged; otherwise the rendered block is appended to `output`.
///
/// # Errors
///
/// Returns an error if either table cannot be loaded, rows cannot be keyed,
/// or the report cannot be written.
pub fn run_tabular_comparison(
    kind: TableKind,
    path1: &Path,
    path2: &Path,
    output: &Path,
    requested: &[String],
    config: &ComparisonConfig,
) -> Result<TabularDiff, ComparisonError> {
    let table1 = parse_tsv_file(path1)?;
    let table2 = parse_tsv_file(path2)?;
    debug!(
        rows1 = table1.num_rows(),
        rows2 = table2.num_rows(),
        "Loaded {} files",
        kind.title()
    );

    let diff = compare_tables(&kind.settings(), table1, table2, requested, config)?;

    if diff.is_identical() {
        info!("The {} files are identical.", kind.title());
    } else {
        let block = render_tabular(&diff, path1, path2);
        append_block(output, &block)?;
    }

    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tsv::parse_tsv_text;

    fn cols(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| (*c).to_string()).collect()
    }

    fn aggregated(text: &str) -> Table {
        parse_tsv_text(text).unwrap()
    }

    #[test]
    fn test_identical_tables() {
        let text = "ID\tGene\tTier\tIC50 MT\n\
                    chr1-100-101-A-T\tKRAS\tPass\t25.3\n\
                    chr2-5-6-G-C\tTP53\tReject\tNA\n";
        let diff = compare_tables(
            &TableKind::Aggregated.settings(),
            aggregated(text),
            aggregated(text),
            &cols(&["Tier", "IC50 MT"]),
            &ComparisonConfig::default(),
        )
        .unwrap();

        assert!(diff.is_identical());
        assert_eq!(diff.summary().common_variants, 2);
        assert_eq!(diff.summary().total_variants, 2);
    }

    #[test]
    fn test_value_and_unique_differences() {
        let t1 = "ID\tTier\nchr1-100-101-A-T\tPass\nchr5-1-2-G-C\tPass\n";
        let t2 = "ID\ttier\nchr1-100-101-A-T\tReject\n";
        let diff = compare_tables(
            &TableKind::Aggregated.settings(),
            aggregated(t1),
            aggregated(t2),
            &cols(&["Tier"]),
            &ComparisonConfig::default(),
        )
        .unwrap();

        assert_eq!(diff.renames2.len(), 1);
        let summary = diff.summary();
        assert_eq!(summary.unique_to_file1, 1);
        assert_eq!(summary.unique_to_file2, 0);
        assert_eq!(
            summary.column_differences,
            vec![ColumnCount {
                column: "Tier".into(),
                differences: 1
            }]
        );
        assert_eq!(diff.differences[0].records[0].value1, "Pass");
        assert_eq!(diff.differences[0].records[0].value2, "Reject");
    }

    #[test]
    fn test_fallback_key() {
        let t1 = "Gene\tAA Change\tTier\nKRAS\tG12D\tPass\nTP53\tR175H\tPass\n";
        let t2 = "Gene\tAA Change\tTier\nKRAS\tG12D\tReject\n";
        let diff = compare_tables(
            &TableKind::Aggregated.settings(),
            aggregated(t1),
            aggregated(t2),
            &cols(&["Tier"]),
            &ComparisonConfig::default(),
        )
        .unwrap();

        assert_eq!(diff.key_mode, KeyMode::Replaced);
        assert!(diff.summary().replaced_id);
        assert_eq!(diff.partition.unique_to_1, vec![RowKey::new("TP53 (R175H)")]);
        assert_eq!(diff.differences[0].records[0].key, RowKey::new("KRAS (G12D)"));
    }

    #[test]
    fn test_unresolvable_identity() {
        let t1 = "Tier\nPass\n";
        let result = compare_tables(
            &TableKind::Aggregated.settings(),
            aggregated(t1),
            aggregated(t1),
            &cols(&["Tier"]),
            &ComparisonConfig::default(),
        );
        assert!(matches!(
            result,
            Err(ComparisonError::IdentityUnresolvable { .. })
        ));
    }

    #[test]
    fn test_mixed_kind_column_compared_as_text() {
        let t1 = "ID\tScore\nchr1-1-2-A-T\t5.00\n";
        let t2 = "ID\tScore\nchr1-1-2-A-T\t5.05\nchr1-3-4-A-T\thigh\n";
        let diff = compare_tables(
            &TableKind::Aggregated.settings(),
            aggregated(t1),
            aggregated(t2),
            &cols(&["Score"]),
            &ComparisonConfig::default(),
        )
        .unwrap();

        assert_eq!(diff.differences.len(), 1);
        assert_eq!(diff.differences[0].kind, ColumnKind::Text);
    }

    #[test]
    fn test_reference_match_hits() {
        let header = "Chromosome\tStart\tStop\tReference\tVariant\tTranscript\tMT Epitope Seq\tHit ID\tMatch Start\tMatch Stop\tPeptide\tMatch Window\n";
        let row = |hit: &str, peptide: &str| {
            format!("chr1\t10\t11\tA\tT\tENST1\tPEPTIDE\t{hit}\t1\t8\t{peptide}\tWIN\n")
        };
        let t1 = format!("{header}{}{}{}", row("h1", "AAA"), row("h1", "BBB"), row("h2", "CCC"));
        let t2 = format!("{header}{}{}{}", row("h1", "BBB"), row("h1", "DDD"), row("h2", "CCX"));

        let diff = compare_tables(
            &TableKind::ReferenceMatch.settings(),
            aggregated(&t1),
            aggregated(&t2),
            &cols(&["Peptide", "Match Window"]),
            &ComparisonConfig::default(),
        )
        .unwrap();

        assert_eq!(diff.hit_differences.len(), 2);
        assert_eq!(diff.hit_differences[0].content, "AAA\tWIN");
        assert_eq!(diff.hit_differences[1].content, "DDD\tWIN");
        // h2 has a single hit on both sides and goes through the cell differ
        assert_eq!(diff.differences.len(), 1);
        assert_eq!(diff.differences[0].column, "Peptide");
        assert!(diff.hit_counts.is_some());
    }
}
