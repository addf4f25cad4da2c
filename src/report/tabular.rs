use std::path::Path;

use crate::core::types::RowKey;
use crate::diff::engine::TabularDiff;
use crate::diff::identity::sort_by_row_key;

const BANNER_RULE: &str = "==============================";
const SECTION_RULE: &str = "============";

/// Report header line for a comparison block
#[must_use]
pub fn comparison_title(name: &str) -> String {
    format!(
        "\n\n{BANNER_RULE} {} COMPARISON {BANNER_RULE}\n\n\n",
        name.to_uppercase()
    )
}

fn section_title(name: &str) -> String {
    format!("\n\n{SECTION_RULE}[ {name} ]{SECTION_RULE}\n\n\n")
}

/// Render the report block for a tabular comparison.
///
/// Differences and unique keys are ordered by their row keys, so identical
/// inputs always produce byte-identical blocks.
#[must_use]
pub fn render_tabular(diff: &TabularDiff, path1: &Path, path2: &Path) -> String {
    let mut out = comparison_title(diff.kind.title());
    out.push_str(&format!("File 1: {}\n", path1.display()));
    out.push_str(&format!("File 2: {}\n", path2.display()));

    if !diff.dropped.is_empty() {
        out.push('\n');
        for dropped in &diff.dropped {
            out.push_str(&format!("{dropped}\n"));
        }
    }

    render_summary(&mut out, diff);
    render_differences(&mut out, diff);
    render_hit_differences(&mut out, diff);
    render_unique(&mut out, diff);

    out
}

fn render_summary(out: &mut String, diff: &TabularDiff) {
    let summary = diff.summary();

    out.push_str("\n/* Differences Summary */\n");
    out.push_str("-----------------------------\n");
    out.push_str(&format!(
        "Total number of variants: {}\n",
        summary.total_variants
    ));
    out.push_str(&format!(
        "Number of common variants: {}\n",
        summary.common_variants
    ));
    out.push_str(&format!(
        "Number of variants unique to file 1: {}\n",
        summary.unique_to_file1
    ));
    out.push_str(&format!(
        "Number of variants unique to file 2: {}\n",
        summary.unique_to_file2
    ));
    for count in &summary.column_differences {
        out.push_str("-----\n");
        out.push_str(&format!(
            "Number of differences in {}: {}\n",
            count.column, count.differences
        ));
    }
    if diff.hit_counts.is_some() {
        out.push_str("-----\n");
        out.push_str(&format!(
            "Number of unmatched hits: {}\n",
            summary.hit_differences
        ));
    }

    if summary.replaced_id {
        out.push_str("\nID Format: 'Gene (AA_Change)'\n");
    }
}

fn render_differences(out: &mut String, diff: &TabularDiff) {
    for column in &diff.differences {
        let mut records = column.records.clone();
        sort_by_row_key(&mut records, diff.key_mode, |r| &r.key);

        out.push_str(&section_title(&format!(
            "DIFFERENCES IN {}",
            column.column.to_uppercase()
        )));
        out.push_str("ID\tFile 1\tFile 2\n");
        for r in &records {
            out.push_str(&format!("{}:\t{}\t->\t{}\n", r.key, r.value1, r.value2));
        }
    }
}

fn render_hit_differences(out: &mut String, diff: &TabularDiff) {
    if diff.hit_differences.is_empty() {
        return;
    }

    let mut hits = diff.hit_differences.clone();
    sort_by_row_key(&mut hits, diff.key_mode, |h| &h.key);

    out.push_str(&section_title("HIT DIFFERENCES"));
    out.push_str(&format!("ID\tFile\t{}\n", diff.compared_columns.join("\t")));
    for h in &hits {
        out.push_str(&format!("{}:\t{}\t{}\n", h.key, h.side, h.content));
    }
}

fn render_unique(out: &mut String, diff: &TabularDiff) {
    if !diff.partition.has_unique() {
        return;
    }

    out.push_str(&section_title("UNIQUE VARIANTS"));

    let counts = diff.hit_counts.as_ref();
    let sections = [
        (
            "Variants Unique to File 1:",
            &diff.partition.unique_to_1,
            counts.map(|c| &c.file1),
        ),
        (
            "Variants Unique to File 2:",
            &diff.partition.unique_to_2,
            counts.map(|c| &c.file2),
        ),
    ];

    let mut first = true;
    for (heading, keys, hit_counts) in sections {
        if keys.is_empty() {
            continue;
        }
        if !first {
            out.push('\n');
        }
        first = false;

        let mut keys: Vec<&RowKey> = keys.iter().collect();
        sort_by_row_key(&mut keys, diff.key_mode, |k| *k);

        out.push_str(heading);
        out.push('\n');
        for key in keys {
            match hit_counts.and_then(|c| c.get(key)) {
                Some(hits) => out.push_str(&format!("\t{key}:\t{hits}\n")),
                None => out.push_str(&format!("\t{key}\n")),
            }
        }
    }
}
