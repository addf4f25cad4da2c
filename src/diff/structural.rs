//! Structural comparison of YAML run configurations and JSON metrics.
//!
//! Both documents are loaded into [`serde_json::Value`]. Lists are compared
//! ignoring order: an element only counts as added or removed when it has no
//! equal counterpart left on the other side.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::diff::engine::ComparisonError;
use crate::parsing::structured::{parse_json_file, parse_yaml_file};
use crate::parsing::tsv::ParseError;
use crate::report::structural::{render_metrics, render_yaml};
use crate::report::writer::append_block;

/// Kind of a structural change, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    FieldAdded,
    FieldRemoved,
    ValueChanged,
    TypeChanged,
    ItemAdded,
    ItemRemoved,
}

impl ChangeCategory {
    pub const ALL: [Self; 6] = [
        Self::FieldAdded,
        Self::FieldRemoved,
        Self::ValueChanged,
        Self::TypeChanged,
        Self::ItemAdded,
        Self::ItemRemoved,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::FieldAdded => "Fields Unique to File 2",
            Self::FieldRemoved => "Fields Unique to File 1",
            Self::ValueChanged => "Values Changed",
            Self::TypeChanged => "Type Changes",
            Self::ItemAdded => "Values Added in File 2",
            Self::ItemRemoved => "Values Removed in File 2",
        }
    }
}

/// One difference between two documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuralChange {
    pub category: ChangeCategory,
    /// Location of the change, e.g. `alleles[1]` or `a.b`
    pub path: String,
    pub detail: String,
}

/// Render a value the way it appears in reports: strings bare, everything
/// else as compact JSON
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn root_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Numbers compare by value so `1` and `1.0` are equal
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && unmatched_items(x, y).is_empty() && unmatched_items(y, x).is_empty()
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| same_value(v, w)))
        }
        _ => a == b,
    }
}

/// Order-insensitive identity of a value, used to pair list elements
fn signature(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()),
        Value::Array(items) => {
            let mut sigs: Vec<String> = items.iter().map(signature).collect();
            sigs.sort();
            format!("[{}]", sigs.join(","))
        }
        Value::Object(map) => {
            let mut entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{k:?}:{}", signature(v)))
                .collect();
            entries.sort();
            format!("{{{}}}", entries.join(","))
        }
        other => other.to_string(),
    }
}

/// Indices of `ours` left over once each element is paired with an equal one
/// in `theirs`
fn unmatched_items(ours: &[Value], theirs: &[Value]) -> Vec<usize> {
    let mut available: HashMap<String, usize> = HashMap::new();
    for item in theirs {
        *available.entry(signature(item)).or_default() += 1;
    }

    ours.iter()
        .enumerate()
        .filter_map(|(i, item)| match available.get_mut(&signature(item)) {
            Some(count) if *count > 0 => {
                *count -= 1;
                None
            }
            _ => Some(i),
        })
        .collect()
}

/// Recursive difference between two documents.
///
/// Changes are grouped by [`ChangeCategory`]; within a category fields of
/// an object come before the changes nested below it.
#[must_use]
pub fn deep_diff(value1: &Value, value2: &Value) -> Vec<StructuralChange> {
    let mut changes = Vec::new();
    walk("", value1, value2, &mut changes);
    changes.sort_by_key(|c| c.category);
    changes
}

fn change(category: ChangeCategory, path: String, detail: String) -> StructuralChange {
    StructuralChange {
        category,
        path,
        detail,
    }
}

fn walk(path: &str, value1: &Value, value2: &Value, changes: &mut Vec<StructuralChange>) {
    match (value1, value2) {
        (Value::Object(m1), Value::Object(m2)) => {
            for (key, v) in m1 {
                if !m2.contains_key(key) {
                    let p = child_path(path, key);
                    changes.push(change(ChangeCategory::FieldRemoved, p, display_value(v)));
                }
            }
            for (key, v) in m2 {
                if !m1.contains_key(key) {
                    let p = child_path(path, key);
                    changes.push(change(ChangeCategory::FieldAdded, p, display_value(v)));
                }
            }
            for (key, v1) in m1 {
                if let Some(v2) = m2.get(key) {
                    walk(&child_path(path, key), v1, v2, changes);
                }
            }
        }
        (Value::Array(a1), Value::Array(a2)) => {
            let base = root_path(path);
            for i in unmatched_items(a2, a1) {
                let p = format!("{base}[{i}]");
                changes.push(change(ChangeCategory::ItemAdded, p, display_value(&a2[i])));
            }
            for i in unmatched_items(a1, a2) {
                let p = format!("{base}[{i}]");
                changes.push(change(ChangeCategory::ItemRemoved, p, display_value(&a1[i])));
            }
        }
        (v1, v2) if same_value(v1, v2) => {}
        (v1, v2) if type_name(v1) != type_name(v2) && !(v1.is_number() && v2.is_number()) => {
            changes.push(change(
                ChangeCategory::TypeChanged,
                root_path(path).to_string(),
                format!("{} -> {}", type_name(v1), type_name(v2)),
            ));
        }
        (v1, v2) => {
            changes.push(change(
                ChangeCategory::ValueChanged,
                root_path(path).to_string(),
                format!("{} -> {}", display_value(v1), display_value(v2)),
            ));
        }
    }
}

/// Remove every object key starting with `chr`, at any depth.
///
/// Per-variant entries in metrics files are keyed by their variant ID; what
/// remains are the run inputs.
#[must_use]
pub fn filter_chr_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| !k.starts_with("chr"))
                .map(|(k, v)| (k, filter_chr_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(filter_chr_keys).collect()),
        other => other,
    }
}

/// Top-level comparison of two metrics documents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsDiff {
    /// Keys present in both files, sorted
    pub shared: Vec<String>,
    pub unique_to_file1: Vec<(String, Value)>,
    pub unique_to_file2: Vec<(String, Value)>,
    /// `(key, "old -> new")` for shared keys whose values differ
    pub changed: Vec<(String, String)>,
}

impl MetricsDiff {
    /// Shared fields alone do not count as a difference
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.unique_to_file1.is_empty() && self.unique_to_file2.is_empty() && self.changed.is_empty()
    }
}

/// Compare the top-level fields of two filtered metrics objects
#[must_use]
pub fn compare_metrics(metrics1: &Map<String, Value>, metrics2: &Map<String, Value>) -> MetricsDiff {
    let mut keys1: Vec<&String> = metrics1.keys().collect();
    let mut keys2: Vec<&String> = metrics2.keys().collect();
    keys1.sort();
    keys2.sort();

    let mut diff = MetricsDiff::default();
    for key in keys1 {
        let v1 = &metrics1[key.as_str()];
        match metrics2.get(key) {
            Some(v2) => {
                diff.shared.push(key.clone());
                if !same_value(v1, v2) {
                    diff.changed.push((
                        key.clone(),
                        format!("{} -> {}", display_value(v1), display_value(v2)),
                    ));
                }
            }
            None => diff.unique_to_file1.push((key.clone(), v1.clone())),
        }
    }
    for key in keys2 {
        if !metrics1.contains_key(key) {
            diff.unique_to_file2
                .push((key.clone(), metrics2[key.as_str()].clone()));
        }
    }

    diff
}

/// Load, compare and report two `inputs.yml` files.
///
/// Returns the changes found; identical files are logged and not written.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded or the report cannot be
/// written.
pub fn run_yaml_comparison(
    path1: &Path,
    path2: &Path,
    output: &Path,
) -> Result<Vec<StructuralChange>, ComparisonError> {
    let doc1 = parse_yaml_file(path1)?;
    let doc2 = parse_yaml_file(path2)?;

    let changes = deep_diff(&doc1, &doc2);
    debug!(changes = changes.len(), "Compared YAML inputs");

    if changes.is_empty() {
        info!("The YAML input files are identical.");
    } else {
        append_block(output, &render_yaml(&changes, path1, path2))?;
    }
    Ok(changes)
}

fn load_metrics(path: &Path) -> Result<Map<String, Value>, ParseError> {
    match filter_chr_keys(parse_json_file(path)?) {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::InvalidFormat(format!(
            "{}: expected a JSON object at the top level",
            path.display()
        ))),
    }
}

/// Load, compare and report two aggregated metrics JSON files.
///
/// # Errors
///
/// Returns an error if either file cannot be loaded, is not a JSON object,
/// or the report cannot be written.
pub fn run_json_comparison(
    path1: &Path,
    path2: &Path,
    output: &Path,
) -> Result<MetricsDiff, ComparisonError> {
    let metrics1 = load_metrics(path1)?;
    let metrics2 = load_metrics(path2)?;

    let diff = compare_metrics(&metrics1, &metrics2);
    debug!(
        shared = diff.shared.len(),
        changed = diff.changed.len(),
        "Compared metrics inputs"
    );

    if diff.is_identical() {
        info!("The JSON metric inputs are identical.");
    } else {
        append_block(output, &render_metrics(&diff, path1, path2))?;
    }
    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn find(changes: &[StructuralChange], category: ChangeCategory) -> Vec<(&str, &str)> {
        changes
            .iter()
            .filter(|c| c.category == category)
            .map(|c| (c.path.as_str(), c.detail.as_str()))
            .collect()
    }

    #[test]
    fn test_identical_documents() {
        let doc = json!({"alleles": ["HLA-A*02:01", "HLA-B*07:02"], "top_score_metric": "median"});
        assert!(deep_diff(&doc, &doc).is_empty());
    }

    #[test]
    fn test_list_order_is_ignored() {
        let a = json!({"alleles": ["A", "B", "C"], "lengths": [8, 9, 10]});
        let b = json!({"alleles": ["C", "A", "B"], "lengths": [10, 8, 9]});
        assert!(deep_diff(&a, &b).is_empty());
    }

    #[test]
    fn test_field_and_value_changes() {
        let a = json!({"net_chop_method": "cterm", "fasta_size": 200, "iedb": {"retries": 5}});
        let b = json!({"fasta_size": 100, "iedb": {"retries": 5, "timeout": 30}, "tdna_vaf": 0.25});
        let changes = deep_diff(&a, &b);

        assert_eq!(
            find(&changes, ChangeCategory::FieldAdded),
            vec![("tdna_vaf", "0.25"), ("iedb.timeout", "30")]
        );
        assert_eq!(
            find(&changes, ChangeCategory::FieldRemoved),
            vec![("net_chop_method", "cterm")]
        );
        assert_eq!(
            find(&changes, ChangeCategory::ValueChanged),
            vec![("fasta_size", "200 -> 100")]
        );
        // Categories are grouped in report order
        assert_eq!(changes[0].category, ChangeCategory::FieldAdded);
    }

    #[test]
    fn test_list_items_and_type_changes() {
        let a = json!({"alleles": ["A", "B"], "threshold": "500"});
        let b = json!({"alleles": ["B", "D", "E"], "threshold": 500});
        let changes = deep_diff(&a, &b);

        assert_eq!(
            find(&changes, ChangeCategory::ItemAdded),
            vec![("alleles[1]", "D"), ("alleles[2]", "E")]
        );
        assert_eq!(find(&changes, ChangeCategory::ItemRemoved), vec![("alleles[0]", "A")]);
        assert_eq!(
            find(&changes, ChangeCategory::TypeChanged),
            vec![("threshold", "str -> int")]
        );
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(deep_diff(&json!({"x": 1}), &json!({"x": 1.0})).is_empty());
        assert_eq!(
            find(&deep_diff(&json!({"x": 1}), &json!({"x": 1.5})), ChangeCategory::ValueChanged),
            vec![("x", "1 -> 1.5")]
        );
    }

    #[test]
    fn test_filter_chr_keys() {
        let doc = json!({
            "alleles": ["A"],
            "chr1-100-101-A-T": {"genes": []},
            "nested": {"chrX-1-2-G-C": 1, "kept": [{"chr2": 0, "other": 1}]}
        });
        assert_eq!(
            filter_chr_keys(doc),
            json!({"alleles": ["A"], "nested": {"kept": [{"other": 1}]}})
        );
    }

    #[test]
    fn test_compare_metrics() {
        let m1 = json!({"alleles": ["A"], "binding_threshold": 500, "old_field": {"a": 1}});
        let m2 = json!({"alleles": ["A"], "binding_threshold": 250, "new_field": [1, 2]});
        let diff = compare_metrics(m1.as_object().unwrap(), m2.as_object().unwrap());

        assert_eq!(diff.shared, vec!["alleles", "binding_threshold"]);
        assert_eq!(
            diff.changed,
            vec![("binding_threshold".to_string(), "500 -> 250".to_string())]
        );
        assert_eq!(diff.unique_to_file1[0].0, "old_field");
        assert_eq!(diff.unique_to_file2[0].0, "new_field");
        assert!(!diff.is_identical());
    }

    #[test]
    fn test_compare_metrics_numbers_by_value() {
        let m1 = json!({"binding_threshold": 500, "percentile": 1});
        let m2 = json!({"binding_threshold": 500.0, "percentile": 1.5});
        let diff = compare_metrics(m1.as_object().unwrap(), m2.as_object().unwrap());

        assert_eq!(
            diff.changed,
            vec![("percentile".to_string(), "1 -> 1.5".to_string())]
        );
    }

    #[test]
    fn test_metrics_with_only_shared_fields_are_identical() {
        let m = json!({"alleles": ["A"], "chr1-1-2-A-T": {"x": 1}});
        let diff = compare_metrics(m.as_object().unwrap(), m.as_object().unwrap());
        assert!(diff.is_identical());
        assert_eq!(diff.shared.len(), 2);
    }

    #[test]
    fn test_run_json_comparison_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("a.json");
        let p2 = dir.path().join("b.json");
        std::fs::write(&p1, "[1, 2]").unwrap();
        std::fs::write(&p2, "{}").unwrap();

        let result = run_json_comparison(&p1, &p2, &dir.path().join("out.tsv"));
        assert!(matches!(
            result,
            Err(ComparisonError::Parse(ParseError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_run_yaml_comparison_writes_only_on_difference() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("a.yml");
        let p2 = dir.path().join("b.yml");
        let out = dir.path().join("report.tsv");
        std::fs::write(&p1, "alleles:\n  - A\n  - B\nfasta_size: 200\n").unwrap();
        std::fs::write(&p2, "alleles:\n  - B\n  - A\nfasta_size: 200\n").unwrap();

        assert!(run_yaml_comparison(&p1, &p2, &out).unwrap().is_empty());
        assert!(!out.exists());

        std::fs::write(&p2, "alleles:\n  - A\nfasta_size: 100\n").unwrap();
        let changes = run_yaml_comparison(&p1, &p2, &out).unwrap();
        assert_eq!(changes.len(), 2);
        let report = std::fs::read_to_string(&out).unwrap();
        assert!(report.contains("INPUT YML COMPARISON"));
        assert!(report.contains("\tfasta_size: 200 -> 100\n"));
    }
}
