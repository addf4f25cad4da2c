use std::path::Path;

use serde_json::Value;

use crate::diff::structural::{display_value, ChangeCategory, MetricsDiff, StructuralChange};
use crate::report::tabular::comparison_title;

fn files(out: &mut String, path1: &Path, path2: &Path) {
    out.push_str(&format!("File 1: {}\n", path1.display()));
    out.push_str(&format!("File 2: {}\n", path2.display()));
}

/// Render the `inputs.yml` comparison block
#[must_use]
pub fn render_yaml(changes: &[StructuralChange], path1: &Path, path2: &Path) -> String {
    let mut out = comparison_title("Input YML");
    files(&mut out, path1, path2);
    out.push('\n');

    for category in ChangeCategory::ALL {
        let mut entries = changes.iter().filter(|c| c.category == category).peekable();
        if entries.peek().is_none() {
            continue;
        }
        out.push_str(&format!("=== {} ===\n", category.title()));
        for c in entries {
            out.push_str(&format!("\t{}: {}\n", c.path, c.detail));
        }
        out.push('\n');
    }

    out
}

/// Write `key:` followed by the value; objects and lists are expanded one
/// entry per indented line
fn expanded_field(out: &mut String, key: &str, value: &Value) {
    out.push_str(&format!("\t{key}:"));
    match value {
        Value::Object(map) => {
            for (field, v) in map {
                out.push_str(&format!("\n\t\t{field}: {}", display_value(v)));
            }
        }
        Value::Array(items) => {
            for v in items {
                out.push_str(&format!("\n\t\t{}", display_value(v)));
            }
        }
        other => out.push_str(&format!(" {}", display_value(other))),
    }
    out.push('\n');
}

/// Render the metrics JSON comparison block
#[must_use]
pub fn render_metrics(diff: &MetricsDiff, path1: &Path, path2: &Path) -> String {
    let mut out = comparison_title("Metrics JSON");
    files(&mut out, path1, path2);
    out.push_str("\n--------------------------------\n");
    out.push_str("\t*** INPUT COMPARISON ***\n");
    out.push_str("--------------------------------\n");

    if !diff.shared.is_empty() {
        out.push_str("\n=== Shared Fields ===\n");
        for key in &diff.shared {
            out.push_str(&format!("\t{key}\n"));
        }
    }

    for (title, fields) in [
        ("Fields Unique to File 1", &diff.unique_to_file1),
        ("Fields Unique to File 2", &diff.unique_to_file2),
    ] {
        if fields.is_empty() {
            continue;
        }
        out.push_str(&format!("\n=== {title} ===\n"));
        for (key, value) in fields {
            expanded_field(&mut out, key, value);
        }
    }

    if !diff.changed.is_empty() {
        out.push_str("\n=== Values Changed ===\n");
        for (key, change) in &diff.changed {
            out.push_str(&format!("\t{key}: {change}\n"));
        }
    }

    out
}
