//! Locating result files inside a pVACtools results folder.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Glob patterns of the files compared for each MHC class
pub const INPUT_YML: &str = "inputs.yml";
pub const METRICS_JSON: &str = "*all_epitopes.aggregated.metrics.json";
pub const AGGREGATED_TSV: &str = "*all_epitopes.aggregated.tsv";
pub const UNAGGREGATED_TSV: &str = "*all_epitopes.tsv";
pub const REFERENCE_MATCHES: &str = "*.reference_matches";

/// First file matching `pattern` directly inside `root/subdir`.
///
/// Matches are sorted so the choice does not depend on directory order.
/// Unreadable entries and an invalid pattern are logged and yield `None`.
#[must_use]
pub fn find_file(root: &Path, subdir: &str, pattern: &str) -> Option<PathBuf> {
    let search = root.join(subdir).join(pattern);
    let search = search.to_string_lossy();

    let entries = match glob::glob(&search) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid search pattern {search}: {e}");
            return None;
        }
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping unreadable path: {e}");
                None
            }
        })
        .collect();
    found.sort();

    debug!("{search}: {} match(es)", found.len());
    found.into_iter().next()
}
