use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError + '_ {
    move |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Append a fully rendered block to the report.
///
/// The block is written with a single call and flushed before the handle is
/// dropped, so the next comparison always sees a complete block.
///
/// # Errors
///
/// Returns `ReportError::Write` if the file cannot be opened, written or flushed.
pub fn append_block(path: &Path, block: &str) -> Result<(), ReportError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_error(path))?;
    file.write_all(block.as_bytes()).map_err(write_error(path))?;
    file.flush().map_err(write_error(path))
}

/// Column lists printed in the report banner
#[derive(Debug, Clone, Copy)]
pub struct BannerColumns<'a> {
    pub aggregated: &'a [String],
    pub unaggregated: &'a [String],
    pub reference_match: &'a [String],
}

/// Render the banner written once at the top of a report
#[must_use]
pub fn render_header(generated_at: &str, columns: &BannerColumns<'_>) -> String {
    format!(
        "Report Generation Date and Time: {generated_at}\n\n\
         Aggregated Columns: {}\n\
         Unaggregated Columns: {}\n\
         Reference Match Columns: {}\n\n",
        columns.aggregated.join(", "),
        columns.unaggregated.join(", "),
        columns.reference_match.join(", "),
    )
}

/// Start a new report, replacing any existing file, with the banner
///
/// # Errors
///
/// Returns `ReportError::Write` if the file cannot be created or written.
pub fn write_header(path: &Path, columns: &BannerColumns<'_>) -> Result<(), ReportError> {
    let generated_at = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string();
    let header = render_header(&generated_at, columns);

    let mut file = std::fs::File::create(path).map_err(write_error(path))?;
    file.write_all(header.as_bytes()).map_err(write_error(path))?;
    file.flush().map_err(write_error(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_render_header() {
        let agg = cols(&["Tier", "Best Peptide"]);
        let unagg = cols(&["Biotype"]);
        let refm = cols(&["Peptide"]);
        let header = render_header(
            "2024-01-01 00:00:00",
            &BannerColumns {
                aggregated: &agg,
                unaggregated: &unagg,
                reference_match: &refm,
            },
        );

        assert!(header.starts_with("Report Generation Date and Time: 2024-01-01 00:00:00\n\n"));
        assert!(header.contains("Aggregated Columns: Tier, Best Peptide\n"));
        assert!(header.ends_with("Reference Match Columns: Peptide\n\n"));
    }

    #[test]
    fn test_header_truncates_and_blocks_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tsv");
        std::fs::write(&path, "stale contents").unwrap();

        let empty: Vec<String> = Vec::new();
        let columns = BannerColumns {
            aggregated: &empty,
            unaggregated: &empty,
            reference_match: &empty,
        };
        write_header(&path, &columns).unwrap();
        append_block(&path, "block one\n").unwrap();
        append_block(&path, "block two\n").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
        assert!(content.ends_with("block one\nblock two\n"));
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let err = append_block(Path::new("/nonexistent/dir/report.tsv"), "x").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/report.tsv"));
    }
}
