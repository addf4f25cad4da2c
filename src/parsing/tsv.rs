use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::table::Table;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TSV {path}: {source}")]
    Tsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse YAML {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Load a tab-separated file with a header row
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, `ParseError::Tsv`
/// if a record cannot be read, or `ParseError::InvalidFormat` if the header
/// is empty or a row has more fields than the header.
pub fn parse_tsv_file(path: &Path) -> Result<Table, ParseError> {
    let file = std::fs::File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tsv_reader(file, path)
}

/// Parse tab-separated text with a header row
///
/// # Errors
///
/// Returns `ParseError::Tsv` if a record cannot be read, or
/// `ParseError::InvalidFormat` if the header is empty or a row has more
/// fields than the header.
pub fn parse_tsv_text(text: &str) -> Result<Table, ParseError> {
    parse_tsv_reader(text.as_bytes(), Path::new("<text>"))
}

fn parse_tsv_reader<R: Read>(reader: R, source: &Path) -> Result<Table, ParseError> {
    let tsv_error = |e: csv::Error| ParseError::Tsv {
        path: source.to_path_buf(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(tsv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err(ParseError::InvalidFormat(format!(
            "{} has no header row",
            source.display()
        )));
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(tsv_error)?;
        if record.len() > columns.len() {
            let line = record.position().map_or(0, csv::Position::line);
            return Err(ParseError::InvalidFormat(format!(
                "{} line {line}: expected {} fields, saw {}",
                source.display(),
                columns.len(),
                record.len()
            )));
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::new(columns, rows))
}
