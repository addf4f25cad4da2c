use std::path::Path;

use serde_json::Value;

use crate::parsing::tsv::ParseError;

fn read(path: &Path) -> Result<String, ParseError> {
    std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a YAML document (e.g. `inputs.yml`) into a JSON value tree
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or `ParseError::Yaml`
/// if it is not valid YAML with string keys.
pub fn parse_yaml_file(path: &Path) -> Result<Value, ParseError> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|source| ParseError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON document (e.g. an aggregated metrics file)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or `ParseError::Json`
/// if it is not valid JSON.
pub fn parse_json_file(path: &Path) -> Result<Value, ParseError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| ParseError::Json {
        path: path.to_path_buf(),
        source,
    })
}
