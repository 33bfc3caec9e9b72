//! Reading specification, mapping and example files.

use serde_json::Value;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tracing::warn;

use crate::error::ApplicationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` files are YAML, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a document. Object key order is kept as written.
pub fn parse(input: &str, format: DocumentFormat) -> Result<Value, ApplicationError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(input)
            .map_err(|e| ApplicationError::other(format!("Invalid JSON: {}", e))),
        DocumentFormat::Yaml => serde_saphyr::from_str(input)
            .map_err(|e| ApplicationError::other(format!("Invalid YAML: {}", e))),
    }
}

/// Read and parse the file at `path`.
///
/// A missing file is a `FileNotFound` error carrying the path; any other read
/// or parse failure is a generic error naming the file.
pub fn load_document(path: &Path) -> Result<Value, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "cannot read file");
        match e.kind() {
            IoErrorKind::NotFound => ApplicationError::file_not_found(path),
            _ => ApplicationError::other(format!("Cannot read '{}': {}", path.display(), e)),
        }
    })?;

    parse(&content, DocumentFormat::from_path(path)).map_err(|e| {
        ApplicationError::other(format!("Cannot parse '{}': {}", path.display(), e))
    })
}
