//! External examples associated with schemas through mapping files.
//!
//! A mapping file is a JSON (or YAML) object whose keys are schema locations
//! in the specification and whose values are one example file path or a list
//! of them:
//!
//! ```json
//! {
//!   "/paths/~1pets/get/responses/200/schema": ["pets.json", "empty.json"],
//!   "$.definitions.Pet": "pet.json"
//! }
//! ```

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::bundle::ValidatorFactory;
use crate::error::ApplicationError;
use crate::glob;
use crate::parse::load_document;
use crate::types::{ValidationOptions, ValidationResponse, ValidationStatistics};
use crate::validate::validate_external_examples;

/// Validate the examples named by every mapping file matching
/// `mapping_pattern` against the specification at `spec_path`.
///
/// Mapping files are processed in sorted order and their responses merged:
/// errors are concatenated, each tagged with its mapping file, and statistics
/// summed. A pattern matching nothing is reported as a missing file.
pub fn validate_examples_by_map(
    spec_path: impl AsRef<Path>,
    mapping_pattern: &str,
    options: &ValidationOptions,
) -> ValidationResponse {
    let mapping_files = match glob::expand(mapping_pattern, true) {
        Ok(files) => files,
        Err(e) => return ValidationResponse::from_error(e),
    };
    debug!(pattern = mapping_pattern, files = mapping_files.len(), "expanded mapping files");

    let initial = ValidationResponse::new(mapping_statistics(0), Vec::new());
    mapping_files.iter().fold(initial, |response, mapping_file| {
        response.merge(validate_mapping_file(spec_path.as_ref(), mapping_file, options))
    })
}

fn mapping_statistics(matched: usize) -> ValidationStatistics {
    ValidationStatistics {
        matching_file_paths_mapping: Some(matched),
        ..Default::default()
    }
}

fn validate_mapping_file(
    spec_path: &Path,
    mapping_file: &Path,
    options: &ValidationOptions,
) -> ValidationResponse {
    let tagged = |errors: Vec<ApplicationError>| -> Vec<ApplicationError> {
        errors
            .into_iter()
            .map(|e| e.with_map_file_path(mapping_file))
            .collect()
    };

    let mapping = match load_document(mapping_file) {
        Ok(m) => m,
        Err(e) => return ValidationResponse::new(mapping_statistics(0), tagged(vec![e])),
    };
    let mut statistics = mapping_statistics(1);

    let document = match load_document(spec_path) {
        Ok(d) => d,
        Err(e) => return ValidationResponse::new(statistics, tagged(vec![e])),
    };
    let Value::Object(entries) = &mapping else {
        let e = ApplicationError::other(
            "Mapping file must map schema locations to example file paths",
        );
        return ValidationResponse::new(statistics, tagged(vec![e]));
    };

    debug!(mapping = %mapping_file.display(), entries = entries.len(), "validating mapping file");
    let factory = ValidatorFactory::new(&document, options);
    let base_dir = if options.cwd_to_mapping_file {
        mapping_file.parent()
    } else {
        None
    };

    let mut errors = Vec::new();
    for (schema_location, files) in entries {
        let Some(files) = example_file_paths(files) else {
            errors.push(ApplicationError::incomplete_pair(format!(
                "Examples of '{schema_location}' must be a file path or a list of file paths"
            )));
            continue;
        };
        let example_paths: Vec<PathBuf> = files
            .into_iter()
            .map(|f| match base_dir {
                Some(dir) => dir.join(f),
                None => PathBuf::from(f),
            })
            .collect();
        errors.extend(validate_external_examples(
            &factory,
            &document,
            schema_location,
            &example_paths,
            &mut statistics,
        ));
    }

    ValidationResponse::new(statistics, tagged(errors))
}

fn example_file_paths(value: &Value) -> Option<Vec<&str>> {
    match value {
        Value::String(s) => Some(vec![s.as_str()]),
        Value::Array(items) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}
