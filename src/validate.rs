//! Validation of examples against their schemas.
//!
//! Returns **all** errors, not just the first: a failing schema/example pair
//! never stops the remaining pairs. Validation does not modify the document.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::bundle::{ValidatorFactory, compile_validate, violations};
use crate::correlate::build_schema_example_map;
use crate::error::ApplicationError;
use crate::example::resolve_example;
use crate::parse::load_document;
use crate::path::{LocationPath, flatten, get, query_locations, query_values};
use crate::types::{ValidationOptions, ValidationResponse, ValidationStatistics};
use crate::version::determine_version;

/// Where an example came from; decides how its errors are annotated.
#[derive(Clone, Copy, Debug)]
pub enum ExampleOrigin<'a> {
    /// Embedded in the specification document at this location.
    Document(&'a LocationPath),
    /// Read from an external example file.
    File(&'a Path),
}

impl ExampleOrigin<'_> {
    fn describe(&self) -> String {
        match self {
            ExampleOrigin::Document(location) => location.to_pointer(),
            ExampleOrigin::File(path) => path.display().to_string(),
        }
    }

    fn annotate(&self, error: ApplicationError) -> ApplicationError {
        match self {
            ExampleOrigin::Document(location) => error.with_example_path(location.to_pointer()),
            ExampleOrigin::File(path) => error.with_example_file_path(path),
        }
    }
}

// ─── In-document examples ───────────────────────────────────────────────────

/// Validate every example embedded in `document` with default options.
pub fn validate(document: &Value) -> ValidationResponse {
    validate_with_options(document, &ValidationOptions::default())
}

/// Validate every example embedded in `document`.
///
/// Every schema location of the document is visited, in traversal order,
/// whether or not an example was declared for it. Schema locations derived
/// from examples that no schema sits at are visited afterwards.
pub fn validate_with_options(document: &Value, options: &ValidationOptions) -> ValidationResponse {
    let version = match determine_version(document) {
        Ok(v) => v,
        Err(e) => return ValidationResponse::from_error(e),
    };
    let schema_locations = match query_locations(document, version.schemas_locator()) {
        Ok(l) => l,
        Err(e) => return ValidationResponse::from_error(e),
    };
    let example_locations = match query_locations(document, version.examples_locator()) {
        Ok(l) => l,
        Err(e) => return ValidationResponse::from_error(e),
    };
    debug!(
        ?version,
        schemas = schema_locations.len(),
        examples = example_locations.len(),
        "validating embedded examples"
    );

    let example_map = build_schema_example_map(&example_locations);
    let factory = ValidatorFactory::new(document, options);
    let mut statistics = ValidationStatistics::with_schemas(schema_locations.len());
    let mut errors = Vec::new();

    let derived_only: Vec<&LocationPath> = example_map
        .keys()
        .filter(|l| !schema_locations.contains(*l))
        .collect();

    for (schema_location, discovered) in schema_locations
        .iter()
        .map(|l| (l, true))
        .chain(derived_only.into_iter().map(|l| (l, false)))
    {
        let schema = get(document, schema_location);
        if !discovered && schema.is_some() {
            statistics.schemas_with_examples += 1;
        }
        let example_location = example_map.get(schema_location);
        let example = resolve_example(example_location, document);

        errors.extend(validate_example_value(
            &factory,
            &schema_location.to_pointer(),
            schema,
            example.as_ref(),
            example_location.map(ExampleOrigin::Document),
            &mut statistics,
        ));
    }

    ValidationResponse::new(statistics, errors)
}

/// Read the specification at `path` and validate its embedded examples.
/// Read or parse failures are reported inside the response.
pub fn validate_file(path: impl AsRef<Path>) -> ValidationResponse {
    validate_file_with_options(path, &ValidationOptions::default())
}

pub fn validate_file_with_options(
    path: impl AsRef<Path>,
    options: &ValidationOptions,
) -> ValidationResponse {
    match load_document(path.as_ref()) {
        Ok(document) => validate_with_options(&document, options),
        Err(e) => ValidationResponse::from_error(e),
    }
}

// ─── One schema/example pair ────────────────────────────────────────────────

/// Classify one schema/example pair, update `statistics` and return its
/// errors.
///
/// - no schema, no example: nothing happens
/// - schema without example: `schemas_with_examples` is decremented
/// - example without schema: `examples_total` and `examples_without_schema`
///   are incremented
/// - both: `examples_total` is incremented and the example is validated
pub fn validate_example_value(
    factory: &ValidatorFactory,
    schema_location: &str,
    schema: Option<&Value>,
    example: Option<&Value>,
    origin: Option<ExampleOrigin<'_>>,
    statistics: &mut ValidationStatistics,
) -> Vec<ApplicationError> {
    let annotate = |e: ApplicationError| match origin {
        Some(o) => o.annotate(e),
        None => e,
    };

    match (schema, example) {
        (None, None) => Vec::new(),
        (Some(_), None) => {
            statistics.schema_without_example();
            vec![ApplicationError::incomplete_pair(format!(
                "Schema '{schema_location}' is missing examples."
            ))]
        }
        (None, Some(_)) => {
            statistics.example_without_schema();
            let example_name = origin
                .map(|o| o.describe())
                .unwrap_or_else(|| schema_location.to_string());
            vec![annotate(ApplicationError::incomplete_pair(format!(
                "Example '{example_name}' is missing a schema."
            )))]
        }
        (Some(schema), Some(example)) => {
            statistics.example_checked();
            let errors = match compile_validate(factory, schema) {
                Ok((validator, prepared)) => {
                    violations(&validator, &prepared, factory.bundle(), example)
                }
                Err(e) => vec![e],
            };
            debug!(schema = schema_location, errors = errors.len(), "validated example");
            errors.into_iter().map(annotate).collect()
        }
    }
}

// ─── External examples ──────────────────────────────────────────────────────

/// Validate one external example file against the schema at
/// `schema_location` of the specification at `spec_path`.
pub fn validate_example(
    spec_path: impl AsRef<Path>,
    schema_location: &str,
    example_path: impl AsRef<Path>,
) -> ValidationResponse {
    validate_example_with_options(
        spec_path,
        schema_location,
        example_path,
        &ValidationOptions::default(),
    )
}

pub fn validate_example_with_options(
    spec_path: impl AsRef<Path>,
    schema_location: &str,
    example_path: impl AsRef<Path>,
    options: &ValidationOptions,
) -> ValidationResponse {
    let document = match load_document(spec_path.as_ref()) {
        Ok(d) => d,
        Err(e) => return ValidationResponse::from_error(e),
    };
    let factory = ValidatorFactory::new(&document, options);
    let mut statistics = ValidationStatistics::default();
    let errors = validate_external_examples(
        &factory,
        &document,
        schema_location,
        &[example_path.as_ref().to_path_buf()],
        &mut statistics,
    );
    ValidationResponse::new(statistics, errors)
}

/// Validate example files against the schema at `schema_location`.
///
/// Unlike the in-document pass, a schema location that resolves to nothing
/// is an error, and none of the example files are read.
pub(crate) fn validate_external_examples(
    factory: &ValidatorFactory,
    document: &Value,
    schema_location: &str,
    example_paths: &[PathBuf],
    statistics: &mut ValidationStatistics,
) -> Vec<ApplicationError> {
    let schema = match query_values(document, schema_location) {
        Ok(values) => flatten(values.into_iter().cloned().collect()),
        Err(e) => return vec![e],
    };
    let Some(schema) = schema else {
        return vec![ApplicationError::path_not_found(schema_location)];
    };
    statistics.schemas_with_examples += 1;

    let mut errors = Vec::new();
    for path in example_paths {
        match load_document(path) {
            Ok(example) => errors.extend(validate_example_value(
                factory,
                schema_location,
                Some(&schema),
                Some(&example),
                Some(ExampleOrigin::File(path)),
                statistics,
            )),
            Err(e) => errors.push(e.with_example_file_path(path)),
        }
    }
    errors
}
