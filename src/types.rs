use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

// ─── Statistics ─────────────────────────────────────────────────────────────

/// Running counters of a validation pass.
///
/// `matching_file_paths_mapping` is only present for the mapping-file
/// workflow, where it counts the mapping files that could be opened.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatistics {
    pub schemas_with_examples: usize,
    pub examples_total: usize,
    pub examples_without_schema: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_file_paths_mapping: Option<usize>,
}

impl ValidationStatistics {
    /// Counters for a pass that discovered `schemas` schema locations.
    pub fn with_schemas(schemas: usize) -> Self {
        ValidationStatistics {
            schemas_with_examples: schemas,
            ..Default::default()
        }
    }

    /// Field-wise sum. The mapping counter is kept when either side has one.
    pub fn merge(self, other: ValidationStatistics) -> Self {
        let matching = match (
            self.matching_file_paths_mapping,
            other.matching_file_paths_mapping,
        ) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
        };
        ValidationStatistics {
            schemas_with_examples: self.schemas_with_examples + other.schemas_with_examples,
            examples_total: self.examples_total + other.examples_total,
            examples_without_schema: self.examples_without_schema
                + other.examples_without_schema,
            matching_file_paths_mapping: matching,
        }
    }

    pub(crate) fn schema_without_example(&mut self) {
        self.schemas_with_examples = self.schemas_with_examples.saturating_sub(1);
    }

    pub(crate) fn example_without_schema(&mut self) {
        self.examples_total += 1;
        self.examples_without_schema += 1;
    }

    pub(crate) fn example_checked(&mut self) {
        self.examples_total += 1;
    }
}

// ─── Response ───────────────────────────────────────────────────────────────

/// Result of every public entry point. `valid` is true iff `errors` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub statistics: ValidationStatistics,
    pub errors: Vec<ApplicationError>,
}

impl ValidationResponse {
    pub fn new(statistics: ValidationStatistics, errors: Vec<ApplicationError>) -> Self {
        ValidationResponse {
            valid: errors.is_empty(),
            statistics,
            errors,
        }
    }

    /// A response carrying a single failure and zeroed counters.
    pub fn from_error(error: ApplicationError) -> Self {
        Self::new(ValidationStatistics::default(), vec![error])
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Concatenates the error lists (`self` first) and sums the statistics.
    pub fn merge(self, other: ValidationResponse) -> Self {
        let mut errors = self.errors;
        errors.extend(other.errors);
        Self::new(self.statistics.merge(other.statistics), errors)
    }
}

// ─── Options ────────────────────────────────────────────────────────────────

/// Knobs shared by all entry points.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Resolve example file paths of a mapping file relative to the mapping
    /// file's directory instead of the working directory.
    pub cwd_to_mapping_file: bool,
    /// Forbid properties an object schema does not declare, unless the schema
    /// sets `additionalProperties` itself.
    pub no_additional_properties: bool,
    /// Treat every declared property of an object schema as required.
    pub all_properties_required: bool,
    /// Formats accepted without checking the value.
    pub ignore_formats: Vec<String>,
}
