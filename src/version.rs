//! OpenAPI major version detection and the path grammar of each version.

use serde_json::Value;

use crate::error::ApplicationError;

/// The two OpenAPI document shapes whose examples can be located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenApiVersion {
    /// Swagger 2.0: `responses.<code>.examples.application/json` next to
    /// `responses.<code>.schema`.
    V2,
    /// OpenAPI 3.x: named examples under `content.application/json.examples`
    /// next to `content.application/json.schema`.
    V3,
}

impl OpenApiVersion {
    /// JSONPath matching every example of the document.
    pub fn examples_locator(&self) -> &'static str {
        match self {
            OpenApiVersion::V2 => "$..examples['application/json']",
            OpenApiVersion::V3 => {
                "$..['responses','requestBody']..content['application/json'].examples.*['value','$ref']"
            }
        }
    }

    /// JSONPath matching every schema that may govern an example.
    pub fn schemas_locator(&self) -> &'static str {
        match self {
            OpenApiVersion::V2 => "$..schema",
            OpenApiVersion::V3 => {
                "$..['responses','requestBody']..content['application/json'].schema"
            }
        }
    }
}

/// Picks the grammar from the `openapi` / `swagger` marker field.
pub fn determine_version(document: &Value) -> Result<OpenApiVersion, ApplicationError> {
    if let Some(marker) = document.get("openapi") {
        return match marker.as_str() {
            Some(v) if is_major(v, "3") => Ok(OpenApiVersion::V3),
            _ => Err(ApplicationError::unsupported_version(format!(
                "openapi: {}",
                marker
            ))),
        };
    }
    if let Some(marker) = document.get("swagger") {
        return match marker.as_str() {
            Some(v) if is_major(v, "2") => Ok(OpenApiVersion::V2),
            _ => Err(ApplicationError::unsupported_version(format!(
                "swagger: {}",
                marker
            ))),
        };
    }
    Err(ApplicationError::unsupported_version(
        "no 'openapi' or 'swagger' field",
    ))
}

fn is_major(version: &str, major: &str) -> bool {
    version == major
        || version
            .strip_prefix(major)
            .is_some_and(|rest| rest.starts_with('.'))
}
