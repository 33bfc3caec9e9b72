//! Validation of the examples embedded in Swagger 2.0 and OpenAPI 3.x
//! documents against the JSON schemas that accompany them.
//!
//! ```text
//! document → determine_version → locate schemas + examples → correlate
//!          → bundle $refs → compile schema → validate example → ValidationResponse
//! ```
//!
//! Examples can also live in separate files, tied to schema locations by
//! mapping files (see [`validate_examples_by_map`]).
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let spec = json!({
//!     "swagger": "2.0",
//!     "paths": {
//!         "/pets": {
//!             "get": {
//!                 "responses": {
//!                     "200": {
//!                         "schema": {"type": "array", "items": {"type": "string"}},
//!                         "examples": {"application/json": ["Rex", 7]}
//!                     }
//!                 }
//!             }
//!         }
//!     }
//! });
//!
//! let response = openapi_examples::validate(&spec);
//! assert!(!response.valid);
//! assert_eq!(response.statistics.examples_total, 1);
//! assert_eq!(response.errors[0].data_path(), Some("[1]"));
//! ```
//!
//! Every entry point returns a [`ValidationResponse`]; failures to read or
//! parse files are reported in its error list rather than returned as `Err`.

pub mod bundle;
pub mod correlate;
pub mod error;
pub mod example;
pub mod glob;
pub mod mapping;
pub mod parse;
pub mod path;
pub mod types;
pub mod validate;
pub mod version;

pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use mapping::validate_examples_by_map;
pub use validate::{
    validate, validate_example, validate_example_with_options, validate_file,
    validate_file_with_options, validate_with_options,
};
pub use version::{OpenApiVersion, determine_version};
