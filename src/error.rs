use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::path::Path;

/// Discriminant of an [`ApplicationError`], as it appears in the `type` field
/// of the serialized error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Validation,
    FileNotFound,
    PathNotFound,
    UnsupportedVersion,
    Error,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Validation => "Validation",
            ErrorType::FileNotFound => "ENOENT",
            ErrorType::PathNotFound => "JsonPathNotFound",
            ErrorType::UnsupportedVersion => "UnsupportedVersion",
            ErrorType::Error => "Error",
        }
    }
}

/// What went wrong, with the data specific to each kind of failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// An example does not satisfy its schema, or a schema/example pair is
    /// incomplete.
    #[error("{message}")]
    Validation {
        message: String,
        /// Dotted/indexed path into the example, e.g. `.versions[0].id`.
        data_path: String,
        /// Pointer into the schema at the failing keyword.
        schema_path: String,
        keyword: String,
        params: Value,
    },

    #[error("No such file or directory: '{path}'")]
    FileNotFound { path: String },

    #[error("Path to schema can't be found: '{path}'")]
    PathNotFound { path: String },

    #[error("Unsupported OpenAPI version: {found}")]
    UnsupportedVersion { found: String },

    #[error("{message}")]
    Error { message: String },
}

/// A single failure reported inside a [`crate::ValidationResponse`].
///
/// The file-path annotations are attached by the layer that knows them: the
/// example file path where the example is read, the mapping file path where
/// mapping files are aggregated. Each annotation returns a new value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ApplicationError {
    pub kind: ErrorKind,
    /// Pointer to the example inside the specification document.
    pub example_path: Option<String>,
    pub example_file_path: Option<String>,
    pub map_file_path: Option<String>,
}

impl ApplicationError {
    fn new(kind: ErrorKind) -> Self {
        ApplicationError {
            kind,
            example_path: None,
            example_file_path: None,
            map_file_path: None,
        }
    }

    pub fn validation(
        message: impl Into<String>,
        data_path: impl Into<String>,
        schema_path: impl Into<String>,
        keyword: impl Into<String>,
        params: Value,
    ) -> Self {
        Self::new(ErrorKind::Validation {
            message: message.into(),
            data_path: data_path.into(),
            schema_path: schema_path.into(),
            keyword: keyword.into(),
            params,
        })
    }

    /// A pair-level failure that has no keyword or data path of its own,
    /// such as a schema without examples.
    pub fn incomplete_pair(message: impl Into<String>) -> Self {
        Self::validation(message, "", "", "", Value::Object(Default::default()))
    }

    pub fn file_not_found(path: &Path) -> Self {
        Self::new(ErrorKind::FileNotFound {
            path: path.display().to_string(),
        })
    }

    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::PathNotFound { path: path.into() })
    }

    pub fn unsupported_version(found: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedVersion {
            found: found.into(),
        })
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Error {
            message: message.into(),
        })
    }

    pub fn error_type(&self) -> ErrorType {
        match self.kind {
            ErrorKind::Validation { .. } => ErrorType::Validation,
            ErrorKind::FileNotFound { .. } => ErrorType::FileNotFound,
            ErrorKind::PathNotFound { .. } => ErrorType::PathNotFound,
            ErrorKind::UnsupportedVersion { .. } => ErrorType::UnsupportedVersion,
            ErrorKind::Error { .. } => ErrorType::Error,
        }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// The failing keyword, for validation errors.
    pub fn keyword(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Validation { keyword, .. } => Some(keyword),
            _ => None,
        }
    }

    /// The path into the example, for validation errors.
    pub fn data_path(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Validation { data_path, .. } => Some(data_path),
            _ => None,
        }
    }

    pub fn with_example_path(self, example_path: impl Into<String>) -> Self {
        ApplicationError {
            example_path: Some(example_path.into()),
            ..self
        }
    }

    pub fn with_example_file_path(self, path: &Path) -> Self {
        ApplicationError {
            example_file_path: Some(path.display().to_string()),
            ..self
        }
    }

    pub fn with_map_file_path(self, path: &Path) -> Self {
        ApplicationError {
            map_file_path: Some(path.display().to_string()),
            ..self
        }
    }
}

impl Serialize for ApplicationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.error_type().as_str())?;
        map.serialize_entry("message", &self.message())?;
        match &self.kind {
            ErrorKind::Validation {
                data_path,
                schema_path,
                keyword,
                params,
                ..
            } => {
                map.serialize_entry("dataPath", data_path)?;
                map.serialize_entry("schemaPath", schema_path)?;
                map.serialize_entry("keyword", keyword)?;
                map.serialize_entry("params", params)?;
            }
            ErrorKind::FileNotFound { path } | ErrorKind::PathNotFound { path } => {
                map.serialize_entry("path", path)?;
            }
            ErrorKind::UnsupportedVersion { .. } | ErrorKind::Error { .. } => {}
        }
        if let Some(p) = &self.example_path {
            map.serialize_entry("examplePath", p)?;
        }
        if let Some(p) = &self.example_file_path {
            map.serialize_entry("exampleFilePath", p)?;
        }
        if let Some(p) = &self.map_file_path {
            map.serialize_entry("mapFilePath", p)?;
        }
        map.end()
    }
}
