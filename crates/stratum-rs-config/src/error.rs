//! Error types for source resolution and validation.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while resolving sources or validating a config model.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file bytes are not valid for the configured encoding.
    #[error("config file {} is not valid {encoding}", .path.display())]
    Decode { path: PathBuf, encoding: String },
    /// The configured encoding label is not supported.
    #[error("unsupported config file encoding: {0}")]
    UnsupportedEncoding(String),
    /// Parsing a config file failed.
    #[error("failed to parse config file {}: {source}", .path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// The parsed file root is not a mapping.
    #[error("config file {} must be a mapping and not a '{found}'", .path.display())]
    FileFormat { path: PathBuf, found: &'static str },
    /// An explicitly supplied value could not be converted to YAML.
    #[error("invalid value for {key}: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },
    /// The merged values failed schema validation.
    #[error("invalid config: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}

/// A single offending field reported by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the field, empty when the failure is not tied to one.
    pub path: String,
    /// Reason the field was rejected.
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Structured validation failure, one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for the field at `path`.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any recorded failure points at `path`.
    pub fn contains_field(&self, path: &str) -> bool {
        self.errors.iter().any(|error| error.path == path)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Convert a deserialization failure into a field-level error.
    ///
    /// The tracked path locates the value that failed. serde reports missing
    /// and unknown fields on the enclosing mapping as ``missing field `name` ``
    /// and ``unknown field `name`, expected ...``, so the quoted name is
    /// appended to that location.
    pub(crate) fn from_decode(error: &serde_path_to_error::Error<serde_yaml::Error>) -> Self {
        let location = match error.path().to_string() {
            path if path == "." => String::new(),
            path => path,
        };
        let message = error.inner().to_string();
        let (path, reason) = if let Some(field) = quoted_field(&message, "missing field `") {
            (join_field(location, &field), "missing required field".to_string())
        } else if let Some(field) = quoted_field(&message, "unknown field `") {
            (join_field(location, &field), message)
        } else {
            (location, message)
        };
        let mut errors = Self::new();
        errors.add(path, reason);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.errors.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn join_field(location: String, field: &str) -> String {
    if location.is_empty() {
        field.to_string()
    } else if location == field || location.ends_with(&format!(".{field}")) {
        location
    } else {
        format!("{location}.{field}")
    }
}

fn quoted_field(message: &str, marker: &str) -> Option<String> {
    let start = message.find(marker)? + marker.len();
    let rest = &message[start..];
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
