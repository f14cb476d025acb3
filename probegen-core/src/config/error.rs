//! Errors raised while loading, checking, or resolving generator settings

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read generator config '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse generator config '{path}' ({}): {message}", location(.line, .column))]
    ParseError {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("Invalid generator config: {0}")]
    ValidationError(#[from] ValidationError),

    /// Also raised for a variable that is set but blank
    #[error("Environment variable '{var}' is not set")]
    EnvVarNotFound { var: String },

    /// No model name was given; the provider was asked which ones it serves.
    #[error(
        "Model name is required for {family}. The API returns the following available models: {}. Not all of these are text generation models",
        .available_models.join("  ")
    )]
    ModelRequired {
        family: String,
        available_models: Vec<String>,
    },
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!("line {line}, column {column}"),
        (Some(line), None) => format!("line {line}"),
        _ => "unknown location".to_string(),
    }
}

/// A single rejected setting
#[derive(Debug, Error)]
#[error("'{field_path}' {kind}{}", .context.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct ValidationError {
    /// Dotted path of the setting, e.g. `retry.max_wait_ms`
    pub field_path: String,
    pub kind: ValidationErrorKind,
    pub context: Option<String>,
}

#[derive(Debug, Error)]
pub enum ValidationErrorKind {
    #[error("is required")]
    RequiredFieldMissing,

    #[error("expected {expected}, got {actual}")]
    InvalidValue { expected: String, actual: String },

    #[error("is out of range: {message}")]
    OutOfRange { message: String },

    #[error("is not a usable URL: {message}")]
    InvalidUrl { message: String },
}

impl ValidationError {
    pub fn new(field_path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            field_path: field_path.into(),
            kind,
            context: None,
        }
    }

    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    pub fn required(field_path: impl Into<String>) -> Self {
        Self::new(field_path, ValidationErrorKind::RequiredFieldMissing)
    }

    pub fn invalid_value(
        field_path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let kind = ValidationErrorKind::InvalidValue {
            expected: expected.into(),
            actual: actual.into(),
        };
        Self::new(field_path, kind)
    }

    pub fn out_of_range(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        let kind = ValidationErrorKind::OutOfRange {
            message: message.into(),
        };
        Self::new(field_path, kind)
    }
}
