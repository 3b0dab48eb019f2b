//! Error taxonomy for artifact loading and the predict path

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring a model artifact into memory. Fatal at startup.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("model artifact not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported model artifact format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to deserialize model artifact {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Client-caused problem with a predict request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("field '{field}' is required")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{field}' is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

impl ValidationError {
    /// Name of the offending field, if the error concerns one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::InvalidType { field, .. }
            | ValidationError::OutOfRange { field, .. } => Some(field),
            ValidationError::MalformedBody(_) | ValidationError::NotAnObject => None,
        }
    }
}

/// Server-side failure while running the model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model backend failed: {0}")]
    Backend(String),

    #[error("model produced no output")]
    EmptyOutput,

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}

/// Error returned by the predict operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionRequestError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Error in prediction: {0}")]
    Inference(#[from] InferenceError),

    #[error("Model is not loaded")]
    NotReady,
}

impl PredictionRequestError {
    /// True when the caller, not the service, caused the failure
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictionRequestError::Validation(_))
    }
}
