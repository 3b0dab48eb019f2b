//! Regression backends behind a common trait

mod linear;
mod onnx;

pub use linear::{LinearModelArtifact, LinearRegressor, LINEAR_MODEL_TYPE};
pub use onnx::OnnxRegressor;

use crate::error::InferenceError;
use crate::models::FeatureVector;

/// A loaded model: fixed-order feature vector in, one scalar out.
///
/// Implementations are immutable after construction and shared across
/// request handlers without locking.
pub trait Regressor: Send + Sync {
    /// Predict the average temperature for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short backend name, e.g. "linear" or "onnx"
    fn kind(&self) -> &'static str;

    /// Version string reported by the artifact
    fn version(&self) -> &str;
}

/// Reject non-finite model output
pub(crate) fn ensure_finite(value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::NonFinite(value))
    }
}
