//! Linear regression exported as JSON coefficients

use super::{ensure_finite, Regressor};
use crate::error::InferenceError;
use crate::models::{FeatureVector, FEATURE_ORDER, NUM_FEATURES};
use serde::{Deserialize, Serialize};

/// `model_type` tag carried by linear artifacts
pub const LINEAR_MODEL_TYPE: &str = "linear_regression";

fn default_model_type() -> String {
    LINEAR_MODEL_TYPE.to_string()
}

fn default_version() -> String {
    "unversioned".to_string()
}

/// On-disk layout of a linear model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Column names the model was fitted on; checked against `FEATURE_ORDER`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Ordinary least squares model: `intercept + Σ coefficient_i * feature_i`
#[derive(Debug, Clone)]
pub struct LinearRegressor {
    coefficients: [f64; NUM_FEATURES],
    intercept: f64,
    version: String,
}

impl LinearRegressor {
    pub fn new(coefficients: [f64; NUM_FEATURES], intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            version: default_version(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Build a regressor from a decoded artifact, checking its shape
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self, String> {
        if artifact.model_type != LINEAR_MODEL_TYPE {
            return Err(format!(
                "expected model_type '{}', found '{}'",
                LINEAR_MODEL_TYPE, artifact.model_type
            ));
        }

        if let Some(names) = &artifact.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_ORDER.iter().copied()) {
                return Err(format!(
                    "feature_names {:?} do not match expected order {:?}",
                    names, FEATURE_ORDER
                ));
            }
        }

        let coefficients: [f64; NUM_FEATURES] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                format!(
                    "expected {} coefficients, found {}",
                    NUM_FEATURES,
                    artifact.coefficients.len()
                )
            })?;

        if !artifact.intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("coefficients and intercept must be finite".to_string());
        }

        Ok(Self::new(coefficients, artifact.intercept).with_version(artifact.version))
    }

    pub fn coefficients(&self) -> &[f64; NUM_FEATURES] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        ensure_finite(self.intercept + dot)
    }

    fn kind(&self) -> &'static str {
        "linear"
    }

    fn version(&self) -> &str {
        &self.version
    }
}
