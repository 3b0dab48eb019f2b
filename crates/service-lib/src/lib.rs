//! Core library for the Dubai weather prediction service
//!
//! This crate provides:
//! - The weather observation schema and its fixed feature order
//! - Lax input coercion from JSON payloads
//! - Model artifact loading (linear JSON exports and ONNX graphs)
//! - The prediction service with its NOT_READY/READY lifecycle
//! - Health reporting and observability

pub mod artifact;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod service;
pub mod validation;

pub use artifact::{load, ArtifactFormat};
pub use error::{ArtifactLoadError, InferenceError, PredictionRequestError, ValidationError};
pub use health::{HealthReport, ReadinessResponse, ServiceStatus};
pub use models::{FeatureVector, Prediction, WeatherObservation, FEATURE_ORDER, NUM_FEATURES};
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{LinearRegressor, OnnxRegressor, Regressor};
pub use service::{PredictOptions, PredictionService};
