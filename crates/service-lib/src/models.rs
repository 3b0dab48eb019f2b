//! Core data models for the prediction service

use serde::{Deserialize, Serialize};

/// Number of input features expected by the model
pub const NUM_FEATURES: usize = 7;

/// Field order of the model input vector.
///
/// The regressor was fitted on exactly this column order. Reordering it does
/// not fail anywhere, it silently produces different predictions.
pub const FEATURE_ORDER: [&str; NUM_FEATURES] =
    ["day", "month", "year", "tmin", "tmax", "prcp", "wspd"];

/// One weather observation submitted for prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub day: i64,
    pub month: i64,
    pub year: i64,
    /// Minimum temperature in °C
    pub tmin: f64,
    /// Maximum temperature in °C
    pub tmax: f64,
    /// Precipitation in mm
    pub prcp: f64,
    /// Wind speed in km/h
    pub wspd: f64,
}

impl WeatherObservation {
    /// Assemble the model input vector in `FEATURE_ORDER`
    pub fn to_features(&self) -> FeatureVector {
        FeatureVector([
            self.day as f64,
            self.month as f64,
            self.year as f64,
            self.tmin,
            self.tmax,
            self.prcp,
            self.wspd,
        ])
    }
}

/// Fixed-order model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Look up a feature by its schema name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_ORDER
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }
}

/// Successful predict response body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted average temperature in °C
    pub prediction: f64,
}
