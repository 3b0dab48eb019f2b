//! Service configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use service_lib::PredictOptions;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Address to bind the HTTP listener to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the serialized model artifact (.json or .onnx)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Expected SHA256 of the artifact, hex encoded
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Enable semantic range checks on predict inputs
    #[serde(default)]
    pub validate_ranges: bool,

    /// Report model invocation failures as 400 instead of 500
    #[serde(default)]
    pub legacy_error_status: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model_path() -> String {
    "model/dubai_weather_lr.json".to_string()
}

impl ServiceConfig {
    /// Load configuration from `WEATHER_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("WEATHER").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid service configuration")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn predict_options(&self) -> PredictOptions {
        PredictOptions {
            validate_ranges: self.validate_ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("WEATHER")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_source(env(&[])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, "model/dubai_weather_lr.json");
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert!(config.model_sha256.is_none());
        assert!(!config.validate_ranges);
        assert!(!config.legacy_error_status);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ServiceConfig::from_source(env(&[
            ("WEATHER_PORT", "9100"),
            ("WEATHER_MODEL_PATH", "/srv/models/lr.onnx"),
            ("WEATHER_VALIDATE_RANGES", "true"),
            ("WEATHER_LEGACY_ERROR_STATUS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.model_path, "/srv/models/lr.onnx");
        assert!(config.predict_options().validate_ranges);
        assert!(config.legacy_error_status);
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        assert!(ServiceConfig::from_source(env(&[("WEATHER_PORT", "not-a-port")])).is_err());
    }
}
