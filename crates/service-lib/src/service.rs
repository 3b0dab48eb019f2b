//! Prediction service
//!
//! Owns the injected model and turns observations into predictions. The
//! model is set at most once; afterwards it is shared read-only.

use crate::error::{PredictionRequestError, ValidationError};
use crate::health::{HealthReport, ServiceStatus};
use crate::models::{Prediction, WeatherObservation};
use crate::observability::{ServiceMetrics, StructuredLogger};
use crate::predictor::Regressor;
use crate::validation;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Knobs for the predict path
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictOptions {
    /// Reject semantically implausible inputs (day 32, negative rainfall, ...)
    pub validate_ranges: bool,
}

pub struct PredictionService {
    model: OnceLock<Arc<dyn Regressor>>,
    options: PredictOptions,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    /// Create a service with no model; it reports NOT_READY until one is installed
    pub fn new(options: PredictOptions) -> Self {
        Self::from_parts(OnceLock::new(), options)
    }

    /// Create a READY service around an already loaded model
    pub fn with_model(model: Arc<dyn Regressor>, options: PredictOptions) -> Self {
        let kind = model.kind();
        let version = model.version().to_string();
        let service = Self::from_parts(OnceLock::from(model), options);
        service.announce_model(kind, &version);
        service
    }

    fn from_parts(model: OnceLock<Arc<dyn Regressor>>, options: PredictOptions) -> Self {
        Self {
            model,
            options,
            metrics: ServiceMetrics::new(),
            logger: StructuredLogger::new("weather-service"),
        }
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Move from NOT_READY to READY. Fails, returning the model, if one is
    /// already installed.
    pub fn install_model(&self, model: Arc<dyn Regressor>) -> Result<(), Arc<dyn Regressor>> {
        let kind = model.kind();
        let version = model.version().to_string();
        self.model.set(model)?;
        self.announce_model(kind, &version);
        Ok(())
    }

    fn announce_model(&self, kind: &str, version: &str) {
        self.metrics.set_model_info(kind, version);
        self.logger.log_model_installed(kind, version);
    }

    pub fn status(&self) -> ServiceStatus {
        if self.model.get().is_some() {
            ServiceStatus::Ready
        } else {
            ServiceStatus::NotReady
        }
    }

    pub fn health_check(&self) -> HealthReport {
        HealthReport::for_status(self.status())
    }

    /// Predict from a raw JSON request body
    pub fn predict_body(&self, body: &[u8]) -> Result<Prediction, PredictionRequestError> {
        let observation = validation::parse_observation(body).map_err(|e| self.rejected(e))?;
        self.predict(&observation)
    }

    /// Predict the average temperature for one observation
    pub fn predict(
        &self,
        observation: &WeatherObservation,
    ) -> Result<Prediction, PredictionRequestError> {
        let model = self.model.get().ok_or(PredictionRequestError::NotReady)?;

        if self.options.validate_ranges {
            validation::check_ranges(observation).map_err(|e| self.rejected(e))?;
        }

        let features = observation.to_features();
        let start = Instant::now();
        let result = model.predict(&features);
        let elapsed = start.elapsed();
        self.metrics.observe_prediction_latency(elapsed.as_secs_f64());

        match result {
            Ok(prediction) => {
                self.metrics.inc_predictions();
                self.logger.log_prediction(prediction, elapsed.as_micros());
                Ok(Prediction { prediction })
            }
            Err(e) => {
                self.metrics.inc_inference_errors();
                self.logger.log_inference_failure(&e.to_string());
                Err(e.into())
            }
        }
    }

    fn rejected(&self, err: ValidationError) -> PredictionRequestError {
        self.metrics.inc_validation_errors();
        self.logger.log_rejected(err.field(), &err.to_string());
        err.into()
    }
}
