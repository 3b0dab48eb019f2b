//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, outcome counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    validation_errors_total: IntCounter,
    inference_errors_total: IntCounter,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "weather_service_prediction_latency_seconds",
                "Time spent running model inference",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "weather_service_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            validation_errors_total: register_int_counter!(
                "weather_service_validation_errors_total",
                "Total number of predict requests rejected as invalid"
            )
            .expect("Failed to register validation_errors_total"),

            inference_errors_total: register_int_counter!(
                "weather_service_inference_errors_total",
                "Total number of model invocation failures"
            )
            .expect("Failed to register inference_errors_total"),

            model_info: register_gauge_vec!(
                "weather_service_model_info",
                "Information about the loaded model artifact",
                &["kind", "version"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Handle to the process-wide Prometheus metrics.
///
/// Clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_validation_errors(&self) {
        self.inner().validation_errors_total.inc();
    }

    pub fn inc_inference_errors(&self) {
        self.inner().inference_errors_total.inc();
    }

    /// Record which model is serving
    pub fn set_model_info(&self, kind: &str, version: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[kind, version])
            .set(1.0);
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model_path: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            service_version = %version,
            model_path = %model_path,
            "Prediction service starting"
        );
    }

    pub fn log_model_installed(&self, kind: &str, version: &str) {
        info!(
            event = "model_installed",
            service = %self.service_name,
            kind = %kind,
            model_version = %version,
            "Model installed, service ready"
        );
    }

    pub fn log_prediction(&self, prediction: f64, elapsed_us: u128) {
        debug!(
            event = "prediction_generated",
            service = %self.service_name,
            prediction = prediction,
            elapsed_us = elapsed_us,
            "Generated temperature prediction"
        );
    }

    pub fn log_rejected(&self, field: Option<&str>, detail: &str) {
        info!(
            event = "request_rejected",
            service = %self.service_name,
            field = ?field,
            detail = %detail,
            "Rejected invalid predict request"
        );
    }

    pub fn log_inference_failure(&self, detail: &str) {
        warn!(
            event = "inference_failed",
            service = %self.service_name,
            detail = %detail,
            "Model invocation failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}
