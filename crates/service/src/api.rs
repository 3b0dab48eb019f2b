//! HTTP API: health, readiness, prediction and Prometheus metrics

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use service_lib::{PredictionRequestError, PredictionService, ReadinessResponse};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    /// Report inference failures as 400, as the legacy endpoint did
    pub legacy_error_status: bool,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>) -> Self {
        Self {
            service,
            legacy_error_status: false,
        }
    }

    pub fn with_legacy_error_status(mut self, enabled: bool) -> Self {
        self.legacy_error_status = enabled;
        self
    }
}

/// Error body for non-2xx predict responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Predict-path error paired with the compatibility mode in effect
pub struct ApiError {
    error: PredictionRequestError,
    legacy_error_status: bool,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.error {
            PredictionRequestError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictionRequestError::Inference(_) if self.legacy_error_status => {
                StatusCode::BAD_REQUEST
            }
            PredictionRequestError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PredictionRequestError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.error.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check - always 200, status field carries OK/NOT_READY
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.service.health_check()))
}

/// Readiness check - returns 200 if a model is loaded, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = ReadinessResponse::from(state.service.status());

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Predict the average temperature for one observation.
///
/// The body is taken raw so that every malformed request, including
/// invalid JSON, gets the same `{"detail": ...}` 400 response.
async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match state.service.predict_body(&body) {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(error) => ApiError {
            error,
            legacy_error_status: state.legacy_error_status,
        }
        .into_response(),
    }
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            Vec::new(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
