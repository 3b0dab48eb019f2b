//! Integration tests for the HTTP API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use service_lib::{
    artifact, FeatureVector, InferenceError, PredictOptions, PredictionService, Regressor,
};
use std::sync::Arc;
use tower::ServiceExt;
use weather_service::api::{create_router, AppState};

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/dubai_weather_lr.json"
);

/// Prediction of the fixture artifact for `reference_payload()`
const REFERENCE_PREDICTION: f64 = 33.808;

fn reference_payload() -> Value {
    json!({
        "day": 15,
        "month": 7,
        "year": 2024,
        "tmin": 28.0,
        "tmax": 41.0,
        "prcp": 0.0,
        "wspd": 12.5
    })
}

fn ready_app() -> Router {
    let model = artifact::load(FIXTURE).expect("fixture artifact loads");
    let service = PredictionService::with_model(model, PredictOptions::default());
    create_router(Arc::new(AppState::new(Arc::new(service))))
}

fn not_ready_app() -> Router {
    let service = PredictionService::new(PredictOptions::default());
    create_router(Arc::new(AppState::new(Arc::new(service))))
}

struct BrokenRegressor;

impl Regressor for BrokenRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
        Err(InferenceError::Backend("tensor shape mismatch".to_string()))
    }

    fn kind(&self) -> &'static str {
        "broken"
    }

    fn version(&self) -> &str {
        "test"
    }
}

fn broken_app(legacy_error_status: bool) -> Router {
    let service = PredictionService::with_model(Arc::new(BrokenRegressor), PredictOptions::default());
    let state = AppState::new(Arc::new(service)).with_legacy_error_status(legacy_error_status);
    create_router(Arc::new(state))
}

fn predict_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_reports_ok_when_ready() {
    let app = ready_app();

    for _ in 0..3 {
        let (status, body) = send(app.clone(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "API is running");
    }
}

#[tokio::test]
async fn test_health_reports_not_ready_without_model() {
    let (status, body) = send(not_ready_app(), get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "NOT_READY");
}

#[tokio::test]
async fn test_readyz_tracks_model_state() {
    let (status, body) = send(not_ready_app(), get_request("/readyz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    let (status, body) = send(ready_app(), get_request("/readyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_predict_returns_single_finite_value() {
    let (status, body) = send(ready_app(), predict_request(reference_payload().to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let obj = body.as_object().unwrap();
    assert_eq!(obj.len(), 1);

    let prediction = obj["prediction"].as_f64().unwrap();
    assert!(prediction.is_finite());
    assert!((prediction - REFERENCE_PREDICTION).abs() < 1e-9, "{}", prediction);
}

#[tokio::test]
async fn test_predict_is_reproducible() {
    let app = ready_app();
    let (_, first) = send(app.clone(), predict_request(reference_payload().to_string())).await;

    for _ in 0..5 {
        let (status, again) = send(app.clone(), predict_request(reference_payload().to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn test_predict_missing_field_is_400() {
    let mut payload = reference_payload();
    payload.as_object_mut().unwrap().remove("wspd");

    let (status, body) = send(ready_app(), predict_request(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("wspd"));
}

#[tokio::test]
async fn test_predict_non_numeric_field_is_400() {
    let mut payload = reference_payload();
    payload["tmax"] = json!("hot");

    let (status, body) = send(ready_app(), predict_request(payload.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("tmax"));
}

#[tokio::test]
async fn test_predict_malformed_json_is_400() {
    let (status, body) = send(ready_app(), predict_request("{\"day\": 15,")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_predict_without_model_is_503() {
    let (status, body) =
        send(not_ready_app(), predict_request(reference_payload().to_string())).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_inference_failure_is_500() {
    let (status, body) =
        send(broken_app(false), predict_request(reference_payload().to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Error in prediction:"));
}

#[tokio::test]
async fn test_inference_failure_legacy_status_is_400() {
    let (status, _) = send(broken_app(true), predict_request(reference_payload().to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_identical_requests_agree() {
    let app = ready_app();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                send(app, predict_request(reference_payload().to_string())).await
            })
        })
        .collect();

    let mut predictions = Vec::with_capacity(handles.len());
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        predictions.push(body["prediction"].as_f64().unwrap());
    }

    assert_eq!(predictions.len(), 50);
    assert!(predictions.iter().all(|p| *p == predictions[0]));
}

#[tokio::test]
async fn test_metrics_endpoint_returns_prometheus_format() {
    let app = ready_app();
    send(app.clone(), predict_request(reference_payload().to_string())).await;

    let response = app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("weather_service_prediction_latency_seconds_bucket"));
    assert!(metrics_text.contains("weather_service_predictions_total"));
    assert!(metrics_text.contains("weather_service_model_info"));
}
