//! API client for the prediction service

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure talking to the prediction service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{0}")]
    Connection(#[source] reqwest::Error),

    #[error("API error ({status}): {detail}")]
    Api { status: StatusCode, detail: String },

    #[error("failed to parse response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last path segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.base_url.join("health")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ClientError::Connection)?;
        Self::decode(response).await
    }

    /// `POST /predict`
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ClientError> {
        let url = self.base_url.join("predict")?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ClientError::Connection)?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(ClientError::Api { status, detail });
        }

        response.json().await.map_err(ClientError::Decode)
    }
}

// API request/response types

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub tmin: f64,
    pub tmax: f64,
    pub prcp: f64,
    pub wspd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn request() -> PredictRequest {
        PredictRequest {
            day: 15,
            month: 7,
            year: 2024,
            tmin: 28.0,
            tmax: 41.0,
            prcp: 0.0,
            wspd: 12.5,
        }
    }

    fn client(url: &str) -> ApiClient {
        ApiClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_predict_posts_all_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(Matcher::Json(json!({
                "day": 15, "month": 7, "year": 2024,
                "tmin": 28.0, "tmax": 41.0, "prcp": 0.0, "wspd": 12.5
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"prediction": 33.81}"#)
            .create_async()
            .await;

        let response = client(&server.url()).predict(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.prediction, 33.81);
    }

    #[tokio::test]
    async fn test_predict_error_detail_surfaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(400)
            .with_body(r#"{"detail": "Invalid input: field 'tmax' must be a floating-point number"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).predict(&request()).await.unwrap_err();
        match err {
            ClientError::Api { status, detail } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert!(detail.contains("tmax"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_verbatim() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server.url()).predict(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { ref detail, .. } if detail == "bad gateway"));
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let predict = server
            .mock("POST", "/api/predict")
            .expect(2)
            .with_status(200)
            .with_body(r#"{"prediction": 33.81}"#)
            .create_async()
            .await;
        let health = server
            .mock("GET", "/api/health")
            .expect(2)
            .with_status(200)
            .with_body(r#"{"status": "OK", "message": "API is running"}"#)
            .create_async()
            .await;

        for base in [format!("{}/api", server.url()), format!("{}/api/", server.url())] {
            let api = client(&base);
            assert_eq!(api.predict(&request()).await.unwrap().prediction, 33.81);
            assert_eq!(api.health().await.unwrap().status, "OK");
        }

        predict.assert_async().await;
        health.assert_async().await;
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "OK", "message": "API is running"}"#)
            .create_async()
            .await;

        let health = client(&server.url()).health().await.unwrap();
        assert_eq!(health.status, "OK");
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // Port 9 (discard) is not expected to be listening locally
        let err = client("http://127.0.0.1:9").predict(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
