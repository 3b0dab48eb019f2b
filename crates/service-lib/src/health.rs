//! Health and readiness reporting
//!
//! The service has two states: NOT_READY until a model is installed and
//! READY afterwards. There is no way back.

use serde::{Deserialize, Serialize};

/// Message reported while the model is loaded
pub const READY_MESSAGE: &str = "API is running";

/// Message reported before the model is loaded
pub const NOT_READY_MESSAGE: &str = "model artifact not loaded";

/// Lifecycle status of the prediction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[serde(rename = "OK")]
    Ready,
    #[serde(rename = "NOT_READY")]
    NotReady,
}

impl ServiceStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ServiceStatus::Ready)
    }
}

/// Body of `/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub message: String,
}

impl HealthReport {
    pub fn for_status(status: ServiceStatus) -> Self {
        let message = match status {
            ServiceStatus::Ready => READY_MESSAGE,
            ServiceStatus::NotReady => NOT_READY_MESSAGE,
        };
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ServiceStatus> for ReadinessResponse {
    fn from(status: ServiceStatus) -> Self {
        if status.is_ready() {
            ReadinessResponse {
                ready: true,
                reason: None,
            }
        } else {
            ReadinessResponse {
                ready: false,
                reason: Some(NOT_READY_MESSAGE.to_string()),
            }
        }
    }
}
