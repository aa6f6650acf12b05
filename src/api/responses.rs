//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::{ActionResult, Theme, TimerSnapshot};

/// Body of `POST /timer/duration`. `seconds` is kept raw so that
/// non-numeric input reaches the controller and is ignored there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DurationRequest {
    #[serde(default)]
    pub seconds: Value,
}

/// API response structure for operation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
    pub theme: Theme,
}

impl ApiResponse {
    /// Build a response from an operation outcome
    pub fn from_result(message: &str, result: ActionResult) -> Self {
        let (status, message) = if result.transition.is_applied() {
            ("applied", message.to_string())
        } else {
            ("ignored", format!("{} ignored", message))
        };

        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: result.timer,
            theme: result.theme,
        }
    }
}

/// Status response with the full observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub theme: Theme,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub errors: Vec<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
