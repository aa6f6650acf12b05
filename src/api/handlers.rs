//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::error;

use crate::state::{ActionResult, AppState};
use super::responses::{ApiResponse, DurationRequest, HealthResponse, StatusResponse};

/// Turn an operation outcome into a response, or a 500 on internal failure
fn respond(
    message: &str,
    result: Result<ActionResult, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(result) => Ok(Json(ApiResponse::from_result(message, result))),
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/duration - Configure the countdown duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Duration set", state.set_duration(&request.seconds))
}

/// Handle POST /timer/start - Start or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Timer started", state.start())
}

/// Handle POST /timer/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Timer paused", state.pause())
}

/// Handle POST /timer/reset - Restore the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Timer reset", state.reset())
}

/// Handle POST /timer/clear - Forget the configured duration
pub async fn clear_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Timer cleared", state.clear())
}

/// Handle POST /theme/toggle
pub async fn theme_toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond("Theme toggled", state.toggle_theme())
}

/// Handle GET /status - Return current timer and theme status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let theme = match state.get_theme() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get theme: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let errors = state.get_errors().unwrap_or_else(|e| {
        error!("Failed to get error list: {}", e);
        Vec::new()
    });

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        theme,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
        errors,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
