//! Health check endpoints
//!
//! - /v1/health - Process is up
//! - /v1/health/ready - Readiness probe (pings the store)
//! - /metrics - Prometheus scrape endpoint

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use todo_shared::{Envelope, MessageData};
use tracing::warn;

/// Basic health check endpoint
pub async fn health_check() -> Json<Envelope<MessageData>> {
    Json(Envelope::success(MessageData::new("running")))
}

/// Readiness probe - 503 while the store cannot be reached
pub async fn readiness_check(State(state): State<AppState>) -> ApiResult<Json<Envelope<MessageData>>> {
    match state.users().ping().await {
        Ok(()) => Ok(Json(Envelope::success(MessageData::new("ready")))),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            Err(ApiError::Unavailable("store unreachable".to_string()))
        }
    }
}

/// Render the Prometheus registry; 404 when no recorder is attached
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics() {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
