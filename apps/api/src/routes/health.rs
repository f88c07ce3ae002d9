//! Liveness and readiness probes.

use axum::extract::State;
use axum::http::StatusCode;

use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::response::ApiResponse;
use crate::state::AppState;

/// `GET /health`: the process is up. Never touches the database.
pub async fn health() -> ApiResponse<()> {
    ApiResponse::message(StatusCode::OK, "API is running")
}

/// `GET /health/ready`: the database answers a trivial query.
pub async fn ready(State(state): State<AppState>) -> ApiResult<()> {
    if state.db.health_check().await {
        Ok(ApiResponse::message(StatusCode::OK, "Ready"))
    } else {
        tracing::warn!("Readiness check failed: database unavailable");
        Err(ApiError::new(ErrorCode::Unavailable, "Database unavailable"))
    }
}
