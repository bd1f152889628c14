//! Health check endpoint

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub avg_response_time_ms: f64,
}

/// Report liveness and database reachability; 503 when the database is down
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = state.pool.ping().await {
        tracing::warn!("Health check failed: {:#}", e);
        return Err(ApiError::service_unavailable("Database unavailable"));
    }

    let stats = &state.request_stats;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: format!("{:?}", state.pool.driver()).to_lowercase(),
        uptime_seconds: stats.uptime_seconds(),
        total_requests: stats.total_requests(),
        avg_response_time_ms: stats.avg_response_time_us() / 1000.0,
    }))
}
