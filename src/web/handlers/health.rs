//! Health check HTTP handler

use axum::{Json, extract::State, response::IntoResponse};

use crate::web::{AppState, responses::HealthResponse};

/// Liveness plus a snapshot of the job counters
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime_seconds: (now - state.start_time).num_seconds(),
        jobs: state.countdown.stats().await,
    })
}
