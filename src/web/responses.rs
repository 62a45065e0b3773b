//! HTTP response types and utilities
//!
//! Successful JSON responses carry their payload directly; failures use the
//! `ApiResponse` envelope so clients get a consistent error shape.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    errors::{AppError, JobError},
    models::{Job, JobStatus, StatusView},
    services::ServiceStats,
};

/// Error envelope for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Always false; successful responses carry their payload directly
    pub success: bool,
    pub error: String,
    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Status of a job as returned by the JSON API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub id: u64,
    pub name: String,
    pub date_time_added: DateTime<Utc>,
    pub total_delay_seconds: u64,
    pub status: JobStatus,
    pub elapsed_time_seconds: u64,
    pub remaining_time_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateTime<Utc>>,
}

impl JobStatusResponse {
    pub fn new(job: Job, view: StatusView) -> Self {
        Self {
            id: job.id.get(),
            name: job.name,
            date_time_added: job.created_at,
            total_delay_seconds: job.total_delay_seconds,
            status: view.status,
            elapsed_time_seconds: view.elapsed_seconds,
            remaining_time_seconds: view.remaining_seconds,
            completed_time: job.completed_at,
        }
    }
}

/// Health check payload
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub jobs: ServiceStats,
}

/// Convert AppError to an HTTP response with the JSON error envelope
pub fn handle_error(error: AppError) -> Response {
    let status = error_status(&error);
    let message = match &error {
        AppError::Job(job_error) => job_error.to_string(),
        AppError::Validation { message } => message.clone(),
        AppError::Configuration { message } => format!("Configuration error: {}", message),
    };

    (status, Json(ApiResponse::error(message))).into_response()
}

/// 404 with the JSON error envelope, for lookups that never reach the registry
pub fn not_found(message: impl Into<String>) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(message))).into_response()
}

/// HTTP status code for an application error
pub fn error_status(error: &AppError) -> StatusCode {
    match error {
        AppError::Job(JobError::InvalidDelay { .. }) | AppError::Validation { .. } => {
            StatusCode::BAD_REQUEST
        }
        AppError::Job(JobError::NotFound { .. }) => StatusCode::NOT_FOUND,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
