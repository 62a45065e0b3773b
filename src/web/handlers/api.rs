//! JSON API handlers for countdown jobs
//!
//! Thin wrappers around `CountdownService`: parse the request, call the
//! service, map the result onto `JobStatusResponse` or an error envelope.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    errors::AppError,
    web::{
        AppState,
        responses::{JobStatusResponse, handle_error, not_found},
        utils::{JobIdParam, parse_job_id},
    },
};

/// Request DTO for creating a countdown job
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// Free-form job name
    #[serde(default)]
    pub name: String,
    /// Countdown length in seconds, at least 1
    #[schema(example = 30)]
    pub delay_seconds: i64,
}

/// List the status of every retained job, oldest first
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "jobs",
    responses(
        (status = 200, description = "Status of all retained jobs", body = [JobStatusResponse]),
    )
)]
pub async fn list_job_statuses(State(state): State<AppState>) -> Response {
    let statuses: Vec<JobStatusResponse> = state
        .countdown
        .list_statuses()
        .await
        .into_iter()
        .map(|(job, view)| JobStatusResponse::new(job, view))
        .collect();

    Json(statuses).into_response()
}

/// Get the status of a single job
#[utoipa::path(
    get,
    path = "/api/status/{id}",
    tag = "jobs",
    params(
        ("id" = u64, Path, description = "Job ID", example = 1),
    ),
    responses(
        (status = 200, description = "Job status", body = JobStatusResponse),
        (status = 400, description = "Job ID is not an integer"),
        (status = 404, description = "Job not found or evicted from history"),
    )
)]
pub async fn get_job_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_job_id(&id) {
        Ok(JobIdParam::Id(id)) => id,
        Ok(unissued) => return not_found(unissued.not_found_message()),
        Err(_) => {
            return handle_error(AppError::validation(
                "Invalid request URL format. Use /api/status/<ID>",
            ));
        }
    };

    match state.countdown.job_status(id).await {
        Ok((job, view)) => Json(JobStatusResponse::new(job, view)).into_response(),
        Err(e) => handle_error(e),
    }
}

/// Create a countdown job and return its initial status
#[utoipa::path(
    post,
    path = "/api/status",
    tag = "jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobStatusResponse),
        (status = 400, description = "Delay missing, not an integer or out of range"),
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected job creation body: {}", rejection.body_text());
            return handle_error(AppError::validation("Invalid delay value"));
        }
    };

    let id = match state
        .countdown
        .create_job(&request.name, request.delay_seconds)
        .await
    {
        Ok(id) => id,
        Err(e) => return handle_error(e),
    };

    match state.countdown.job_status(id).await {
        Ok((job, view)) => {
            (StatusCode::CREATED, Json(JobStatusResponse::new(job, view))).into_response()
        }
        Err(e) => handle_error(e),
    }
}
