//! HTML page handlers
//!
//! Server-rendered views over the countdown service: the history table,
//! the start form, the active countdown list and a per-job detail page.
//! Errors are returned as plain text.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::error;

use crate::{
    errors::{AppError, JobError},
    job_scheduling::{derive_status, expected_completion},
    models::{Job, JobStatus},
    web::{
        AppState,
        utils::{JobIdParam, parse_job_id},
    },
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// One row of the history table
pub struct HistoryRow {
    pub id: u64,
    pub name: String,
    pub added: String,
    pub expected_completion: String,
    pub completed: String,
    pub total_delay_seconds: u64,
    pub elapsed_seconds: u64,
    pub status: &'static str,
    pub status_class: &'static str,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub max_history: usize,
    pub rows: Vec<HistoryRow>,
}

#[derive(Template)]
#[template(path = "start.html")]
pub struct StartTemplate {}

/// A countdown still running, for the status list
pub struct ActiveRow {
    pub id: u64,
    pub name: String,
    pub remaining_seconds: u64,
}

#[derive(Template)]
#[template(path = "status_index.html")]
pub struct StatusIndexTemplate {
    pub active: Vec<ActiveRow>,
    pub message: String,
}

#[derive(Template)]
#[template(path = "status_detail.html")]
pub struct StatusDetailTemplate {
    pub id: u64,
    pub name: String,
    pub status: &'static str,
    pub in_progress: bool,
    pub remaining_seconds: u64,
    pub total_delay_seconds: u64,
    pub added: String,
    pub completed: String,
}

#[derive(Debug, Deserialize)]
pub struct StartForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub delay: String,
}

fn render<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Failed to render template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

fn plain_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

fn format_completed(job: &Job) -> String {
    job.completed_at
        .map(|at| at.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// History of the most recent countdowns, oldest first
pub async fn index(State(state): State<AppState>) -> Response {
    let jobs = state.countdown.recent_jobs().await;
    let now = state.countdown.now();

    let rows = jobs
        .iter()
        .map(|job| {
            let view = derive_status(job, now);
            HistoryRow {
                id: job.id.get(),
                name: job.name.clone(),
                added: job.created_at.format(TIME_FORMAT).to_string(),
                expected_completion: expected_completion(job).format(TIME_FORMAT).to_string(),
                completed: format_completed(job),
                total_delay_seconds: job.total_delay_seconds,
                elapsed_seconds: view.elapsed_seconds,
                status: view.status.as_str(),
                status_class: view.status.css_class(),
            }
        })
        .collect();

    render(IndexTemplate {
        max_history: state.countdown.max_history(),
        rows,
    })
}

pub async fn start_form() -> Response {
    render(StartTemplate {})
}

/// Create a countdown from the submitted form and go back to the history
pub async fn start_submit(State(state): State<AppState>, Form(form): Form<StartForm>) -> Response {
    let Ok(delay) = form.delay.trim().parse::<i64>() else {
        return plain_error(StatusCode::BAD_REQUEST, "Invalid delay value");
    };

    match state.countdown.create_job(&form.name, delay).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(AppError::Job(JobError::InvalidDelay { .. })) => {
            plain_error(StatusCode::BAD_REQUEST, "Invalid delay value")
        }
        Err(e) => plain_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Countdowns whose completion has not been recorded and which still have
/// time remaining
///
/// A job past its deadline whose timer has not fired yet is neither listed
/// nor counted as completed.
pub async fn status_index(State(state): State<AppState>) -> Response {
    let statuses = state.countdown.list_statuses().await;
    let unrecorded = statuses.iter().filter(|(job, _)| !job.completed).count();

    let active: Vec<ActiveRow> = statuses
        .iter()
        .filter(|(job, view)| !job.completed && view.status == JobStatus::InProgress)
        .map(|(job, view)| ActiveRow {
            id: job.id.get(),
            name: job.name.clone(),
            remaining_seconds: view.remaining_seconds,
        })
        .collect();

    let message = if statuses.is_empty() {
        "No countdowns activated."
    } else if unrecorded == 0 {
        "All queued tasks are completed."
    } else {
        ""
    };

    render(StatusIndexTemplate {
        active,
        message: message.to_string(),
    })
}

pub async fn status_detail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let job_id = match parse_job_id(&id) {
        Ok(JobIdParam::Id(id)) => id,
        Ok(unissued) => return plain_error(StatusCode::NOT_FOUND, unissued.not_found_message()),
        Err(_) => {
            return plain_error(
                StatusCode::BAD_REQUEST,
                "Invalid request URL format. Use /status/<ID>",
            );
        }
    };

    match state.countdown.job_status(job_id).await {
        Ok((job, view)) => render(StatusDetailTemplate {
            id: job.id.get(),
            status: view.status.as_str(),
            in_progress: view.status == JobStatus::InProgress,
            remaining_seconds: view.remaining_seconds,
            total_delay_seconds: job.total_delay_seconds,
            added: job.created_at.format(TIME_FORMAT).to_string(),
            completed: job
                .completed_at
                .map(|at| at.format(TIME_FORMAT).to_string())
                .unwrap_or_default(),
            name: job.name,
        }),
        Err(e) if e.is_not_found() => plain_error(
            StatusCode::NOT_FOUND,
            JobIdParam::Id(job_id).not_found_message(),
        ),
        Err(e) => plain_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
