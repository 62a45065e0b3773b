//! Status derivation: turns a stored job plus the current time into a view
//!
//! The derived status may report "completed" before the completion callback
//! has set the stored flag. For display, the clock wins; the stored flag only
//! changes through the registry.

use crate::models::{Job, JobStatus, StatusView};
use chrono::{DateTime, Duration, Utc};

/// Instant at which the job's countdown is due to finish
pub fn expected_completion(job: &Job) -> DateTime<Utc> {
    let delay = i64::try_from(job.total_delay_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX);
    job.created_at
        .checked_add_signed(delay)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Compute the progress of `job` as seen at `now`
pub fn derive_status(job: &Job, now: DateTime<Utc>) -> StatusView {
    if job.completed || now >= expected_completion(job) {
        return StatusView {
            status: JobStatus::Completed,
            elapsed_seconds: job.total_delay_seconds,
            remaining_seconds: 0,
        };
    }

    let elapsed_seconds = u64::try_from((now - job.created_at).num_seconds()).unwrap_or(0);
    StatusView {
        status: JobStatus::InProgress,
        elapsed_seconds,
        remaining_seconds: job.total_delay_seconds.saturating_sub(elapsed_seconds),
    }
}
