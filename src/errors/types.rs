//! Error type definitions for the countdown service

use thiserror::Error;

use crate::models::JobId;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Job registry errors
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// Validation errors raised by adapters before reaching the registry
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Rejected configuration values
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Errors produced by the job registry
///
/// Both variants are caller errors; neither is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Delay below one second or over the configured cap, rejected before
    /// any state change
    #[error("Invalid delay: {delay_seconds} seconds")]
    InvalidDelay { delay_seconds: i64 },

    /// The job was never issued or has been evicted from history
    #[error("Job ID {id} not found.")]
    NotFound { id: JobId },
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Job(JobError::NotFound { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_job() {
        let err = JobError::NotFound { id: JobId(7) };
        assert_eq!(err.to_string(), "Job ID 7 not found.");
    }

    #[test]
    fn test_job_error_converts_into_app_error() {
        let err: AppError = JobError::NotFound { id: JobId(3) }.into();
        assert!(err.is_not_found());

        let err: AppError = JobError::InvalidDelay { delay_seconds: 0 }.into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("Invalid delay"));
    }
}
