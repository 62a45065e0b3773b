//! Centralized error handling for the countdown service
//!
//! Job-level failures (`JobError`) are the only errors the core produces.
//! They are wrapped by `AppError`, which the web layer maps onto HTTP
//! status codes.
//!
//! # Usage
//!
//! ```rust
//! use countdown_service::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for registry Results
pub type JobResult<T> = Result<T, JobError>;
