//! Service layer
//!
//! `CountdownService` is the single stateful component the web layer
//! depends on; it owns the job registry and the completion scheduler.

pub mod countdown_service;

pub use countdown_service::{CountdownService, ServiceStats};
