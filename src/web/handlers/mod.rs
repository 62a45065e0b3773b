//! Web handlers module
//!
//! HTML pages, the JSON job API and the health endpoint. Each handler
//! delegates to `CountdownService` and only deals with HTTP concerns.

pub mod api;
pub mod health;
pub mod pages;
