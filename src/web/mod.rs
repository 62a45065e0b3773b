//! Web layer module
//!
//! HTTP interface for the countdown service. Handlers are thin: they parse
//! the request, delegate to `CountdownService` and format the result.
//!
//! # Architecture
//!
//! - **Handlers**: HTML pages, JSON API and health check
//! - **Responses**: JSON payloads and the error envelope
//! - **Middleware**: request logging
//! - **Utils**: path parameter parsing

use anyhow::Result;
use axum::{
    Router,
    routing::get,
};
use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::{config::Config, services::CountdownService};

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod utils;

pub use responses::{ApiResponse, JobStatusResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub countdown: CountdownService,
    /// Application start time for uptime calculation
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(countdown: CountdownService) -> Self {
        Self {
            countdown,
            start_time: Utc::now(),
        }
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, countdown: CountdownService) -> Result<Self> {
        let app = create_router(AppState::new(countdown));
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        Ok(Self { app, addr })
    }

    /// Serve until `cancellation_token` fires, reporting bind success or
    /// failure through `ready_signal` first
    pub async fn serve_with_cancellation(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
        cancellation_token: CancellationToken,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                let shutdown_signal = async move {
                    cancellation_token.cancelled().await;
                    tracing::info!("Web server received cancellation signal, shutting down gracefully");
                };

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal)
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Build the router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(handlers::pages::index))
        .route(
            "/start",
            get(handlers::pages::start_form).post(handlers::pages::start_submit),
        )
        .route("/status", get(handlers::pages::status_index))
        .route("/status/", get(handlers::pages::status_index))
        .route("/status/{id}", get(handlers::pages::status_detail))
        .route("/status/{id}/", get(handlers::pages::status_detail))
        // JSON API
        .route(
            "/api/status",
            get(handlers::api::list_job_statuses).post(handlers::api::create_job),
        )
        .route("/api/status/", get(handlers::api::list_job_statuses))
        .route("/api/status/{id}", get(handlers::api::get_job_status))
        .route("/api/status/{id}/", get(handlers::api::get_job_status))
        .route("/api/openapi.json", get(openapi::openapi_json))
        // Health
        .route("/health", get(handlers::health::health_check))
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(middleware::request_logging_middleware))
        .with_state(state)
}
