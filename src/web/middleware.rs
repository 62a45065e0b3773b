//! HTTP middleware

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Response header carrying the generated request ID
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Runs the handler inside an `http_request` span keyed by a fresh request
/// ID, so job lifecycle logs emitted while serving it carry the same ID. The
/// ID is echoed back in `x-request-id`. Routes are logged by their template
/// (`/status/{id}`); unmatched requests fall back to the raw path.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned())
        .unwrap_or_else(|| path.clone());

    let span = info_span!("http_request", request_id = %request_id, method = %method, route = %route);
    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    span.in_scope(|| {
        if status.is_client_error() || status.is_server_error() {
            warn!(path = %path, status = status.as_u16(), duration_ms, "Request failed");
        } else {
            info!(path = %path, status = status.as_u16(), duration_ms, "Request served");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
