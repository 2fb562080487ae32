//! Request-id tagging and access logging middleware.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header::USER_AGENT, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::info;

use crate::metrics;

/// Header carrying the request id in both directions.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Metric label for requests that matched no route.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Request id attached to each request's extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Generate a request id from the current time in nanoseconds.
pub fn next_request_id() -> HeaderValue {
    HeaderValue::from(Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

/// Request ID injection middleware.
///
/// Reuses a printable inbound `X-Request-Id`, otherwise generates one.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(&X_REQUEST_ID)
        .filter(|v| v.to_str().is_ok_and(|s| !s.is_empty()))
        .cloned()
        .unwrap_or_else(next_request_id);

    // Header values built above are always visible ASCII.
    let id = header.to_str().unwrap_or_default().to_string();
    request.extensions_mut().insert(RequestId(id));

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID.clone(), header);
    response
}

/// Route template the request matched, or [`UNMATCHED_ENDPOINT`].
pub fn endpoint_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string())
}

/// Access logging middleware.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let endpoint = endpoint_label(&request);

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let response = next.run(request).await;

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        user_agent = %user_agent,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        "Request completed"
    );
    metrics::record_http_latency(start, &endpoint);

    response
}
