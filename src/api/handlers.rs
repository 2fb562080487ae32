//! HTTP API handlers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        HeaderMap, StatusCode,
    },
    response::IntoResponse,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::metrics;
use crate::template::Template;

/// Body returned on `/`.
pub const USAGE: &str = "use /padt as the URL to POST to\n";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Whether the server is accepting and answering requests.
    pub healthy: Arc<AtomicBool>,
    /// Response template path.
    pub file: Arc<PathBuf>,
    /// Dump PADT request headers and body.
    pub debug: bool,
    /// Per-request handling deadline.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create new app state. Starts unhealthy.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(false)),
            file: Arc::new(file.into()),
            debug: false,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Build state from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            debug: config.debug,
            request_timeout: config.request_timeout(),
            ..Self::new(config.file.clone())
        }
    }

    /// Set health state.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Check if healthy.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Usage hint handler.
pub async fn index() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        USAGE,
    )
}

/// Health check handler - returns 204 if healthy, 503 otherwise.
pub async fn healthz(State(state): State<AppState>) -> StatusCode {
    if state.is_healthy() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// PADT handler - serves the rendered response template.
pub async fn padt(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if state.debug {
        dump_request(&headers, &body);
    }

    let template = Template::load_or_fallback(&state.file).await;
    let (rendered, party_id) = template.render_fresh();

    debug!(
        party_id = %party_id,
        source = %template.source(),
        "Rendered PADT response"
    );
    metrics::inc_padt_responses(template.source());

    ([(CONTENT_TYPE, "application/xml")], rendered)
}

/// Fallback for unrouted paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Not Found\n",
    )
}

fn dump_request(headers: &HeaderMap, body: &Bytes) {
    info!("--------------");
    for (name, value) in headers {
        info!(header = %name, value = ?value, "PADT request header");
    }
    info!(body = %String::from_utf8_lossy(body), "PADT request body");
    info!("--------------");
}
