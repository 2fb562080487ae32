//! HTTP API route definitions.

use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers::{healthz, index, not_found, padt, AppState};
use super::middleware::{log_requests, request_id};

/// Create the API router.
///
/// Layers run outermost first: trace span, request id, access log,
/// request timeout, then the handler.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.request_timeout;

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/padt", post(padt))
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::X_REQUEST_ID;
    use crate::template::{DEFAULT_TEMPLATE, PLACEHOLDER};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tower::ServiceExt;
    use uuid::{Uuid, Version};

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_padt() -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/padt")
            .body(Body::from("<PADTRequest/>"))
            .unwrap()
    }

    #[tokio::test]
    async fn index_returns_usage_hint() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(body_string(response).await, "use /padt as the URL to POST to\n");
    }

    #[tokio::test]
    async fn unknown_path_returns_404() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn healthz_returns_503_when_not_healthy() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn healthz_returns_204_when_healthy() {
        let state = AppState::new("padt.xml");
        state.set_healthy(true);
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn padt_serves_file_with_fresh_party_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<Reply><PartyID>{PLACEHOLDER}</PartyID></Reply>").unwrap();
        let app = create_router(AppState::new(file.path()));

        let first = app.clone().oneshot(post_padt()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CONTENT_TYPE], "application/xml");
        let first = body_string(first).await;

        let second = body_string(app.oneshot(post_padt()).await.unwrap()).await;

        let id = first
            .strip_prefix("<Reply><PartyID>")
            .and_then(|rest| rest.strip_suffix("</PartyID></Reply>"))
            .unwrap();
        let parsed = Uuid::parse_str(id).unwrap();
        assert_eq!(parsed.get_version(), Some(Version::Random));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn padt_serves_latin1_file_unchanged_apart_from_party_id() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><R n=\"Jos\xe9\">${PartyID}</R>")
            .unwrap();
        let app = create_router(AppState::new(file.path()));

        let response = app.oneshot(post_padt()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let prefix: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><R n=\"Jos\xe9\">";
        assert!(body.starts_with(prefix));
        assert!(body.ends_with(b"</R>"));
        let id = std::str::from_utf8(&body[prefix.len()..body.len() - 4]).unwrap();
        assert_eq!(Uuid::parse_str(id).unwrap().get_version(), Some(Version::Random));
    }

    #[tokio::test]
    async fn padt_falls_back_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(dir.path().join("missing.xml"));
        state.debug = true;
        let app = create_router(state);

        let response = app.oneshot(post_padt()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(!body.contains(PLACEHOLDER));
        let (prefix, _) = DEFAULT_TEMPLATE.split_once(PLACEHOLDER).unwrap();
        assert!(body.starts_with(prefix));
    }

    #[tokio::test]
    async fn padt_rejects_get() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(Request::builder().uri("/padt").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn inbound_request_id_is_echoed() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Request-Id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[&X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_absent() {
        let app = create_router(AppState::new("padt.xml"));

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers()[&X_REQUEST_ID].to_str().unwrap();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }
}
