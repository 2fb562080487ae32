//! HTTP API module: usage hint, health, and the PADT endpoint.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use middleware::RequestId;
pub use routes::create_router;
