//! PADT stub: an HTTP test double for a single downstream endpoint.
//!
//! `POST /padt` answers with the contents of a configured XML file (or a
//! built-in default when the file cannot be read), with every `${PartyID}`
//! replaced by a fresh random UUID:
//!
//! ```text
//! <PartyID>${PartyID}</PartyID>
//!        │
//!        ▼
//! <PartyID>0b6c3f52-8f0e-4b4e-9a61-5d0f1e2a7c3d</PartyID>
//! ```
//!
//! `GET /healthz` reports 204 while serving and 503 before startup or once
//! shutdown has begun, so orchestrators stop routing before connections drain.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`template`]: Response template loading and substitution
//! - [`api`]: Routes, handlers and middleware
//! - [`server`]: Lifecycle and graceful shutdown
//! - [`metrics`]: Response and latency metrics
//! - [`utils`]: Signal handling

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod template;
pub mod utils;

pub use config::Config;
pub use error::{Result, StubError};
