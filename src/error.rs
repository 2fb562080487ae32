//! Unified error types for the PADT stub.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the PADT stub.
#[derive(Error, Debug)]
pub enum StubError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listen address could not be parsed.
    #[error("invalid listen address {addr:?}: {reason}")]
    InvalidListenAddr {
        /// The address as configured.
        addr: String,
        /// Why it was rejected.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The server task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// In-flight requests did not drain within the grace period.
    #[error("could not gracefully shut down the server within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, StubError>;
