//! Application configuration loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, StubError};

/// Prefix shared by every environment variable the stub reads.
pub const ENV_PREFIX: &str = "PADT_";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server listen address. `:port` binds every IPv4 interface.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Response template served on `/padt`.
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Log headers and body of every PADT request.
    #[serde(default)]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request handling deadline.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// How long to wait for in-flight requests on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_listen_addr() -> String {
    ":5000".to_string()
}

fn default_file() -> PathBuf {
    PathBuf::from("padt_response_file.xml")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_shutdown_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            file: default_file(),
            debug: false,
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.file.as_os_str().is_empty() {
            return Err(StubError::InvalidConfig(
                "PADT_FILE must not be empty".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(StubError::InvalidConfig(
                "PADT_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.shutdown_timeout_secs == 0 {
            return Err(StubError::InvalidConfig(
                "PADT_SHUTDOWN_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the listen address into a bindable socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = self.listen_addr.trim();
        let normalized = match addr.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => addr.to_string(),
        };

        normalized
            .parse()
            .map_err(|e: std::net::AddrParseError| StubError::InvalidListenAddr {
                addr: self.listen_addr.clone(),
                reason: e.to_string(),
            })
    }

    /// Per-request handling deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Grace period for draining connections on shutdown.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
