//! Error types for the backend client and service configuration.
//!
//! None of these escape the public availability operations: the service
//! folds them into an [`AvailabilityResult`](courtside_core::AvailabilityResult)
//! failure or a fail-closed default. They surface directly only from
//! construction helpers such as [`RestBackend::new`](crate::RestBackend::new)
//! and [`ServiceConfig::load_from`](crate::ServiceConfig::load_from).

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while talking to the hosted database.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The call did not finish before the configured deadline.
    #[error("backend call timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The backend client is misconfigured.
    #[error("backend configuration error: {message}")]
    Config { message: String },
}

impl BackendError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Returns true if this error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Errors raised while loading [`ServiceConfig`](crate::ServiceConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A `env::VAR` reference could not be resolved.
    #[error("environment variable `{var}` is not set")]
    MissingEnv { var: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Creates an invalid-configuration error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
