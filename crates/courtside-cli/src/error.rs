//! CLI error types.

use courtside_availability::{BackendError, ConfigError};
use courtside_core::TracingError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a `courtside` invocation with a failure exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("logging setup failed: {0}")]
    Tracing(#[from] TracingError),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The lookup ran but reported failure; its result was already printed.
    #[error("availability lookup failed: {0}")]
    Lookup(String),
}
