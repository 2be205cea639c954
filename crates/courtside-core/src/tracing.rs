//! Tracing setup shared by the courtside crates.
//!
//! Every crate logs through `tracing` macros; binaries call [`init_tracing`]
//! once to install a subscriber. Logs go to stderr so stdout stays free for
//! command output.
//!
//! ```ignore
//! use courtside_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::for_cli(debug, TracingOutputFormat::Compact))?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line human-readable output
    Pretty,
    /// One line per event (default)
    #[default]
    Compact,
    /// JSON lines, for log shipping
    Json,
}

/// What to log and how to lay it out.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for courtside targets when `RUST_LOG` is not set
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Include file and line of the call site
    pub include_location: bool,
    pub include_timestamp: bool,
    /// Log span open/close events
    pub include_span_events: bool,
    /// Explicit filter directive; takes precedence over `RUST_LOG` and `level`
    pub filter: Option<String>,
}

/// Log targets of the courtside crates.
const TARGETS: &[&str] = &[
    "courtside",
    "courtside_core",
    "courtside_providers",
    "courtside_availability",
    "courtside_cli",
];

/// Builds a filter directive enabling `level` for every courtside target.
pub fn default_directive(level: Level) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingOutputFormat::Compact,
            include_location: false,
            include_timestamp: true,
            include_span_events: false,
            filter: None,
        }
    }
}

impl TracingConfig {
    /// Config for the `courtside` binary.
    ///
    /// Quiet (warnings only) by default; `debug` raises the level and adds
    /// call sites while dropping timestamps.
    #[must_use]
    pub fn for_cli(debug: bool, format: TracingOutputFormat) -> Self {
        let config = Self::default().with_format(format);
        if debug {
            Self {
                level: Level::DEBUG,
                include_location: true,
                include_timestamp: false,
                ..config
            }
        } else {
            config
        }
    }

    /// Config for a long-running embedder: JSON lines at info with spans.
    #[must_use]
    pub fn structured() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Json,
            include_location: true,
            include_timestamp: true,
            include_span_events: true,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Resolves the filter: explicit directive, then `RUST_LOG`, then `level`.
    pub fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(directive) = &self.filter {
            return Ok(EnvFilter::try_new(directive)?);
        }
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::new(default_directive(self.level))),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_span_events(self.span_events());

        match (self.format, self.include_timestamp) {
            (TracingOutputFormat::Pretty, true) => base.pretty().boxed(),
            (TracingOutputFormat::Pretty, false) => base.pretty().without_time().boxed(),
            (TracingOutputFormat::Compact, true) => base.compact().boxed(),
            (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
            (TracingOutputFormat::Json, true) => base.json().boxed(),
            (TracingOutputFormat::Json, false) => base.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed or the
/// filter directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_are_quiet() {
        let config = TracingConfig::for_cli(false, TracingOutputFormat::Compact);
        assert_eq!(config.level, Level::WARN);
        assert!(config.include_timestamp);
        assert!(!config.include_location);
    }

    #[test]
    fn cli_debug_raises_level() {
        let config = TracingConfig::for_cli(true, TracingOutputFormat::Json);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, TracingOutputFormat::Json);
        assert!(config.include_location);
        assert!(!config.include_timestamp);
    }

    #[test]
    fn structured_logs_spans() {
        let config = TracingConfig::structured();
        assert_eq!(config.format, TracingOutputFormat::Json);
        assert!(config.include_span_events);
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }

    #[test]
    fn explicit_filter_wins() {
        let config = TracingConfig::default().with_filter("courtside=trace");
        assert!(config.env_filter().is_ok());

        let bad = TracingConfig::default().with_filter("courtside=[");
        assert!(matches!(bad.env_filter(), Err(TracingError::EnvFilter(_))));
    }

    #[test]
    fn default_directive_covers_all_crates() {
        let directive = default_directive(Level::DEBUG);
        assert!(directive.contains("courtside=DEBUG"));
        assert!(directive.contains("courtside_availability=DEBUG"));
        assert!(directive.contains("courtside_providers=DEBUG"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
