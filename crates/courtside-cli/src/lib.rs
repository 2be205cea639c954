//! Command-line interface for courtside availability lookups.
//!
//! This crate provides the `courtside` binary. Every fetch command prints an
//! availability result as JSON on stdout and exits non-zero when the result
//! reports failure; logs go to stderr.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
