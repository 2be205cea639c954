//! Subcommand implementations.

pub mod availability;
pub mod config;
