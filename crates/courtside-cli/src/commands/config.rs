//! Configuration commands.

use std::path::Path;

use courtside_availability::ServiceConfig;

use crate::error::CliResult;

/// Dump the effective configuration as TOML.
pub fn dump(config: &ServiceConfig, path: &Path) -> CliResult<()> {
    println!("# config.toml ({})", path.display());
    println!("{}", config.to_toml_string()?);
    Ok(())
}

/// Validate the configuration, including secret references.
pub fn validate(config: &ServiceConfig) -> CliResult<()> {
    config.validate()?;
    if config.backend.resolved_api_key()?.is_none() {
        println!("warning: backend.api_key is not set; requests will be anonymous.");
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("config: {}{state}", path.display());
    Ok(())
}
