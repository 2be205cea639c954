//! Service configuration.
//!
//! All settings live in a single `config.toml`, by default at
//! `~/.config/courtside/config.toml`:
//!
//! ```toml
//! request_timeout_secs = 30
//!
//! [backend]
//! url = "https://project.db.example"
//! api_key = "env::COURTSIDE_API_KEY"
//!
//! [cache]
//! provider_ttl_secs = 300
//! templates_ttl_secs = 300
//! ```
//!
//! `backend.api_key` supports `env::VAR_NAME` references, resolved when the
//! backend client is built; anything else is used as-is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default deadline for every remote call, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default lifetime of cached provider configs and template flags, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "COURTSIDE_CONFIG";

/// Configuration for the availability service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Hosted database settings.
    pub backend: BackendSettings,

    /// Cache lifetimes.
    pub cache: CacheSettings,

    /// Deadline applied to each backend and adapter call.
    pub request_timeout_secs: u64,

    /// Debug mode.
    pub debug: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            cache: CacheSettings::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            debug: false,
        }
    }
}

/// Hosted database settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Project URL; REST endpoints live under `/rest/v1/`.
    pub url: String,

    /// Anon or service key (supports the `env::` prefix).
    pub api_key: Option<String>,

    /// Schema to query instead of the default one.
    pub schema: Option<String>,
}

impl BackendSettings {
    /// Returns the API key with any `env::` reference expanded.
    pub fn resolved_api_key(&self) -> Result<Option<String>, ConfigError> {
        self.api_key.as_deref().map(resolve_secret).transpose()
    }
}

/// Cache lifetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub provider_ttl_secs: u64,
    pub templates_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            provider_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            templates_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheSettings {
    pub fn provider_ttl(&self) -> Duration {
        Duration::from_secs(self.provider_ttl_secs)
    }

    pub fn templates_ttl(&self) -> Duration {
        Duration::from_secs(self.templates_ttl_secs)
    }
}

impl ServiceConfig {
    /// Loads configuration from the default path, or defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("courtside")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the settings the service cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::invalid("backend.url is not set"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs must be positive"));
        }
        if self.cache.provider_ttl_secs == 0 || self.cache.templates_ttl_secs == 0 {
            return Err(ConfigError::invalid("cache TTLs must be positive"));
        }
        Ok(())
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Resolves a value that may be an `env::VAR_NAME` reference.
pub fn resolve_secret(value: &str) -> Result<String, ConfigError> {
    match value.strip_prefix("env::") {
        Some(var) => std::env::var(var).map_err(|_| ConfigError::MissingEnv {
            var: var.to_string(),
        }),
        None => Ok(value.to_string()),
    }
}
