//! Acme provider configuration.

use std::time::Duration;

use courtside_core::ProviderConfig;
use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Default HTTP timeout for a single Acme request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings the Acme adapter extracts from a provider config row.
#[derive(Debug, Clone)]
pub struct AcmeConfig {
    /// API root. Always ends with a `/` so relative joins keep its path.
    pub base_url: Url,
    /// Bearer token, if the facility's API requires one.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Deep-link template for booking a slot.
    pub booking_url_template: Option<String>,
}

impl AcmeConfig {
    /// Creates a config for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> ProviderResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            booking_url_template: None,
        })
    }

    /// Extracts the Acme settings from a provider config row.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `api_base_url` is missing or
    /// malformed.
    pub fn from_provider_config(config: &ProviderConfig) -> ProviderResult<Self> {
        let base_url = config
            .api_base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::configuration(format!(
                    "provider config {} has no api_base_url",
                    config.id
                ))
            })?;

        let mut acme = Self::new(base_url)?;
        acme.api_key = config
            .setting_str("api_key")
            .filter(|key| !key.is_empty())
            .map(String::from);
        if let Some(secs) = config.setting_u64("timeout_secs").filter(|s| *s > 0) {
            acme.timeout = Duration::from_secs(secs);
        }
        acme.booking_url_template = config.booking_url_template.clone();
        Ok(acme)
    }

    /// Returns the availability endpoint for a site.
    pub fn availability_url(&self, site_id: i64) -> ProviderResult<Url> {
        self.base_url
            .join(&format!("sites/{site_id}/availability"))
            .map_err(|e| {
                ProviderError::configuration(format!("invalid availability url: {e}"))
                    .with_source(e)
            })
    }
}

fn parse_base_url(raw: &str) -> ProviderResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| {
        ProviderError::configuration(format!("invalid api_base_url '{raw}': {e}")).with_source(e)
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ProviderError::configuration(format!(
            "api_base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
