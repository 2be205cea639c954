//! Provider configuration as stored by the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Describes how to reach an availability backend for a facility.
///
/// Values are fetched on demand and shared behind an `Arc` while cached;
/// they are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider identifier.
    pub id: String,
    /// Discriminator selecting the adapter implementation.
    pub provider_type: String,
    /// Base URL of the upstream API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Free-form adapter settings.
    #[serde(default)]
    pub api_config: Map<String, Value>,
    /// Format string for human-facing booking links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url_template: Option<String>,
}

impl ProviderConfig {
    /// Creates a config with the given id and type.
    pub fn new(id: impl Into<String>, provider_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider_type: provider_type.into(),
            api_base_url: None,
            api_config: Map::new(),
            booking_url_template: None,
        }
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Builder method to set one `api_config` entry.
    pub fn with_api_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.api_config.insert(key.into(), value.into());
        self
    }

    /// Builder method to set the booking URL template.
    pub fn with_booking_url_template(mut self, template: impl Into<String>) -> Self {
        self.booking_url_template = Some(template.into());
        self
    }

    /// Returns a string setting from `api_config`.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.api_config.get(key).and_then(Value::as_str)
    }

    /// Returns a numeric setting from `api_config`.
    ///
    /// Numeric strings such as `"30"` are accepted too.
    pub fn setting_u64(&self, key: &str) -> Option<u64> {
        match self.api_config.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
