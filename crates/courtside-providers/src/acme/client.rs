//! Acme booking API client.
//!
//! Low-level HTTP access to the availability endpoint plus the wire types it
//! returns. Mapping into [`AvailabilitySlot`](courtside_core::AvailabilitySlot)
//! happens in the provider.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::config::AcmeConfig;
use crate::error::{ProviderError, ProviderResult};

/// Body of `GET /sites/{siteId}/availability`.
#[derive(Debug, Clone, Deserialize)]
pub struct AcmeAvailabilityResponse {
    #[serde(default)]
    pub slots: Vec<AcmeSlot>,
}

/// One bookable slot as returned by the Acme API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcmeSlot {
    /// Numeric or string court identifier; absent for site-wide slots.
    #[serde(default)]
    pub court_id: Option<Value>,
    #[serde(default)]
    pub court_name: Option<String>,
    #[serde(default)]
    pub court_number: Option<u32>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl AcmeSlot {
    /// Returns the court id as a string, whatever JSON type it arrived as.
    pub fn court_id(&self) -> Option<String> {
        match self.court_id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// HTTP client for one Acme API root.
#[derive(Debug)]
pub struct AcmeClient {
    http_client: reqwest::Client,
    config: AcmeConfig,
}

impl AcmeClient {
    /// Creates a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the HTTP client cannot be constructed.
    pub fn new(config: AcmeConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {e}")).with_source(e)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &AcmeConfig {
        &self.config
    }

    /// Fetches the slots offered by `site_id` on `date`.
    pub async fn site_availability(
        &self,
        site_id: i64,
        date: NaiveDate,
    ) -> ProviderResult<Vec<AcmeSlot>> {
        let url = self.config.availability_url(site_id)?;

        let mut request = self
            .http_client
            .get(url)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_request_error)?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, site_id, retry_after, &body));
        }

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {e}")).with_source(e)
        })?;

        let parsed: AcmeAvailabilityResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse availability: {e}"))
                .with_source(e)
        })?;

        debug!(
            site_id,
            date = %date,
            slots = parsed.slots.len(),
            "fetched acme availability"
        );
        Ok(parsed.slots)
    }
}

fn map_request_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout("request timed out").with_source(e)
    } else if e.is_connect() {
        ProviderError::network(format!("connection failed: {e}")).with_source(e)
    } else {
        ProviderError::network(format!("request failed: {e}")).with_source(e)
    }
}

/// Maps a non-success HTTP status into a provider error.
fn status_error(
    status: StatusCode,
    site_id: i64,
    retry_after: Option<u64>,
    body: &str,
) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::authentication(format!("API key rejected ({status})"))
        }
        StatusCode::NOT_FOUND => ProviderError::not_found(format!("unknown site {site_id}")),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {s} seconds"))
                .unwrap_or_default()
        )),
        s if s.is_server_error() => ProviderError::server(format!("API error ({status})")),
        _ => {
            let body = body.trim();
            ProviderError::invalid_response(format!("unexpected status ({status}): {body}"))
        }
    }
}
