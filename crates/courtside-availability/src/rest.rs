//! HTTP implementation of [`AvailabilityBackend`] for a PostgREST-style API.
//!
//! Tables are read with `GET /rest/v1/<table>?<filters>` and RPCs are called
//! with `POST /rest/v1/rpc/<function>`. Counts use `Prefer: count=exact`
//! with a `HEAD` request and read the total from `Content-Range`.

use std::time::Duration;

use chrono::NaiveDate;
use courtside_core::BoxFuture;
use reqwest::header::{CONTENT_RANGE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};
use url::Url;

use crate::backend::{AvailabilityBackend, CourtRow, ProviderConfigRow, SlotRow};
use crate::config::BackendSettings;
use crate::error::{BackendError, BackendResult};

pub const PROVIDERS_TABLE: &str = "availability_providers";
pub const COURTS_TABLE: &str = "courts";
pub const COURT_SLOT_TABLE: &str = "court_slot";
pub const ONE_TIME_TABLE: &str = "court_one_time_availability";
pub const SLOTS_BATCH_RPC: &str = "get_available_slots_batch";

const PROVIDER_COLUMNS: &str = "id,provider_type,api_base_url,api_config,booking_url_template,is_active";
const COURT_COLUMNS: &str = "id,name,court_number,availability_status";

/// Backend client for the hosted database's REST interface.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http_client: reqwest::Client,
    rest_url: Url,
    schema: Option<String>,
}

impl RestBackend {
    /// Creates a client from backend settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL is missing or malformed,
    /// the API key reference cannot be resolved, or a header value is
    /// invalid.
    pub fn new(settings: &BackendSettings, timeout: Duration) -> BackendResult<Self> {
        let base = settings.url.trim();
        if base.is_empty() {
            return Err(BackendError::config("backend url is not set"));
        }
        let mut base = Url::parse(base)
            .map_err(|e| BackendError::config(format!("invalid backend url '{base}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let rest_url = base
            .join("rest/v1/")
            .map_err(|e| BackendError::config(format!("invalid backend url: {e}")))?;

        let api_key = settings
            .resolved_api_key()
            .map_err(|e| BackendError::config(e.to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert("apikey", header_value(&key)?);
            headers.insert(
                reqwest::header::AUTHORIZATION,
                header_value(&format!("Bearer {key}"))?,
            );
        }
        if let Some(schema) = &settings.schema {
            headers.insert("accept-profile", header_value(schema)?);
            headers.insert("content-profile", header_value(schema)?);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            rest_url,
            schema: settings.schema.clone(),
        })
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.rest_url
            .join(path)
            .map_err(|e| BackendError::config(format!("invalid endpoint '{path}': {e}")))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let url = self.endpoint(table)?;
        trace!(table, ?query, "backend select");
        let response = self.http_client.get(url).query(query).send().await?;
        decode(response).await
    }

    async fn count(&self, table: &str, query: &[(&str, String)]) -> BackendResult<u64> {
        let url = self.endpoint(table)?;
        let response = self
            .http_client
            .head(url)
            .query(query)
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::status(status.as_u16(), ""));
        }

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| BackendError::status(status.as_u16(), "missing Content-Range total"))?;
        debug!(table, total, "backend count");
        Ok(total)
    }
}

fn header_value(value: &str) -> BackendResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| BackendError::config(format!("invalid header value: {e}")))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(BackendError::status(status.as_u16(), body));
    }
    Ok(serde_json::from_str(&body)?)
}

/// Extracts the total from a `Content-Range` header such as `0-24/3573` or
/// `*/0`. Returns `None` when the total is unknown (`*`) or malformed.
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl AvailabilityBackend for RestBackend {
    fn fetch_active_provider<'a>(
        &'a self,
        provider_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<ProviderConfigRow>>> {
        Box::pin(async move {
            let rows: Vec<ProviderConfigRow> = self
                .select(
                    PROVIDERS_TABLE,
                    &[
                        ("select", PROVIDER_COLUMNS.to_string()),
                        ("id", eq(provider_id)),
                        ("is_active", eq(true)),
                        ("limit", "1".to_string()),
                    ],
                )
                .await?;
            Ok(rows.into_iter().find(|row| row.is_active))
        })
    }

    fn fetch_courts<'a>(
        &'a self,
        facility_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Vec<CourtRow>>> {
        Box::pin(async move {
            self.select(
                COURTS_TABLE,
                &[
                    ("select", COURT_COLUMNS.to_string()),
                    ("facility_id", eq(facility_id)),
                    ("order", "court_number.asc.nullslast".to_string()),
                ],
            )
            .await
        })
    }

    fn fetch_available_slots_batch<'a>(
        &'a self,
        court_ids: &'a [String],
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<Vec<SlotRow>>> {
        Box::pin(async move {
            let url = self.endpoint(&format!("rpc/{SLOTS_BATCH_RPC}"))?;
            let body = json!({
                "p_court_ids": court_ids,
                "p_date_from": date_from.format("%Y-%m-%d").to_string(),
                "p_date_to": date_to.format("%Y-%m-%d").to_string(),
            });
            debug!(
                courts = court_ids.len(),
                from = %date_from,
                to = %date_to,
                "calling {SLOTS_BATCH_RPC}"
            );
            let response = self.http_client.post(url).json(&body).send().await?;
            decode(response).await
        })
    }

    fn count_court_slot_templates<'a>(
        &'a self,
        facility_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<u64>> {
        Box::pin(async move {
            self.count(
                COURT_SLOT_TABLE,
                &[("select", "id".to_string()), ("facility_id", eq(facility_id))],
            )
            .await
        })
    }

    fn count_one_time_availability<'a>(
        &'a self,
        facility_id: &'a str,
        from: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<u64>> {
        Box::pin(async move {
            self.count(
                ONE_TIME_TABLE,
                &[
                    ("select", "id".to_string()),
                    ("facility_id", eq(facility_id)),
                    ("is_available", eq(true)),
                    ("availability_date", format!("gte.{}", from.format("%Y-%m-%d"))),
                ],
            )
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> BackendSettings {
        BackendSettings {
            url: url.to_string(),
            api_key: Some("anon".into()),
            schema: None,
        }
    }

    #[test]
    fn content_range_totals() {
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn endpoints_live_under_rest_v1() {
        let config = settings("https://db.example/base");
        let backend = RestBackend::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(
            backend.endpoint(COURTS_TABLE).unwrap().as_str(),
            "https://db.example/base/rest/v1/courts"
        );
        assert_eq!(
            backend.endpoint(&format!("rpc/{SLOTS_BATCH_RPC}")).unwrap().as_str(),
            "https://db.example/base/rest/v1/rpc/get_available_slots_batch"
        );
    }

    #[test]
    fn missing_url_is_config_error() {
        let err = RestBackend::new(&settings("  "), Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, BackendError::Config { .. }));
    }

    #[test]
    fn unresolved_key_is_config_error() {
        let mut s = settings("https://db.example");
        s.api_key = Some("env::_COURTSIDE_REST_TEST_MISSING".into());
        let err = RestBackend::new(&s, Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("_COURTSIDE_REST_TEST_MISSING"));
    }

    #[test]
    fn schema_is_kept() {
        let mut s = settings("https://db.example");
        s.schema = Some("booking".into());
        let backend = RestBackend::new(&s, Duration::from_secs(5)).unwrap();
        assert_eq!(backend.schema(), Some("booking"));
    }
}
