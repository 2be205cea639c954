//! The hosted-database interface the availability service depends on.
//!
//! The service never talks to tables directly; it goes through
//! [`AvailabilityBackend`], which [`RestBackend`](crate::RestBackend)
//! implements over HTTP and tests replace with an in-memory fake.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use courtside_core::{BoxFuture, ProviderConfig, TemplateSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BackendError, BackendResult};

/// Court status value that marks a court as bookable.
pub const COURT_STATUS_AVAILABLE: &str = "available";

/// Typed access to the tables and RPCs behind availability.
pub trait AvailabilityBackend: Send + Sync {
    /// Looks up an active provider config by id. Inactive or missing rows
    /// yield `Ok(None)`.
    fn fetch_active_provider<'a>(
        &'a self,
        provider_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<ProviderConfigRow>>>;

    /// Loads every court of a facility, active or not.
    fn fetch_courts<'a>(
        &'a self,
        facility_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Vec<CourtRow>>>;

    /// Runs `get_available_slots_batch` over `court_ids` for the inclusive
    /// range `[date_from, date_to]`.
    fn fetch_available_slots_batch<'a>(
        &'a self,
        court_ids: &'a [String],
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<Vec<SlotRow>>>;

    /// Counts recurring `court_slot` templates for a facility.
    fn count_court_slot_templates<'a>(&'a self, facility_id: &'a str)
    -> BoxFuture<'a, BackendResult<u64>>;

    /// Counts available `court_one_time_availability` rows for a facility
    /// dated on or after `from`.
    fn count_one_time_availability<'a>(
        &'a self,
        facility_id: &'a str,
        from: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<u64>>;
}

/// A provider config row as stored in the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfigRow {
    pub id: String,
    pub provider_type: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub api_config: Option<Value>,
    #[serde(default)]
    pub booking_url_template: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<ProviderConfigRow> for ProviderConfig {
    fn from(row: ProviderConfigRow) -> Self {
        let api_config = match row.api_config {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        ProviderConfig {
            id: row.id,
            provider_type: row.provider_type,
            api_base_url: row.api_base_url,
            api_config,
            booking_url_template: row.booking_url_template,
        }
    }
}

/// A court row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub court_number: Option<u32>,
    #[serde(default)]
    pub availability_status: Option<String>,
}

impl CourtRow {
    /// A court is active when it has no status or is explicitly available.
    pub fn is_active(&self) -> bool {
        self.availability_status
            .as_deref()
            .is_none_or(|status| status == COURT_STATUS_AVAILABLE)
    }
}

/// One row returned by `get_available_slots_batch`.
///
/// Times are local wall-clock strings (`HH:MM` or `HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRow {
    pub court_id: String,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub template_source: Option<TemplateSource>,
}

/// Runs `call` under `deadline`, mapping expiry to [`BackendError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> BackendResult<T>
where
    F: Future<Output = BackendResult<T>>,
{
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| BackendError::Timeout(deadline))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn court(status: Option<&str>) -> CourtRow {
        CourtRow {
            id: "c1".into(),
            name: None,
            court_number: Some(1),
            availability_status: status.map(String::from),
        }
    }

    #[test]
    fn court_activity() {
        assert!(court(None).is_active());
        assert!(court(Some("available")).is_active());
        assert!(!court(Some("maintenance")).is_active());
        assert!(!court(Some("closed")).is_active());
    }

    #[test]
    fn provider_row_into_config() {
        let row: ProviderConfigRow = serde_json::from_value(json!({
            "id": "p1",
            "provider_type": "acme_booking",
            "api_base_url": "https://api.acme.test",
            "api_config": {"api_key": "k", "timeout_secs": 5}
        }))
        .unwrap();
        assert!(row.is_active);

        let config = ProviderConfig::from(row);
        assert_eq!(config.provider_type, "acme_booking");
        assert_eq!(config.setting_str("api_key"), Some("k"));
        assert_eq!(config.setting_u64("timeout_secs"), Some(5));
    }

    #[test]
    fn non_object_api_config_is_empty() {
        let row = ProviderConfigRow {
            id: "p1".into(),
            provider_type: "acme_booking".into(),
            api_base_url: None,
            api_config: Some(json!("not an object")),
            booking_url_template: None,
            is_active: true,
        };
        assert!(ProviderConfig::from(row).api_config.is_empty());
    }

    #[test]
    fn slot_row_decodes() {
        let row: SlotRow = serde_json::from_value(json!({
            "court_id": "c1",
            "slot_date": "2025-03-01",
            "start_time": "09:00:00",
            "end_time": "10:00:00",
            "price_cents": null,
            "template_source": "one_time"
        }))
        .unwrap();
        assert_eq!(row.price_cents, None);
        assert_eq!(row.template_source, Some(TemplateSource::OneTime));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expiry_is_timeout() {
        let result: BackendResult<()> = with_deadline(Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(BackendError::Timeout(d)) if d == Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn deadline_passes_result_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
