//! Acme booking provider.

use chrono::{DateTime, Local, NaiveDate, Utc};
use courtside_core::{
    AvailabilitySlot, BoxFuture, FetchAvailabilityParams, ProviderConfig, court_labels,
};
use tracing::{debug, info, warn};

use super::client::{AcmeClient, AcmeSlot};
use super::config::AcmeConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::provider::AvailabilityProvider;
use crate::provider_type::ProviderType;

/// Availability adapter for the Acme booking API.
#[derive(Debug)]
pub struct AcmeBookingProvider {
    client: AcmeClient,
}

impl AcmeBookingProvider {
    /// Creates a provider from already-extracted settings.
    pub fn new(config: AcmeConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: AcmeClient::new(config)?,
        })
    }

    /// Creates a provider bound to a backend provider config row.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the row lacks a usable
    /// `api_base_url`.
    pub fn from_config(config: &ProviderConfig) -> ProviderResult<Self> {
        Self::new(AcmeConfig::from_provider_config(config)?)
    }

    async fn fetch(
        &self,
        params: FetchAvailabilityParams,
    ) -> ProviderResult<Vec<AvailabilitySlot>> {
        let site_id = params.site_id.ok_or_else(|| {
            ProviderError::configuration("site id is required for acme_booking")
        })?;

        let mut dates = params.dates;
        dates.sort_unstable();
        dates.dedup();

        let mut slots = Vec::new();
        for date in dates {
            let raw = self.client.site_availability(site_id, date).await?;
            for api_slot in &raw {
                match self.to_slot(site_id, date, api_slot) {
                    Some(slot) => slots.push(slot),
                    None => warn!(
                        site_id,
                        start = %api_slot.start,
                        end = %api_slot.end,
                        "skipping acme slot that does not end after it starts"
                    ),
                }
            }
        }

        info!(site_id, count = slots.len(), "acme availability fetched");
        Ok(slots)
    }

    fn to_slot(&self, site_id: i64, date: NaiveDate, api: &AcmeSlot) -> Option<AvailabilitySlot> {
        if api.end <= api.start {
            return None;
        }

        let court_id = api.court_id();
        let (court_name, short_name) = court_labels(api.court_name.as_deref(), api.court_number);
        let key = format!(
            "acme-{site_id}-{}-{}",
            court_id.as_deref().unwrap_or("site"),
            api.start.timestamp()
        );

        let facility_id = site_id.to_string();
        let mut slot = AvailabilitySlot::new(key, api.start, api.end, facility_id, court_name)
            .with_short_court_name(short_name);
        if let Some(id) = &court_id {
            slot = slot.with_court_id(id.clone());
        }
        if let Some(number) = api.court_number {
            slot = slot.with_court_number(number);
        }
        if let Some(price) = api.price {
            slot = slot.with_price(price, api.currency.clone());
        }
        if let Some(template) = &self.client.config().booking_url_template {
            slot = slot.with_booking_url(render_booking_url(
                template,
                site_id,
                date,
                court_id.as_deref(),
                api.start,
            ));
        }
        Some(slot)
    }
}

impl AvailabilityProvider for AcmeBookingProvider {
    fn name(&self) -> &str {
        ProviderType::AcmeBooking.as_str()
    }

    fn fetch_availability(
        &self,
        params: FetchAvailabilityParams,
    ) -> BoxFuture<'_, ProviderResult<Vec<AvailabilitySlot>>> {
        debug!(dates = params.dates.len(), site_id = ?params.site_id, "acme fetch requested");
        Box::pin(async move {
            self.fetch(params)
                .await
                .map_err(|e| e.with_provider(ProviderType::AcmeBooking.as_str()))
        })
    }
}

/// Fills the placeholders of a booking deep link.
///
/// `{startTime}` renders as the local wall-clock `HH:MM` of the slot start;
/// an absent court renders as an empty string. Values are percent-encoded.
pub fn render_booking_url(
    template: &str,
    site_id: i64,
    date: NaiveDate,
    court_id: Option<&str>,
    start: DateTime<Utc>,
) -> String {
    let start_time = start.with_timezone(&Local).format("%H:%M").to_string();
    template
        .replace("{siteId}", &site_id.to_string())
        .replace("{date}", &date.format("%Y-%m-%d").to_string())
        .replace("{courtId}", &urlencoding::encode(court_id.unwrap_or_default()))
        .replace("{startTime}", &urlencoding::encode(&start_time))
}
