//! Slot types for facility availability.
//!
//! This module provides the provider-agnostic data model shared by every
//! resolution path:
//! - [`AvailabilitySlot`]: a single bookable interval for one court
//! - [`TemplateSource`]: which local template tier produced a slot
//! - [`AvailabilityResult`]: the uniform envelope returned by every fetch
//! - [`FetchAvailabilityParams`]: what a provider is asked for

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The local template tier that produced a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateSource {
    /// A court-level recurring rule.
    Court,
    /// A facility-level default rule.
    Facility,
    /// A one-off override for a specific date.
    OneTime,
}

impl TemplateSource {
    /// Returns the wire name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Court => "court",
            Self::Facility => "facility",
            Self::OneTime => "one_time",
        }
    }
}

impl std::fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Returns `(display name, short name)` for a court.
///
/// An explicit non-blank name wins; otherwise the number is used
/// (`"Court 3"` / `"C3"`); with neither, both fall back to `"Court"`.
pub fn court_labels(name: Option<&str>, number: Option<u32>) -> (String, String) {
    let name = name.map(str::trim).filter(|n| !n.is_empty());
    match (name, number) {
        (Some(name), Some(n)) => (name.to_string(), format!("C{n}")),
        (Some(name), None) => (name.to_string(), name.to_string()),
        (None, Some(n)) => (format!("Court {n}"), format!("C{n}")),
        (None, None) => ("Court".to_string(), "Court".to_string()),
    }
}

/// A normalized, provider-agnostic unit of bookable time.
///
/// Slots are produced either by the local template path or by an external
/// provider adapter, never by both. Local slots carry `is_local_slot = true`
/// and a [`TemplateSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    /// Stable identifier for this slot.
    pub key: String,
    /// Start instant.
    pub datetime: DateTime<Utc>,
    /// End instant.
    pub end_date_time: DateTime<Utc>,
    /// Court identifier, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_id: Option<String>,
    /// Facility identifier (local id or external site id).
    pub facility_id: String,
    /// Display name of the court.
    pub court_name: String,
    /// Short display name of the court.
    pub short_court_name: String,
    /// Court number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_number: Option<u32>,
    /// Price in major currency units. `None` means free or unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// ISO currency code for `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// True for slots sourced from local templates.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_local_slot: bool,
    /// Template tier for local slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_source: Option<TemplateSource>,
    /// Human-facing booking link, when the provider has a template for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
}

impl AvailabilitySlot {
    /// Creates a new slot with the required fields.
    ///
    /// The short court name defaults to the court name.
    pub fn new(
        key: impl Into<String>,
        datetime: DateTime<Utc>,
        end_date_time: DateTime<Utc>,
        facility_id: impl Into<String>,
        court_name: impl Into<String>,
    ) -> Self {
        let court_name = court_name.into();
        Self {
            key: key.into(),
            datetime,
            end_date_time,
            court_id: None,
            facility_id: facility_id.into(),
            short_court_name: court_name.clone(),
            court_name,
            court_number: None,
            price: None,
            currency: None,
            is_local_slot: false,
            template_source: None,
            booking_url: None,
        }
    }

    /// Builder method to set the court id.
    pub fn with_court_id(mut self, court_id: impl Into<String>) -> Self {
        self.court_id = Some(court_id.into());
        self
    }

    /// Builder method to set the court number.
    pub fn with_court_number(mut self, number: u32) -> Self {
        self.court_number = Some(number);
        self
    }

    /// Builder method to set the short court name.
    pub fn with_short_court_name(mut self, name: impl Into<String>) -> Self {
        self.short_court_name = name.into();
        self
    }

    /// Builder method to set the price in major units.
    pub fn with_price(mut self, price: f64, currency: Option<String>) -> Self {
        self.price = Some(price);
        self.currency = currency;
        self
    }

    /// Marks this slot as produced by a local template tier.
    pub fn with_local_source(mut self, source: Option<TemplateSource>) -> Self {
        self.is_local_slot = true;
        self.template_source = source;
        self
    }

    /// Builder method to set the booking link.
    pub fn with_booking_url(mut self, url: impl Into<String>) -> Self {
        self.booking_url = Some(url.into());
        self
    }

    /// Returns true if the slot starts before it ends.
    pub fn is_well_formed(&self) -> bool {
        self.datetime < self.end_date_time
    }

    /// Returns true if the slot starts strictly after `now`.
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.datetime > now
    }

    /// Returns the slot length.
    pub fn duration(&self) -> chrono::Duration {
        self.end_date_time - self.datetime
    }
}

/// Parameters handed to an availability provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchAvailabilityParams {
    /// Calendar dates to fetch.
    pub dates: Vec<NaiveDate>,
    /// External numeric site identifier, if the provider needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
}

impl FetchAvailabilityParams {
    /// Creates parameters for the given dates.
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            site_id: None,
        }
    }

    /// Builder method to set the external site id.
    pub fn with_site_id(mut self, site_id: Option<i64>) -> Self {
        self.site_id = site_id;
        self
    }
}

/// The uniform envelope returned by every availability resolution path.
///
/// Callers must branch on `success`, not on `slots.is_empty()`: a failed
/// fetch and a facility with nothing bookable both carry an empty slot list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    /// Resolved slots. Not guaranteed to be sorted.
    pub slots: Vec<AvailabilitySlot>,
    /// Whether resolution succeeded.
    pub success: bool,
    /// Human-readable failure message, present iff `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of slots when the whole result set fits in one response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<usize>,
}

impl AvailabilityResult {
    /// A successful result carrying `slots` and their count.
    pub fn success(slots: Vec<AvailabilitySlot>) -> Self {
        let total_count = Some(slots.len());
        Self {
            slots,
            success: true,
            error: None,
            total_count,
        }
    }

    /// A successful result with nothing available.
    pub fn empty() -> Self {
        Self {
            slots: Vec::new(),
            success: true,
            error: None,
            total_count: None,
        }
    }

    /// A failed result with the given message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            slots: Vec::new(),
            success: false,
            error: Some(message.into()),
            total_count: None,
        }
    }

    /// Returns true for a successful result with no slots.
    pub fn is_empty_success(&self) -> bool {
        self.success && self.slots.is_empty()
    }
}
