//! Availability from locally stored schedule templates.
//!
//! Facilities without an external booking system keep their schedule in
//! the hosted database as recurring `court_slot` templates and one-time
//! overrides. The `get_available_slots_batch` RPC expands those into
//! concrete rows; this module fetches them in a single call and reshapes
//! the rows into [`AvailabilitySlot`]s.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use courtside_core::{
    AvailabilityResult, AvailabilitySlot, DateRange, SharedClock, TimedCache, court_labels,
    local_date, local_end_instant, local_instant, parse_wall_time,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{AvailabilityBackend, CourtRow, SlotRow, with_deadline};

/// Outcome of a "does this facility have local templates" check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLookup {
    /// At least one recurring template or future one-time override exists.
    Found,
    /// Neither table has a row for the facility.
    NotFound,
    /// The counts could not be fetched.
    FetchFailed(String),
}

impl TemplateLookup {
    fn from_flag(has_templates: bool) -> Self {
        if has_templates {
            Self::Found
        } else {
            Self::NotFound
        }
    }

    /// Collapses the lookup to a flag; a failed fetch counts as "no templates".
    pub fn has_templates(&self) -> bool {
        matches!(self, Self::Found)
    }
}

/// Why a slot row could not be turned into a slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotRowError {
    #[error("court {0} is not an active court of this facility")]
    UnknownCourt(String),
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    #[error("slot does not end after it starts")]
    EmptyInterval,
}

/// Display identity of a court, resolved once per fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CourtInfo {
    pub name: String,
    pub short_name: String,
    pub number: Option<u32>,
}

impl From<&CourtRow> for CourtInfo {
    fn from(court: &CourtRow) -> Self {
        let (name, short_name) = court_labels(court.name.as_deref(), court.court_number);
        Self {
            name,
            short_name,
            number: court.court_number,
        }
    }
}

/// Fetches slots for facilities scheduled by local templates.
pub struct LocalAvailabilityFetcher {
    backend: Arc<dyn AvailabilityBackend>,
    templates: TimedCache<String, bool>,
    clock: SharedClock,
    request_timeout: Duration,
}

impl std::fmt::Debug for LocalAvailabilityFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAvailabilityFetcher")
            .field("templates", &self.templates)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl LocalAvailabilityFetcher {
    pub fn new(
        backend: Arc<dyn AvailabilityBackend>,
        templates_ttl: Duration,
        clock: SharedClock,
        request_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            templates: TimedCache::new(templates_ttl, Arc::clone(&clock)),
            clock,
            request_timeout,
        }
    }

    /// Returns true if the facility has local templates.
    ///
    /// Fails closed: a failed lookup answers false.
    pub async fn has_local_templates(&self, facility_id: &str) -> bool {
        self.check_local_templates(facility_id).await.has_templates()
    }

    /// Checks for local templates, keeping failure distinct from absence.
    ///
    /// Both answers are cached per facility for the template TTL; failures
    /// are not cached.
    pub async fn check_local_templates(&self, facility_id: &str) -> TemplateLookup {
        if let Some(has_templates) = self.templates.get(facility_id) {
            debug!(facility_id, has_templates, "template flag cache hit");
            return TemplateLookup::from_flag(has_templates);
        }

        let today = local_date(self.clock.now());
        let counts = tokio::try_join!(
            with_deadline(
                self.request_timeout,
                self.backend.count_court_slot_templates(facility_id),
            ),
            with_deadline(
                self.request_timeout,
                self.backend.count_one_time_availability(facility_id, today),
            ),
        );

        match counts {
            Ok((recurring, one_time)) => {
                let has_templates = recurring > 0 || one_time > 0;
                debug!(facility_id, recurring, one_time, "counted local templates");
                self.templates.insert(facility_id.to_string(), has_templates);
                TemplateLookup::from_flag(has_templates)
            }
            Err(e) => {
                warn!(facility_id, error = %e, "failed to check local templates");
                TemplateLookup::FetchFailed(e.to_string())
            }
        }
    }

    /// Fetches slots for `facility_id` over the range covering `dates`.
    ///
    /// A facility with no active courts, or an empty `dates`, yields an
    /// empty success. Backend failures yield a failed result.
    pub async fn fetch_local_availability(
        &self,
        facility_id: &str,
        dates: &[NaiveDate],
    ) -> AvailabilityResult {
        let fetch_courts = self.backend.fetch_courts(facility_id);
        let courts = match with_deadline(self.request_timeout, fetch_courts).await {
            Ok(courts) => courts,
            Err(e) => {
                warn!(facility_id, error = %e, "failed to load courts");
                return AvailabilityResult::failure(format!("Failed to load courts: {e}"));
            }
        };

        let courts: HashMap<String, CourtInfo> = courts
            .iter()
            .filter(|court| court.is_active())
            .map(|court| (court.id.clone(), CourtInfo::from(court)))
            .collect();
        if courts.is_empty() {
            info!(facility_id, "facility has no active courts");
            return AvailabilityResult::empty();
        }

        let Some(range) = DateRange::covering(dates) else {
            debug!(facility_id, "no dates requested");
            return AvailabilityResult::empty();
        };

        let mut court_ids: Vec<String> = courts.keys().cloned().collect();
        court_ids.sort();

        let rows = match with_deadline(
            self.request_timeout,
            self.backend
                .fetch_available_slots_batch(&court_ids, range.from, range.to),
        )
        .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(facility_id, error = %e, "failed to fetch local slots");
                return AvailabilityResult::failure(format!("Failed to fetch available slots: {e}"));
            }
        };

        let mut slots = Vec::with_capacity(rows.len());
        for row in &rows {
            match slot_from_row(facility_id, row, &courts) {
                Ok(slot) => slots.push(slot),
                Err(e) => warn!(
                    facility_id,
                    court_id = %row.court_id,
                    date = %row.slot_date,
                    error = %e,
                    "skipping slot row"
                ),
            }
        }

        info!(
            facility_id,
            courts = court_ids.len(),
            from = %range.from,
            to = %range.to,
            slots = slots.len(),
            "local availability fetched"
        );
        AvailabilityResult::success(slots)
    }

    /// Drops every cached template flag.
    pub fn clear_local_templates_cache(&self) {
        self.templates.clear();
    }
}

/// Maps one RPC row into a local slot.
///
/// `price_cents` converts to major units; a null price stays `None`.
pub fn slot_from_row(
    facility_id: &str,
    row: &SlotRow,
    courts: &HashMap<String, CourtInfo>,
) -> Result<AvailabilitySlot, SlotRowError> {
    let court = courts
        .get(&row.court_id)
        .ok_or_else(|| SlotRowError::UnknownCourt(row.court_id.clone()))?;

    let invalid_start = || SlotRowError::InvalidTime(row.start_time.clone());
    let start_time = parse_wall_time(&row.start_time).ok_or_else(invalid_start)?;
    let start = local_instant(row.slot_date, start_time).ok_or_else(invalid_start)?;
    let end = local_end_instant(row.slot_date, start_time, &row.end_time)
        .ok_or_else(|| SlotRowError::InvalidTime(row.end_time.clone()))?;
    if end <= start {
        return Err(SlotRowError::EmptyInterval);
    }

    let key = format!("{}-{}-{}", row.court_id, row.slot_date, row.start_time);
    let mut slot = AvailabilitySlot::new(key, start, end, facility_id, court.name.clone())
        .with_court_id(row.court_id.clone())
        .with_short_court_name(court.short_name.clone())
        .with_local_source(row.template_source);
    if let Some(number) = court.number {
        slot = slot.with_court_number(number);
    }
    if let Some(cents) = row.price_cents {
        slot = slot.with_price(cents as f64 / 100.0, None);
    }
    Ok(slot)
}
