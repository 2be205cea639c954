//! In-memory test doubles for the backend and providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use courtside_core::{
    AvailabilitySlot, BoxFuture, FetchAvailabilityParams, ManualClock, TemplateSource,
};
use courtside_providers::{
    AvailabilityProvider, ProviderError, ProviderRegistry, ProviderResult, ProviderType,
};

use crate::backend::{AvailabilityBackend, CourtRow, ProviderConfigRow, SlotRow};
use crate::error::{BackendError, BackendResult};

/// A fixed "now": 2025-03-01 08:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(test_now()))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn provider_row(id: &str, provider_type: &str) -> ProviderConfigRow {
    ProviderConfigRow {
        id: id.to_string(),
        provider_type: provider_type.to_string(),
        api_base_url: Some("https://api.acme.test".to_string()),
        api_config: None,
        booking_url_template: None,
        is_active: true,
    }
}

pub fn court_row(id: &str, name: Option<&str>, number: Option<u32>) -> CourtRow {
    CourtRow {
        id: id.to_string(),
        name: name.map(String::from),
        court_number: number,
        availability_status: None,
    }
}

pub fn slot_row(court_id: &str, day: NaiveDate, start: &str, end: &str) -> SlotRow {
    SlotRow {
        court_id: court_id.to_string(),
        slot_date: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        price_cents: None,
        template_source: Some(TemplateSource::Court),
    }
}

/// Arguments of one `fetch_available_slots_batch` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCall {
    pub court_ids: Vec<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

#[derive(Debug, Default)]
struct Calls {
    provider: usize,
    courts: usize,
    batches: Vec<BatchCall>,
    counts: usize,
    one_time_from: Option<NaiveDate>,
}

/// Records every call and answers from canned data.
#[derive(Debug, Default)]
pub struct FakeBackend {
    providers: Vec<ProviderConfigRow>,
    courts: Vec<CourtRow>,
    slots: Vec<SlotRow>,
    court_slot_count: u64,
    one_time_count: u64,
    fail_providers: bool,
    fail_courts: bool,
    fail_batch: bool,
    fail_counts: bool,
    delay: Option<Duration>,
    calls: Mutex<Calls>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, row: ProviderConfigRow) -> Self {
        self.providers.push(row);
        self
    }

    pub fn with_court(mut self, row: CourtRow) -> Self {
        self.courts.push(row);
        self
    }

    pub fn with_slots(mut self, rows: Vec<SlotRow>) -> Self {
        self.slots.extend(rows);
        self
    }

    pub fn with_template_counts(mut self, court_slot: u64, one_time: u64) -> Self {
        self.court_slot_count = court_slot;
        self.one_time_count = one_time;
        self
    }

    pub fn failing_providers(mut self) -> Self {
        self.fail_providers = true;
        self
    }

    pub fn failing_courts(mut self) -> Self {
        self.fail_courts = true;
        self
    }

    pub fn failing_batch(mut self) -> Self {
        self.fail_batch = true;
        self
    }

    pub fn failing_counts(mut self) -> Self {
        self.fail_counts = true;
        self
    }

    /// Makes every call sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn provider_calls(&self) -> usize {
        self.calls.lock().unwrap().provider
    }

    pub fn courts_calls(&self) -> usize {
        self.calls.lock().unwrap().courts
    }

    pub fn batch_calls(&self) -> Vec<BatchCall> {
        self.calls.lock().unwrap().batches.clone()
    }

    pub fn count_calls(&self) -> usize {
        self.calls.lock().unwrap().counts
    }

    pub fn one_time_from(&self) -> Option<NaiveDate> {
        self.calls.lock().unwrap().one_time_from
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn injected(what: &str) -> BackendError {
    BackendError::status(500, format!("injected {what} failure"))
}

impl AvailabilityBackend for FakeBackend {
    fn fetch_active_provider<'a>(
        &'a self,
        provider_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Option<ProviderConfigRow>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().provider += 1;
            self.pause().await;
            if self.fail_providers {
                return Err(injected("provider"));
            }
            Ok(self
                .providers
                .iter()
                .find(|row| row.id == provider_id && row.is_active)
                .cloned())
        })
    }

    fn fetch_courts<'a>(
        &'a self,
        _facility_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<Vec<CourtRow>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().courts += 1;
            self.pause().await;
            if self.fail_courts {
                return Err(injected("courts"));
            }
            Ok(self.courts.clone())
        })
    }

    fn fetch_available_slots_batch<'a>(
        &'a self,
        court_ids: &'a [String],
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<Vec<SlotRow>>> {
        Box::pin(async move {
            self.calls.lock().unwrap().batches.push(BatchCall {
                court_ids: court_ids.to_vec(),
                date_from,
                date_to,
            });
            self.pause().await;
            if self.fail_batch {
                return Err(injected("batch"));
            }
            Ok(self.slots.clone())
        })
    }

    fn count_court_slot_templates<'a>(
        &'a self,
        _facility_id: &'a str,
    ) -> BoxFuture<'a, BackendResult<u64>> {
        Box::pin(async move {
            self.calls.lock().unwrap().counts += 1;
            self.pause().await;
            if self.fail_counts {
                return Err(injected("count"));
            }
            Ok(self.court_slot_count)
        })
    }

    fn count_one_time_availability<'a>(
        &'a self,
        _facility_id: &'a str,
        from: NaiveDate,
    ) -> BoxFuture<'a, BackendResult<u64>> {
        Box::pin(async move {
            {
                let mut calls = self.calls.lock().unwrap();
                calls.counts += 1;
                calls.one_time_from = Some(from);
            }
            self.pause().await;
            if self.fail_counts {
                return Err(injected("count"));
            }
            Ok(self.one_time_count)
        })
    }
}

/// A provider that returns canned slots (or an error) and counts calls.
#[derive(Clone)]
pub struct FakeProvider {
    slots: Vec<AvailabilitySlot>,
    error: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_params: Arc<Mutex<Option<FetchAvailabilityParams>>>,
}

impl FakeProvider {
    pub fn returning(slots: Vec<AvailabilitySlot>) -> Self {
        Self {
            slots,
            error: None,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_params: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing(message: &str) -> Self {
        let mut provider = Self::returning(Vec::new());
        provider.error = Some(message.to_string());
        provider
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<FetchAvailabilityParams> {
        self.last_params.lock().unwrap().clone()
    }

    /// A registry whose `acme_booking` factory hands out clones of `self`.
    pub fn registry(&self) -> ProviderRegistry {
        let provider = self.clone();
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderType::AcmeBooking, move |_| {
            Ok(Box::new(provider.clone()) as Box<dyn AvailabilityProvider>)
        });
        registry
    }
}

impl AvailabilityProvider for FakeProvider {
    fn name(&self) -> &str {
        "acme_booking"
    }

    fn fetch_availability(
        &self,
        params: FetchAvailabilityParams,
    ) -> BoxFuture<'_, ProviderResult<Vec<AvailabilitySlot>>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_params.lock().unwrap() = Some(params);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.error {
                Some(message) => Err(ProviderError::server(message.clone())),
                None => Ok(self.slots.clone()),
            }
        })
    }
}

/// An external (non-local) slot for site 42.
pub fn external_slot(key: &str, start: DateTime<Utc>) -> AvailabilitySlot {
    AvailabilitySlot::new(
        key,
        start,
        start + chrono::Duration::hours(1),
        "42",
        "Court 1",
    )
}
