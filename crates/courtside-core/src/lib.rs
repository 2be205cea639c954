//! Core types: availability slots, provider config, time helpers, TTL cache

pub mod cache;
pub mod provider_config;
pub mod slot;
pub mod time;
pub mod tracing;
pub mod upcoming;

use std::future::Future;
use std::pin::Pin;

pub use cache::{Clock, ManualClock, SharedClock, SystemClock, TimedCache};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use provider_config::ProviderConfig;
pub use slot::{
    AvailabilityResult, AvailabilitySlot, FetchAvailabilityParams, TemplateSource, court_labels,
};
pub use time::{
    DateRange, local_date, local_end_instant, local_instant, parse_wall_time, today_and_tomorrow,
};
pub use upcoming::{
    DEFAULT_NEXT_SLOT_COUNT, filter_future_slots, filter_future_slots_now, next_slots,
    next_slots_now,
};

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
