//! Availability service for courtside facilities.
//!
//! This crate answers "when is this court bookable?" from either of the two
//! places a facility's schedule can live:
//!
//! - [`LocalAvailabilityFetcher`] - slots expanded from templates stored in
//!   the hosted database
//! - [`AvailabilityService`] - slots fetched from an external booking system
//!   through a [`courtside_providers::AvailabilityProvider`]
//! - [`AvailabilityResolver`] - picks between the two per facility
//!
//! Both paths read the hosted database through [`AvailabilityBackend`];
//! [`RestBackend`] is the production implementation.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │ AvailabilityResolver │
//!                 └─────┬──────────┬─────┘
//!        has templates? │          │ provider id
//!                       ▼          ▼
//! ┌──────────────────────────┐  ┌─────────────────────┐
//! │ LocalAvailabilityFetcher │  │ AvailabilityService │
//! │  (template flag cache)   │  │ ProviderConfigCache │
//! └────────────┬─────────────┘  └──────┬─────────┬────┘
//!              │                       │         │ ProviderRegistry
//!              ▼                       ▼         ▼
//!        ┌──────────────────────────────┐   external API
//!        │ AvailabilityBackend (REST)   │
//!        └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use courtside_availability::{AvailabilityResolver, ServiceConfig};
//!
//! let resolver = AvailabilityResolver::from_config(&ServiceConfig::load()?)?;
//! let result = resolver
//!     .resolve_availability("facility-1", Some("provider-1"), params)
//!     .await;
//! if !result.success {
//!     eprintln!("{}", result.error.unwrap_or_default());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod local;
pub mod provider_cache;
pub mod resolver;
pub mod rest;
pub mod service;

#[cfg(test)]
mod testing;

pub use backend::{AvailabilityBackend, CourtRow, ProviderConfigRow, SlotRow, with_deadline};
pub use config::{BackendSettings, CacheSettings, ServiceConfig, resolve_secret};
pub use error::{BackendError, BackendResult, ConfigError};
pub use local::{CourtInfo, LocalAvailabilityFetcher, SlotRowError, TemplateLookup, slot_from_row};
pub use provider_cache::{ConfigLookup, ProviderConfigCache};
pub use resolver::{AvailabilityResolver, AvailabilitySource, NO_SOURCE_CONFIGURED};
pub use rest::{RestBackend, parse_content_range_total};
pub use service::{AvailabilityService, PROVIDER_NOT_FOUND};
