//! Acme booking provider implementation.
//!
//! [`AcmeBookingProvider`] fetches bookable slots from a facility hosted on
//! the Acme booking REST API, one request per requested date.
//!
//! # Configuration
//!
//! The adapter is built from a [`ProviderConfig`](courtside_core::ProviderConfig)
//! row:
//!
//! - `api_base_url` (required): root of the Acme API, e.g. `https://api.acme.test/v2`
//! - `api_config.api_key`: bearer token sent with every request
//! - `api_config.timeout_secs`: per-request HTTP timeout (default 30)
//! - `booking_url_template`: deep link with `{siteId}`, `{date}`,
//!   `{courtId}` and `{startTime}` placeholders
//!
//! # Example
//!
//! ```ignore
//! use courtside_core::{FetchAvailabilityParams, ProviderConfig};
//! use courtside_providers::acme::AcmeBookingProvider;
//!
//! let config = ProviderConfig::new("cfg-1", "acme_booking")
//!     .with_api_base_url("https://api.acme.test/v2")
//!     .with_api_setting("api_key", "secret");
//!
//! let provider = AcmeBookingProvider::from_config(&config)?;
//! let slots = provider
//!     .fetch_availability(FetchAvailabilityParams::new(dates).with_site_id(Some(42)))
//!     .await?;
//! ```

mod client;
mod config;
mod provider;

pub use client::{AcmeAvailabilityResponse, AcmeClient, AcmeSlot};
pub use config::{AcmeConfig, DEFAULT_TIMEOUT_SECS};
pub use provider::{AcmeBookingProvider, render_booking_url};
