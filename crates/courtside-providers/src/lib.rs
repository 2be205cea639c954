//! AvailabilityProvider trait, registry and booking-system adapters.
//!
//! This crate is the seam between the availability service and external
//! booking systems:
//!
//! - [`AvailabilityProvider`] - The trait every adapter implements
//! - [`ProviderRegistry`] - Maps a provider type string to an adapter factory
//! - [`ProviderType`] - The closed set of provider types this build knows
//! - [`ProviderError`] - Error types for provider operations
//!
//! # Architecture
//!
//! ```text
//!   ProviderConfig (from backend)
//!            │
//!            ▼
//!   ┌──────────────────┐   unknown type
//!   │ ProviderRegistry │ ───────────────▶ ProviderError::unsupported
//!   └────────┬─────────┘
//!            │ get_provider()
//!            ▼
//!   ┌──────────────────────┐
//!   │ AcmeBookingProvider  │  (dyn AvailabilityProvider)
//!   └────────┬─────────────┘
//!            │ fetch_availability()
//!            ▼
//!     Vec<AvailabilitySlot>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use courtside_providers::ProviderRegistry;
//!
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.get_provider(&config)?;
//! let slots = provider.fetch_availability(params).await?;
//! ```

#[cfg(feature = "acme")]
pub mod acme;
pub mod error;
pub mod provider;
pub mod provider_type;
pub mod registry;

// Re-export main types at crate root
pub use courtside_core::BoxFuture;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::AvailabilityProvider;
pub use provider_type::ProviderType;
pub use registry::{ProviderFactory, ProviderRegistry};
