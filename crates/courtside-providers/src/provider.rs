//! AvailabilityProvider trait definition.
//!
//! A provider adapter translates [`FetchAvailabilityParams`] into whatever
//! calling convention an upstream booking system requires, and maps its
//! responses into [`AvailabilitySlot`]s. Everything provider-specific stays
//! behind this trait.

use courtside_core::{AvailabilitySlot, BoxFuture, FetchAvailabilityParams};

use crate::error::ProviderResult;

/// The capability every availability adapter implements.
///
/// Implementations are constructed per [`ProviderConfig`](courtside_core::ProviderConfig)
/// by a registry factory and must be `Send + Sync` so the service can await
/// them from any task.
///
/// # Example Implementation
///
/// ```ignore
/// struct FixedProvider(Vec<AvailabilitySlot>);
///
/// impl AvailabilityProvider for FixedProvider {
///     fn name(&self) -> &str { "fixed" }
///
///     fn fetch_availability(
///         &self,
///         _params: FetchAvailabilityParams,
///     ) -> BoxFuture<'_, ProviderResult<Vec<AvailabilitySlot>>> {
///         let slots = self.0.clone();
///         Box::pin(async move { Ok(slots) })
///     }
/// }
/// ```
pub trait AvailabilityProvider: Send + Sync {
    /// Returns the provider type this adapter serves (e.g. "acme_booking").
    fn name(&self) -> &str;

    /// Fetches bookable slots for the requested dates.
    ///
    /// Slots returned here are external: `is_local_slot` stays false and
    /// `template_source` stays empty.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, rejected credentials,
    /// malformed upstream responses, or missing required parameters.
    fn fetch_availability(
        &self,
        params: FetchAvailabilityParams,
    ) -> BoxFuture<'_, ProviderResult<Vec<AvailabilitySlot>>>;
}
