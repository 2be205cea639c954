//! The availability orchestrator for externally hosted facilities.
//!
//! [`AvailabilityService::fetch_availability`] resolves a provider id to its
//! config, picks the adapter for the config's provider type, and calls it
//! under a deadline. Every failure ends up in the result envelope; nothing
//! is returned as `Err`.

use std::time::Duration;

use courtside_core::{
    AvailabilityResult, FetchAvailabilityParams, SharedClock, today_and_tomorrow,
};
use courtside_providers::{ProviderError, ProviderRegistry};
use tracing::{debug, info, warn};

use crate::provider_cache::ProviderConfigCache;

/// Error message for a provider id with no active config.
pub const PROVIDER_NOT_FOUND: &str = "Provider configuration not found";

/// Fetches availability from external booking systems.
#[derive(Debug)]
pub struct AvailabilityService {
    configs: ProviderConfigCache,
    registry: ProviderRegistry,
    clock: SharedClock,
    request_timeout: Duration,
}

impl AvailabilityService {
    pub fn new(
        configs: ProviderConfigCache,
        registry: ProviderRegistry,
        clock: SharedClock,
        request_timeout: Duration,
    ) -> Self {
        Self {
            configs,
            registry,
            clock,
            request_timeout,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn provider_configs(&self) -> &ProviderConfigCache {
        &self.configs
    }

    /// Fetches availability through the provider identified by `provider_id`.
    ///
    /// Steps, in order: resolve the config (cached), check the provider type
    /// is registered, build the adapter, call it under the request deadline.
    /// The adapter is never invoked for a missing config or an unsupported
    /// type.
    pub async fn fetch_availability(
        &self,
        provider_id: &str,
        params: FetchAvailabilityParams,
    ) -> AvailabilityResult {
        let Some(config) = self.configs.fetch_provider_config(provider_id).await else {
            warn!(provider_id, "provider configuration not found");
            return AvailabilityResult::failure(PROVIDER_NOT_FOUND);
        };

        if !self.registry.is_provider_registered(&config.provider_type) {
            let err = ProviderError::unsupported(&config.provider_type);
            warn!(provider_id, provider_type = %config.provider_type, "unsupported provider type");
            return AvailabilityResult::failure(err.message());
        }

        let provider = match self.registry.get_provider(&config) {
            Ok(provider) => provider,
            Err(e) => {
                warn!(provider_id, error = %e, "failed to build provider");
                return AvailabilityResult::failure(e.to_string());
            }
        };

        debug!(
            provider_id,
            provider = provider.name(),
            dates = params.dates.len(),
            site_id = ?params.site_id,
            "fetching provider availability"
        );
        let fetch = provider.fetch_availability(params);
        let outcome = tokio::time::timeout(self.request_timeout, fetch)
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::timeout(format!(
                    "no response within {}s",
                    self.request_timeout.as_secs_f64()
                ))
                .with_provider(provider.name()))
            });

        match outcome {
            Ok(slots) => {
                info!(provider_id, count = slots.len(), "provider availability fetched");
                AvailabilityResult::success(slots)
            }
            Err(e) => {
                warn!(provider_id, error = %e, "provider availability failed");
                AvailabilityResult::failure(e.to_string())
            }
        }
    }

    /// Fetches today's availability (and tomorrow's, if asked) for a
    /// facility's external site.
    ///
    /// `facility_external_id` is the facility's numeric id in the external
    /// system; a missing or non-numeric id leaves the site unset.
    pub async fn fetch_today_availability(
        &self,
        provider_id: &str,
        facility_external_id: Option<&str>,
        include_tomorrow: bool,
    ) -> AvailabilityResult {
        let dates = today_and_tomorrow(self.clock.now(), include_tomorrow);
        let site_id = facility_external_id.and_then(|id| id.trim().parse::<i64>().ok());
        let params = FetchAvailabilityParams::new(dates).with_site_id(site_id);
        self.fetch_availability(provider_id, params).await
    }

    /// Drops every cached provider config.
    pub fn clear_provider_cache(&self) {
        self.configs.clear();
    }
}
