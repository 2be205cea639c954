//! One entry point for "what is bookable at this facility".

use std::sync::Arc;

use courtside_core::{AvailabilityResult, FetchAvailabilityParams, SharedClock, SystemClock};
use courtside_providers::ProviderRegistry;
use tracing::{debug, info};

use crate::backend::AvailabilityBackend;
use crate::config::ServiceConfig;
use crate::error::BackendResult;
use crate::local::LocalAvailabilityFetcher;
use crate::provider_cache::ProviderConfigCache;
use crate::rest::RestBackend;
use crate::service::AvailabilityService;

/// Error message when a facility has neither templates nor a provider.
pub const NO_SOURCE_CONFIGURED: &str = "No availability source configured for facility";

/// Where a resolved result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilitySource {
    LocalTemplates,
    Provider,
    Unconfigured,
}

/// Routes a facility to local templates or its external provider.
///
/// Local templates win when present; otherwise the facility's provider is
/// used; with neither, the result is a failure.
#[derive(Debug)]
pub struct AvailabilityResolver {
    local: LocalAvailabilityFetcher,
    service: AvailabilityService,
}

impl AvailabilityResolver {
    pub fn new(local: LocalAvailabilityFetcher, service: AvailabilityService) -> Self {
        Self { local, service }
    }

    /// Wires both caches, the fetcher and the orchestrator to one backend.
    pub fn with_backend(
        backend: Arc<dyn AvailabilityBackend>,
        registry: ProviderRegistry,
        clock: SharedClock,
        config: &ServiceConfig,
    ) -> Self {
        let timeout = config.request_timeout();
        let local = LocalAvailabilityFetcher::new(
            Arc::clone(&backend),
            config.cache.templates_ttl(),
            Arc::clone(&clock),
            timeout,
        );
        let configs = ProviderConfigCache::new(
            backend,
            config.cache.provider_ttl(),
            Arc::clone(&clock),
            timeout,
        );
        let service = AvailabilityService::new(configs, registry, clock, timeout);
        Self::new(local, service)
    }

    /// Builds a resolver talking to the configured REST backend with every
    /// built-in provider registered.
    ///
    /// # Errors
    ///
    /// Returns a backend configuration error if the REST client cannot be
    /// built from `config.backend`.
    pub fn from_config(config: &ServiceConfig) -> BackendResult<Self> {
        let backend = RestBackend::new(&config.backend, config.request_timeout())?;
        Ok(Self::with_backend(
            Arc::new(backend),
            ProviderRegistry::with_defaults(),
            Arc::new(SystemClock),
            config,
        ))
    }

    pub fn local(&self) -> &LocalAvailabilityFetcher {
        &self.local
    }

    pub fn service(&self) -> &AvailabilityService {
        &self.service
    }

    /// Picks the source for `facility_id` without fetching slots.
    pub async fn source_for(
        &self,
        facility_id: &str,
        provider_id: Option<&str>,
    ) -> AvailabilitySource {
        if self.local.has_local_templates(facility_id).await {
            AvailabilitySource::LocalTemplates
        } else if provider_id.is_some_and(|id| !id.trim().is_empty()) {
            AvailabilitySource::Provider
        } else {
            AvailabilitySource::Unconfigured
        }
    }

    /// Resolves availability for a facility from whichever source it uses.
    pub async fn resolve_availability(
        &self,
        facility_id: &str,
        provider_id: Option<&str>,
        params: FetchAvailabilityParams,
    ) -> AvailabilityResult {
        let source = self.source_for(facility_id, provider_id).await;
        debug!(facility_id, ?source, "resolved availability source");

        match (source, provider_id) {
            (AvailabilitySource::LocalTemplates, _) => {
                self.local
                    .fetch_local_availability(facility_id, &params.dates)
                    .await
            }
            (AvailabilitySource::Provider, Some(provider_id)) => {
                self.service.fetch_availability(provider_id.trim(), params).await
            }
            _ => {
                info!(facility_id, "no availability source configured");
                AvailabilityResult::failure(NO_SOURCE_CONFIGURED)
            }
        }
    }

    /// Drops both caches.
    pub fn clear_caches(&self) {
        self.service.clear_provider_cache();
        self.local.clear_local_templates_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeBackend, FakeProvider, court_row, date, external_slot, provider_row, slot_row,
        test_clock, test_now,
    };

    fn resolver(backend: &Arc<FakeBackend>, provider: &FakeProvider) -> AvailabilityResolver {
        AvailabilityResolver::with_backend(
            backend.clone(),
            provider.registry(),
            test_clock(),
            &ServiceConfig::default(),
        )
    }

    fn params() -> FetchAvailabilityParams {
        FetchAvailabilityParams::new(vec![date(2025, 3, 1)]).with_site_id(Some(42))
    }

    #[tokio::test]
    async fn falls_back_to_provider_without_templates() {
        let backend =
            Arc::new(FakeBackend::new().with_provider(provider_row("p1", "acme_booking")));
        let provider = FakeProvider::returning(vec![
            external_slot("a", test_now()),
            external_slot("b", test_now() + chrono::Duration::hours(2)),
        ]);
        let result = resolver(&backend, &provider)
            .resolve_availability("f1", Some("p1"), params())
            .await;

        assert!(result.success);
        assert_eq!(result.total_count, Some(2));
        for slot in &result.slots {
            assert!(!slot.is_local_slot && slot.template_source.is_none());
        }
        assert_eq!(provider.last_params().unwrap().site_id, Some(42));
        assert!(backend.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn prefers_local_templates() {
        let day = date(2025, 3, 1);
        let backend = Arc::new(
            FakeBackend::new()
                .with_template_counts(3, 0)
                .with_court(court_row("c1", None, Some(1)))
                .with_slots(vec![slot_row("c1", day, "18:00", "19:00")])
                .with_provider(provider_row("p1", "acme_booking")),
        );
        let provider = FakeProvider::returning(vec![external_slot("x", test_now())]);
        let result = resolver(&backend, &provider)
            .resolve_availability("f1", Some("p1"), params())
            .await;

        assert!(result.success);
        assert_eq!(result.slots.len(), 1);
        assert!(result.slots[0].is_local_slot);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn template_failure_falls_back_to_provider() {
        let backend = Arc::new(
            FakeBackend::new()
                .failing_counts()
                .with_provider(provider_row("p1", "acme_booking")),
        );
        let provider = FakeProvider::returning(vec![external_slot("a", test_now())]);
        let resolver = resolver(&backend, &provider);

        assert_eq!(
            resolver.source_for("f1", Some("p1")).await,
            AvailabilitySource::Provider
        );
        let result = resolver.resolve_availability("f1", Some("p1"), params()).await;
        assert!(result.success);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn nothing_configured_is_failure() {
        let backend = Arc::new(FakeBackend::new());
        let provider = FakeProvider::returning(Vec::new());
        let resolver = resolver(&backend, &provider);

        for provider_id in [None, Some(""), Some("  ")] {
            let result = resolver.resolve_availability("f1", provider_id, params()).await;
            assert!(!result.success);
            assert_eq!(result.error.as_deref(), Some(NO_SOURCE_CONFIGURED));
        }
    }

    #[tokio::test]
    async fn clear_caches_clears_both() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_template_counts(0, 0)
                .with_provider(provider_row("p1", "acme_booking")),
        );
        let provider = FakeProvider::returning(Vec::new());
        let resolver = resolver(&backend, &provider);

        resolver.resolve_availability("f1", Some("p1"), params()).await;
        resolver.clear_caches();
        resolver.resolve_availability("f1", Some("p1"), params()).await;

        assert_eq!(backend.count_calls(), 4);
        assert_eq!(backend.provider_calls(), 2);
    }

    #[test]
    fn from_config_requires_backend_url() {
        assert!(AvailabilityResolver::from_config(&ServiceConfig::default()).is_err());

        let mut config = ServiceConfig::default();
        config.backend.url = "https://db.example".into();
        config.request_timeout_secs = 5;
        let resolver = AvailabilityResolver::from_config(&config).unwrap();
        #[cfg(feature = "acme")]
        assert!(resolver.service().registry().is_provider_registered("acme_booking"));
        assert!(!resolver.service().registry().is_provider_registered("legacy_api"));
    }
}
