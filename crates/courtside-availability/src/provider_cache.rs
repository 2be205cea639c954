//! Cached lookup of provider configs.

use std::sync::Arc;
use std::time::Duration;

use courtside_core::{ProviderConfig, SharedClock, TimedCache};
use tracing::{debug, warn};

use crate::backend::{AvailabilityBackend, with_deadline};

/// Outcome of a provider config lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLookup {
    /// An active config, from the cache or freshly fetched.
    Found(Arc<ProviderConfig>),
    /// No such provider, or it is inactive.
    NotFound,
    /// The backend call failed or timed out.
    FetchFailed(String),
}

impl ConfigLookup {
    /// Collapses the lookup to the config, treating failure as absence.
    pub fn into_config(self) -> Option<Arc<ProviderConfig>> {
        match self {
            Self::Found(config) => Some(config),
            Self::NotFound | Self::FetchFailed(_) => None,
        }
    }
}

/// Provider configs keyed by provider id, valid for a fixed TTL.
///
/// Only found configs are cached. A missing or inactive provider is looked
/// up again on the next call, so enabling a provider takes effect
/// immediately.
pub struct ProviderConfigCache {
    backend: Arc<dyn AvailabilityBackend>,
    cache: TimedCache<String, Arc<ProviderConfig>>,
    request_timeout: Duration,
}

impl std::fmt::Debug for ProviderConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfigCache")
            .field("cache", &self.cache)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ProviderConfigCache {
    pub fn new(
        backend: Arc<dyn AvailabilityBackend>,
        ttl: Duration,
        clock: SharedClock,
        request_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            cache: TimedCache::new(ttl, clock),
            request_timeout,
        }
    }

    /// Returns the active config for `provider_id`, or `None` if it is
    /// missing, inactive, or could not be fetched.
    pub async fn fetch_provider_config(&self, provider_id: &str) -> Option<Arc<ProviderConfig>> {
        self.lookup_provider_config(provider_id).await.into_config()
    }

    /// Looks up the config for `provider_id`, keeping failure distinct from
    /// absence.
    pub async fn lookup_provider_config(&self, provider_id: &str) -> ConfigLookup {
        if let Some(config) = self.cache.get(provider_id) {
            debug!(provider_id, "provider config cache hit");
            return ConfigLookup::Found(config);
        }

        debug!(provider_id, "provider config cache miss");
        let fetched = with_deadline(
            self.request_timeout,
            self.backend.fetch_active_provider(provider_id),
        )
        .await;

        match fetched {
            Ok(Some(row)) => {
                let config = Arc::new(ProviderConfig::from(row));
                self.cache.insert(provider_id.to_string(), Arc::clone(&config));
                ConfigLookup::Found(config)
            }
            Ok(None) => {
                debug!(provider_id, "no active provider config");
                ConfigLookup::NotFound
            }
            Err(e) => {
                warn!(provider_id, error = %e, "failed to fetch provider config");
                ConfigLookup::FetchFailed(e.to_string())
            }
        }
    }

    /// Drops every cached config.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
