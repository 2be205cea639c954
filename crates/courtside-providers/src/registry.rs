//! Provider registry: maps provider types to adapter factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use courtside_core::ProviderConfig;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::AvailabilityProvider;
use crate::provider_type::ProviderType;

/// Builds an adapter bound to one provider config.
pub type ProviderFactory =
    Arc<dyn Fn(&ProviderConfig) -> ProviderResult<Box<dyn AvailabilityProvider>> + Send + Sync>;

/// The table of adapters available at runtime.
///
/// Built once at startup with [`ProviderRegistry::with_defaults`]; tests and
/// embedders can [`register`](ProviderRegistry::register) their own factory
/// for a type, replacing the built-in one.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderType, ProviderFactory>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every adapter compiled into this build.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "acme")]
        registry.register(ProviderType::AcmeBooking, |config| {
            let provider = crate::acme::AcmeBookingProvider::from_config(config)?;
            Ok(Box::new(provider) as Box<dyn AvailabilityProvider>)
        });

        registry
    }

    /// Registers (or replaces) the factory for `provider_type`.
    pub fn register<F>(&mut self, provider_type: ProviderType, factory: F) -> &mut Self
    where
        F: Fn(&ProviderConfig) -> ProviderResult<Box<dyn AvailabilityProvider>>
            + Send
            + Sync
            + 'static,
    {
        debug!(provider_type = %provider_type, "registered availability provider");
        self.factories.insert(provider_type, Arc::new(factory));
        self
    }

    /// Returns true if `provider_type` names a type with a registered adapter.
    ///
    /// Pure lookup; unknown strings simply return false.
    pub fn is_provider_registered(&self, provider_type: &str) -> bool {
        provider_type
            .parse::<ProviderType>()
            .is_ok_and(|ty| self.factories.contains_key(&ty))
    }

    /// Returns the registered types in a stable order.
    pub fn registered_types(&self) -> Vec<ProviderType> {
        ProviderType::ALL
            .iter()
            .copied()
            .filter(|ty| self.factories.contains_key(ty))
            .collect()
    }

    /// Builds an adapter bound to `config`.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedProvider` error when the type is unknown or has
    /// no registered factory, or whatever the factory reports when the config
    /// is unusable for that adapter.
    pub fn get_provider(
        &self,
        config: &ProviderConfig,
    ) -> ProviderResult<Box<dyn AvailabilityProvider>> {
        let provider_type: ProviderType = config.provider_type.parse()?;
        let factory = self
            .factories
            .get(&provider_type)
            .ok_or_else(|| ProviderError::unsupported(&config.provider_type))?;

        factory(config).map_err(|e| e.with_provider(provider_type.as_str()))
    }
}
