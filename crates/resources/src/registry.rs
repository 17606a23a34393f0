//! Ordered provider table with protocol-prefix dispatch.
//!
//! Providers are scanned in reverse registration order and the first one
//! whose protocol is a prefix of the URL is selected. Selection stops there:
//! if the selected provider lacks the requested capability the request
//! fails, even when an earlier provider with a matching protocol could have
//! served it. A later registration therefore overrides an earlier one, and
//! the empty-protocol fallback has to be registered first.

use tracing::{info, warn};

use crate::error::ResourceResult;
use crate::provider::ResourceProvider;

/// Providers in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Box<dyn ResourceProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. It takes precedence over every provider registered before it.
    pub fn register(&mut self, provider: Box<dyn ResourceProvider>) {
        info!("Registered resource provider for protocol '{}'", provider.protocol());
        self.providers.push(provider);
    }

    /// Provider selected for `url`, if any protocol matches.
    pub fn find(&self, url: &str) -> Option<&dyn ResourceProvider> {
        self.providers
            .iter()
            .rev()
            .find(|p| url.starts_with(p.protocol()))
            .map(|p| p.as_ref())
    }

    /// Run a factory-style request against the selected provider.
    ///
    /// `Ok(None)` when no provider matches.
    pub fn create<R>(
        &self,
        url: &str,
        produce: impl FnOnce(&dyn ResourceProvider, &str) -> ResourceResult<Option<R>>,
    ) -> ResourceResult<Option<R>> {
        let Some(provider) = self.find(url) else {
            return Ok(None);
        };
        produce(provider, url).inspect_err(|e| warn!("Request for '{}' failed: {}", url, e))
    }

    /// Run a destination-style request against the selected provider.
    ///
    /// A no-op when no provider matches.
    pub fn populate(
        &self,
        url: &str,
        fill: impl FnOnce(&dyn ResourceProvider, &str) -> ResourceResult<()>,
    ) -> ResourceResult<()> {
        let Some(provider) = self.find(url) else {
            return Ok(());
        };
        fill(provider, url).inspect_err(|e| warn!("Load of '{}' failed: {}", url, e))
    }

    /// Registered protocols, in registration order.
    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.protocol())
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
