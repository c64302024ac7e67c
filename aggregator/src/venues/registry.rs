// Provider registry
// This file holds the ordered, immutable set of liquidity providers that the
// router fans out to. Registration order is kept for deterministic tie-breaks.
//
// Numan Thabit 2025 Nov

use super::provider::LiquidityProvider;
use anyhow::{bail, Result};
use std::sync::Arc;

/// Builder for a [`ProviderRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    providers: Vec<Arc<dyn LiquidityProvider>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Names must be unique.
    pub fn register(&mut self, provider: Arc<dyn LiquidityProvider>) -> Result<&mut Self> {
        let name = provider.name();
        if name.trim().is_empty() {
            bail!("provider name must not be empty");
        }
        if self.providers.iter().any(|p| p.name() == name) {
            bail!("provider {name} already registered");
        }
        self.providers.push(provider);
        Ok(self)
    }

    pub fn with(mut self, provider: Arc<dyn LiquidityProvider>) -> Result<Self> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            providers: self.providers.into(),
        }
    }
}

/// Frozen provider list shared by router instances.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Arc<[Arc<dyn LiquidityProvider>]>,
}

impl ProviderRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn providers(&self) -> &[Arc<dyn LiquidityProvider>] {
        &self.providers
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
