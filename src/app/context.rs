use std::sync::Arc;

use crate::domain::SiteConfig;
use crate::ports::{LocalStore, SiteBackend};

/// Application context holding the dependencies every flow draws from.
///
/// Replaces window-scoped globals: components receive the backend and the
/// local store through this value instead of reaching for ambient state.
pub struct AppContext<B: SiteBackend, S: LocalStore> {
    backend: Arc<B>,
    store: Arc<S>,
    config: SiteConfig,
}

impl<B: SiteBackend, S: LocalStore> AppContext<B, S> {
    /// Create a new application context.
    pub fn new(backend: B, store: S, config: SiteConfig) -> Self {
        Self { backend: Arc::new(backend), store: Arc::new(store), config }
    }

    /// Shared handle to the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Shared handle to the local store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

impl<B: SiteBackend, S: LocalStore> Clone for AppContext<B, S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}
