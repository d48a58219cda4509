//! Application state shared across handlers.

use std::sync::{Arc, Mutex, PoisonError};

use crate::cart::{CartStore, FileStorage, LocalStorage, SharedStorage, StorageError};
use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;

/// Error building application state from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It owns the application's one
/// cart; handlers reach it through [`AppState::with_cart`], which serializes
/// every cart operation.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: Mutex<CartStore<SharedStorage>>,
}

impl AppState {
    /// Create application state around an already-chosen storage backend.
    ///
    /// The cart is restored from `storage` immediately.
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        storage: impl LocalStorage + Send + Sync + 'static,
    ) -> Self {
        let storage: SharedStorage = Arc::new(storage);
        let cart = CartStore::open(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Create application state from configuration: file storage under
    /// `storage_dir` and the configured (or built-in) catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage directory cannot be created or the
    /// catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage = FileStorage::open(&config.storage_dir)?;
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        Ok(Self::new(config, catalog, storage))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Run `f` with exclusive access to the cart.
    ///
    /// The lock is held only for the duration of `f`. A poisoned lock is
    /// recovered, since every cart operation leaves the cart valid.
    pub fn with_cart<R>(&self, f: impl FnOnce(&mut CartStore<SharedStorage>) -> R) -> R {
        let mut cart = self
            .inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
