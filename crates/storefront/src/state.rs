//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::notify::TracingNotifier;
use crate::services::CartService;
use crate::storage::FileStore;

/// The concrete cart service wired up for production.
pub type StorefrontCartService = CartService<CatalogClient, FileStore, TracingNotifier>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the cart service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    cart: StorefrontCartService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the catalog client and file store from configuration and
    /// restores the persisted cart (empty if none exists).
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog_url);
        let storage = FileStore::new(config.storage_dir.clone());
        let cart = CartService::new(catalog, storage, TracingNotifier);

        Self {
            inner: Arc::new(AppStateInner { config, cart }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn cart(&self) -> &StorefrontCartService {
        &self.inner.cart
    }
}
