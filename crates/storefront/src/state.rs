//! Application state shared across request handlers.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tmi_store_core::CartStore;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::storage::JsonFileStorage;

/// Shared application state.
///
/// Cheap to clone; all clones share the same inner state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    content: ContentStore,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create the application state and hydrate the cart from its slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read. A missing or
    /// corrupt cart slot is not an error; hydration falls back to an empty
    /// cart.
    pub fn new(config: StorefrontConfig, content_dir: &Path) -> Result<Self, ContentError> {
        let catalog = CatalogClient::new(&config.catalog);
        let content = ContentStore::load(content_dir)?;

        let storage = Arc::new(JsonFileStorage::new(config.cart_slot_path.clone()));
        let mut cart = CartStore::new(storage);
        cart.hydrate();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                content,
                cart: Mutex::new(cart),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// Lock the cart for the duration of one mutation or read.
    ///
    /// A poisoned lock is recovered rather than propagated; the cart's totals
    /// are recomputed on every mutation, so a panic mid-handler cannot leave
    /// them inconsistent.
    #[must_use]
    pub fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
