//! Store container.
//!
//! [`ClientStores`] is the single owner of the cart, wishlist and toast
//! queue for a UI session. Build it once at startup and pass it (or the
//! individual handles) to every view; handles are cheap clones that all point
//! at the same state.

use std::sync::Arc;

use tracing::info;

use crate::bus::EventBus;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::storage::{FileStorage, KeyValueStore};
use crate::toast::ToastStore;
use crate::wishlist::WishlistStore;

/// Owner of the shared client-side stores.
#[derive(Clone, Debug)]
pub struct ClientStores {
    bus: EventBus,
    cart: CartStore,
    wishlist: WishlistStore,
    toasts: ToastStore,
}

impl ClientStores {
    /// Build every store once, rehydrating cart and wishlist from `storage`.
    pub fn new(storage: impl KeyValueStore + 'static, bus: EventBus, config: &ClientConfig) -> Self {
        Self::with_storage(Arc::new(storage), bus, config)
    }

    /// Like [`ClientStores::new`] for an already shared backing store.
    pub fn with_storage(
        storage: Arc<dyn KeyValueStore>,
        bus: EventBus,
        config: &ClientConfig,
    ) -> Self {
        let cart = CartStore::load(Arc::clone(&storage), bus.clone());
        let wishlist = WishlistStore::load(storage, bus.clone());
        let toasts = ToastStore::new(config.toast_ttl);

        info!(
            cart_lines = cart.len(),
            wishlist_entries = wishlist.count(),
            "Client stores initialized"
        );

        Self {
            bus,
            cart,
            wishlist,
            toasts,
        }
    }

    /// Build the stores on a [`FileStorage`] rooted at `config.storage_dir`.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            FileStorage::new(config.storage_dir.clone()),
            EventBus::new(),
            config,
        )
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    #[must_use]
    pub const fn toasts(&self) -> &ToastStore {
        &self.toasts
    }

    #[must_use]
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }
}
