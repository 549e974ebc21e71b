//! Wishlist store.
//!
//! A set of product ids kept in insertion order. The only mutation is
//! [`WishlistStore::toggle`], which persists under [`keys::WISHLIST`] and then
//! publishes the full id list on [`topics::WISHLIST_UPDATED`].

use std::fmt;
use std::sync::{Arc, Mutex};

use boutique_core::ProductId;
use tracing::debug;

use crate::bus::{EventBus, topics};
use crate::lock;
use crate::storage::{KeyValueStore, keys, load_snapshot, save_snapshot};

struct WishlistInner {
    entries: Mutex<Vec<ProductId>>,
    storage: Arc<dyn KeyValueStore>,
    bus: EventBus,
}

/// Shared handle to the wishlist.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistInner>,
}

impl WishlistStore {
    /// Build the wishlist, rehydrating from [`keys::WISHLIST`].
    pub(crate) fn load(storage: Arc<dyn KeyValueStore>, bus: EventBus) -> Self {
        let entries: Vec<ProductId> = load_snapshot(storage.as_ref(), keys::WISHLIST);
        debug!(entries = entries.len(), "Wishlist loaded");

        Self {
            inner: Arc::new(WishlistInner {
                entries: Mutex::new(entries),
                storage,
                bus,
            }),
        }
    }

    /// Whether `id` is on the wishlist. Matching is exact.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        lock(&self.inner.entries).contains(id)
    }

    /// Add `id` if absent, otherwise remove every occurrence of it.
    ///
    /// Subscribers to [`topics::WISHLIST_UPDATED`] are notified after the new
    /// state is persisted. Returns whether `id` is on the wishlist afterwards.
    pub fn toggle(&self, id: &ProductId) -> bool {
        let mut entries = lock(&self.inner.entries);
        let present = if entries.contains(id) {
            entries.retain(|entry| entry != id);
            false
        } else {
            entries.push(id.clone());
            true
        };
        debug!(product_id = %id, present, "Wishlist toggled");

        save_snapshot(self.inner.storage.as_ref(), keys::WISHLIST, &entries);
        let snapshot = entries.clone();
        drop(entries);

        self.inner.bus.publish(topics::WISHLIST_UPDATED, &snapshot);
        present
    }

    #[must_use]
    pub fn count(&self) -> usize {
        lock(&self.inner.entries).len()
    }

    /// Snapshot of the ids, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<ProductId> {
        lock(&self.inner.entries).clone()
    }
}

impl fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WishlistStore")
            .field("entries", &*lock(&self.inner.entries))
            .finish_non_exhaustive()
    }
}
