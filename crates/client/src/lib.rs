//! Boutique Client - shared client-side state.
//!
//! This crate holds the state a storefront UI shares across all of its
//! views: the cart, the wishlist and the toast queue, plus a typed client for
//! the catalog read API.
//!
//! # Architecture
//!
//! - [`ClientStores`] is built once and owns the single instance of each
//!   store; views receive cheap handles that all observe the same state
//! - Cart and wishlist write a full JSON snapshot to a [`KeyValueStore`]
//!   after every mutation and rehydrate from it on construction
//! - Cart and wishlist announce changes on the [`EventBus`] so unrelated
//!   views can react without holding a reference to each other
//! - Toasts expire on their own via `tokio` timers
//!
//! Every mutation follows the same order: update memory, persist, notify.
//!
//! # Example
//!
//! ```rust
//! use boutique_client::{CartItem, ClientConfig, ClientStores, EventBus, MemoryStorage};
//! use rust_decimal::Decimal;
//!
//! let stores = ClientStores::new(
//!     MemoryStorage::new(),
//!     EventBus::new(),
//!     &ClientConfig::default(),
//! );
//!
//! stores.cart().add(&CartItem::new(1, Decimal::new(50, 0)));
//! stores.cart().add(&CartItem::new(1, Decimal::new(50, 0)));
//! assert_eq!(stores.cart().total(), Decimal::new(100, 0));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bus;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod storage;
pub mod stores;
pub mod toast;
pub mod wishlist;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use bus::{EventBus, Subscription};
pub use cart::{CartItem, CartLine, CartStore, LineKey};
pub use catalog::{CatalogClient, CatalogError, CatalogSnapshot};
pub use config::{ClientConfig, ConfigError};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use stores::ClientStores;
pub use toast::{Notice, NoticeAction, NoticeId, Severity, ToastStore};
pub use wishlist::WishlistStore;

/// Lock a store mutex, recovering the data if a previous holder panicked.
///
/// Store state is only mutated through complete operations, so a poisoned
/// lock still guards a consistent collection.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
