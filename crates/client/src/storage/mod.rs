//! Durable key-value backing store for client state.
//!
//! Stores persist a full JSON snapshot of their collection under a fixed key
//! after every mutation, and read it back once when constructed.
//!
//! # Implementations
//!
//! - [`MemoryStorage`] - process-local map, for tests and ephemeral sessions
//! - [`FileStorage`] - one file per key under a directory, survives restarts
//!
//! The contract is deliberately small (`get`/`set`/`remove` on strings) and
//! makes no transaction or size guarantees. When several processes share a
//! backing store, the last write wins.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised by a backing store implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be represented by this backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A synchronous string-keyed store scoped to the client device.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage keys used by the client stores.
pub mod keys {
    /// Key for the cart line snapshot.
    pub const CART: &str = "cart";

    /// Key for the wishlist snapshot.
    pub const WISHLIST: &str = "wishlist";
}

/// Load a persisted collection snapshot.
///
/// A missing key, an unreadable store or a value that fails to parse all
/// yield an empty collection. Failures are logged, never propagated.
pub(crate) fn load_snapshot<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "No persisted state, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted state, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, error = %e, "Discarding unparsable persisted state");
            Vec::new()
        }
    }
}

/// Write a full collection snapshot.
///
/// Write failures are logged; the in-memory collection stays authoritative.
pub(crate) fn save_snapshot<T: Serialize>(storage: &dyn KeyValueStore, key: &str, items: &[T]) {
    let raw = match serde_json::to_string(items) {
        Ok(raw) => raw,
        Err(e) => {
            error!(key, error = %e, "Failed to serialize state snapshot");
            return;
        }
    };

    if let Err(e) = storage.set(key, &raw) {
        error!(key, error = %e, "Failed to persist state snapshot");
    }
}
