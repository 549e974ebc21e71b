use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::lock;
use crate::storage::{KeyValueStore, StorageError};

/// In-memory backing store for tests and ephemeral sessions.
///
/// Clones share the same map, so a clone handed to a second store container
/// simulates a process restart against the same device storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("cart").unwrap(), None);

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));

        storage.remove("cart").unwrap();
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("wishlist", "[1]").unwrap();
        assert_eq!(other.get("wishlist").unwrap().as_deref(), Some("[1]"));
    }
}
