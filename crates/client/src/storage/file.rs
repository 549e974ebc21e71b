//! Filesystem-backed key-value store.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── cart.json        # full cart snapshot
//! └── wishlist.json    # full wishlist snapshot
//! ```
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! crash mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{KeyValueStore, StorageError};

/// Filesystem-backed store that persists each key as its own file.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `base`. The directory is created on first write.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_owned(),
        source,
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.base).map_err(|e| io_error(key, e))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));

        assert_eq!(storage.get("cart").unwrap(), None);
        storage.set("cart", r#"[{"productId":1}]"#).unwrap();

        // Re-open from same directory
        let reopened = FileStorage::new(dir.path().join("state"));
        assert_eq!(
            reopened.get("cart").unwrap().as_deref(),
            Some(r#"[{"productId":1}]"#)
        );
        assert!(dir.path().join("state").join("cart.json").exists());
    }

    #[test]
    fn test_set_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.set("wishlist", "[1]").unwrap();
        storage.set("wishlist", "[1,2]").unwrap();

        assert_eq!(storage.get("wishlist").unwrap().as_deref(), Some("[1,2]"));
        assert!(!dir.path().join("wishlist.json.tmp").exists());
    }

    #[test]
    fn test_remove_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.remove("cart").is_ok());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["", "../cart", "a/b", ".hidden"] {
            let err = storage.set(key, "[]").unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key {key:?}");
        }
    }
}
