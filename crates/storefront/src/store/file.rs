//! JSON-file store.
//!
//! The whole store is one JSON object of string values. It is read once on
//! open and rewritten on every change through a sibling temp file and a
//! rename, so a crash mid-write leaves the previous contents in place.
//! In-memory entries only change after the file write succeeds.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

type Entries = BTreeMap<String, String>;

/// A store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Entries,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Json`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");
        Ok(Self { path, entries })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the entries, write the copy, then keep it.
    fn commit(&mut self, change: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        change(&mut next);
        if next == self.entries {
            return Ok(());
        }

        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn flush(&self, entries: &Entries) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.commit(|entries| {
            entries.insert(key.to_owned(), value);
        })
    }

    fn set_many(&mut self, entries: Vec<(&str, String)>) -> Result<(), StoreError> {
        self.commit(|next| {
            for (key, value) in entries {
                next.insert(key.to_owned(), value);
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.commit(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A store whose directory has been replaced by a plain file, so every
    /// later write fails.
    fn unwritable_store(dir: &Path) -> FileStore {
        let sub = dir.join("sub");
        let mut store = FileStore::open(sub.join("store.json")).unwrap();
        store.set("cart", "old".to_string()).unwrap();

        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, "not a directory").unwrap();
        store
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("cart", "[]".to_string()).unwrap();
        store
            .set_many(vec![
                ("orders", "[1]".to_string()),
                ("extra", "x".to_string()),
            ])
            .unwrap();
        store.remove("cart").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap(), None);
        assert_eq!(reopened.get("orders").unwrap().as_deref(), Some("[1]"));
        assert_eq!(reopened.get("extra").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_failed_set_keeps_old_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = unwritable_store(dir.path());

        assert!(matches!(
            store.set("cart", "new".to_string()),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn test_failed_remove_keeps_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = unwritable_store(dir.path());

        assert!(store.remove("cart").is_err());
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn test_failed_set_many_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = unwritable_store(dir.path());

        let result = store.set_many(vec![
            ("orders", "[1]".to_string()),
            ("cart", "[]".to_string()),
        ]);
        assert!(result.is_err());
        assert_eq!(store.get("orders").unwrap(), None);
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("old"));
    }
}
