//! Key-value persistence for client-side records
//!
//! Records are JSON documents stored under a fixed key. Each record is
//! wrapped in a [`Persisted`] envelope (`{"state": ..., "version": 0}`) so the
//! on-disk shape stays stable as the state types evolve.
//!
//! Two backends are provided:
//!
//! - [`FileStore`] -- one `<key>.json` file per record in a data directory
//! - [`MemoryStore`] -- process-local map, used by tests and embedders

use crate::error::{ClubnetError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod state;
pub mod types;
pub use state::PersistentState;
pub use types::Persisted;

/// Persistence port used by the session and server stores
///
/// Implementations store opaque strings; typed access goes through
/// [`load_state`] and [`save_state`].
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns the raw record stored under `key`, or `None` if absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the record stored under `key`.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the record stored under `key`. Absent keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Loads and unwraps the state stored under `key`.
///
/// A record that fails to parse is logged and treated as absent, so a
/// corrupted file never prevents the client from starting.
pub fn load_state<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };

    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(envelope) => Ok(Some(envelope.state)),
        Err(e) => {
            tracing::warn!("Discarding unreadable record '{}': {}", key, e);
            Ok(None)
        }
    }
}

/// Wraps `state` in a [`Persisted`] envelope and stores it under `key`.
pub fn save_state<T: Serialize>(store: &dyn KeyValueStore, key: &str, state: &T) -> Result<()> {
    let json = serde_json::to_string(&Persisted::new(state))?;
    store.save(key, &json)
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(ClubnetError::Storage(format!("Invalid storage key: '{}'", key)).into())
    }
}

/// File-backed store: one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store in the platform data directory
    ///
    /// `CLUBNET_DATA_DIR` overrides the location, which makes it easy to
    /// point the binary at a scratch directory.
    pub fn new() -> Result<Self> {
        if let Ok(override_dir) = std::env::var("CLUBNET_DATA_DIR") {
            return Self::with_dir(override_dir);
        }

        let proj_dirs = ProjectDirs::from("edu", "clubnet", "clubnet")
            .ok_or_else(|| ClubnetError::Storage("Could not determine data directory".into()))?;

        Self::with_dir(proj_dirs.data_dir())
    }

    /// Create a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use clubnet::storage::{FileStore, KeyValueStore};
    ///
    /// let dir = std::env::temp_dir().join("clubnet-doc-store");
    /// let store = FileStore::with_dir(&dir).unwrap();
    /// store.save("greeting", "\"hi\"").unwrap();
    /// assert_eq!(store.load("greeting").unwrap().as_deref(), Some("\"hi\""));
    /// ```
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .context("Failed to create data directory")
            .map_err(|e| ClubnetError::Storage(format!("{:#}", e)))?;
        Ok(Self { dir })
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClubnetError::Io(e).into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Write-then-rename so readers never observe a half-written record.
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        std::fs::write(&tmp, value).map_err(ClubnetError::Io)?;
        std::fs::rename(&tmp, &path).map_err(ClubnetError::Io)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClubnetError::Io(e).into()),
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.records
            .lock()
            .map_err(|_| ClubnetError::Storage("memory store lock poisoned".into()).into())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.records()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn test_file_store_load_missing_returns_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_dir(tmp.path()).unwrap();
        assert!(store.load("absent").unwrap().is_none());
    }

    #[test]
    fn test_file_store_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_dir(tmp.path()).unwrap();
        store.save("clubnet-auth", "{\"state\":{}}").unwrap();
        assert_eq!(
            store.load("clubnet-auth").unwrap().as_deref(),
            Some("{\"state\":{}}")
        );
        assert!(tmp.path().join("clubnet-auth.json").exists());
    }

    #[test]
    fn test_file_store_save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_dir(tmp.path()).unwrap();
        store.save("record", "1").unwrap();
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["record.json".to_string()]);
    }

    #[test]
    fn test_file_store_remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_dir(tmp.path()).unwrap();
        store.save("record", "1").unwrap();
        store.remove("record").unwrap();
        store.remove("record").unwrap();
        assert!(store.load("record").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::with_dir(tmp.path()).unwrap();
        assert!(store.save("../escape", "1").is_err());
        assert!(store.load("a/b").is_err());
        assert!(store.load("").is_err());
        assert!(store.load(".hidden").is_err());
    }

    #[test]
    fn test_file_store_reports_io_cause() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = FileStore::with_dir(blocker.join("data")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Storage error: Failed to create data directory: "));
        assert!(message.len() > "Storage error: Failed to create data directory: ".len());
    }

    #[test]
    fn test_file_store_creates_nested_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = FileStore::with_dir(&nested).unwrap();
        assert_eq!(store.dir(), nested.as_path());
        assert!(nested.is_dir());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.load("k").unwrap().is_none());
    }

    #[test]
    fn test_save_state_wraps_in_envelope() {
        let store = MemoryStore::new();
        save_state(&store, "probe", &Probe { value: 7 }).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&store.load("probe").unwrap().unwrap()).unwrap();
        assert_eq!(raw["state"]["value"], 7);
        assert_eq!(raw["version"], 0);
    }

    #[test]
    fn test_load_state_unwraps_envelope() {
        let store = MemoryStore::new();
        store.save("probe", "{\"state\":{\"value\":3}}").unwrap();
        let probe: Probe = load_state(&store, "probe").unwrap().unwrap();
        assert_eq!(probe.value, 3);
    }

    #[test]
    fn test_load_state_discards_corrupt_record() {
        let store = MemoryStore::new();
        store.save("probe", "not json").unwrap();
        let probe: Option<Probe> = load_state(&store, "probe").unwrap();
        assert!(probe.is_none());
    }
}
