//! Shared, persisted, lazily hydrated state cell
//!
//! [`PersistentState`] keeps one record in memory and mirrors every write to a
//! [`KeyValueStore`]. The record is read from the store at most once, the
//! first time [`PersistentState::ready`] is awaited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::error::{ClubnetError, Result};
use crate::storage::{load_state, save_state, KeyValueStore};

/// In-memory copy of a persisted record with atomic replace semantics
///
/// Every write runs under the write lock: the new value is computed from the
/// current one, persisted, and only then swapped in. A concurrent reader sees
/// either the complete old value or the complete new one.
#[derive(Debug)]
pub struct PersistentState<T> {
    kv: Arc<dyn KeyValueStore>,
    key: &'static str,
    value: RwLock<T>,
    hydrated: OnceCell<()>,
    touched: AtomicBool,
    normalize: fn(T) -> T,
}

impl<T> PersistentState<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    /// Create a cell holding `initial` until hydration.
    pub fn new(kv: Arc<dyn KeyValueStore>, key: &'static str, initial: T) -> Self {
        Self {
            kv,
            key,
            value: RwLock::new(initial),
            hydrated: OnceCell::new(),
            touched: AtomicBool::new(false),
            normalize: std::convert::identity,
        }
    }

    /// Install a function applied to records read back from storage.
    pub fn with_normalizer(mut self, normalize: fn(T) -> T) -> Self {
        self.normalize = normalize;
        self
    }

    /// Storage key of this record.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load the persisted record, once.
    ///
    /// Concurrent callers wait on the same load. A write that lands before
    /// hydration wins over the stored record.
    pub async fn ready(&self) -> Result<()> {
        self.hydrated
            .get_or_try_init(|| async { self.hydrate() })
            .await
            .map(|_| ())
    }

    /// True once [`ready`](Self::ready) has completed.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.initialized()
    }

    fn hydrate(&self) -> Result<()> {
        let Some(stored) = load_state::<T>(self.kv.as_ref(), self.key)? else {
            tracing::debug!("No persisted record for '{}'", self.key);
            return Ok(());
        };

        let mut guard = self.write_guard()?;
        if self.touched.load(Ordering::SeqCst) {
            tracing::debug!("Skipping hydration of '{}': already written", self.key);
            return Ok(());
        }
        *guard = (self.normalize)(stored);
        tracing::debug!("Hydrated '{}' from storage", self.key);
        Ok(())
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.read_guard().clone()
    }

    /// Persist `value` and make it current.
    pub fn replace(&self, value: T) -> Result<()> {
        let mut guard = self.write_guard()?;
        save_state(self.kv.as_ref(), self.key, &value)?;
        *guard = value;
        self.touched.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Apply `apply` to a copy of the current value, persist it, swap it in.
    ///
    /// If persisting fails the current value is left untouched.
    pub fn modify(&self, apply: &mut dyn FnMut(&mut T)) -> Result<T> {
        let mut guard = self.write_guard()?;
        let mut next = guard.clone();
        apply(&mut next);
        save_state(self.kv.as_ref(), self.key, &next)?;
        *guard = next.clone();
        self.touched.store(true, Ordering::SeqCst);
        Ok(next)
    }

    /// Delete the persisted record and hold `value` in memory.
    pub fn reset(&self, value: T) -> Result<()> {
        let mut guard = self.write_guard()?;
        self.kv.remove(self.key)?;
        *guard = value;
        self.touched.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, T> {
        // A panic while holding the lock cannot leave a half-written value:
        // writers only assign fully built values.
        self.value.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, T>> {
        self.value.write().map_err(|_| {
            ClubnetError::Storage(format!("state lock for '{}' poisoned", self.key)).into()
        })
    }
}
