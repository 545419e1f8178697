use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::error::PersistenceError;

/// Keys written to the durable store.
pub mod keys {
    pub const ITEMS: &str = "items";
    pub const INCOME: &str = "income";
    pub const SAVING_PERCENTAGE: &str = "savingPercentage";
    pub const TIME_UNIT: &str = "timeUnit";
    pub const WALLET: &str = "wallet";
    pub const THEME: &str = "theme";

    pub const ALL: [&str; 6] = [ITEMS, INCOME, SAVING_PERCENTAGE, TIME_UNIT, WALLET, THEME];
}

/// Abstraction over durable string key-value backends.
///
/// Only the persistence synchronizer writes through this trait.
pub trait KeyValueStore: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;

    /// Moves a corrupt value aside so it can be inspected later.
    /// Returns a label for the preserved copy, if the backend keeps one.
    fn quarantine(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _ = key;
        Ok(None)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// Volatile store for tests and ephemeral sessions.
///
/// Clones share the same entries, so a test can keep a handle after handing
/// a boxed copy to the synchronizer.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store with raw entries, as an older build might have left them.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut state) = store.state.lock() {
            state
                .entries
                .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Makes every subsequent read fail with [`PersistenceError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_reads = fail;
        }
    }

    /// Makes every subsequent write fail, as a full quota would.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_writes = fail;
        }
    }

    /// Raw value currently held for `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.entries.get(key).cloned())
    }

    /// Number of successful `set`/`remove` calls.
    pub fn write_count(&self) -> usize {
        self.state.lock().map(|state| state.writes).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let state = self.lock()?;
        if state.fail_reads {
            return Err(PersistenceError::Unavailable(format!("cannot read `{key}`")));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(PersistenceError::Unavailable(format!(
                "quota exceeded writing `{key}`"
            )));
        }
        state.entries.insert(key.to_string(), value.to_string());
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let mut state = self.lock()?;
        if state.fail_writes {
            return Err(PersistenceError::Unavailable(format!(
                "cannot remove `{key}`"
            )));
        }
        state.entries.remove(key);
        state.writes += 1;
        Ok(())
    }
}
