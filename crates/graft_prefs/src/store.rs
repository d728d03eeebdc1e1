//! The store trait and the in-memory store.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{PrefsError, PrefsResult};
use crate::value::SettingValue;

/// Durable key/value storage.
///
/// Typed reads never fail: a missing key or a value of another type yields
/// the caller's default.
pub trait SettingsStore: Send {
    /// Raw value for `key`.
    fn get(&self, key: &str) -> Option<SettingValue>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PrefsError::EmptyKey`] for an empty key, or an I/O error
    /// from stores that write through.
    fn set(&mut self, key: &str, value: SettingValue) -> PrefsResult<()>;

    /// Deletes `key`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from stores that write through.
    fn remove(&mut self, key: &str) -> PrefsResult<bool>;

    /// Persists pending writes.
    ///
    /// # Errors
    ///
    /// Returns an I/O or encoding error if the backing file cannot be
    /// written.
    fn flush(&mut self) -> PrefsResult<()>;

    /// Returns true if `key` holds a value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Boolean under `key`, else `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|value| value.as_bool())
            .unwrap_or(default)
    }

    /// Integer under `key`, else `default`.
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|value| value.as_i32())
            .unwrap_or(default)
    }

    /// String under `key`, else `default`.
    fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key)
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }

    /// Stores a boolean.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::set`].
    fn set_bool(&mut self, key: &str, value: bool) -> PrefsResult<()> {
        self.set(key, value.into())
    }

    /// Stores an integer.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::set`].
    fn set_int(&mut self, key: &str, value: i32) -> PrefsResult<()> {
        self.set(key, value.into())
    }

    /// Stores a string.
    ///
    /// # Errors
    ///
    /// See [`SettingsStore::set`].
    fn set_string(&mut self, key: &str, value: &str) -> PrefsResult<()> {
        self.set(key, value.into())
    }
}

/// A store shared between the engine and control listeners.
pub type SharedStore = Arc<Mutex<dyn SettingsStore>>;

/// Wraps a store for sharing.
pub fn shared(store: impl SettingsStore + 'static) -> SharedStore {
    Arc::new(Mutex::new(store))
}

pub(crate) fn check_key(key: &str) -> PrefsResult<()> {
    if key.is_empty() {
        Err(PrefsError::EmptyKey)
    } else {
        Ok(())
    }
}

/// Volatile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, SettingValue>,
    flushes: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// How many times [`SettingsStore::flush`] ran.
    #[must_use]
    pub const fn flush_count(&self) -> u64 {
        self.flushes
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> PrefsResult<()> {
        check_key(key)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PrefsResult<bool> {
        Ok(self.values.remove(key).is_some())
    }

    fn flush(&mut self) -> PrefsResult<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_defaults() {
        let mut store = MemoryStore::new();
        store.set_string("name", "graft").unwrap();

        assert_eq!(store.get_string("name", "x"), "graft");
        assert_eq!(store.get_int("name", 5), 5);
        assert!(store.get_bool("missing", true));
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.set_bool("", true), Err(PrefsError::EmptyKey)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_shared_handle() {
        let store = shared(MemoryStore::new());
        store.lock().set_int("volume", 40).unwrap();

        let other = Arc::clone(&store);
        assert_eq!(other.lock().get_int("volume", 0), 40);
        assert!(other.lock().remove("volume").unwrap());
        assert!(!other.lock().contains("volume"));
    }
}
