//! # TOML File Store
//!
//! Keeps every preference in one TOML table:
//!
//! ```toml
//! "Demo.MasterVolume" = 80
//! "Demo.PushToTalk" = true
//! "Demo.Nickname" = "graft"
//! ```
//!
//! Writes go to a sibling temp file which is then renamed over the target,
//! so a crash mid-write leaves the previous file intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PrefsError, PrefsResult};
use crate::store::{check_key, SettingsStore};
use crate::value::SettingValue;

/// Configuration for [`TomlFileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStoreConfig {
    /// Write the file after every change.
    pub autosave: bool,
    /// Write pending changes when the store is dropped.
    pub flush_on_drop: bool,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            autosave: false,
            flush_on_drop: true,
        }
    }
}

impl FileStoreConfig {
    /// Every change hits the disk immediately.
    #[must_use]
    pub const fn write_through() -> Self {
        Self {
            autosave: true,
            flush_on_drop: true,
        }
    }
}

/// Preferences persisted as a TOML file.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    config: FileStoreConfig,
    values: BTreeMap<String, SettingValue>,
    dirty: bool,
}

impl TomlFileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file exists but cannot be read, or a
    /// parse error if it is not a valid preference table.
    pub fn open(path: impl AsRef<Path>, config: FileStoreConfig) -> PrefsResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<BTreeMap<String, SettingValue>>(&raw)?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        debug!(path = %path.display(), keys = values.len(), "opened preference file");

        Ok(Self {
            path,
            config,
            values,
            dirty: false,
        })
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if there are unwritten changes.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn after_change(&mut self) -> PrefsResult<()> {
        self.dirty = true;
        if self.config.autosave {
            self.flush()
        } else {
            Ok(())
        }
    }

    fn write_file(&self) -> PrefsResult<()> {
        let encoded = toml::to_string(&self.values)?;
        let staging = self.path.with_extension("toml.tmp");
        let io = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io)?;
        }
        fs::write(&staging, encoded).map_err(io)?;
        fs::rename(&staging, &self.path).map_err(io)
    }
}

impl SettingsStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> PrefsResult<()> {
        check_key(key)?;
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.after_change()
    }

    fn remove(&mut self, key: &str) -> PrefsResult<bool> {
        if self.values.remove(key).is_none() {
            return Ok(false);
        }
        self.after_change()?;
        Ok(true)
    }

    fn flush(&mut self) -> PrefsResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.write_file()?;
        self.dirty = false;
        debug!(path = %self.path.display(), keys = self.values.len(), "flushed preferences");
        Ok(())
    }
}

impl Drop for TomlFileStore {
    fn drop(&mut self) {
        if self.config.flush_on_drop {
            if let Err(error) = self.flush() {
                warn!(path = %self.path.display(), %error, "failed to flush preferences on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("test_prefs_{tag}_{nanos}.toml"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("missing");
        let store = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();

        assert!(!store.contains("anything"));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_unchanged_value_stays_clean() {
        let path = temp_path("clean");
        let mut store = TomlFileStore::open(&path, FileStoreConfig::default()).unwrap();
        store.set_int("volume", 3).unwrap();
        store.flush().unwrap();

        store.set_int("volume", 3).unwrap();
        assert!(!store.is_dirty());

        drop(store);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "this is = = not toml").unwrap();

        let result = TomlFileStore::open(&path, FileStoreConfig::default());
        assert!(matches!(result, Err(PrefsError::Parse(_))));

        let _ = fs::remove_file(&path);
    }
}
