//! Config synchronizer.
//!
//! Owns the snapshot store. The lifecycle registry reads single entries
//! through [`ConfigSync::is_disabled`] and writes only wholesale, never
//! partially.

use crate::config::store::{ConfigStore, UnitSettings};
use crate::core::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Thread-safe owner of the config snapshot.
pub struct ConfigSync {
    store: Mutex<ConfigStore>,
}

impl ConfigSync {
    /// Wrap an existing store.
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Load the snapshot at `path` (missing file yields an empty store).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(ConfigStore::load(path)?))
    }

    /// Backing file path.
    pub fn path(&self) -> PathBuf {
        self.store.lock().unwrap().path().to_path_buf()
    }

    /// True only if an entry exists and explicitly disables the unit.
    pub fn is_disabled(&self, qualified_name: &str) -> bool {
        self.store.lock().unwrap().is_disabled(qualified_name)
    }

    /// Settings for a unit, if an entry exists.
    pub fn entry(&self, qualified_name: &str) -> Option<UnitSettings> {
        self.store.lock().unwrap().entry(qualified_name).cloned()
    }

    /// Set one unit's enabled flag and persist.
    ///
    /// This is the external-change surface: a disabled unit only leaves
    /// the Disabled pool after the config changes and the unit reloads.
    pub fn set_enabled(&self, qualified_name: &str, enabled: bool) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.set_enabled(qualified_name, enabled);
        store.update()
    }

    /// Replace every entry and persist the whole snapshot.
    pub fn replace_and_persist(&self, units: HashMap<String, UnitSettings>) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.replace_all(units);
        store.update()
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }
}
