//! Config snapshot store.
//!
//! Maps a unit's globally-qualified name (`<bundle>::<type>`) to its
//! persisted settings, backed by a JSON file at a path supplied at
//! construction. Absence of an entry means enabled-by-default.

use crate::core::{now, Result, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Persisted settings for one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSettings {
    /// Whether the unit may be loaded.
    pub enabled: bool,
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// On-disk snapshot shape.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    saved_at: Timestamp,
    units: HashMap<String, UnitSettings>,
}

/// Config snapshot store.
#[derive(Debug)]
pub struct ConfigStore {
    /// Backing file path
    path: PathBuf,
    /// Qualified name -> settings
    units: HashMap<String, UnitSettings>,
    /// Last persist time
    saved_at: Option<Timestamp>,
}

impl ConfigStore {
    /// Create an empty store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            units: HashMap::new(),
            saved_at: None,
        }
    }

    /// Load a store from `path`. A missing file yields an empty store;
    /// a present but unparsable file is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let raw = std::fs::read_to_string(&path)?;
        let snapshot: SnapshotFile = serde_json::from_str(&raw)?;
        Ok(Self {
            path,
            units: snapshot.units,
            saved_at: Some(snapshot.saved_at),
        })
    }

    /// Persist the whole snapshot.
    pub fn update(&mut self) -> Result<()> {
        let stamp = now();
        let snapshot = SnapshotFile {
            saved_at: stamp,
            units: self.units.clone(),
        };
        let raw = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, raw)?;
        self.saved_at = Some(stamp);
        Ok(())
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings for a unit, if an entry exists.
    pub fn entry(&self, qualified_name: &str) -> Option<&UnitSettings> {
        self.units.get(qualified_name)
    }

    /// Set a unit's enabled flag, creating the entry if absent.
    pub fn set_enabled(&mut self, qualified_name: &str, enabled: bool) {
        self.units
            .insert(qualified_name.to_string(), UnitSettings { enabled });
    }

    /// Replace every entry with `units`.
    pub fn replace_all(&mut self, units: HashMap<String, UnitSettings>) {
        self.units = units;
    }

    /// True only if an entry exists and explicitly disables the unit.
    pub fn is_disabled(&self, qualified_name: &str) -> bool {
        self.units
            .get(qualified_name)
            .map(|settings| !settings.enabled)
            .unwrap_or(false)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// When the snapshot was last persisted.
    pub fn saved_at(&self) -> Option<Timestamp> {
        self.saved_at
    }
}
