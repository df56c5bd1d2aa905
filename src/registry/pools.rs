//! Lifecycle pools.
//!
//! Three disjoint mappings from qualified unit key to unit record. A key
//! that has been seen at least once lives in exactly one pool; the
//! lifecycle registry owns every transition between them.

use crate::plugin::{CapabilitySet, Plugin, TypeEntry};
use std::collections::HashMap;
use std::sync::Arc;

/// Which pool a unit currently occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolState {
    /// Active and registered.
    Loaded,
    /// Parked; retried on demand.
    Unloaded,
    /// Forced off by config; leaves only via external config change.
    Disabled,
}

impl std::fmt::Display for PoolState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolState::Loaded => write!(f, "loaded"),
            PoolState::Unloaded => write!(f, "unloaded"),
            PoolState::Disabled => write!(f, "disabled"),
        }
    }
}

/// One known unit: its instance, descriptor, and load-time capability set.
///
/// Constructed once per type and reused across load/unload cycles, so
/// plugin-internal state survives a parked retry.
#[derive(Clone)]
pub struct UnitRecord {
    bundle: String,
    descriptor: TypeEntry,
    plugin: Arc<dyn Plugin>,
    capabilities: CapabilitySet,
}

impl UnitRecord {
    /// Build a record, discovering the capability set from the instance.
    pub fn new(bundle: &str, descriptor: TypeEntry, plugin: Arc<dyn Plugin>) -> Self {
        let capabilities = plugin.capabilities();
        Self {
            bundle: bundle.to_string(),
            descriptor,
            plugin,
            capabilities,
        }
    }

    /// Defining bundle name.
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Registration record for the unit's type.
    pub fn descriptor(&self) -> &TypeEntry {
        &self.descriptor
    }

    /// The unit instance.
    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    /// Capability tags discovered at load time.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Stable key: `<bundle>::<type>`, also the config snapshot key.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.bundle, self.descriptor.type_name())
    }

    /// Display name of the unit instance.
    pub fn display_name(&self) -> &str {
        self.plugin.name()
    }
}

impl std::fmt::Debug for UnitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRecord")
            .field("key", &self.qualified_name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// The three lifecycle pools.
#[derive(Default)]
pub struct Pools {
    loaded: HashMap<String, UnitRecord>,
    unloaded: HashMap<String, UnitRecord>,
    disabled: HashMap<String, UnitRecord>,
}

impl Pools {
    /// Create empty pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Which pool holds `key`, if it has been seen.
    pub fn state_of(&self, key: &str) -> Option<PoolState> {
        if self.loaded.contains_key(key) {
            Some(PoolState::Loaded)
        } else if self.unloaded.contains_key(key) {
            Some(PoolState::Unloaded)
        } else if self.disabled.contains_key(key) {
            Some(PoolState::Disabled)
        } else {
            None
        }
    }

    /// Record in the loaded pool, if present.
    pub fn get_loaded(&self, key: &str) -> Option<&UnitRecord> {
        self.loaded.get(key)
    }

    /// Record in the unloaded pool, if present.
    pub fn get_unloaded(&self, key: &str) -> Option<&UnitRecord> {
        self.unloaded.get(key)
    }

    /// Record in the disabled pool, if present.
    pub fn get_disabled(&self, key: &str) -> Option<&UnitRecord> {
        self.disabled.get(key)
    }

    /// Insert into the loaded pool, replacing any previous entry.
    pub fn put_loaded(&mut self, key: &str, record: UnitRecord) {
        self.loaded.insert(key.to_string(), record);
    }

    /// Park in the unloaded pool, replacing any previous parking.
    pub fn park_unloaded(&mut self, key: &str, record: UnitRecord) {
        self.unloaded.insert(key.to_string(), record);
    }

    /// Strict insert into the unloaded pool. False if the key was
    /// already parked; the caller treats that as an invariant violation.
    pub fn insert_unloaded(&mut self, key: &str, record: UnitRecord) -> bool {
        if self.unloaded.contains_key(key) {
            return false;
        }
        self.unloaded.insert(key.to_string(), record);
        true
    }

    /// Move into the disabled pool, replacing any previous entry.
    pub fn put_disabled(&mut self, key: &str, record: UnitRecord) {
        self.disabled.insert(key.to_string(), record);
    }

    /// Remove from the loaded pool.
    pub fn remove_loaded(&mut self, key: &str) -> Option<UnitRecord> {
        self.loaded.remove(key)
    }

    /// Remove from the unloaded pool.
    pub fn remove_unloaded(&mut self, key: &str) -> Option<UnitRecord> {
        self.unloaded.remove(key)
    }

    /// Remove from the disabled pool.
    pub fn remove_disabled(&mut self, key: &str) -> Option<UnitRecord> {
        self.disabled.remove(key)
    }

    /// Keys currently loaded, sorted.
    pub fn loaded_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.loaded.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Records currently parked, sorted by key.
    pub fn unloaded_records(&self) -> Vec<UnitRecord> {
        let mut records: Vec<UnitRecord> = self.unloaded.values().cloned().collect();
        records.sort_by_key(|r| r.qualified_name());
        records
    }

    /// Keys currently disabled, sorted.
    pub fn disabled_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.disabled.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every known unit exactly once, with its state, sorted by key.
    ///
    /// If a key transiently appears in more than one pool the strongest
    /// state wins (loaded over disabled over unloaded).
    pub fn snapshot(&self) -> Vec<(UnitRecord, PoolState)> {
        let mut by_key: HashMap<String, (UnitRecord, PoolState)> = HashMap::new();
        for (key, record) in &self.unloaded {
            by_key.insert(key.clone(), (record.clone(), PoolState::Unloaded));
        }
        for (key, record) in &self.disabled {
            by_key.insert(key.clone(), (record.clone(), PoolState::Disabled));
        }
        for (key, record) in &self.loaded {
            by_key.insert(key.clone(), (record.clone(), PoolState::Loaded));
        }

        let mut entries: Vec<(UnitRecord, PoolState)> = by_key.into_values().collect();
        entries.sort_by_key(|(record, _)| record.qualified_name());
        entries
    }

    /// Pool sizes as (loaded, unloaded, disabled).
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.loaded.len(), self.unloaded.len(), self.disabled.len())
    }
}
