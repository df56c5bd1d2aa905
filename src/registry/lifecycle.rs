//! Lifecycle registry.
//!
//! Owns the three pools and every transition between them. All pool
//! mutation goes through these operations; external callers never touch a
//! pool directly. The pool mutex is never held across an await point, so
//! the remove/insert pair around a suspending hook is two-phase. A failed
//! phase is reported, never silently dropped.

use crate::config::{ConfigSync, UnitSettings};
use crate::core::{Outcome, Result};
use crate::monitoring::Logger;
use crate::plugin::{ClientRef, HostContext, Plugin, TypeEntry};
use crate::registry::pools::{PoolState, Pools, UnitRecord};
use crate::registry::schedule::ScheduleHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const TAG: &str = "registry";

/// Registry of unit lifecycle state.
pub struct LifecycleRegistry {
    /// The three pools, guarded by one mutex for the whole registry
    pools: Mutex<Pools>,
    /// Per-unit scheduled-task handles, cancelled on unload
    schedules: Mutex<HashMap<String, ScheduleHandle>>,
    /// Persisted enablement snapshot
    config: Arc<ConfigSync>,
    /// Host client handle passed to client-bound units
    client: Option<ClientRef>,
    /// Logging sink
    logger: Arc<Logger>,
}

impl LifecycleRegistry {
    /// Create a registry.
    pub fn new(config: Arc<ConfigSync>, client: Option<ClientRef>, logger: Arc<Logger>) -> Self {
        Self {
            pools: Mutex::new(Pools::new()),
            schedules: Mutex::new(HashMap::new()),
            config,
            client,
            logger,
        }
    }

    /// Validate `P`, aggregating every violation, and load it only when
    /// all checks pass. The defining bundle name is the first path
    /// segment of the type name (the defining crate).
    pub async fn install<P: Plugin + Default + 'static>(&self) -> Outcome {
        let entry = TypeEntry::of::<P>();
        let bundle = entry
            .type_name()
            .split("::")
            .next()
            .unwrap_or("host")
            .to_string();
        self.install_entry(&bundle, entry).await
    }

    /// Validate a hand-built entry and load it only when every check
    /// passes.
    pub async fn install_entry(&self, bundle_name: &str, entry: TypeEntry) -> Outcome {
        let check = entry.validate();
        if !check.is_success() {
            return check;
        }
        self.load_entry(bundle_name, &entry).await
    }

    /// Attempt to load one candidate type.
    ///
    /// Idempotent: a no-op success when the unit is already loaded. A
    /// parked instance (unloaded or disabled) is reused so plugin state
    /// survives retries; otherwise the entry is validated and a fresh
    /// instance constructed.
    pub async fn load_entry(&self, bundle_name: &str, entry: &TypeEntry) -> Outcome {
        let key = format!("{}::{}", bundle_name, entry.type_name());

        let parked = {
            let pools = self.pools.lock().unwrap();
            if pools.get_loaded(&key).is_some() {
                return Outcome::success();
            }
            pools
                .get_unloaded(&key)
                .or_else(|| pools.get_disabled(&key))
                .cloned()
        };

        let record = match parked {
            Some(record) => record,
            None => {
                let check = entry.validate();
                if !check.is_success() {
                    return check;
                }

                let ctx = HostContext::new(self.client.clone(), self.config.clone());
                let plugin = match entry.construct(&ctx) {
                    Some(plugin) => plugin,
                    None => {
                        return Outcome::failure(format!(
                            "{} passed validation but has no constructor",
                            entry.type_name()
                        ))
                    }
                };

                let record = UnitRecord::new(bundle_name, entry.clone(), plugin);
                let expansions = record.capabilities().expansions();
                if !expansions.is_empty() {
                    self.logger.debug(
                        TAG,
                        &format!("{} declares expansions [{}]", key, expansions.join(", ")),
                    );
                }
                record
            }
        };

        self.load_unit(record).await
    }

    /// Gated load of an instantiated unit.
    ///
    /// Order of gates: re-validation, config disable, then the
    /// precondition check. Config disable wins regardless of precondition
    /// outcome, and the activation hook never runs for a disabled unit.
    pub async fn load_unit(&self, record: UnitRecord) -> Outcome {
        let key = record.qualified_name();

        let check = record.descriptor().validate();
        if !check.is_success() {
            return check;
        }

        if self.config.is_disabled(&key) {
            if record.capabilities().is_vital() {
                self.logger.warn(
                    TAG,
                    &format!("{} is disabled by config but vital; loading anyway", key),
                );
            } else {
                {
                    let mut pools = self.pools.lock().unwrap();
                    pools.remove_unloaded(&key);
                    pools.put_disabled(&key, record);
                }
                return Outcome::failure(format!(
                    "{} is disabled by config ({})",
                    key,
                    self.config.path().display()
                ));
            }
        }

        if !record.plugin().check_preconditions().await {
            {
                let mut pools = self.pools.lock().unwrap();
                pools.remove_disabled(&key);
                pools.park_unloaded(&key, record.clone());
            }
            return Outcome::failure(format!(
                "Preconditions failed for {}",
                record.display_name()
            ));
        }

        {
            let mut pools = self.pools.lock().unwrap();
            pools.remove_unloaded(&key);
            pools.remove_disabled(&key);
        }

        record.plugin().activate().await;

        if record.capabilities().is_client_bound() {
            if let Some(client) = &self.client {
                record.plugin().apply_to_client(client).await;
            }
        }

        self.pools.lock().unwrap().put_loaded(&key, record);
        Outcome::success()
    }

    /// Deactivate a loaded unit and park it for a later retry.
    ///
    /// No-op success when already parked; fails when the unit is not
    /// currently loaded. A failed pool removal or insertion afterwards is
    /// an invariant violation and is reported as such.
    pub async fn unload_unit(&self, key: &str) -> Outcome {
        let record = {
            let pools = self.pools.lock().unwrap();
            if pools.get_unloaded(key).is_some() {
                return Outcome::success();
            }
            match pools.get_loaded(key) {
                Some(record) => record.clone(),
                None => return Outcome::failure(format!("{} was not loaded", key)),
            }
        };

        let check = record.descriptor().validate();
        if !check.is_success() {
            return check;
        }

        record.plugin().deactivate().await;
        self.cancel_schedule(key);

        let mut pools = self.pools.lock().unwrap();
        if pools.remove_loaded(key).is_none() {
            return Outcome::failure(format!(
                "Could not remove {} from the loaded pool. Please report this to the plexus maintainers.",
                key
            ));
        }
        if !pools.insert_unloaded(key, record) {
            return Outcome::failure(format!(
                "Could not park {} in the unloaded pool. Please report this to the plexus maintainers.",
                key
            ));
        }

        Outcome::success()
    }

    /// Re-attempt every parked unit, sequentially, in key order.
    ///
    /// Never touches the disabled pool. Returns per-unit outcomes; the
    /// caller triggers one dependent-registry reattachment afterwards.
    pub async fn retry_unloaded(&self) -> Vec<(String, Outcome)> {
        let parked = self.pools.lock().unwrap().unloaded_records();

        let mut results = Vec::with_capacity(parked.len());
        for record in parked {
            let key = record.qualified_name();
            let outcome = self.load_unit(record).await;
            if outcome.is_success() {
                self.logger.log(TAG, &format!("{} loaded on retry", key));
            } else {
                self.logger
                    .debug(TAG, &format!("{} still parked: {}", key, outcome));
            }
            results.push((key, outcome));
        }
        results
    }

    /// True only if the config snapshot explicitly disables the unit.
    pub fn is_config_disabled(&self, record: &UnitRecord) -> bool {
        self.config.is_disabled(&record.qualified_name())
    }

    /// Persist the lifecycle state of every known unit, wholesale.
    ///
    /// Loaded and parked units persist as enabled (parked still wants to
    /// load); disabled units persist as disabled; vital units always
    /// persist as enabled.
    pub fn sync_config(&self) -> Result<()> {
        let snapshot = self.pools.lock().unwrap().snapshot();

        let mut units = HashMap::new();
        for (record, state) in snapshot {
            let enabled = record.capabilities().is_vital() || state != PoolState::Disabled;
            units.insert(record.qualified_name(), UnitSettings { enabled });
        }
        self.config.replace_and_persist(units)
    }

    /// Attach a scheduled-task handle to a unit, cancelling any previous
    /// one. The handle is cancelled when the unit unloads.
    pub fn attach_schedule(&self, key: &str, handle: ScheduleHandle) {
        if let Some(previous) = self
            .schedules
            .lock()
            .unwrap()
            .insert(key.to_string(), handle)
        {
            previous.cancel();
        }
    }

    /// Cancel and drop a unit's scheduled-task handle, if any.
    pub fn cancel_schedule(&self, key: &str) {
        if let Some(handle) = self.schedules.lock().unwrap().remove(key) {
            handle.cancel();
        }
    }

    /// Whether a unit currently has a scheduled-task handle.
    pub fn has_schedule(&self, key: &str) -> bool {
        self.schedules.lock().unwrap().contains_key(key)
    }

    /// Which pool holds `key`, if it has been seen.
    pub fn state_of(&self, key: &str) -> Option<PoolState> {
        self.pools.lock().unwrap().state_of(key)
    }

    /// Keys currently loaded, sorted.
    pub fn loaded_keys(&self) -> Vec<String> {
        self.pools.lock().unwrap().loaded_keys()
    }

    /// Keys currently disabled, sorted.
    pub fn disabled_keys(&self) -> Vec<String> {
        self.pools.lock().unwrap().disabled_keys()
    }

    /// Pool sizes as (loaded, unloaded, disabled).
    pub fn counts(&self) -> (usize, usize, usize) {
        self.pools.lock().unwrap().counts()
    }

    /// The record for a known unit, wherever it currently lives.
    pub fn record(&self, key: &str) -> Option<UnitRecord> {
        let pools = self.pools.lock().unwrap();
        pools
            .get_loaded(key)
            .or_else(|| pools.get_unloaded(key))
            .or_else(|| pools.get_disabled(key))
            .cloned()
    }
}
