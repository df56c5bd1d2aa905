//! Bundle loader queue.
//!
//! An ordered, reference-deduplicated queue of bundles awaiting a
//! scan-and-load pass. Draining is serialized: one worker drains the
//! queue to completion, then writes the config snapshot, then rebuilds
//! the command registry, strictly in that order.

use crate::bundle::source::{Bundle, BundleRef};
use crate::command::CommandRegistry;
use crate::core::{short_type_name, Outcome, Result};
use crate::monitoring::Logger;
use crate::registry::LifecycleRegistry;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const TAG: &str = "loader";

/// FIFO bundle queue with a separately tracked loaded set.
pub struct BundleLoader {
    /// Bundles awaiting a pass
    queue: Mutex<VecDeque<BundleRef>>,
    /// Bundles whose pass completed without a bundle-level error
    loaded: Mutex<Vec<BundleRef>>,
    /// Serializes drains so two passes never race the rebuild
    drain_lock: tokio::sync::Mutex<()>,
    /// Lifecycle registry performing the per-type loads
    registry: Arc<LifecycleRegistry>,
    /// Dependent registry rebuilt after every pass
    commands: Arc<CommandRegistry>,
    /// Logging sink
    logger: Arc<Logger>,
}

impl BundleLoader {
    /// Create a loader.
    pub fn new(
        registry: Arc<LifecycleRegistry>,
        commands: Arc<CommandRegistry>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            loaded: Mutex::new(Vec::new()),
            drain_lock: tokio::sync::Mutex::new(()),
            registry,
            commands,
            logger,
        }
    }

    /// Enqueue a bundle for the next drain.
    ///
    /// A bundle that already completed a pass is rejected; a duplicate
    /// still sitting in the queue is tolerated as a no-op. Both checks
    /// use reference identity.
    pub fn install(&self, bundle: BundleRef) -> Outcome {
        if self.is_loaded(&bundle) {
            return Outcome::failure(format!("Bundle {} is already loaded", bundle.name()));
        }

        let mut queue = self.queue.lock().unwrap();
        if queue.iter().any(|pending| Arc::ptr_eq(pending, &bundle)) {
            return Outcome::success();
        }
        queue.push_back(bundle);
        Outcome::success()
    }

    /// Drain the queue to completion.
    ///
    /// Pops bundles FIFO and loads each candidate sequentially in scan
    /// order. An individual unit failure stays with that unit; only a
    /// bundle-level scan error keeps a bundle out of the loaded set.
    /// After the queue empties the config snapshot is persisted and the
    /// command registry rebuilt.
    pub async fn drain(&self) -> Result<()> {
        let _guard = self.drain_lock.lock().await;

        loop {
            let bundle = self.queue.lock().unwrap().pop_front();
            let Some(bundle) = bundle else { break };

            // A re-enqueue that slipped in while this bundle was mid-load
            // must not produce a second pass.
            if self.is_loaded(&bundle) {
                self.logger
                    .debug(TAG, &format!("{} already loaded, skipping", bundle.name()));
                continue;
            }

            self.logger
                .log(TAG, &format!("Loading systems from {}", bundle.name()));
            match self.load_bundle(&bundle).await {
                Ok(()) => self.loaded.lock().unwrap().push(bundle),
                Err(err) => self.logger.error(TAG, &err.to_string()),
            }
        }
        self.logger.log(TAG, "Finished loading all bundles");

        self.registry.sync_config()?;
        self.reattach_commands();
        Ok(())
    }

    async fn load_bundle(&self, bundle: &Bundle) -> Result<()> {
        let candidates = bundle.scan()?;
        for entry in candidates {
            let outcome = self.registry.load_entry(bundle.name(), entry).await;
            if outcome.is_success() {
                self.logger.log(
                    TAG,
                    &format!("{} loaded successfully", short_type_name(entry.type_name())),
                );
            } else {
                self.logger.error(TAG, &outcome.to_string());
            }
        }
        Ok(())
    }

    /// Full rebuild of the command registry from the loaded bundles.
    ///
    /// Clears every registered module, then re-adds modules of units
    /// currently loaded. The registry is briefly empty mid-rebuild;
    /// serialized drains keep two rebuilds from interleaving.
    pub fn reattach_commands(&self) {
        for module in self.commands.list_modules() {
            self.commands.remove_module(&module);
        }

        let loaded_keys = self.registry.loaded_keys();
        let bundles = self.loaded.lock().unwrap().clone();
        for bundle in bundles {
            self.commands.add_modules_from_bundle(&bundle, &loaded_keys);
        }
    }

    /// Whether the bundle completed a pass.
    pub fn is_loaded(&self, bundle: &BundleRef) -> bool {
        self.loaded
            .lock()
            .unwrap()
            .iter()
            .any(|loaded| Arc::ptr_eq(loaded, bundle))
    }

    /// Bundles that completed a pass, in completion order.
    pub fn loaded_bundles(&self) -> Vec<BundleRef> {
        self.loaded.lock().unwrap().clone()
    }

    /// Number of bundles awaiting a pass.
    pub fn pending_len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandModule;
    use crate::config::{ConfigStore, ConfigSync};
    use crate::core::now;
    use crate::plugin::{Plugin, TypeEntry};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Probe {
        label: String,
        ready: AtomicBool,
        activations: AtomicUsize,
    }

    impl Probe {
        fn new(label: &str) -> Arc<Self> {
            Arc::new(Self {
                label: label.to_string(),
                ready: AtomicBool::new(true),
                activations: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Plugin for Probe {
        fn name(&self) -> &str {
            &self.label
        }

        async fn check_preconditions(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        async fn activate(&self) {
            self.activations.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn entry_for(probe: &Arc<Probe>, type_name: &str) -> TypeEntry {
        let instance: Arc<dyn Plugin> = probe.clone();
        TypeEntry::plugin(type_name, move |_| instance.clone())
    }

    fn temp_config(label: &str) -> PathBuf {
        let nanos = now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir().join(format!("plexus-loader-{}-{}.json", label, nanos))
    }

    fn loader_at(path: &PathBuf) -> BundleLoader {
        let logger = Arc::new(Logger::default());
        let config = Arc::new(ConfigSync::new(ConfigStore::empty(path)));
        let registry = Arc::new(LifecycleRegistry::new(config, None, logger.clone()));
        BundleLoader::new(registry, Arc::new(CommandRegistry::new()), logger)
    }

    #[tokio::test]
    async fn test_drain_loads_candidates_in_order() {
        let path = temp_config("order");
        let loader = loader_at(&path);
        let first = Probe::new("first");
        let second = Probe::new("second");

        let bundle: BundleRef = Arc::new(
            Bundle::new("pack")
                .with_export(entry_for(&first, "systems::First"))
                .with_export(entry_for(&second, "systems::Second")),
        );

        assert!(loader.install(bundle.clone()).is_success());
        loader.drain().await.unwrap();

        assert_eq!(loader.registry.counts(), (2, 0, 0));
        assert!(loader.is_loaded(&bundle));
        assert_eq!(loader.pending_len(), 0);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_pending_duplicate_is_noop() {
        let path = temp_config("pending");
        let loader = loader_at(&path);
        let bundle: BundleRef = Arc::new(Bundle::new("pack"));

        assert!(loader.install(bundle.clone()).is_success());
        assert!(loader.install(bundle).is_success());
        assert_eq!(loader.pending_len(), 1);
    }

    #[tokio::test]
    async fn test_loaded_duplicate_is_rejected() {
        let path = temp_config("dedup");
        let loader = loader_at(&path);
        let probe = Probe::new("probe");
        let bundle: BundleRef =
            Arc::new(Bundle::new("pack").with_export(entry_for(&probe, "systems::Probe")));

        loader.install(bundle.clone());
        loader.drain().await.unwrap();

        let outcome = loader.install(bundle.clone());
        assert!(!outcome.is_success());
        assert!(outcome.first_error().unwrap().contains("already loaded"));

        // Exactly one scan pass happened and one loaded-set entry exists.
        loader.drain().await.unwrap();
        assert_eq!(probe.activations.load(Ordering::SeqCst), 1);
        assert_eq!(loader.loaded_bundles().len(), 1);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_unit_failure_does_not_fail_bundle() {
        let path = temp_config("partial");
        let loader = loader_at(&path);
        let good = Probe::new("good");
        let stuck = Probe::new("stuck");
        stuck.ready.store(false, Ordering::SeqCst);

        let bundle: BundleRef = Arc::new(
            Bundle::new("pack")
                .with_export(
                    entry_for(&good, "systems::Good").with_module(
                        CommandModule::new("good-commands").with_command("ping"),
                    ),
                )
                .with_export(
                    entry_for(&stuck, "systems::Stuck").with_module(
                        CommandModule::new("stuck-commands").with_command("later"),
                    ),
                ),
        );

        loader.install(bundle.clone());
        loader.drain().await.unwrap();

        // The stuck unit stays parked; the bundle itself still counts as
        // loaded, and only the loaded unit's commands are visible.
        assert!(loader.is_loaded(&bundle));
        assert_eq!(loader.registry.counts(), (1, 1, 0));
        assert!(loader.commands.find("good-commands").is_some());
        assert!(loader.commands.find("stuck-commands").is_none());

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_malformed_bundle_not_recorded_loaded() {
        let path = temp_config("malformed");
        let loader = loader_at(&path);
        let probe = Probe::new("probe");

        let bundle: BundleRef = Arc::new(
            Bundle::new("pack")
                .with_export(entry_for(&probe, "systems::Dup"))
                .with_export(entry_for(&probe, "systems::Dup")),
        );

        loader.install(bundle.clone());
        loader.drain().await.unwrap();

        assert!(!loader.is_loaded(&bundle));
        assert!(loader
            .logger
            .entries_at_level(crate::monitoring::LogLevel::Error)
            .iter()
            .any(|entry| entry.message.contains("Malformed bundle")));

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_config_written_after_drain() {
        let path = temp_config("sync");
        let loader = loader_at(&path);
        let probe = Probe::new("probe");
        let bundle: BundleRef =
            Arc::new(Bundle::new("pack").with_export(entry_for(&probe, "systems::Probe")));

        loader.install(bundle);
        loader.drain().await.unwrap();

        let reloaded = ConfigSync::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(!reloaded.is_disabled("pack::systems::Probe"));

        std::fs::remove_file(&path).ok();
    }
}
