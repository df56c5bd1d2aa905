//! Host facade.
//!
//! Wires the logger, config synchronizer, lifecycle registry, command
//! registry, and bundle loader into one object a long-running host owns.

use crate::bundle::{BundleLoader, BundleRef};
use crate::command::CommandRegistry;
use crate::config::ConfigSync;
use crate::core::{Outcome, Result};
use crate::monitoring::Logger;
use crate::plugin::{ClientRef, Plugin, TypeEntry};
use crate::registry::LifecycleRegistry;
use std::path::PathBuf;
use std::sync::Arc;

/// The plugin lifecycle runtime, fully wired.
pub struct PluginHost {
    registry: Arc<LifecycleRegistry>,
    loader: BundleLoader,
    commands: Arc<CommandRegistry>,
    config: Arc<ConfigSync>,
    logger: Arc<Logger>,
}

impl PluginHost {
    /// Create a host persisting unit state to `config_path`.
    pub fn new(config_path: impl Into<PathBuf>) -> Result<Self> {
        Self::build(config_path.into(), None)
    }

    /// Create a host with a client handle for client-bound units.
    pub fn with_client(config_path: impl Into<PathBuf>, client: ClientRef) -> Result<Self> {
        Self::build(config_path.into(), Some(client))
    }

    fn build(config_path: PathBuf, client: Option<ClientRef>) -> Result<Self> {
        let logger = Arc::new(Logger::default());
        if let Some(client) = &client {
            logger.debug("host", &format!("attached to {}", client.describe()));
        }

        let config = Arc::new(ConfigSync::load(config_path)?);
        let registry = Arc::new(LifecycleRegistry::new(
            config.clone(),
            client,
            logger.clone(),
        ));
        let commands = Arc::new(CommandRegistry::new());
        let loader = BundleLoader::new(registry.clone(), commands.clone(), logger.clone());

        Ok(Self {
            registry,
            loader,
            commands,
            config,
            logger,
        })
    }

    /// Enqueue a bundle without draining.
    pub fn enqueue(&self, bundle: BundleRef) -> Outcome {
        self.loader.install(bundle)
    }

    /// Drain the queue: scan, load, persist config, rebuild commands.
    pub async fn drain(&self) -> Result<()> {
        self.loader.drain().await
    }

    /// Enqueue a bundle and drain the queue.
    ///
    /// The returned outcome reports the enqueue decision (duplicate
    /// bundles are rejected); hard faults from the pass itself surface
    /// through the `Result`.
    pub async fn install_bundle(&self, bundle: BundleRef) -> Result<Outcome> {
        let outcome = self.loader.install(bundle);
        if !outcome.is_success() {
            return Ok(outcome);
        }
        self.loader.drain().await?;
        Ok(outcome)
    }

    /// Validate and load a `Default`-constructible plugin type.
    pub async fn install<P: Plugin + Default + 'static>(&self) -> Outcome {
        self.registry.install::<P>().await
    }

    /// Validate and load a hand-built type entry.
    pub async fn install_entry(&self, bundle_name: &str, entry: TypeEntry) -> Outcome {
        self.registry.install_entry(bundle_name, entry).await
    }

    /// Deactivate and park a loaded unit.
    pub async fn unload(&self, key: &str) -> Outcome {
        self.registry.unload_unit(key).await
    }

    /// Re-attempt every parked unit, then rebuild the command registry
    /// once.
    pub async fn retry_unloaded(&self) -> Vec<(String, Outcome)> {
        let results = self.registry.retry_unloaded().await;
        self.loader.reattach_commands();
        results
    }

    /// Lifecycle registry.
    pub fn registry(&self) -> &Arc<LifecycleRegistry> {
        &self.registry
    }

    /// Bundle loader.
    pub fn loader(&self) -> &BundleLoader {
        &self.loader
    }

    /// Dependent command registry.
    pub fn commands(&self) -> &Arc<CommandRegistry> {
        &self.commands
    }

    /// Config synchronizer.
    pub fn config(&self) -> &Arc<ConfigSync> {
        &self.config
    }

    /// Logging sink.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}
