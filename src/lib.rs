//! # plexus - Plugin Lifecycle Runtime
//!
//! A lifecycle manager for pluggable systems inside long-running hosts:
//! - **Registry**: three disjoint pools (Loaded, Unloaded, Disabled)
//! - **Loader**: deduplicated bundle queue with serialized drains
//! - **Config**: persisted enablement snapshot keyed by qualified name
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use plexus::{Bundle, Plugin, PluginHost, TypeEntry};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Echo;
//!
//! #[async_trait]
//! impl Plugin for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn activate(&self) {
//!         println!("echo online");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = PluginHost::new("systems.json").unwrap();
//!     let bundle = Arc::new(Bundle::new("pack").with_export(TypeEntry::of::<Echo>()));
//!     host.install_bundle(bundle).await.unwrap();
//! }
//! ```

pub mod bundle;
pub mod command;
pub mod config;
pub mod core;
pub mod host;
pub mod monitoring;
pub mod plugin;
pub mod registry;

pub use crate::core::error::{Error, Result};
pub use crate::core::outcome::Outcome;

pub use bundle::{Bundle, BundleLoader, BundleRef};
pub use command::{CommandModule, CommandRegistry};
pub use config::{ConfigStore, ConfigSync};
pub use host::PluginHost;
pub use plugin::{
    Capability, CapabilitySet, ClientRef, HostClient, HostContext, Plugin, TypeEntry,
};
pub use registry::{LifecycleRegistry, PoolState, ScheduleHandle};
