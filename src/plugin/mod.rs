//! Plugin Module
//!
//! The pluggable-unit contract and registration records:
//! - Plugin trait and capability tags
//! - Host-side handles passed to plugins
//! - Type entries and admissibility validation

pub mod contract;
pub mod descriptor;

pub use contract::{Capability, CapabilitySet, ClientRef, HostClient, HostContext, Plugin};
pub use descriptor::{PluginCtor, TypeEntry};
