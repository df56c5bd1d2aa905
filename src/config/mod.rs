//! Config Module
//!
//! Persisted enablement state for every known unit:
//! - Snapshot store backed by a JSON file
//! - Synchronizer owning wholesale writes and disable lookups

pub mod store;
pub mod sync;

pub use store::{ConfigStore, UnitSettings};
pub use sync::ConfigSync;
