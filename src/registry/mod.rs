//! Registry Module
//!
//! Lifecycle state for every known unit:
//! - Three disjoint pools (Loaded, Unloaded, Disabled)
//! - The lifecycle registry enforcing state-machine transitions
//! - Per-unit scheduled-task handles

pub mod lifecycle;
pub mod pools;
pub mod schedule;

pub use lifecycle::LifecycleRegistry;
pub use pools::{PoolState, Pools, UnitRecord};
pub use schedule::ScheduleHandle;
