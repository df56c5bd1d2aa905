//! Command Module
//!
//! The dependent registry rebuilt from currently loaded bundles:
//! - Command modules contributed by plugins
//! - Registry with full-rebuild reattachment

pub mod registry;

pub use registry::{CommandModule, CommandRegistry};
