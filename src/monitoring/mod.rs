//! Monitoring Module
//!
//! Observational surfaces:
//! - Tagged logging with an inspectable buffer

pub mod logging;

pub use logging::{LogEntry, LogLevel, Logger};
