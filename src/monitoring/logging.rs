//! Tagged logging for plexus.
//!
//! A thin tag + message surface over the `tracing` macros, with a bounded
//! in-memory buffer so tests and operators can inspect recent entries.
//! Purely observational; no lifecycle decision reads the log.

use crate::core::{now, Timestamp};
use std::sync::RwLock;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug level
    Debug = 0,
    /// Info level
    Info = 1,
    /// Warning level
    Warn = 2,
    /// Error level
    Error = 3,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// A buffered log entry.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Timestamp
    pub timestamp: Timestamp,
    /// Log level
    pub level: LogLevel,
    /// Component tag
    pub tag: String,
    /// Message
    pub message: String,
}

/// Tagged logger.
pub struct Logger {
    /// Minimum level recorded
    min_level: LogLevel,
    /// Recent entries (bounded)
    buffer: RwLock<Vec<LogEntry>>,
    /// Maximum buffer size
    max_buffer: usize,
}

impl Logger {
    /// Create a logger recording at `min_level` and above.
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            buffer: RwLock::new(Vec::new()),
            max_buffer: 1000,
        }
    }

    /// Install a global `tracing` subscriber for binary hosts.
    ///
    /// Safe to call more than once; later calls are no-ops.
    pub fn init() {
        let _ = tracing_subscriber::fmt().try_init();
    }

    fn record(&self, level: LogLevel, tag: &str, message: &str) {
        if level < self.min_level {
            return;
        }

        {
            let mut buffer = self.buffer.write().unwrap();
            if buffer.len() >= self.max_buffer {
                buffer.remove(0);
            }
            buffer.push(LogEntry {
                timestamp: now(),
                level,
                tag: tag.to_string(),
                message: message.to_string(),
            });
        }

        match level {
            LogLevel::Debug => tracing::debug!(tag, "{}", message),
            LogLevel::Info => tracing::info!(tag, "{}", message),
            LogLevel::Warn => tracing::warn!(tag, "{}", message),
            LogLevel::Error => tracing::error!(tag, "{}", message),
        }
    }

    /// Log at info level.
    pub fn log(&self, tag: &str, message: &str) {
        self.record(LogLevel::Info, tag, message);
    }

    /// Log at debug level.
    pub fn debug(&self, tag: &str, message: &str) {
        self.record(LogLevel::Debug, tag, message);
    }

    /// Log at warn level.
    pub fn warn(&self, tag: &str, message: &str) {
        self.record(LogLevel::Warn, tag, message);
    }

    /// Log at error level.
    pub fn error(&self, tag: &str, message: &str) {
        self.record(LogLevel::Error, tag, message);
    }

    /// Buffered entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.read().unwrap().clone()
    }

    /// Buffered entries at or above a level.
    pub fn entries_at_level(&self, min_level: LogLevel) -> Vec<LogEntry> {
        self.buffer
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.level >= min_level)
            .cloned()
            .collect()
    }

    /// Clear the buffer.
    pub fn clear(&self) {
        self.buffer.write().unwrap().clear();
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
