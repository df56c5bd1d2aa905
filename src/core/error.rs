//! Error types for plexus.

use thiserror::Error;

/// Result type alias for plexus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard faults that can occur in plexus operations.
///
/// Expected lifecycle outcomes (validation failures, config-disabled
/// units, failed preconditions) are reported through
/// [`Outcome`](crate::core::Outcome), not through this enum.
#[derive(Error, Debug)]
pub enum Error {
    // Bundle errors
    #[error("Malformed bundle {0}: duplicate exported type {1}")]
    MalformedBundle(String, String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
