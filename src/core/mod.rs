//! Core utilities and common types for plexus.

pub mod error;
pub mod outcome;
pub mod types;

pub use error::{Error, Result};
pub use outcome::Outcome;
pub use types::*;
