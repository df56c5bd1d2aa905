//! Common types used across plexus modules.

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Strip leading module path segments from a fully-qualified type name.
///
/// `"my_bot::systems::Moderation"` becomes `"Moderation"`. Used for
/// display only; pool keys always use the full qualified name.
pub fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
