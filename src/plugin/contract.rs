//! Plugin contract definition.
//!
//! Defines the lifecycle interface plugins must implement and the
//! capability tags they may declare.

use crate::config::ConfigSync;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Opaque handle to the host's client connection.
///
/// The runtime never interprets the client beyond handing it to plugins
/// that declare [`Capability::ClientBound`] and describing it in logs.
pub trait HostClient: Send + Sync {
    /// Short human-readable description, used in log output.
    fn describe(&self) -> String {
        "host client".to_string()
    }
}

/// Shared reference to the host client.
pub type ClientRef = Arc<dyn HostClient>;

/// Capability tag a plugin may declare.
///
/// Tags replace runtime type inspection: the registry checks set
/// membership instead of downcasting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Receives the host client handle after activation.
    ClientBound,
    /// Cannot be disabled through the config snapshot.
    Vital,
    /// Named capability expansion.
    Expansion(String),
}

/// Set of capability tags declared by a plugin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    tags: HashSet<Capability>,
}

impl CapabilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag.
    pub fn with(mut self, tag: Capability) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Check tag membership.
    pub fn contains(&self, tag: &Capability) -> bool {
        self.tags.contains(tag)
    }

    /// Whether the plugin is marked vital.
    pub fn is_vital(&self) -> bool {
        self.contains(&Capability::Vital)
    }

    /// Whether the plugin wants the host client handle.
    pub fn is_client_bound(&self) -> bool {
        self.contains(&Capability::ClientBound)
    }

    /// Names of all declared expansions.
    pub fn expansions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tags
            .iter()
            .filter_map(|tag| match tag {
                Capability::Expansion(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of declared tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tags are declared.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Minimal hooks a plugin may need at construction time.
#[derive(Clone)]
pub struct HostContext {
    /// Host client handle, if the host has one.
    pub client: Option<ClientRef>,
    /// Handle to the persisted config snapshot.
    pub config: Arc<ConfigSync>,
}

impl HostContext {
    /// Create a new context.
    pub fn new(client: Option<ClientRef>, config: Arc<ConfigSync>) -> Self {
        Self { client, config }
    }
}

/// Lifecycle contract all plugins must implement.
///
/// Preconditions and the two lifecycle hooks are the only operations
/// allowed to suspend; everything else must return without blocking.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Declared capability tags.
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new()
    }

    /// Readiness check gating activation. May suspend; no timeout is
    /// imposed. Returning false parks the plugin for a later retry.
    async fn check_preconditions(&self) -> bool {
        true
    }

    /// Activation hook. May suspend.
    async fn activate(&self) {}

    /// Deactivation hook. May suspend.
    async fn deactivate(&self) {}

    /// Client-binding hook, invoked after activation for plugins that
    /// declare [`Capability::ClientBound`].
    async fn apply_to_client(&self, _client: &ClientRef) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_set_builder() {
        let caps = CapabilitySet::new()
            .with(Capability::Vital)
            .with(Capability::Expansion("scheduler".to_string()));

        assert!(caps.is_vital());
        assert!(!caps.is_client_bound());
        assert_eq!(caps.expansions(), ["scheduler"]);
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn test_capability_set_dedup() {
        let caps = CapabilitySet::new()
            .with(Capability::Vital)
            .with(Capability::Vital);
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn test_expansions_sorted() {
        let caps = CapabilitySet::new()
            .with(Capability::Expansion("b".to_string()))
            .with(Capability::Expansion("a".to_string()));
        assert_eq!(caps.expansions(), ["a", "b"]);
    }

    struct Quiet;

    #[async_trait]
    impl Plugin for Quiet {
        fn name(&self) -> &str {
            "quiet"
        }
    }

    #[tokio::test]
    async fn test_default_hooks() {
        let plugin = Quiet;
        assert!(plugin.check_preconditions().await);
        plugin.activate().await;
        plugin.deactivate().await;
        assert!(plugin.capabilities().is_empty());
    }
}
