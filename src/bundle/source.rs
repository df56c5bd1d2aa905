//! Source bundles.
//!
//! A bundle is a logical package of candidate types, enumerated as an
//! explicit export table. Bundle identity is reference identity
//! (`Arc::ptr_eq`), not content equality.

use crate::core::{Error, Result};
use crate::plugin::TypeEntry;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared reference to a bundle. The loader queue and the loaded set
/// deduplicate on this reference.
pub type BundleRef = Arc<Bundle>;

/// An ordered package of candidate types.
#[derive(Debug)]
pub struct Bundle {
    /// Bundle name, the first half of every qualified name
    name: String,
    /// Export table, in scan order
    exports: Vec<TypeEntry>,
}

impl Bundle {
    /// Create an empty bundle.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exports: Vec::new(),
        }
    }

    /// Add an export. Order is preserved and determines scan order.
    pub fn with_export(mut self, entry: TypeEntry) -> Self {
        self.exports.push(entry);
        self
    }

    /// Bundle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full export table, including inadmissible entries.
    pub fn exports(&self) -> &[TypeEntry] {
        &self.exports
    }

    /// Globally-qualified name for a type exported by this bundle.
    pub fn qualified_name(&self, type_name: &str) -> String {
        format!("{}::{}", self.name, type_name)
    }

    /// Admissible candidate types, in export order.
    ///
    /// A duplicate exported type name is a bundle-level error; individual
    /// inadmissible entries are simply filtered out.
    pub fn scan(&self) -> Result<Vec<&TypeEntry>> {
        let mut seen = HashSet::new();
        for entry in &self.exports {
            if !seen.insert(entry.type_name()) {
                return Err(Error::MalformedBundle(
                    self.name.clone(),
                    entry.type_name().to_string(),
                ));
            }
        }

        Ok(self
            .exports
            .iter()
            .filter(|entry| entry.validate().is_success())
            .collect())
    }
}
