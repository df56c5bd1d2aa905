//! Command registry.
//!
//! Secondary table of command modules, kept consistent with which plugins
//! are currently loaded. Rebuilds are full clears, not incremental diffs.

use crate::bundle::Bundle;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// A named group of commands contributed by one plugin type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandModule {
    /// Module name
    pub name: String,
    /// Command names exposed by the module
    pub commands: Vec<String>,
}

impl CommandModule {
    /// Create a new command module.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            commands: Vec::new(),
        }
    }

    /// Add a command.
    pub fn with_command(mut self, command: &str) -> Self {
        self.commands.push(command.to_string());
        self
    }
}

/// Registry of command modules.
pub struct CommandRegistry {
    /// Registered modules
    modules: RwLock<Vec<CommandModule>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            modules: RwLock::new(Vec::new()),
        }
    }

    /// All registered modules, in registration order.
    pub fn list_modules(&self) -> Vec<CommandModule> {
        self.modules.read().unwrap().clone()
    }

    /// Register a module.
    pub fn add_module(&self, module: CommandModule) {
        self.modules.write().unwrap().push(module);
    }

    /// Remove a module. Returns false if it was not registered.
    pub fn remove_module(&self, module: &CommandModule) -> bool {
        let mut modules = self.modules.write().unwrap();
        match modules.iter().position(|m| m == module) {
            Some(index) => {
                modules.remove(index);
                true
            }
            None => false,
        }
    }

    /// Register the modules of every admissible export in `bundle` whose
    /// qualified name appears in `loaded_keys`.
    ///
    /// Parked and disabled units contribute nothing; their commands become
    /// visible only once the unit itself loads.
    pub fn add_modules_from_bundle(&self, bundle: &Bundle, loaded_keys: &[String]) {
        for entry in bundle.exports() {
            if !entry.validate().is_success() {
                continue;
            }
            let key = bundle.qualified_name(entry.type_name());
            if !loaded_keys.iter().any(|k| k == &key) {
                continue;
            }
            for module in entry.modules() {
                self.add_module(module.clone());
            }
        }
    }

    /// Look a module up by name.
    pub fn find(&self, name: &str) -> Option<CommandModule> {
        self.modules
            .read()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.modules.read().unwrap().len()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
