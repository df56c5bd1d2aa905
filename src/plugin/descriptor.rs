//! Type entries and admissibility validation.
//!
//! Bundles enumerate their candidate types as explicit [`TypeEntry`]
//! records instead of being scanned through reflection. The validator
//! decides which entries are admissible plugins.

use crate::command::CommandModule;
use crate::core::Outcome;
use crate::plugin::contract::{HostContext, Plugin};
use std::sync::Arc;

/// No-argument plugin constructor.
///
/// The context carries the only hooks a plugin may need at construction
/// time (client handle, config handle).
pub type PluginCtor = Arc<dyn Fn(&HostContext) -> Arc<dyn Plugin> + Send + Sync>;

/// Registration record for one candidate type exported by a bundle.
#[derive(Clone)]
pub struct TypeEntry {
    type_name: String,
    implements_plugin: bool,
    is_abstract: bool,
    is_public: bool,
    ctor: Option<PluginCtor>,
    modules: Vec<CommandModule>,
}

impl TypeEntry {
    /// Entry for a concrete public plugin type with an explicit constructor.
    pub fn plugin(
        type_name: impl Into<String>,
        ctor: impl Fn(&HostContext) -> Arc<dyn Plugin> + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            implements_plugin: true,
            is_abstract: false,
            is_public: true,
            ctor: Some(Arc::new(ctor)),
            modules: Vec::new(),
        }
    }

    /// Entry for a plugin type constructed through `Default`.
    pub fn of<P: Plugin + Default + 'static>() -> Self {
        Self::plugin(std::any::type_name::<P>(), |_ctx| {
            let plugin: Arc<dyn Plugin> = Arc::new(P::default());
            plugin
        })
    }

    /// Entry for an abstract base type. Listed by bundles for completeness
    /// but never instantiable.
    pub fn abstract_base(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            implements_plugin: true,
            is_abstract: true,
            is_public: true,
            ctor: None,
            modules: Vec::new(),
        }
    }

    /// Entry for an exported type that does not implement the Plugin
    /// contract (helper types a bundle exports alongside its plugins).
    pub fn foreign(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            implements_plugin: false,
            is_abstract: false,
            is_public: true,
            ctor: None,
            modules: Vec::new(),
        }
    }

    /// Mark the entry as not publicly constructible.
    pub fn internal(mut self) -> Self {
        self.is_public = false;
        self
    }

    /// Attach a command module contributed by this type.
    pub fn with_module(mut self, module: CommandModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Fully-qualified type name within the defining bundle.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Command modules contributed by this type.
    pub fn modules(&self) -> &[CommandModule] {
        &self.modules
    }

    /// Validate admissibility, producing one error per violated rule.
    ///
    /// Rules are checked independently, not short-circuited, so all
    /// violations for a candidate are reported at once.
    pub fn validate(&self) -> Outcome {
        let mut errors = Vec::new();

        if !self.implements_plugin {
            errors.push(format!(
                "{} does not implement the Plugin contract",
                self.type_name
            ));
        }
        if self.is_abstract {
            errors.push(format!("{} is abstract", self.type_name));
        }
        if !self.is_public || self.ctor.is_none() {
            errors.push(format!(
                "{} is not publicly constructible with a no-argument constructor",
                self.type_name
            ));
        }

        Outcome::from_errors(errors)
    }

    /// Construct a fresh instance. Returns None for entries without a
    /// public constructor; callers must validate first.
    pub fn construct(&self, ctx: &HostContext) -> Option<Arc<dyn Plugin>> {
        self.ctor.as_ref().map(|ctor| ctor(ctx))
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry")
            .field("type_name", &self.type_name)
            .field("implements_plugin", &self.implements_plugin)
            .field("is_abstract", &self.is_abstract)
            .field("is_public", &self.is_public)
            .field("has_ctor", &self.ctor.is_some())
            .field("modules", &self.modules.len())
            .finish()
    }
}
