//! core::registry
//!
//! The verb registry: `(context?, name)` to registration.
//!
//! # Lifecycle
//!
//! Contexts and verbs are registered once at startup, then the registry is
//! only read. The dispatcher enforces this by moving the registry into an
//! immutable `Dispatcher` once registration ends.
//!
//! # Invariants
//!
//! - At most one registration per `(context, name)` pair
//! - A verb's context, if any, was registered first
//!
//! The registry is generic over the callback reference `H` so the core
//! stays independent of how callbacks are invoked.

use thiserror::Error;

use super::naming::{Lookup, QualifiedIndex, Target};
use super::resolve::ResolveError;
use super::schema::OptionSchema;
use super::types::{ContextName, VerbId};

/// Errors from registration.
///
/// These are configuration errors: fatal at startup, never seen during
/// dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("verb {0} already exists")]
    DuplicateVerb(String),

    #[error("context {0} already exists")]
    DuplicateContext(String),

    #[error("verb {verb} refers to unknown context '{context}'")]
    UnknownContext { verb: String, context: String },
}

/// A registered context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub name: ContextName,
    pub description: String,
}

/// A verb, its option schema, its help text, and its callback.
#[derive(Debug, Clone)]
pub struct VerbRegistration<H> {
    pub verb: VerbId,
    pub schema: OptionSchema,
    pub callback: H,
    /// One-line summary shown in verb listings.
    pub summary: String,
    pub description: String,
    /// `(command line, explanation)` pairs shown in verb help.
    pub examples: Vec<(String, String)>,
}

impl<H> VerbRegistration<H> {
    pub fn new(verb: VerbId, schema: OptionSchema, callback: H) -> Self {
        Self {
            verb,
            schema,
            callback,
            summary: String::new(),
            description: String::new(),
            examples: Vec::new(),
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn example(mut self, command: impl Into<String>, explanation: impl Into<String>) -> Self {
        self.examples.push((command.into(), explanation.into()));
        self
    }
}

/// Registry of contexts and verbs.
#[derive(Debug, Clone)]
pub struct VerbRegistry<H> {
    contexts: Vec<ContextInfo>,
    verbs: QualifiedIndex<VerbRegistration<H>>,
}

impl<H> Default for VerbRegistry<H> {
    fn default() -> Self {
        Self {
            contexts: Vec::new(),
            verbs: QualifiedIndex::new(),
        }
    }
}

impl<H> VerbRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateContext`] if the name is taken.
    pub fn register_context(
        &mut self,
        name: ContextName,
        description: impl Into<String>,
    ) -> Result<(), RegistryError> {
        if self.has_context(name.as_str()) {
            return Err(RegistryError::DuplicateContext(name.to_string()));
        }
        self.contexts.push(ContextInfo {
            name,
            description: description.into(),
        });
        Ok(())
    }

    pub fn has_context(&self, name: &str) -> bool {
        self.contexts.iter().any(|c| c.name.as_str() == name)
    }

    pub fn contexts(&self) -> &[ContextInfo] {
        &self.contexts
    }

    /// Register a verb.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownContext`] if the verb's context is not registered
    /// - [`RegistryError::DuplicateVerb`] if `(context, name)` is already taken
    pub fn register(&mut self, reg: VerbRegistration<H>) -> Result<(), RegistryError> {
        let context = reg.verb.context.as_ref().map(ContextName::as_str);
        if let Some(context) = context {
            if !self.has_context(context) {
                return Err(RegistryError::UnknownContext {
                    verb: reg.verb.to_string(),
                    context: context.to_string(),
                });
            }
        }

        let name = reg.verb.name.as_str();
        if self.verbs.contains(context, name) {
            return Err(RegistryError::DuplicateVerb(reg.verb.to_string()));
        }

        let context = context.map(str::to_string);
        let name = name.to_string();
        self.verbs.insert(context.as_deref(), &name, reg);
        Ok(())
    }

    /// Exact lookup by context and name.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if no such verb exists.
    pub fn lookup_by_full(
        &self,
        context: &str,
        name: &str,
    ) -> Result<&VerbRegistration<H>, ResolveError> {
        self.verbs
            .get(Some(context), name)
            .ok_or_else(|| ResolveError::NotFound(Target::qualified(context, name).to_string()))
    }

    /// Lookup by bare name; succeeds only when exactly one registration
    /// owns that name.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] if no registration has this name
    /// - [`ResolveError::AmbiguousVerb`] listing every owner otherwise
    pub fn lookup_by_name(&self, name: &str) -> Result<&VerbRegistration<H>, ResolveError> {
        match self.verbs.lookup(&Target::bare(name)) {
            Lookup::Found(reg) => Ok(reg),
            Lookup::Ambiguous(regs) => Err(ResolveError::AmbiguousVerb(
                regs.into_iter().map(|r| r.verb.clone()).collect(),
            )),
            Lookup::Missing => Err(ResolveError::NotFound(name.to_string())),
        }
    }

    /// All registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &VerbRegistration<H>> {
        self.verbs.iter()
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }
}
