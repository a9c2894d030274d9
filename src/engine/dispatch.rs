//! engine::dispatch
//!
//! Registration, then dispatch.
//!
//! # Lifecycle
//!
//! A [`DispatcherBuilder`] collects contexts, verbs, and settings. Every
//! registration error surfaces there, at startup. [`DispatcherBuilder::build`]
//! consumes the builder and yields a [`Dispatcher`] that can only be read,
//! so nothing is registered once dispatching starts.
//!
//! # Dispatch
//!
//! ```text
//! Received -> Resolved -> Classified -> Merged -> Dispatched
//!        \          \           \          \
//!         +----------+-----------+----------+--> Failed
//! ```
//!
//! Before classification two reserved words are handled, unless the verb's
//! schema declares them itself:
//!
//! - `help` anywhere in the options prints the verb's help and stops.
//! - `verbose` / `lets.verbose` turns on verbose output for this
//!   invocation and is removed from the options. Verbs of the built-in
//!   `lets` context see these words unchanged.

use std::collections::BTreeMap;

use crate::core::classify::classify;
use crate::core::merge::overlay;
use crate::core::naming::Target;
use crate::core::registry::{VerbRegistration, VerbRegistry};
use crate::core::resolve::{resolve, ResolveError};
use crate::core::schema::OptionSchema;
use crate::core::types::{ContextName, VerbId};
use crate::settings::value::parse_flag;
use crate::settings::{persisted_options, SettingDef, SettingRegistry, SettingValue, SettingsStore};
use crate::ui::output::Console;

use super::error::{BuildError, CallbackError, DispatchError};
use super::handler::{VerbCall, VerbHandler};
use super::help;
use super::invocation::{Invocation, Stage};

/// Context owning the built-in verbs and settings.
pub const BUILTIN_CONTEXT: &str = "lets";

/// Setting that turns verbose output on for every invocation.
pub const VERBOSE_SETTING: &str = "lets.verbose";

const HELP_WORD: &str = "help";
const VERBOSE_WORD: &str = "verbose";

/// A boxed verb callback.
pub type Handler = Box<dyn VerbHandler>;

/// A verb registration with a boxed callback.
pub type Registration = VerbRegistration<Handler>;

/// Registration phase.
pub struct DispatcherBuilder {
    program: String,
    about: String,
    registry: VerbRegistry<Handler>,
    settings: SettingRegistry,
}

impl DispatcherBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            about: String::new(),
            registry: VerbRegistry::new(),
            settings: SettingRegistry::new(),
        }
    }

    /// Description shown in the help overview.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = about.into();
        self
    }

    /// Register a context.
    pub fn context(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> Result<&mut Self, BuildError> {
        self.registry
            .register_context(ContextName::new(name)?, description)?;
        Ok(self)
    }

    /// Register a verb.
    pub fn verb(&mut self, registration: Registration) -> Result<&mut Self, BuildError> {
        tracing::debug!(verb = %registration.verb, "registering verb");
        self.registry.register(registration)?;
        Ok(self)
    }

    /// Register a verb from a `[CONTEXT.]NAME` target and a callback.
    ///
    /// # Example
    ///
    /// ```
    /// use lets::core::schema::{OptionDef, OptionSchema};
    /// use lets::engine::{CallbackError, DispatcherBuilder, VerbCall};
    ///
    /// let mut builder = DispatcherBuilder::new("lets");
    /// builder.context("build", "Build tasks").unwrap();
    /// builder
    ///     .verb_fn(
    ///         "build.compile",
    ///         OptionSchema::new(vec![OptionDef::toggle("clean")]).unwrap(),
    ///         "Compile the project",
    ///         |call: &mut VerbCall<'_>| -> Result<i32, CallbackError> {
    ///             Ok(if call.options.flag("clean") { 1 } else { 0 })
    ///         },
    ///     )
    ///     .unwrap();
    /// let dispatcher = builder.build();
    /// assert_eq!(dispatcher.registry().len(), 1);
    /// ```
    pub fn verb_fn<F>(
        &mut self,
        target: &str,
        schema: OptionSchema,
        summary: &str,
        handler: F,
    ) -> Result<&mut Self, BuildError>
    where
        F: Fn(&mut VerbCall<'_>) -> Result<i32, CallbackError>
            + Send
            + Sync
            + 'static,
    {
        let target = Target::parse(target);
        let verb = VerbId::parse_parts(target.context.as_deref().unwrap_or(""), &target.name)?;
        let handler: Handler = Box::new(handler);
        self.verb(VerbRegistration::new(verb, schema, handler).summary(summary))
    }

    /// Register a setting. Its context must already be registered.
    pub fn setting(&mut self, def: SettingDef) -> Result<&mut Self, BuildError> {
        if !self.registry.has_context(def.context.as_str()) {
            return Err(BuildError::UnknownSettingContext {
                setting: def.key(),
                context: def.context.to_string(),
            });
        }
        self.settings.register(def)?;
        Ok(self)
    }

    /// Finish registration.
    pub fn build(self) -> Dispatcher {
        tracing::debug!(
            verbs = self.registry.len(),
            settings = self.settings.len(),
            "registration complete"
        );
        Dispatcher {
            program: self.program,
            about: self.about,
            registry: self.registry,
            settings: self.settings,
        }
    }
}

/// Read-only dispatch phase.
pub struct Dispatcher {
    program: String,
    about: String,
    registry: VerbRegistry<Handler>,
    settings: SettingRegistry,
}

impl Dispatcher {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn registry(&self) -> &VerbRegistry<Handler> {
        &self.registry
    }

    pub fn settings(&self) -> &SettingRegistry {
        &self.settings
    }

    /// Resolve an invocation's target to a registration.
    pub fn resolve(&self, invocation: &Invocation) -> Result<&Registration, ResolveError> {
        resolve(
            &self.registry,
            invocation.raw_context.as_deref(),
            &invocation.raw_verb,
        )
    }

    /// Dispatch an already-tokenized argument list.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MissingVerb`] for an empty list, otherwise as
    /// [`Dispatcher::dispatch`].
    pub fn run(
        &self,
        args: &[String],
        store: &dyn SettingsStore,
        console: &mut Console,
    ) -> Result<i32, DispatchError> {
        let invocation = Invocation::from_args(args).ok_or(DispatchError::MissingVerb)?;
        self.dispatch(&invocation, store, console)
    }

    /// Dispatch one invocation and return the callback's exit status.
    ///
    /// Every failure before the callback aborts the dispatch; the callback
    /// never runs with partial options.
    pub fn dispatch(
        &self,
        invocation: &Invocation,
        store: &dyn SettingsStore,
        console: &mut Console,
    ) -> Result<i32, DispatchError> {
        let mut stage = Stage::Received;
        tracing::debug!(
            %stage,
            target = %invocation.target(),
            options = ?invocation.raw_options,
        );

        let result = self.run_stages(invocation, store, console, &mut stage);
        match &result {
            Ok(status) => tracing::debug!(stage = %Stage::Dispatched, status),
            Err(err) => tracing::debug!(stage = %Stage::Failed, after = %stage, error = %err),
        }
        result
    }

    fn run_stages(
        &self,
        invocation: &Invocation,
        store: &dyn SettingsStore,
        console: &mut Console,
        stage: &mut Stage,
    ) -> Result<i32, DispatchError> {
        let reg = self.resolve(invocation)?;
        *stage = Stage::Resolved;
        tracing::debug!(%stage, verb = %reg.verb);

        let mut raw_options = invocation.raw_options.clone();
        if !reg.schema.declares(HELP_WORD) && raw_options.iter().any(|o| o == HELP_WORD) {
            console.print(help::verb_help(&self.program, reg));
            return Ok(0);
        }

        let builtin = reg.verb.context.as_ref().map(ContextName::as_str) == Some(BUILTIN_CONTEXT);
        if !builtin && !reg.schema.declares(VERBOSE_WORD) {
            let before = raw_options.len();
            raw_options.retain(|o| o != VERBOSE_WORD && o != VERBOSE_SETTING);
            if raw_options.len() != before {
                console.set_verbose(true);
            }
        }

        let entries = store.entries()?;
        self.apply_stored_verbosity(&entries, console);
        for warning in self.audit(&entries) {
            tracing::warn!(%warning, "settings file");
            console.warn(warning);
        }

        let invoked =
            classify(&raw_options, &reg.schema).map_err(|source| DispatchError::Options {
                verb: reg.verb.to_string(),
                source,
            })?;
        *stage = Stage::Classified;
        tracing::debug!(%stage, invoked = invoked.len());

        let persisted = persisted_options(&reg.verb, &reg.schema, &entries)?;
        let options = overlay(&reg.schema, &persisted, &invoked);
        *stage = Stage::Merged;
        tracing::debug!(%stage, options = ?options);

        console.verbose(format!("running {}", reg.verb));
        let mut call = VerbCall {
            verb: &reg.verb,
            options,
            console,
            store,
            dispatcher: self,
        };
        reg.callback
            .invoke(&mut call)
            .map_err(|source| DispatchError::Callback {
                verb: reg.verb.to_string(),
                source,
            })
    }

    fn apply_stored_verbosity(
        &self,
        entries: &BTreeMap<String, SettingValue>,
        console: &mut Console,
    ) {
        if let Some(SettingValue::Text(value)) = entries.get(VERBOSE_SETTING) {
            if parse_flag(value) == Some(true) {
                console.set_verbose(true);
            }
        }
    }

    /// Warnings about stored entries no registration accounts for.
    ///
    /// A stored `ctx.key` is accounted for when it is a registered setting
    /// or feeds option `key` of a verb in context `ctx`.
    pub fn audit(&self, entries: &BTreeMap<String, SettingValue>) -> Vec<String> {
        let unclaimed: BTreeMap<String, SettingValue> = entries
            .iter()
            .filter(|(key, _)| !self.feeds_option(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.settings
            .audit(&unclaimed, |context| self.registry.has_context(context))
    }

    fn feeds_option(&self, key: &str) -> bool {
        self.registry.iter().any(|reg| {
            reg.schema
                .iter()
                .any(|def| reg.verb.setting_key(&def.key).as_deref() == Some(key))
        })
    }
}
