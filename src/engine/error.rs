//! engine::error
//!
//! Dispatch failures and their exit codes.
//!
//! # Exit codes
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | success (callbacks pass their own status through)     |
//! | 2    | verb or setting not found                             |
//! | 3    | ambiguous verb or setting                             |
//! | 4    | unrecognized option, missing value, invalid choice    |
//! | 5    | configuration error while registering verbs/settings  |
//! | 6    | settings could not be read, written, or interpreted   |
//! | 7    | callback failed                                       |
//! | 64   | usage error (no verb, bad verb arguments)             |

use thiserror::Error;

use crate::core::classify::ClassifyError;
use crate::core::registry::RegistryError;
use crate::core::resolve::ResolveError;
use crate::core::schema::SchemaError;
use crate::core::types::TypeError;
use crate::settings::SettingsError;

pub const EXIT_NOT_FOUND: i32 = 2;
pub const EXIT_AMBIGUOUS: i32 = 3;
pub const EXIT_OPTIONS: i32 = 4;
pub const EXIT_CONFIGURATION: i32 = 5;
pub const EXIT_SETTINGS: i32 = 6;
pub const EXIT_CALLBACK: i32 = 7;
pub const EXIT_USAGE: i32 = 64;

fn resolve_exit_code(err: &ResolveError) -> i32 {
    match err {
        ResolveError::NotFound(_) => EXIT_NOT_FOUND,
        ResolveError::AmbiguousVerb(_) => EXIT_AMBIGUOUS,
    }
}

/// Exit code for a settings failure.
fn settings_exit_code(err: &SettingsError) -> i32 {
    match err {
        SettingsError::UnknownSetting(_) => EXIT_NOT_FOUND,
        SettingsError::AmbiguousSetting(_) => EXIT_AMBIGUOUS,
        _ => EXIT_SETTINGS,
    }
}

/// Errors a verb callback reports.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The verb was called with arguments it cannot use.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

impl CallbackError {
    pub fn usage(message: impl Into<String>) -> Self {
        CallbackError::Usage(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        CallbackError::Failed(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CallbackError::Usage(_) => EXIT_USAGE,
            CallbackError::Resolve(err) => resolve_exit_code(err),
            CallbackError::Settings(err) => settings_exit_code(err),
            CallbackError::Io(_) | CallbackError::Failed(_) => EXIT_CALLBACK,
        }
    }
}

/// Errors while registering contexts, verbs, and settings.
///
/// Always a programming error in the registering code.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Name(#[from] TypeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Setting(#[from] SettingsError),

    #[error("setting {setting} refers to unknown context '{context}'")]
    UnknownSettingContext { setting: String, context: String },
}

impl BuildError {
    pub fn exit_code(&self) -> i32 {
        EXIT_CONFIGURATION
    }
}

/// Errors from dispatching one invocation.
///
/// Every variant aborts the dispatch before the callback runs, except
/// [`DispatchError::Callback`] which carries the callback's own failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no verb given")]
    MissingVerb,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{verb}: {source}")]
    Options {
        verb: String,
        #[source]
        source: ClassifyError,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("{verb} failed: {source}")]
    Callback {
        verb: String,
        #[source]
        source: CallbackError,
    },
}

impl DispatchError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::MissingVerb => EXIT_USAGE,
            DispatchError::Resolve(err) => resolve_exit_code(err),
            DispatchError::Options { .. } => EXIT_OPTIONS,
            DispatchError::Settings(err) => settings_exit_code(err),
            DispatchError::Callback { source, .. } => source.exit_code(),
        }
    }
}
