//! settings::traits
//!
//! Settings store trait definition.
//!
//! # Design
//!
//! The `SettingsStore` trait is a small key-value interface. Keys are
//! namespaced `context.name` strings (e.g. "build.flavor"). The dispatcher
//! only reads through it while merging options; writes come from verbs
//! such as `lets.set`.
//!
//! # Durability
//!
//! Implementations that persist must make writes durable across process
//! restarts. Cross-process atomicity is the store's job, not the
//! dispatcher's.
//!
//! # Example
//!
//! ```
//! use lets::settings::{MemorySettingsStore, SettingValue, SettingsStore};
//!
//! let store = MemorySettingsStore::new();
//! store.set("build.flavor", SettingValue::text("release")).unwrap();
//! assert_eq!(
//!     store.get("build.flavor").unwrap(),
//!     Some(SettingValue::text("release"))
//! );
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use super::lock::LockError;
use super::value::SettingValue;

/// Errors from settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write settings file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("home directory not found")]
    NoHomeDir,

    #[error("invalid setting key '{0}', expected CONTEXT.NAME")]
    InvalidKey(String),

    #[error("invalid value for setting {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("unknown setting {0}")]
    UnknownSetting(String),

    #[error("ambiguous setting found. Use one of following settings: {}", .0.join(", "))]
    AmbiguousSetting(Vec<String>),

    #[error("setting {0} already exists")]
    DuplicateSetting(String),

    #[error("setting {0} is not a list or dict")]
    NotACollection(String),
}

impl SettingsError {
    pub(crate) fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Trait for settings storage providers.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait SettingsStore: Send + Sync {
    /// Get a setting by its `context.name` key.
    ///
    /// Returns `Ok(None)` if the setting was never stored.
    fn get(&self, key: &str) -> Result<Option<SettingValue>, SettingsError>;

    /// Store a setting, overwriting any existing value.
    fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError>;

    /// Every stored setting, keyed by `context.name`.
    fn entries(&self) -> Result<BTreeMap<String, SettingValue>, SettingsError>;

    /// Check if a setting is stored.
    ///
    /// Default implementation uses `get()` and checks for `Some`.
    fn exists(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Split a `context.name` key at its first `.`.
pub(crate) fn split_key(key: &str) -> Result<(&str, &str), SettingsError> {
    match key.split_once('.') {
        Some((context, name)) if !context.is_empty() && !name.is_empty() => Ok((context, name)),
        _ => Err(SettingsError::InvalidKey(key.to_string())),
    }
}
