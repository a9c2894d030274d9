//! settings
//!
//! Persisted settings: the store behind every option's middle tier.
//!
//! # Modules
//!
//! - [`traits`] - `SettingsStore` trait and `SettingsError`
//! - [`value`] - Setting values (text, list, map)
//! - [`file_store`] - TOML file store with atomic writes
//! - [`memory_store`] - In-memory store
//! - [`lock`] - Advisory lock serializing writes
//! - [`definitions`] - Registered settings and value edits
//! - [`snapshot`] - Persisted option values for one verb

pub mod definitions;
pub mod file_store;
pub mod lock;
pub mod memory_store;
pub mod snapshot;
pub mod traits;
pub mod value;

pub use definitions::{SettingDef, SettingRegistry};
pub use file_store::FileSettingsStore;
pub use lock::{LockError, SettingsLock};
pub use memory_store::MemorySettingsStore;
pub use snapshot::persisted_options;
pub use traits::{SettingsError, SettingsStore};
pub use value::SettingValue;
