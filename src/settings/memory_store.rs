//! settings::memory_store
//!
//! In-memory settings storage for tests and embedders that persist
//! settings themselves.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::traits::{split_key, SettingsError, SettingsStore};
use super::value::SettingValue;

/// Settings held in process memory.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<BTreeMap<String, SettingValue>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: Into<String>,
    {
        Self {
            values: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, SettingsError> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        split_key(key)?;
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, SettingValue>, SettingsError> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.clone())
    }
}
