//! settings::file_store
//!
//! TOML file settings storage.
//!
//! # File Locations
//!
//! Searched in order:
//! 1. An explicit path (`--config`)
//! 2. `$LETS_CONFIG`
//! 3. `$XDG_CONFIG_HOME/lets/config.toml` (only if it exists)
//! 4. `~/.lets/config.toml` (canonical write location)
//!
//! # Format
//!
//! One table per context:
//!
//! ```toml
//! [build]
//! flavor = "release"
//! targets = ["app", "lib"]
//!
//! [build.env]
//! CC = "clang"
//! ```
//!
//! Native TOML scalars (`verbose = true`, `jobs = 4`) read as their text.
//! Entries with no setting shape, such as arrays of tables, are skipped with
//! a warning and left untouched by writes.
//!
//! A missing file reads as an empty store. Writes are atomic (temp file,
//! fsync, rename) and hold a [`SettingsLock`] for the whole
//! read-modify-write cycle.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::lock::SettingsLock;
use super::traits::{split_key, SettingsError, SettingsStore};
use super::value::SettingValue;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "LETS_CONFIG";

type Document = toml::Table;

/// Settings stored in a TOML file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Locate the settings file, honouring `explicit` then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoHomeDir`] when nothing else applies and
    /// the home directory cannot be determined.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let path = locate(
            explicit,
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        )?;
        tracing::debug!(path = %path.display(), "using settings file");
        Ok(Self { path })
    }

    /// The canonical write location, `~/.lets/config.toml`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
        Ok(home.join(".lets").join("config.toml"))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, SettingsError> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let content = toml::to_string_pretty(document)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(write_err)?;
            file.write_all(content.as_bytes()).map_err(write_err)?;
            file.sync_all().map_err(write_err)?;
        }

        fs::rename(&temp_path, &self.path).map_err(write_err)?;
        Ok(())
    }
}

/// Read one stored entry, warning when it has no setting shape.
fn convert(key: &str, raw: &toml::Value) -> Option<SettingValue> {
    let value = SettingValue::from_toml(raw);
    if value.is_none() {
        tracing::warn!(key, found = raw.type_str(), "unsupported settings value, ignoring");
    }
    value
}

/// Pick the settings file from the candidate sources.
fn locate(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
    xdg_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, SettingsError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    if let Some(xdg) = xdg_home {
        let path = xdg.join("lets").join("config.toml");
        if path.exists() {
            return Ok(path);
        }
    }
    let home = home.ok_or(SettingsError::NoHomeDir)?;
    Ok(home.join(".lets").join("config.toml"))
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<SettingValue>, SettingsError> {
        let (context, name) = split_key(key)?;
        let document = self.read_document()?;
        let Some(raw) = document
            .get(context)
            .and_then(toml::Value::as_table)
            .and_then(|table| table.get(name))
        else {
            return Ok(None);
        };
        Ok(convert(key, raw))
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let (context, name) = split_key(key)?;
        let encoded =
            toml::Value::try_from(&value).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        let mut lock = SettingsLock::acquire(&self.path)?;

        let mut document = self.read_document()?;
        let slot = document
            .entry(context.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if !slot.is_table() {
            tracing::warn!(context, "replacing non-table entry in settings file");
            *slot = toml::Value::Table(toml::Table::new());
        }
        if let toml::Value::Table(table) = slot {
            table.insert(name.to_string(), encoded);
        }
        self.write_document(&document)?;
        lock.release()?;

        tracing::debug!(key, path = %self.path.display(), "setting written");
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, SettingValue>, SettingsError> {
        let document = self.read_document()?;
        let mut entries = BTreeMap::new();
        for (context, table) in &document {
            let Some(table) = table.as_table() else {
                tracing::warn!(key = %context, "settings entry outside a context table, ignoring");
                continue;
            };
            for (name, raw) in table {
                let key = format!("{}.{}", context, name);
                if let Some(value) = convert(&key, raw) {
                    entries.insert(key, value);
                }
            }
        }
        Ok(entries)
    }
}
