//! settings::lock
//!
//! Exclusive lock serializing writes to a settings file.
//!
//! # Storage
//!
//! - `<settings file>.lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - Held for the whole read-modify-write cycle of a settings update
//! - Released on drop
//! - Acquisition is non-blocking (fails fast if locked)
//!
//! Reads never take the lock; they only ever observe a complete file
//! because writes go through an atomic rename.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("settings are locked by another lets process")]
    AlreadyLocked,

    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on one settings file.
#[derive(Debug)]
pub struct SettingsLock {
    path: PathBuf,
    /// Some while the lock is held.
    file: Option<File>,
}

impl SettingsLock {
    /// The lock file guarding `settings_path`.
    pub fn lock_path_for(settings_path: &Path) -> PathBuf {
        let mut name = settings_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("settings"));
        name.push(".lock");
        settings_path.with_file_name(name)
    }

    /// Acquire the lock guarding `settings_path`.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(settings_path: &Path) -> Result<Self, LockError> {
        let path = Self::lock_path_for(settings_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    LockError::CreateFailed(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "settings lock acquired");
                Ok(Self {
                    path,
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(LockError::AlreadyLocked),
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock before the guard goes out of scope.
    ///
    /// Dropping a held guard releases it too, logging any failure.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for SettingsLock {
    fn drop(&mut self) {
        if self.is_held() {
            if let Err(e) = self.release() {
                tracing::warn!(path = %self.path.display(), error = %e, "settings lock not released");
            }
        }
    }
}
