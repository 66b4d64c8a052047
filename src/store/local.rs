//! Local key-value storage backing the favorites slot.
//!
//! [`JsonFileStorage`] keeps one `<key>.json` file per slot under a data directory
//! and writes atomically (temp file + rename), so a crash mid-write leaves the
//! previous value intact. [`MemoryStorage`] is the ephemeral equivalent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Minimal string key-value store
pub trait LocalStorage: Send + Sync {
    /// Value stored under `key`, or `None` if the slot was never written
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;
}

/// File-per-key storage under a directory.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens storage rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tracing::debug!(path = ?dir, "initializing local storage");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::InvalidInput(format!(
                "invalid storage key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl LocalStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.slot_path(key)?;
        let temp_path = path.with_extension("json.tmp");

        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;

        tracing::trace!(path = ?path, bytes = value.len(), "slot written");
        Ok(())
    }
}

/// In-memory storage; nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Internal("memory storage lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Internal("memory storage lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
