use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::capabilities::StateStore;
use crate::error::{CacheError, IoError, Result};

/// Process-lifetime state.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), CacheError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// State kept in a flat JSON object on disk, rewritten on every `set`.
///
/// Reads and writes use blocking `std::fs`, so `set` blocks the calling
/// task for the duration of one small file write.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl JsonStateStore {
    /// Loads `path` if it exists; a missing file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values: HashMap<String, String> = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| IoError::read_error(&path, e))?;
            serde_json::from_str(&content)
                .map_err(|e| CacheError::corrupt_state(&path, e))?
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "opened state file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, values: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content)
    }
}

impl StateStore for JsonStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), CacheError> {
        let mut values = self.values();
        values.insert(key.to_string(), value.to_string());
        self.save(&values).map_err(|e| CacheError::state(key, e))
    }
}
