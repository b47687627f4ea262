use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Durable key-value storage for user preferences
pub trait PreferenceStorage: Send + Sync {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Preferences kept as a JSON object in a single file.
///
/// Writes go to a temporary file that is renamed over the original so a
/// crash never leaves a half-written preferences file behind.
#[derive(Debug)]
pub struct FilePreferenceStorage {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Storage backed by `preferences.json` in the configuration directory
    pub fn from_config(manager: &crate::config::ConfigManager) -> Self {
        Self::new(manager.preferences_file())
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let content =
            fs::read_to_string(&self.file_path).context("Failed to read preferences file")?;

        if content.trim().is_empty() {
            log::warn!("Preferences file is empty, treating as no preferences");
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                log::warn!(
                    "Preferences file {} is corrupted ({}), ignoring it",
                    self.file_path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }

        let json = serde_json::to_string_pretty(map).context("Failed to serialize preferences")?;
        let temp_path = self.file_path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary preferences file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write preferences")?;
        file.sync_all()
            .context("Failed to sync preferences file to disk")?;
        drop(file);

        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary preferences file")?;

        log::debug!("Saved preferences to {}", self.file_path.display());
        Ok(())
    }
}

impl PreferenceStorage for FilePreferenceStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value.to_string());
        self.write_all(&map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

/// In-process storage for tests and embedders without a writable disk
#[derive(Debug, Default)]
pub struct MemoryPreferenceStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferenceStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single pre-populated entry
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl PreferenceStorage for MemoryPreferenceStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

impl<T: PreferenceStorage + ?Sized> PreferenceStorage for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
