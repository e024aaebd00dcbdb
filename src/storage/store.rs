//! File-backed string key/value store.
//!
//! Mirrors browser local storage semantics: string keys, string values,
//! persisted as one JSON object in `storage.json`.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage file name inside the data directory
pub const STORAGE_FILE: &str = "storage.json";

pub struct LocalStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    /// A missing file is an empty store.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let path = data_dir.join(STORAGE_FILE);
        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file: {:?}", path))?;
            serde_json::from_str(&content).with_context(|| "Failed to parse storage JSON")?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, items })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Write all items back to disk
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.items).context("Failed to serialize storage")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write storage file: {:?}", self.path))?;
        debug!("Storage saved to {:?}", self.path);
        Ok(())
    }
}
