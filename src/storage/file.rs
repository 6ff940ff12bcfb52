//! JSON-file-backed key-value store.
//!
//! The whole store is one JSON object kept in memory and rewritten to disk
//! on every mutation. A missing or corrupted file opens as an empty store.

use super::KeyValueStore;
use crate::config::{get_data_dir, write_atomic};
use crate::error::{Error, Result};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Store file name inside the data directory
const STORE_FILE_NAME: &str = "storage.json";

/// A `KeyValueStore` persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(get_data_dir()?.join(STORE_FILE_NAME)))
    }

    /// Open the store at `path`. Never fails: unreadable content is logged
    /// and replaced by an empty store on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Store at {} could not be read ({}), starting empty",
                    path.display(),
                    e
                );
                Map::new()
            }
        };
        info!(
            "Opened store {} with {} key(s)",
            path.display(),
            entries.len()
        );
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::ConfigParse {
                message: format!("expected a JSON object, found {}", type_name(&other)),
                source: None,
            }),
        }
    }

    fn flush(&self, key: &str) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.entries).map_err(|e| Error::PersistenceWrite {
            key: key.to_string(),
            source: Box::new(e),
        })?;
        write_atomic(&self.path, &json).map_err(|e| Error::PersistenceWrite {
            key: key.to_string(),
            source: Box::new(e),
        })?;
        debug!("Store flushed after writing '{}'", key);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.flush(key) {
            // Keep memory consistent with disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(key) {
            self.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
