//! Persistent key-value storage for Inkpad
//!
//! The editor persists everything through a small get/set/remove interface
//! with no transactions: each key is written wholesale and the last writer
//! wins. Two backends are provided:
//!
//! - `JsonFileStore` - one JSON object on disk, rewritten atomically per write
//! - `MemoryStore` - in-process map, with optional write-failure injection
//!
//! # Keys
//!
//! | Key              | Payload                                     |
//! |------------------|---------------------------------------------|
//! | `editorData`     | `{ tabs, activeTabId, theme, timestamp }`   |
//! | `editorSettings` | `{ theme, isCodeMode }`                     |
//! | `passwordHash`   | hex string                                  |
//! | `isLocked`       | bool                                        |
//! | `githubToken`    | obfuscated token string                     |

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────────────────────────

pub const EDITOR_DATA_KEY: &str = "editorData";
/// Unreadable `editorData` is moved here before it is overwritten.
pub const EDITOR_DATA_BACKUP_KEY: &str = "editorData.corrupt";
pub const EDITOR_SETTINGS_KEY: &str = "editorSettings";
pub const PASSWORD_HASH_KEY: &str = "passwordHash";
pub const IS_LOCKED_KEY: &str = "isLocked";
pub const GITHUB_TOKEN_KEY: &str = "githubToken";

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A key-value backend holding JSON values.
///
/// Every call completes before returning; a successful `set` is durable as
/// far as the backend can guarantee.
pub trait KeyValueStore {
    /// Read a key. Returns `Ok(None)` for keys that were never written.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a key, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read and deserialize a key.
pub fn read_key<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::ConfigParse {
                message: format!("Stored '{}' is malformed: {}", key, e),
                source: Some(Box::new(e)),
            }),
        None => Ok(None),
    }
}

/// Serialize and write a key.
pub fn write_key<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|e| Error::PersistenceWrite {
        key: key.to_string(),
        source: Box::new(e),
    })?;
    store.set(key, value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
