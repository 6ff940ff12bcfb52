//! In-memory key-value store.

use super::KeyValueStore;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::io;

/// A `KeyValueStore` backed by a `HashMap`.
///
/// `fail_next_writes(n)` makes the next `n` writes fail with
/// `PersistenceWrite`, which lets callers exercise their retry paths.
/// `fail_reads_of(key)` makes every read of `key` fail until
/// `clear_read_failures` is called.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
    failing_writes: usize,
    failing_reads: HashSet<String>,
    write_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls to `set` or `remove` fail.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.failing_writes = count;
    }

    /// Make every `get` of `key` fail with an I/O error.
    pub fn fail_reads_of(&mut self, key: &str) {
        self.failing_reads.insert(key.to_string());
    }

    pub fn clear_read_failures(&mut self) {
        self.failing_reads.clear();
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn check_write(&mut self, key: &str) -> Result<()> {
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(Error::PersistenceWrite {
                key: key.to_string(),
                source: Box::new(io::Error::new(io::ErrorKind::Other, "injected failure")),
            });
        }
        self.write_count += 1;
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        if self.failing_reads.contains(key) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("injected read failure for '{}'", key),
            )));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.check_write(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
