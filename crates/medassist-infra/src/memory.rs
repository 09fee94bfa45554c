//! In-memory key-value store.
//!
//! Backs `--ephemeral` runs and tests that need a real `KvStore` without a
//! database file. Contents are lost when the process exits.

use dashmap::DashMap;
use medassist_core::storage::kv_store::KvStore;
use medassist_types::error::StorageError;
use serde_json::Value;

/// `KvStore` over a concurrent hash map.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: DashMap<String, Value>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
