//! Persistence backends for settings values
//!
//! The registry only ever reads; writes belong to the host's form
//! submission path (see [`SqliteStore::save`]).

mod sqlite;

pub use sqlite::SqliteStore;

use super::types::ValueMap;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Read access to persisted settings, keyed by settings name
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Load every stored field value for `name`
    ///
    /// Returns an empty map when nothing was ever saved.
    async fn read(&self, name: &str) -> Result<ValueMap>;
}

/// In-memory store, used for embedding and tests
#[derive(Default)]
pub struct MemoryStore {
    options: RwLock<HashMap<String, ValueMap>>,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with values for one settings name
    pub fn with_option(self, name: &str, values: ValueMap) -> Self {
        self.insert(name, values);
        self
    }

    /// Replace the stored values for `name`
    pub fn insert(&self, name: &str, values: ValueMap) {
        let mut options = self.options.write().unwrap_or_else(|e| e.into_inner());
        options.insert(name.to_string(), values);
    }

    /// Number of reads served so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn read(&self, name: &str) -> Result<ValueMap> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let options = self.options.read().unwrap_or_else(|e| e.into_inner());
        Ok(options.get(name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_read() {
        let mut values = ValueMap::new();
        values.insert("apiKey".to_string(), json!("abc123"));
        let store = MemoryStore::new().with_option("voicewp_settings", values);

        let loaded = store.read("voicewp_settings").await.unwrap();
        assert_eq!(loaded.get("apiKey"), Some(&json!("abc123")));

        let missing = store.read("other").await.unwrap();
        assert!(missing.is_empty());

        assert_eq!(store.read_count(), 2);
    }
}
