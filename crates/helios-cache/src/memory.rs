//! In-process fallback tier.
//!
//! One record per key, swapped whole on refresh completion. The memory
//! tier never expires records on its own: a record past its stale window
//! is still the frozen-fallback source of last resort, and freshness is
//! the engine's decision, not the store's.

use std::collections::HashMap;

use tokio::sync::RwLock;

use helios_types::CacheRecord;

/// In-process record map.
#[derive(Debug, Default)]
pub struct MemoryTier {
    records: RwLock<HashMap<String, CacheRecord>>,
}

impl MemoryTier {
    /// Create an empty tier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a copy of the record at `key`.
    pub async fn get(&self, key: &str) -> Option<CacheRecord> {
        self.records.read().await.get(key).cloned()
    }

    /// Replace the record at `key`.
    pub async fn put(&self, key: &str, record: CacheRecord) {
        self.records.write().await.insert(key.to_owned(), record);
    }
}
