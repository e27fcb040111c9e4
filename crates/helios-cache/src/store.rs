//! The two-tier store policy.
//!
//! Reads try the shared tier first and mirror hits into the in-process
//! tier; any shared-tier trouble falls back to memory. Writes always
//! land in memory and are mirrored into the shared tier when it is
//! healthy. Shared-tier failures are logged, never propagated: the
//! caller cannot distinguish a degraded store from a memory-only one
//! except through [`CacheStore::backend`].
//!
//! The two tiers are not linearizable with respect to each other; a
//! very recent write may be visible on one and not yet on the other.
//! Readers treat that as acceptable staleness.

use std::sync::Arc;

use tracing::warn;

use helios_types::{CacheBackend, CacheRecord};

use crate::error::StoreError;
use crate::memory::MemoryTier;
use crate::redis::RedisTier;

/// Two-tier cache store: optional shared primary, in-process secondary.
pub struct CacheStore {
    memory: MemoryTier,
    redis: Option<Arc<RedisTier>>,
}

impl CacheStore {
    /// Connect the store.
    ///
    /// With `remote_url = None`, or when the shared store is unreachable
    /// at startup, the store silently runs memory-only for the life of
    /// the process (`redis_connect_failed` is logged once).
    pub async fn connect(remote_url: Option<&str>) -> Self {
        let redis = match remote_url {
            None => None,
            Some(url) => match RedisTier::connect(url).await {
                Ok(tier) => Some(Arc::new(tier)),
                Err(e) => {
                    warn!(url, error = %e, "redis_connect_failed");
                    None
                }
            },
        };
        Self { memory: MemoryTier::new(), redis }
    }

    /// A memory-only store, for tests and offline runs.
    pub fn memory_only() -> Self {
        Self { memory: MemoryTier::new(), redis: None }
    }

    /// Which backend currently serves this store. Non-blocking.
    pub fn backend(&self) -> CacheBackend {
        match &self.redis {
            Some(tier) if tier.is_healthy() => CacheBackend::Shared,
            _ => CacheBackend::Memory,
        }
    }

    /// Read the record at `key`.
    ///
    /// Shared-tier hits are mirrored into memory. A shared-tier miss,
    /// failure, or undecodable blob falls through to the memory tier, so
    /// a record that only survives in memory (e.g. one the shared store
    /// already expired) is still found.
    pub async fn get(&self, key: &str) -> Option<CacheRecord> {
        if let Some(tier) = &self.redis {
            if tier.is_healthy() {
                match tier.get_record(key).await {
                    Ok(Some(record)) => {
                        self.memory.put(key, record.clone()).await;
                        return Some(record);
                    }
                    Ok(None) => {}
                    Err(StoreError::Serialization(e)) => {
                        // Schema drift: treat as no-record and refresh.
                        warn!(key, error = %e, "redis_read_failed");
                    }
                    Err(e) => {
                        warn!(key, error = %e, "redis_read_failed");
                        tier.mark_unhealthy();
                    }
                }
            }
        }

        self.memory.get(key).await
    }

    /// Write `record` at `key` through both tiers.
    ///
    /// The memory write always happens. The shared write sets a TTL of
    /// the record's serveable lifetime and its failures are logged, not
    /// propagated.
    pub async fn put(&self, key: &str, record: &CacheRecord) {
        self.memory.put(key, record.clone()).await;

        if let Some(tier) = &self.redis {
            if tier.is_healthy() {
                if let Err(e) = tier.put_record(key, record, record.shared_ttl_ms()).await {
                    warn!(key, error = %e, "redis_write_failed");
                    if !matches!(e, StoreError::Serialization(_)) {
                        tier.mark_unhealthy();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use helios_types::Snapshot;

    fn record() -> CacheRecord {
        let now = Utc::now();
        CacheRecord::new(Snapshot::assemble(Vec::new(), 0, 10, now), now, 1000, 500)
    }

    #[tokio::test]
    async fn memory_only_store_reports_memory_backend() {
        let store = CacheStore::memory_only();
        assert_eq!(store.backend(), CacheBackend::Memory);
    }

    #[tokio::test]
    async fn memory_only_round_trip() {
        let store = CacheStore::memory_only();
        assert!(store.get("ephemeris:planets:v1").await.is_none());

        let rec = record();
        store.put("ephemeris:planets:v1", &rec).await;
        assert_eq!(store.get("ephemeris:planets:v1").await.unwrap(), rec);
    }

    #[tokio::test]
    async fn absent_url_degrades_silently() {
        let store = CacheStore::connect(None).await;
        assert_eq!(store.backend(), CacheBackend::Memory);
        let rec = record();
        store.put("k", &rec).await;
        assert!(store.get("k").await.is_some());
    }
}
