//! Shared-store tier (Redis protocol via [`fred`]).
//!
//! Records are stored as single JSON blobs under versioned keys. Writes
//! set a `PX` expiry equal to the record's full serveable lifetime, so
//! the shared store sheds records once they pass the stale window.
//!
//! The tier tracks its own health with an atomic flag: an operation
//! failure demotes it, and a background probe task re-reads a sentinel
//! key every few seconds until the connection recovers. The flag doubles
//! as the engine's non-blocking backend liveness probe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fred::prelude::*;
use fred::types::Expiration;
use tracing::{info, warn};

use helios_types::CacheRecord;

use crate::error::StoreError;

/// Interval between reconnect probes while unhealthy.
const RECONNECT_PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Key read by the reconnect probe. Its value (or absence) is irrelevant.
const PROBE_KEY: &str = "ephemeris:probe";

/// Connection handle to the shared store.
pub struct RedisTier {
    client: Client,
    healthy: AtomicBool,
    reconnecting: AtomicBool,
}

impl RedisTier {
    /// Connect to the store at the given Redis URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the URL cannot be parsed and
    /// [`StoreError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config = Config::from_url(url)
            .map_err(|e| StoreError::Config(format!("invalid redis URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        info!(url, "redis_connected");
        Ok(Self {
            client,
            healthy: AtomicBool::new(true),
            reconnecting: AtomicBool::new(false),
        })
    }

    /// Whether the tier is currently believed reachable. Non-blocking.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Read and decode the record at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the read fails and
    /// [`StoreError::Serialization`] if the blob does not decode (the
    /// caller treats the latter as no-record).
    pub async fn get_record(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        let value: Option<String> = self.client.get(key).await?;
        value.map_or(Ok(None), |blob| Ok(Some(serde_json::from_str(&blob)?)))
    }

    /// Write the record at `key` with a `PX` expiry of `ttl_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the record does not
    /// encode and [`StoreError::Redis`] if the write fails.
    pub async fn put_record(
        &self,
        key: &str,
        record: &CacheRecord,
        ttl_ms: u64,
    ) -> Result<(), StoreError> {
        let blob = serde_json::to_string(record)?;
        let _: () = self
            .client
            .set(
                key,
                blob.as_str(),
                Some(Expiration::PX(ttl_ms as i64)),
                None,
                false,
            )
            .await?;
        Ok(())
    }

    /// Demote the tier and start the reconnect probe if none is running.
    ///
    /// Safe to call on every operation failure; only the first call
    /// while unhealthy spawns a probe task.
    pub fn mark_unhealthy(self: &Arc<Self>) {
        self.healthy.store(false, Ordering::Release);

        if self.reconnecting.swap(true, Ordering::AcqRel) {
            return;
        }

        let tier = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(RECONNECT_PROBE_INTERVAL).await;
                let probe: Result<Option<String>, _> = tier.client.get(PROBE_KEY).await;
                match probe {
                    Ok(_) => {
                        tier.healthy.store(true, Ordering::Release);
                        tier.reconnecting.store(false, Ordering::Release);
                        info!("redis_connected");
                        return;
                    }
                    Err(e) => {
                        warn!(error = %e, "redis_connect_failed");
                    }
                }
            }
        });
    }
}
