//! The snapshot engine.
//!
//! Sole authority over the cache keys for both snapshot kinds. Reads
//! classify the cached record and serve HIT/STALE without touching the
//! upstream; misses and forced refreshes run (or join) the single
//! inflight refresh for their kind; failed refreshes fall back to the
//! last record in either store tier as FROZEN. A background pre-warm
//! ticker keeps the cache populated with no client waiting.
//!
//! Cancelling a client never cancels a refresh: the refresh runs on its
//! own spawned task and its result serves every waiter, present and
//! future.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use helios_cache::CacheStore;
use helios_horizons::EphemerisSource;
use helios_types::{catalog, BodyKind, CacheBackend, CacheRecord, CacheState, Snapshot};

use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{BodyFailure, EngineError};
use crate::freshness::{classify, Freshness};
use crate::inflight::{InflightMap, Ticket};

/// Outcome shared between a refresh and all of its waiters.
type RefreshOutcome = Result<Arc<CacheRecord>, EngineError>;

/// The two snapshot kinds the engine serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// The nine-planet snapshot.
    Planets,
    /// The Voyager probes snapshot.
    Probes,
}

impl SnapshotKind {
    /// Versioned cache key for this kind. A schema change mandates a
    /// version bump here so old and new deployments do not alias.
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Planets => "ephemeris:planets:v1",
            Self::Probes => "ephemeris:probes:v1",
        }
    }

    /// Catalog partition backing this kind.
    pub const fn body_kind(self) -> BodyKind {
        match self {
            Self::Planets => BodyKind::Planet,
            Self::Probes => BodyKind::Probe,
        }
    }

    /// Label for logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planets => "planets",
            Self::Probes => "probes",
        }
    }
}

/// Why a refresh was started; the `reason` label on `cache_misses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// No serveable record existed.
    Miss,
    /// A client forced a refresh.
    ManualRefresh,
    /// A stale record was served and is being revalidated.
    StaleRevalidate,
    /// The background ticker fired.
    BackgroundPrewarm,
}

impl RefreshReason {
    /// Metric label for this reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miss => "miss",
            Self::ManualRefresh => "manual-refresh",
            Self::StaleRevalidate => "stale-revalidate",
            Self::BackgroundPrewarm => "background-prewarm",
        }
    }
}

/// Per-request options for a snapshot read.
#[derive(Debug, Clone, Default)]
pub struct SnapshotOptions {
    /// Bypass a fresh record and refresh from the upstream.
    pub force_refresh: bool,
    /// Correlation id propagated from the client, when present.
    pub correlation_id: Option<String>,
}

/// A decorated snapshot ready for the HTTP facade.
///
/// Decoration is pure: it copies out of the cache record and never
/// mutates stored state.
#[derive(Debug, Clone)]
pub struct SnapshotResult {
    /// The snapshot payload.
    pub snapshot: Snapshot,
    /// How the cache answered.
    pub cache_state: CacheState,
    /// Which tier is currently live.
    pub backend: CacheBackend,
    /// Age of the served record (ms); 0 on a miss.
    pub cache_age_ms: u64,
    /// Remaining freshness (ms); 0 once past the TTL.
    pub cache_expires_in_ms: u64,
    /// True when this is a frozen fallback.
    pub frozen_snapshot: bool,
    /// The refresh failure behind a frozen response.
    pub freeze_reason: Option<String>,
    /// Correlation id for the request.
    pub request_id: String,
    /// When this result was decorated.
    pub generated_at: DateTime<Utc>,
    /// The engine's configured TTL (ms), for the `X-Horizons-TTL` header.
    pub ttl_ms: u64,
}

struct EngineInner {
    source: EphemerisSource,
    store: CacheStore,
    config: EngineConfig,
    clock: Clock,
    inflight: InflightMap<RefreshOutcome>,
    prewarmers: Mutex<Vec<JoinHandle<()>>>,
}

/// The snapshot cache engine. Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct SnapshotEngine {
    inner: Arc<EngineInner>,
}

impl SnapshotEngine {
    /// Create an engine over a source, a store, and a clock.
    pub fn new(
        source: EphemerisSource,
        store: CacheStore,
        config: EngineConfig,
        clock: Clock,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                source,
                store,
                config,
                clock,
                inflight: InflightMap::new(),
                prewarmers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The engine's cache windows.
    pub fn config(&self) -> EngineConfig {
        self.inner.config
    }

    /// Current planets snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only when the refresh failed and no
    /// record exists in either store tier.
    pub async fn planets_snapshot(
        &self,
        opts: SnapshotOptions,
    ) -> Result<SnapshotResult, EngineError> {
        self.snapshot(SnapshotKind::Planets, opts).await
    }

    /// Current probes snapshot. Structurally identical to
    /// [`planets_snapshot`](Self::planets_snapshot).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only when the refresh failed and no
    /// record exists in either store tier.
    pub async fn probes_snapshot(
        &self,
        opts: SnapshotOptions,
    ) -> Result<SnapshotResult, EngineError> {
        self.snapshot(SnapshotKind::Probes, opts).await
    }

    /// Read (and refresh when needed) the snapshot for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] only when the refresh failed and no
    /// record exists in either store tier.
    pub async fn snapshot(
        &self,
        kind: SnapshotKind,
        opts: SnapshotOptions,
    ) -> Result<SnapshotResult, EngineError> {
        let request_id = opts
            .correlation_id
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let backend = self.inner.store.backend();

        if !opts.force_refresh {
            if let Some(record) = self.inner.store.get(kind.cache_key()).await {
                let now = self.inner.clock.now();
                match classify(&record, now, &self.inner.config) {
                    Freshness::Fresh => {
                        counter!("cache_hits", "backend" => backend.as_str(), "state" => "fresh")
                            .increment(1);
                        gauge!("cache_age_ms", "backend" => backend.as_str())
                            .set(record.age_ms(now) as f64);
                        return Ok(self.decorate(&record, CacheState::Hit, backend, request_id));
                    }
                    Freshness::Stale => {
                        counter!("cache_hits", "backend" => backend.as_str(), "state" => "stale")
                            .increment(1);
                        gauge!("cache_age_ms", "backend" => backend.as_str())
                            .set(record.age_ms(now) as f64);
                        self.spawn_revalidate_if_idle(kind, &request_id);
                        return Ok(self.decorate(&record, CacheState::Stale, backend, request_id));
                    }
                    Freshness::Expired => {}
                }
            }
        }

        let reason = if opts.force_refresh {
            RefreshReason::ManualRefresh
        } else {
            RefreshReason::Miss
        };

        match self.join_refresh(kind, reason, request_id.clone()).await {
            Ok(record) => {
                let backend = self.inner.store.backend();
                Ok(self.decorate(&record, CacheState::Miss, backend, request_id))
            }
            Err(err) => self.frozen_fallback(kind, err, backend, request_id).await,
        }
    }

    /// Serve the last record in either tier as FROZEN, or bubble the
    /// refresh error when nothing usable exists.
    async fn frozen_fallback(
        &self,
        kind: SnapshotKind,
        err: EngineError,
        backend: CacheBackend,
        request_id: String,
    ) -> Result<SnapshotResult, EngineError> {
        let Some(record) = self.inner.store.get(kind.cache_key()).await else {
            return Err(err);
        };

        warn!(
            kind = kind.as_str(),
            correlation_id = %request_id,
            error = %err,
            "ephemeris_snapshot_frozen"
        );
        let mut result = self.decorate(&record, CacheState::Frozen, backend, request_id);
        result.freeze_reason = Some(err.to_string());
        Ok(result)
    }

    /// Decorate a record for a response. Pure with respect to the
    /// record: two decorations of the same record differ only in
    /// request metadata.
    fn decorate(
        &self,
        record: &CacheRecord,
        state: CacheState,
        backend: CacheBackend,
        request_id: String,
    ) -> SnapshotResult {
        let now = self.inner.clock.now();
        let ttl_ms = self.inner.config.ttl_ms;
        let cache_age_ms = match state {
            CacheState::Miss => 0,
            _ => record.age_ms(now),
        };
        SnapshotResult {
            snapshot: record.snapshot.clone(),
            cache_state: state,
            backend,
            cache_age_ms,
            cache_expires_in_ms: ttl_ms.saturating_sub(cache_age_ms),
            frozen_snapshot: state == CacheState::Frozen,
            freeze_reason: None,
            request_id,
            generated_at: now,
            ttl_ms,
        }
    }

    // -----------------------------------------------------------------------
    // Single-flight refresh
    // -----------------------------------------------------------------------

    /// Join (or start) the inflight refresh for `kind` and await its
    /// outcome.
    async fn join_refresh(
        &self,
        kind: SnapshotKind,
        reason: RefreshReason,
        correlation_id: String,
    ) -> RefreshOutcome {
        let mut rx = self.start_refresh(kind, reason, correlation_id);
        loop {
            let published = rx.borrow_and_update().clone();
            if let Some(outcome) = published {
                return outcome;
            }
            if rx.changed().await.is_err() {
                return Err(EngineError::RefreshInterrupted);
            }
        }
    }

    /// Start a refresh for `kind` unless one is already inflight;
    /// either way, return a receiver for the (shared) outcome.
    fn start_refresh(
        &self,
        kind: SnapshotKind,
        reason: RefreshReason,
        correlation_id: String,
    ) -> watch::Receiver<Option<RefreshOutcome>> {
        match self.inner.inflight.join(kind) {
            Ticket::Waiter(rx) => rx,
            Ticket::Leader(tx) => {
                let rx = tx.subscribe();
                let engine = self.clone();
                tokio::spawn(async move {
                    // Declared before the refresh so the slot clears on
                    // every exit path, panics included.
                    let _clear = ClearInflight { engine: engine.clone(), kind };
                    let outcome = engine
                        .refresh(kind, reason, &correlation_id)
                        .await
                        .map(Arc::new);
                    let _ = tx.send(Some(outcome));
                });
                rx
            }
        }
    }

    /// Kick off a stale revalidation when no refresh is inflight. The
    /// caller does not wait.
    fn spawn_revalidate_if_idle(&self, kind: SnapshotKind, correlation_id: &str) {
        if self.inner.inflight.is_idle(kind) {
            let _ = self.start_refresh(
                kind,
                RefreshReason::StaleRevalidate,
                correlation_id.to_owned(),
            );
        }
    }

    /// Fan out to the upstream for every catalog body of `kind`,
    /// assemble and persist the record.
    ///
    /// Any sub-fetch failure fails the whole refresh; partial snapshots
    /// are never persisted.
    async fn refresh(
        &self,
        kind: SnapshotKind,
        reason: RefreshReason,
        correlation_id: &str,
    ) -> Result<CacheRecord, EngineError> {
        let entries = catalog(kind.body_kind());
        let backend = self.inner.store.backend();
        let started = Instant::now();

        info!(
            kind = kind.as_str(),
            reason = reason.as_str(),
            bodies = entries.len(),
            correlation_id,
            "ephemeris_refresh"
        );

        let fetches = entries
            .iter()
            .map(|entry| self.inner.source.fetch(entry, correlation_id));
        let results = futures::future::join_all(fetches).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        histogram!("fetch_duration_ms").record(elapsed_ms as f64);

        let mut bodies = Vec::with_capacity(entries.len());
        let mut failures = Vec::new();
        for (entry, result) in entries.iter().zip(results) {
            match result {
                Ok(sv) => bodies.push(sv),
                Err(error) => failures.push(BodyFailure { body: entry.name.to_owned(), error }),
            }
        }

        if !failures.is_empty() {
            let err = EngineError::PartialFailure { kind: kind.as_str(), failures };
            warn!(
                kind = kind.as_str(),
                reason = reason.as_str(),
                elapsed_ms,
                correlation_id,
                error = %err,
                "ephemeris_refresh_failed"
            );
            return Err(err);
        }

        let now = self.inner.clock.now();
        let snapshot = Snapshot::assemble(bodies, entries.len(), elapsed_ms, now);
        let record = CacheRecord::new(
            snapshot,
            now,
            self.inner.config.ttl_ms,
            self.inner.config.stale_ms,
        );
        self.inner.store.put(kind.cache_key(), &record).await;

        counter!("cache_misses", "backend" => backend.as_str(), "reason" => reason.as_str())
            .increment(1);
        debug!(
            kind = kind.as_str(),
            reason = reason.as_str(),
            elapsed_ms,
            correlation_id,
            "refresh complete"
        );

        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Background pre-warmer
    // -----------------------------------------------------------------------

    /// Start the background pre-warm ticker. A no-op when the configured
    /// interval is zero.
    ///
    /// The ticker warms both snapshot kinds, skipping a kind whenever a
    /// refresh for it is already inflight. The first warm runs
    /// immediately.
    pub fn start_prewarm(&self) {
        let interval_ms = self.inner.config.prewarm_interval_ms;
        if interval_ms == 0 {
            return;
        }

        let engine = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_millis(interval_ms));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                engine.prewarm_tick().await;
            }
        });

        self.inner
            .prewarmers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    async fn prewarm_tick(&self) {
        for kind in [SnapshotKind::Planets, SnapshotKind::Probes] {
            if !self.inner.inflight.is_idle(kind) {
                continue;
            }
            let correlation_id = format!("prewarm-{}", Uuid::now_v7());
            if let Err(e) = self
                .join_refresh(kind, RefreshReason::BackgroundPrewarm, correlation_id)
                .await
            {
                debug!(kind = kind.as_str(), error = %e, "prewarm refresh failed");
            }
        }
    }

    /// Stop background work. Spawned tickers are aborted; inflight
    /// client-driven refreshes are left to finish on their own.
    pub fn shutdown(&self) {
        let handles = std::mem::take(
            &mut *self
                .inner
                .prewarmers
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            handle.abort();
        }
    }
}

/// Drop guard releasing a single-flight slot.
struct ClearInflight {
    engine: SnapshotEngine,
    kind: SnapshotKind,
}

impl Drop for ClearInflight {
    fn drop(&mut self) {
        self.engine.inner.inflight.clear(self.kind);
    }
}
