//! Multi-body snapshots and their cache records.
//!
//! A [`Snapshot`] is the coherent output of one upstream fan-out cycle.
//! A [`CacheRecord`] wraps a snapshot with its cache lifecycle instants;
//! records are owned by the cache store and engines only ever read
//! copies. [`CacheState`] and [`CacheBackend`] are the labels surfaced
//! to HTTP clients in headers and metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vector::{StateVector, REFERENCE_FRAME};

/// Distance unit for all snapshot positions.
pub const DISTANCE_UNIT: &str = "AU";

/// Velocity unit for all snapshot velocities.
pub const VELOCITY_UNIT: &str = "AU/day";

/// How a served snapshot relates to cache freshness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheState {
    /// Served from a record younger than the TTL.
    Hit,
    /// Freshly fetched from the upstream for this request.
    Miss,
    /// Served from a record inside the stale-while-revalidate window.
    Stale,
    /// Served from an expired record because the upstream is unavailable.
    Frozen,
}

impl CacheState {
    /// Header/metadata label for this state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Stale => "STALE",
            Self::Frozen => "FROZEN",
        }
    }

    /// Whether this state counts as degraded (`X-Horizons-Cache-Stale`).
    pub const fn is_stale(self) -> bool {
        matches!(self, Self::Stale | Self::Frozen)
    }
}

/// Which storage tier satisfied (or would satisfy) the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheBackend {
    /// In-process fallback tier only.
    Memory,
    /// Shared external store is live.
    Shared,
}

impl CacheBackend {
    /// Header/metadata/metric label for this backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Shared => "shared",
        }
    }
}

/// A coherent set of state vectors produced by one fan-out cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// State vectors in catalog order.
    pub bodies: Vec<StateVector>,
    /// Reference frame shared by every vector.
    pub reference_frame: String,
    /// Distance unit ([`DISTANCE_UNIT`]).
    pub distance_unit: String,
    /// Velocity unit ([`VELOCITY_UNIT`]).
    pub velocity_unit: String,
    /// Aggregate upstream response time for the fan-out (ms).
    pub response_time_ms: u64,
    /// Snapshot timestamp: the first body's timestamp, or the wall clock
    /// at assembly when no body carried one.
    pub timestamp: String,
    /// True when the fan-out returned fewer bodies than the catalog.
    /// Partial snapshots are never served as cache hits.
    pub partial: bool,
}

impl Snapshot {
    /// Assemble a snapshot from fan-out results.
    ///
    /// `expected` is the catalog size for the snapshot kind; a shorter
    /// body list marks the snapshot partial. The timestamp is taken from
    /// the first body, falling back to `now` in RFC 3339.
    pub fn assemble(
        bodies: Vec<StateVector>,
        expected: usize,
        response_time_ms: u64,
        now: DateTime<Utc>,
    ) -> Self {
        let timestamp = bodies
            .first()
            .and_then(|b| b.timestamp.clone())
            .unwrap_or_else(|| now.to_rfc3339());
        let partial = bodies.len() < expected;
        Self {
            bodies,
            reference_frame: REFERENCE_FRAME.to_owned(),
            distance_unit: DISTANCE_UNIT.to_owned(),
            velocity_unit: VELOCITY_UNIT.to_owned(),
            response_time_ms,
            timestamp,
            partial,
        }
    }

    /// Find a body by internal name.
    pub fn body(&self, name: &str) -> Option<&StateVector> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// A snapshot plus its cache lifecycle instants.
///
/// `expires_at = cached_at + TTL` and `stale_until = expires_at + stale
/// window`. Records are written whole on each successful refresh; there
/// is no partial-update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The cached snapshot.
    pub snapshot: Snapshot,
    /// When the record was written.
    pub cached_at: DateTime<Utc>,
    /// When the record stops being fresh.
    pub expires_at: DateTime<Utc>,
    /// When the record stops being serveable as stale.
    pub stale_until: DateTime<Utc>,
}

impl CacheRecord {
    /// Create a record cached at `cached_at` with the given windows.
    pub fn new(snapshot: Snapshot, cached_at: DateTime<Utc>, ttl_ms: u64, stale_ms: u64) -> Self {
        let expires_at = cached_at + chrono::Duration::milliseconds(ttl_ms as i64);
        let stale_until = expires_at + chrono::Duration::milliseconds(stale_ms as i64);
        Self { snapshot, cached_at, expires_at, stale_until }
    }

    /// Age of the record at `now`, clamped to zero (ms).
    pub fn age_ms(&self, now: DateTime<Utc>) -> u64 {
        (now - self.cached_at).num_milliseconds().max(0) as u64
    }

    /// TTL to set on the shared store: the record's full serveable
    /// lifetime, `stale_until - cached_at` (ms).
    pub fn shared_ttl_ms(&self) -> u64 {
        (self.stale_until - self.cached_at).num_milliseconds().max(0) as u64
    }
}
