//! Freshness classification for cache records.
//!
//! Given the record's age against the configured windows:
//!
//! | Condition | State |
//! |---|---|
//! | `age < ttl` | fresh |
//! | `ttl <= age < ttl + stale` | stale (serveable, revalidate) |
//! | `age >= ttl + stale` | expired (refresh required) |
//!
//! A record holding a partial snapshot is never fresh: it downgrades to
//! stale so a revalidation replaces it.

use chrono::{DateTime, Utc};

use helios_types::CacheRecord;

use crate::config::EngineConfig;

/// Where a record sits in its cache lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Young enough to serve as a hit.
    Fresh,
    /// Past the TTL but inside the stale-while-revalidate window.
    Stale,
    /// Past the stale window; only usable as a frozen fallback.
    Expired,
}

/// Classify a record at `now` under the configured windows.
pub fn classify(record: &CacheRecord, now: DateTime<Utc>, config: &EngineConfig) -> Freshness {
    let age = record.age_ms(now);
    let state = if age < config.ttl_ms {
        Freshness::Fresh
    } else if age < config.ttl_ms + config.stale_ms {
        Freshness::Stale
    } else {
        return Freshness::Expired;
    };

    if record.snapshot.partial && state == Freshness::Fresh {
        Freshness::Stale
    } else {
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use helios_types::Snapshot;

    const TTL: u64 = 120_000;
    const STALE: u64 = 60_000;

    fn config() -> EngineConfig {
        EngineConfig { ttl_ms: TTL, stale_ms: STALE, prewarm_interval_ms: 0 }
    }

    fn record_at(cached_at: DateTime<Utc>, partial: bool) -> CacheRecord {
        let mut snapshot = Snapshot::assemble(Vec::new(), 0, 0, cached_at);
        snapshot.partial = partial;
        CacheRecord::new(snapshot, cached_at, TTL, STALE)
    }

    #[test]
    fn boundaries_follow_the_state_table() {
        let t0 = Utc::now();
        let record = record_at(t0, false);
        let cfg = config();

        let cases: [(i64, Freshness); 6] = [
            (0, Freshness::Fresh),
            (TTL as i64 - 1, Freshness::Fresh),
            (TTL as i64, Freshness::Stale),
            ((TTL + STALE) as i64 - 1, Freshness::Stale),
            ((TTL + STALE) as i64, Freshness::Expired),
            ((TTL + STALE) as i64 + 86_400_000, Freshness::Expired),
        ];
        for (offset_ms, expected) in cases {
            let now = t0 + Duration::milliseconds(offset_ms);
            assert_eq!(classify(&record, now, &cfg), expected, "age {offset_ms}ms");
        }
    }

    #[test]
    fn partial_record_is_never_fresh() {
        let t0 = Utc::now();
        let record = record_at(t0, true);
        let cfg = config();

        assert_eq!(classify(&record, t0, &cfg), Freshness::Stale);
        // Past the stale window it expires like any other record.
        let late = t0 + Duration::milliseconds((TTL + STALE) as i64);
        assert_eq!(classify(&record, late, &cfg), Freshness::Expired);
    }

    #[test]
    fn clock_behind_cached_at_counts_as_fresh() {
        let t0 = Utc::now();
        let record = record_at(t0, false);
        let earlier = t0 - Duration::seconds(10);
        assert_eq!(classify(&record, earlier, &config()), Freshness::Fresh);
    }
}
