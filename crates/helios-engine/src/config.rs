//! Engine configuration.
//!
//! All configuration is loaded from environment variables with named
//! defaults. Malformed numeric values fall back to the default with a
//! warning instead of failing startup.

use tracing::warn;

/// Default snapshot TTL (ms).
const DEFAULT_TTL_MS: u64 = 120_000;

/// Floor for the pre-warm interval (ms).
const PREWARM_FLOOR_MS: u64 = 30_000;

/// Cache windows and pre-warm cadence for the snapshot engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a record counts as fresh (ms).
    pub ttl_ms: u64,
    /// Stale-while-revalidate window after the TTL (ms).
    pub stale_ms: u64,
    /// Pre-warm ticker period (ms); `0` disables the ticker.
    pub prewarm_interval_ms: u64,
}

impl EngineConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `CACHE_TTL_MS`, `CACHE_STALE_MS`, `CACHE_WARM_INTERVAL_MS`.
    pub fn from_env() -> Self {
        Self::resolve(
            env_u64("CACHE_TTL_MS"),
            env_u64("CACHE_STALE_MS"),
            env_u64("CACHE_WARM_INTERVAL_MS"),
        )
    }

    /// Resolve explicit overrides against the defaults.
    ///
    /// The stale window defaults to half the TTL; the pre-warm interval
    /// defaults to 80% of the TTL with a 30 s floor.
    pub fn resolve(ttl_ms: Option<u64>, stale_ms: Option<u64>, prewarm_ms: Option<u64>) -> Self {
        let ttl_ms = ttl_ms.unwrap_or(DEFAULT_TTL_MS);
        let stale_ms = stale_ms.unwrap_or(ttl_ms / 2);
        let prewarm_interval_ms = prewarm_ms.unwrap_or_else(|| default_prewarm(ttl_ms));
        Self { ttl_ms, stale_ms, prewarm_interval_ms }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::resolve(None, None, None)
    }
}

fn default_prewarm(ttl_ms: u64) -> u64 {
    PREWARM_FLOOR_MS.max(ttl_ms.saturating_mul(4) / 5)
}

/// Read an optional unsigned env var, warning on malformed values.
fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(name, value = raw, "ignoring malformed environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = EngineConfig::default();
        assert_eq!(config.ttl_ms, 120_000);
        assert_eq!(config.stale_ms, 60_000);
        assert_eq!(config.prewarm_interval_ms, 96_000);
    }

    #[test]
    fn stale_window_tracks_overridden_ttl() {
        let config = EngineConfig::resolve(Some(10_000), None, None);
        assert_eq!(config.stale_ms, 5_000);
        // 80% of 10 s is below the 30 s floor.
        assert_eq!(config.prewarm_interval_ms, 30_000);
    }

    #[test]
    fn prewarm_follows_large_ttl() {
        let config = EngineConfig::resolve(Some(600_000), None, None);
        assert_eq!(config.prewarm_interval_ms, 480_000);
    }

    #[test]
    fn zero_prewarm_disables_ticker() {
        let config = EngineConfig::resolve(Some(1_000), Some(500), Some(0));
        assert_eq!(config.prewarm_interval_ms, 0);
    }
}
