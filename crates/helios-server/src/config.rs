//! Service configuration.
//!
//! All configuration is loaded from environment variables. The service
//! needs its listen address, the optional shared-store URL, the upstream
//! endpoint, and the engine's cache windows (delegated to
//! [`EngineConfig`]).

use tracing::warn;

use helios_engine::EngineConfig;
use helios_horizons::{DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};

/// Complete service configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// TCP listen port (`PORT`, default `3000`).
    pub port: u16,
    /// Shared-store URL (`REDIS_URL`); absent means memory-only.
    pub redis_url: Option<String>,
    /// Upstream Horizons endpoint (`HORIZONS_API_URL`).
    pub horizons_url: String,
    /// Upstream per-call timeout (`HORIZONS_TIMEOUT_MS`).
    pub horizons_timeout_ms: u64,
    /// Cache windows and pre-warm cadence.
    pub engine: EngineConfig,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_owned()),
            port: env_port(),
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            horizons_url: std::env::var("HORIZONS_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            horizons_timeout_ms: env_u64("HORIZONS_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            engine: EngineConfig::from_env(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 3000,
            redis_url: None,
            horizons_url: DEFAULT_API_URL.to_owned(),
            horizons_timeout_ms: DEFAULT_TIMEOUT_MS,
            engine: EngineConfig::default(),
        }
    }
}

fn env_port() -> u16 {
    let Ok(raw) = std::env::var("PORT") else {
        return 3000;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(value = raw, "ignoring malformed PORT");
            3000
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    let Ok(raw) = std::env::var(name) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(v) => v,
        Err(_) => {
            warn!(name, value = raw, "ignoring malformed environment value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.redis_url.is_none());
        assert_eq!(config.horizons_timeout_ms, 10_000);
        assert_eq!(config.engine.ttl_ms, 120_000);
    }
}
