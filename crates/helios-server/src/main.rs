//! Helios server binary.
//!
//! Wires the upstream client, the two-tier store, and the snapshot
//! engine together, starts the background pre-warmer, and serves the
//! HTTP facade until shutdown.

use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use helios_cache::CacheStore;
use helios_engine::{Clock, SnapshotEngine};
use helios_horizons::{EphemerisSource, HorizonsClient};
use helios_server::{build_router, metrics, start_server, AppState, ServiceConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServiceConfig::from_env();
    let _handle = metrics::init_metrics();

    let client = match HorizonsClient::new(&config.horizons_url, config.horizons_timeout_ms) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build upstream client");
            std::process::exit(1);
        }
    };

    let store = CacheStore::connect(config.redis_url.as_deref()).await;
    let engine = SnapshotEngine::new(
        EphemerisSource::Horizons(client),
        store,
        config.engine,
        Clock::System,
    );
    engine.start_prewarm();

    let state = Arc::new(AppState::new(engine.clone()));
    let router = build_router(state);

    if let Err(e) = start_server(&config.host, config.port, router).await {
        error!(error = %e, "server exited with error");
        engine.shutdown();
        std::process::exit(1);
    }

    engine.shutdown();
}
