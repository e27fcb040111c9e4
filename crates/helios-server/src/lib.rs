//! HTTP facade for the Helios ephemeris service.
//!
//! This crate provides the Axum server that exposes:
//!
//! - **Snapshot routes** (`/api/ephemeris/planets` and alias,
//!   `/api/ephemeris/probes`) serving the engine's cached state vectors
//!   with cache-state headers (`X-Horizons-Cache`, age, TTL, frozen)
//! - **The Voyager route** (`/api/voyagers`) composing the probes and
//!   planets snapshots into Earth-relative derived values
//! - **Prometheus metrics** (`/metrics`) and a health string (`/`)
//!
//! Every route derives a correlation id from `X-Request-Id` /
//! `X-Correlation-Id` and echoes it in headers and bodies. Forced
//! refresh is accepted as `?refresh=1|true` or `X-Refresh-Cache`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod request_meta;
pub mod router;
pub mod server;
pub mod state;
pub mod voyagers;

// Re-export primary types for convenience.
pub use config::ServiceConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::AppState;
