//! Axum router construction for the Helios API.
//!
//! Assembles the snapshot routes, the Voyager enrichment route, the
//! metrics exposition, and the health string into a single [`Router`]
//! with CORS enabled for the cross-origin dashboard, request tracing,
//! and an overall per-request deadline.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::metrics;
use crate::state::AppState;
use crate::voyagers;

/// Overall deadline for one client request. The upstream fan-out has
/// its own tighter per-call timeout.
const REQUEST_DEADLINE: Duration = Duration::from_secs(15);

/// Build the complete Axum router.
///
/// Routes:
/// - `GET /` -- static health string
/// - `GET /api/ephemeris/planets` -- planets snapshot
/// - `GET /api/ephemeris/planets/state-vectors` -- alias of the above
/// - `GET /api/ephemeris/probes` -- raw probes snapshot
/// - `GET /api/voyagers` -- probes snapshot with Earth-relative values
/// - `GET /metrics` -- Prometheus exposition
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/ephemeris/planets", get(handlers::get_planets))
        .route(
            "/api/ephemeris/planets/state-vectors",
            get(handlers::get_planets),
        )
        .route("/api/ephemeris/probes", get(handlers::get_probes))
        .route("/api/voyagers", get(voyagers::get_voyagers))
        .route("/metrics", get(metrics::serve_metrics))
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_DEADLINE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
