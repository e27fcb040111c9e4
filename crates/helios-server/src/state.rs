//! Shared application state for the HTTP facade.
//!
//! The facade is a thin shell around the snapshot engine; the state is
//! just the engine handle, wrapped in [`Arc`] and injected through
//! Axum's `State` extractor.

use helios_engine::SnapshotEngine;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// The snapshot cache engine serving every data route.
    pub engine: SnapshotEngine,
}

impl AppState {
    /// Create the state around an engine handle.
    pub const fn new(engine: SnapshotEngine) -> Self {
        Self { engine }
    }
}
