//! Ephemeris source dispatch.
//!
//! Async methods are not dyn-compatible, so the engine holds an
//! [`EphemerisSource`] enum instead of a trait object. The
//! [`ScriptedSource`] variant is the deterministic double used by engine
//! and server tests: canned vectors per body, a switchable failure mode,
//! and a fetch counter for single-flight assertions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use helios_types::{CatalogEntry, StateVector, Velocity, REFERENCE_FRAME};

use crate::client::HorizonsClient;
use crate::error::HorizonsError;

/// A provider of single-body state vectors.
pub enum EphemerisSource {
    /// The real Horizons API.
    Horizons(HorizonsClient),
    /// Canned vectors for tests and offline runs.
    Scripted(Arc<ScriptedSource>),
}

impl EphemerisSource {
    /// Fetch the current state vector for one catalog body.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonsError`] when the underlying source fails.
    pub async fn fetch(
        &self,
        entry: &CatalogEntry,
        correlation_id: &str,
    ) -> Result<StateVector, HorizonsError> {
        match self {
            Self::Horizons(client) => client.fetch(entry, correlation_id).await,
            Self::Scripted(scripted) => scripted.fetch(entry, correlation_id),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Horizons(_) => "horizons",
            Self::Scripted(_) => "scripted",
        }
    }
}

/// Deterministic in-memory ephemeris source.
///
/// Shared behind an [`Arc`] so tests keep a handle after handing the
/// source to an engine: vectors can be replaced, failures toggled, and
/// fetch counts observed while the engine runs.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    vectors: RwLock<HashMap<String, StateVector>>,
    fail_with: RwLock<Option<String>>,
    calls: AtomicU64,
}

impl ScriptedSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace the vector returned for `sv.name`.
    pub fn insert(&self, sv: StateVector) {
        if let Ok(mut vectors) = self.vectors.write() {
            vectors.insert(sv.name.clone(), sv);
        }
    }

    /// Shorthand: place a body at a position with an optional velocity.
    pub fn place(&self, name: &str, x: f64, y: f64, z: f64, velocity: Option<Velocity>) {
        self.insert(StateVector {
            name: name.to_owned(),
            x,
            y,
            z,
            velocity,
            reference_frame: REFERENCE_FRAME.to_owned(),
            source: "scripted".to_owned(),
            timestamp: None,
        });
    }

    /// Make every subsequent fetch fail with a 503 carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut fail) = self.fail_with.write() {
            *fail = Some(message.into());
        }
    }

    /// Clear the failure mode.
    pub fn recover(&self) {
        if let Ok(mut fail) = self.fail_with.write() {
            *fail = None;
        }
    }

    /// Total number of fetch calls observed.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Acquire)
    }

    fn fetch(
        &self,
        entry: &CatalogEntry,
        correlation_id: &str,
    ) -> Result<StateVector, HorizonsError> {
        self.calls.fetch_add(1, Ordering::AcqRel);

        let failure = self.fail_with.read().ok().and_then(|f| f.clone());
        if let Some(message) = failure {
            return Err(HorizonsError::Unavailable {
                body: entry.name.to_owned(),
                status: Some(503),
                snippet: message,
                elapsed_ms: 0,
                correlation_id: correlation_id.to_owned(),
            });
        }

        self.vectors
            .read()
            .ok()
            .and_then(|vectors| vectors.get(entry.name).cloned())
            .ok_or_else(|| HorizonsError::Malformed {
                body: entry.name.to_owned(),
                reason: "no scripted vector for body".to_owned(),
                snippet: String::new(),
                elapsed_ms: 0,
                correlation_id: correlation_id.to_owned(),
            })
    }
}
