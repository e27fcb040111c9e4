//! Engine error types.
//!
//! [`EngineError`] is `Clone`: a refresh is shared by every caller
//! waiting on its single-flight handle, so its failure must be shareable
//! too.

use helios_horizons::HorizonsError;

/// One body's failure inside a fan-out refresh.
#[derive(Debug, Clone)]
pub struct BodyFailure {
    /// Internal name of the body whose fetch failed.
    pub body: String,
    /// The provider error for that body.
    pub error: HorizonsError,
}

/// Errors that can occur in the snapshot engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// One or more sub-fetches of a fan-out failed; the whole refresh
    /// fails atomically and nothing is persisted.
    #[error("upstream refresh failed for {kind}: {}", failure_summary(.failures))]
    PartialFailure {
        /// Snapshot kind label (`planets` / `probes`).
        kind: &'static str,
        /// The individual body failures.
        failures: Vec<BodyFailure>,
    },

    /// The refresh task died without publishing a result.
    #[error("refresh aborted before publishing a result")]
    RefreshInterrupted,
}

fn failure_summary(failures: &[BodyFailure]) -> String {
    let parts: Vec<String> = failures
        .iter()
        .map(|f| format!("{}: {}", f.body, f.error))
        .collect();
    parts.join("; ")
}
