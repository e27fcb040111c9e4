//! Provider error types.
//!
//! Both variants carry everything an operator needs to chase an upstream
//! incident: the HTTP status when one was received, a bounded snippet of
//! the response body, the elapsed time, and the correlation id of the
//! request that hit the failure. The enum is `Clone` so a single failure
//! can be shared with every caller waiting on the same refresh.

/// Maximum number of bytes of upstream body kept in error snippets.
const SNIPPET_MAX: usize = 240;

/// Errors produced by the ephemeris provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HorizonsError {
    /// Transport failure or non-2xx status from the upstream.
    #[error("horizons unavailable for {body} ({}): {snippet}", format_status(.status))]
    Unavailable {
        /// Internal name of the body being fetched.
        body: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// Bounded snippet of the upstream response body.
        snippet: String,
        /// Time spent on the attempt (ms).
        elapsed_ms: u64,
        /// Correlation id of the triggering request.
        correlation_id: String,
    },

    /// The upstream answered 2xx but the body matched neither known shape.
    #[error("horizons response malformed for {body}: {reason}")]
    Malformed {
        /// Internal name of the body being fetched.
        body: String,
        /// What the parser rejected.
        reason: String,
        /// Bounded snippet of the upstream response body.
        snippet: String,
        /// Time spent on the attempt (ms).
        elapsed_ms: u64,
        /// Correlation id of the triggering request.
        correlation_id: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("failed to build horizons HTTP client: {0}")]
    Client(String),
}

fn format_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "transport error".to_owned(), |s| format!("status {s}"))
}

/// Truncate an upstream body to a loggable snippet.
///
/// Cuts at a character boundary at or below [`SNIPPET_MAX`] bytes.
pub fn snippet(body: &str) -> String {
    if body.len() <= SNIPPET_MAX {
        return body.to_owned();
    }
    let mut end = SNIPPET_MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
