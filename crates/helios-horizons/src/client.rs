//! HTTP client for the Horizons vectors endpoint.
//!
//! One `fetch` call maps to one upstream GET with the fixed vectors
//! parameter set (solar-system-barycenter center, J2000 ecliptic frame,
//! AU-day units). The upstream is slow and rate-limited, so every call
//! carries a hard timeout and every outcome is logged with its latency
//! and the caller's correlation id.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};

use helios_types::{CatalogEntry, StateVector, REFERENCE_FRAME};

use crate::error::{snippet, HorizonsError};
use crate::parse::parse_vector_response;

/// Default Horizons API endpoint.
pub const DEFAULT_API_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

/// Default per-call timeout (ms).
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Source tag stamped on every vector this client produces.
const SOURCE: &str = "horizons";

/// Client for the JPL Horizons vectors API.
pub struct HorizonsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HorizonsClient {
    /// Create a client against the given base URL with a per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonsError::Client`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, HorizonsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| HorizonsError::Client(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into() })
    }

    /// Create a client with the default endpoint and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonsError::Client`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_defaults() -> Result<Self, HorizonsError> {
        Self::new(DEFAULT_API_URL, DEFAULT_TIMEOUT_MS)
    }

    /// Fetch the current state vector for one catalog body.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonsError::Unavailable`] on transport failure or a
    /// non-2xx status, [`HorizonsError::Malformed`] when the body matches
    /// neither known response shape.
    pub async fn fetch(
        &self,
        entry: &CatalogEntry,
        correlation_id: &str,
    ) -> Result<StateVector, HorizonsError> {
        let started = Instant::now();
        let now = Utc::now();
        let start_time = now.format("%Y-%m-%d %H:%M").to_string();
        let stop_time = (now + chrono::Duration::hours(1))
            .format("%Y-%m-%d %H:%M")
            .to_string();

        let params = [
            ("format", "json".to_owned()),
            ("COMMAND", format!("'{}'", entry.horizons_id)),
            ("EPHEM_TYPE", "VECTORS".to_owned()),
            ("CENTER", "'@0'".to_owned()),
            ("REF_PLANE", "ECLIPTIC".to_owned()),
            ("REF_SYSTEM", "J2000".to_owned()),
            ("OUT_UNITS", "AU-D".to_owned()),
            ("VEC_TABLE", "2".to_owned()),
            ("STEP_SIZE", "'1d'".to_owned()),
            ("START_TIME", format!("'{start_time}'")),
            ("STOP_TIME", format!("'{stop_time}'")),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                let err = HorizonsError::Unavailable {
                    body: entry.name.to_owned(),
                    status: None,
                    snippet: e.to_string(),
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    correlation_id: correlation_id.to_owned(),
                };
                warn!(
                    body = entry.name,
                    correlation_id,
                    error = %err,
                    "horizons_fetch_error"
                );
                err
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let err = HorizonsError::Unavailable {
                body: entry.name.to_owned(),
                status: Some(status.as_u16()),
                snippet: snippet(&text),
                elapsed_ms: started.elapsed().as_millis() as u64,
                correlation_id: correlation_id.to_owned(),
            };
            warn!(
                body = entry.name,
                status = status.as_u16(),
                correlation_id,
                error = %err,
                "horizons_fetch_error"
            );
            return Err(err);
        }

        let parsed = parse_vector_response(&text).map_err(|e| {
            let err = HorizonsError::Malformed {
                body: entry.name.to_owned(),
                reason: e.to_string(),
                snippet: snippet(&text),
                elapsed_ms: started.elapsed().as_millis() as u64,
                correlation_id: correlation_id.to_owned(),
            };
            warn!(
                body = entry.name,
                correlation_id,
                error = %err,
                "horizons_fetch_error"
            );
            err
        })?;

        let latency_ms = started.elapsed().as_millis() as u64;
        info!(
            body = entry.name,
            latency_ms,
            shape = parsed.shape.as_str(),
            correlation_id,
            "horizons_fetch"
        );

        Ok(StateVector {
            name: entry.name.to_owned(),
            x: parsed.x,
            y: parsed.y,
            z: parsed.z,
            velocity: parsed.velocity,
            reference_frame: REFERENCE_FRAME.to_owned(),
            source: SOURCE.to_owned(),
            timestamp: parsed.timestamp,
        })
    }
}
