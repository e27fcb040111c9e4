//! Upstream ephemeris provider for the Helios service.
//!
//! Wraps the JPL Horizons vectors API: request construction, the
//! two-shape response parser, and error mapping. All backends are
//! dispatched through the [`EphemerisSource`] enum (async methods are
//! not dyn-compatible, so enum dispatch replaces trait objects), which
//! also ships the [`ScriptedSource`] test double used by the engine and
//! server test suites.
//!
//! # Modules
//!
//! - [`client`] -- HTTP client for the Horizons vectors endpoint
//! - [`parse`] -- structured and embedded-text response parsing
//! - [`source`] -- enum dispatch over real and scripted providers
//! - [`error`] -- provider error types

pub mod client;
pub mod error;
pub mod parse;
pub mod source;

// Re-export primary types for convenience.
pub use client::{HorizonsClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use error::HorizonsError;
pub use parse::{parse_vector_response, ParsedVector, ResponseShape};
pub use source::{EphemerisSource, ScriptedSource};
