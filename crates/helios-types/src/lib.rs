//! Shared type definitions for the Helios ephemeris service.
//!
//! This crate is the single source of truth for types used across the
//! Helios workspace. Wire-facing payload types flow downstream to
//! `TypeScript` via `ts-rs` for the visualization dashboard.
//!
//! # Modules
//!
//! - [`catalog`] -- The closed registry of solar-system bodies served
//! - [`vector`] -- Heliocentric state vectors as returned by the upstream
//! - [`snapshot`] -- Coherent multi-body snapshots and their cache records
//! - [`wire`] -- JSON payload types for the HTTP surface

pub mod catalog;
pub mod snapshot;
pub mod vector;
pub mod wire;

// Re-export primary types at the crate root for convenience.
pub use catalog::{catalog, BodyKind, CatalogEntry, PLANETS, PROBES};
pub use snapshot::{CacheBackend, CacheRecord, CacheState, Snapshot};
pub use vector::{StateVector, Velocity, KM_PER_AU, REFERENCE_FRAME, SECONDS_PER_DAY};
pub use wire::{
    BodyPayload, DistanceTriple, ErrorResponse, LightTimePayload, PlanetsResponse,
    SnapshotMetadata, SpeedTriple, TrajectoryPayload, Vector3, VoyagerPayload, VoyagersMetadata,
    VoyagersResponse,
};
