//! Two-tier cache store for Helios snapshots.
//!
//! The primary tier is a shared Redis-compatible store reached through
//! [`fred`]; the secondary tier is an in-process map. Reads try the
//! primary and mirror hits into the secondary; writes go through both.
//! The primary is optional and best-effort: a missing or unreachable
//! store degrades the service to memory-only, never fails it.
//!
//! # Modules
//!
//! - [`redis`] -- shared-store tier with health tracking and reconnect
//! - [`memory`] -- in-process fallback tier
//! - [`store`] -- the two-tier policy
//! - [`error`] -- store error types

pub mod error;
pub mod memory;
pub mod redis;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::MemoryTier;
pub use redis::RedisTier;
pub use store::CacheStore;
