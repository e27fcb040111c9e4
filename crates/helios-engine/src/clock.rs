//! Time source for the engine.
//!
//! Freshness classification compares wall-clock instants, so the clock
//! is an explicit dependency instead of scattered `Utc::now()` calls.
//! Production uses [`Clock::System`]; tests use a manual clock they can
//! freeze and advance deterministically.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// The engine's time source.
#[derive(Clone)]
pub enum Clock {
    /// Real wall clock.
    System,
    /// Externally controlled clock for tests.
    Manual(Arc<ManualClock>),
}

impl Clock {
    /// Current instant according to this clock.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Manual(manual) => manual.now(),
        }
    }

    /// Create a manual clock starting at `start`, returning both the
    /// clock and the handle used to move it.
    pub fn manual(start: DateTime<Utc>) -> (Self, Arc<ManualClock>) {
        let manual = Arc::new(ManualClock { epoch_ms: AtomicI64::new(start.timestamp_millis()) });
        (Self::Manual(Arc::clone(&manual)), manual)
    }
}

/// Atomic epoch-milliseconds cell backing [`Clock::Manual`].
#[derive(Debug)]
pub struct ManualClock {
    epoch_ms: AtomicI64,
}

impl ManualClock {
    /// Current instant.
    pub fn now(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.epoch_ms.load(Ordering::Acquire))
            .unwrap_or_default()
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.epoch_ms.store(instant.timestamp_millis(), Ordering::Release);
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance_ms(&self, ms: i64) {
        self.epoch_ms.fetch_add(ms, Ordering::AcqRel);
    }
}
