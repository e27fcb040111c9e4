//! Single-flight admission control.
//!
//! At most one refresh runs per snapshot kind. The first caller becomes
//! the leader and receives the publish side of a watch channel; everyone
//! arriving while the slot is occupied gets a receiver onto the same
//! channel. The critical section is exactly "check, install if absent"
//! under one lock.
//!
//! The slot must be cleared on every exit path of the leader's task,
//! including panics; the engine wraps clearing in a drop guard. A waiter
//! whose sender vanished without publishing sees the channel close and
//! maps it to a refresh-interrupted error.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

use crate::engine::SnapshotKind;

/// What a refresh publishes to its waiters.
pub(crate) type Published<T> = Option<T>;

/// A caller's position in the single-flight protocol.
pub(crate) enum Ticket<T> {
    /// This caller installed the slot and must run the refresh.
    Leader(watch::Sender<Published<T>>),
    /// A refresh is already running; wait on its channel.
    Waiter(watch::Receiver<Published<T>>),
}

/// One single-flight slot per snapshot kind.
pub(crate) struct InflightMap<T> {
    slots: Mutex<HashMap<SnapshotKind, watch::Receiver<Published<T>>>>,
}

impl<T: Clone> InflightMap<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Mutex::new(HashMap::new()) }
    }

    /// Join the slot for `kind`, installing it when absent.
    pub(crate) fn join(&self, kind: SnapshotKind) -> Ticket<T> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(rx) = slots.get(&kind) {
            return Ticket::Waiter(rx.clone());
        }
        let (tx, rx) = watch::channel(None);
        slots.insert(kind, rx);
        Ticket::Leader(tx)
    }

    /// Whether no refresh is inflight for `kind`.
    pub(crate) fn is_idle(&self, kind: SnapshotKind) -> bool {
        !self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&kind)
    }

    /// Release the slot for `kind`.
    pub(crate) fn clear(&self, kind: SnapshotKind) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
    }
}
