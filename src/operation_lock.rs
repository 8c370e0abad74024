//! Shared "transaction in progress" flag.
//!
//! The gift list view owns the only [`OperationLockWriter`]. Every other part
//! of the UI that needs to know whether a transaction is in flight holds an
//! [`OperationLock`] reader. The flag is advisory: writers never check it
//! before starting work and readers only use it to grey out actions.
//!
//! The flag starts idle and the transition counter only moves on a real flip,
//! so `is_busy() == busy_at(transitions())` whenever no write is in flight.
//! A sampler that needs the count and the value to agree should load
//! [`OperationLock::transitions`] once and derive the value with [`busy_at`]
//! instead of reading both.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Busy value implied by a transition count: odd means busy.
pub fn busy_at(transitions: u64) -> bool {
    transitions % 2 == 1
}

#[derive(Default)]
struct LockState {
    busy: AtomicBool,
    /// Bumped on every actual transition of `busy`
    transitions: AtomicU64,
}

/// Read side of the operation lock. Cheap to clone.
#[derive(Clone, Default)]
pub struct OperationLock {
    state: Arc<LockState>,
}

/// Write side of the operation lock. Not `Clone`; share it behind an `Arc`.
pub struct OperationLockWriter {
    state: Arc<LockState>,
}

impl OperationLock {
    /// Create a lock and its single writer.
    pub fn new() -> (OperationLockWriter, OperationLock) {
        let state = Arc::new(LockState::default());
        (
            OperationLockWriter {
                state: Arc::clone(&state),
            },
            OperationLock { state },
        )
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::SeqCst)
    }

    /// Number of busy/idle transitions so far. Odd counts mean busy, see
    /// [`busy_at`].
    pub fn transitions(&self) -> u64 {
        self.state.transitions.load(Ordering::SeqCst)
    }
}

impl OperationLockWriter {
    pub fn set_busy(&self, busy: bool) {
        let previous = self.state.busy.swap(busy, Ordering::SeqCst);
        if previous != busy {
            self.state.transitions.fetch_add(1, Ordering::SeqCst);
            debug!("Operation lock {}", if busy { "acquired" } else { "released" });
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::SeqCst)
    }

    pub fn reader(&self) -> OperationLock {
        OperationLock {
            state: Arc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lock_is_idle() {
        let (writer, reader) = OperationLock::new();
        assert!(!writer.is_busy());
        assert!(!reader.is_busy());
        assert_eq!(reader.transitions(), 0);
    }

    #[test]
    fn test_readers_see_writer() {
        let (writer, reader) = OperationLock::new();
        let other = writer.reader();
        writer.set_busy(true);
        assert!(reader.is_busy());
        assert!(other.is_busy());
        writer.set_busy(false);
        assert!(!reader.is_busy());
    }

    #[test]
    fn test_transitions_only_count_changes() {
        let (writer, reader) = OperationLock::new();
        writer.set_busy(true);
        writer.set_busy(true);
        writer.set_busy(false);
        writer.set_busy(false);
        assert_eq!(reader.transitions(), 2);
    }

    #[test]
    fn test_busy_matches_transition_parity() {
        let (writer, reader) = OperationLock::new();
        assert_eq!(busy_at(reader.transitions()), reader.is_busy());
        for busy in [true, true, false, true, false, false] {
            writer.set_busy(busy);
            assert_eq!(busy_at(reader.transitions()), reader.is_busy());
        }
        assert_eq!(reader.transitions(), 4);
    }

    #[test]
    fn test_writer_shared_across_threads() {
        let (writer, reader) = OperationLock::new();
        let writer = Arc::new(writer);
        let w = Arc::clone(&writer);
        std::thread::spawn(move || w.set_busy(true)).join().unwrap();
        assert!(reader.is_busy());
    }
}
