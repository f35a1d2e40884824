//! Snapshot-backed iterator shared by the backend adapters.
//!
//! Both shipped adapters materialize the matching range under the engine's
//! own read transaction at scan time, then drive this state machine over
//! the materialized entries. That keeps the consistency scope uniform (a
//! snapshot as of scan start) and keeps the position/exhaustion/release
//! protocol in one place instead of once per backend.

use crate::error::KvError;
use crate::store::Iter;

/// Cursor position over the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `next()` has not been called yet.
    NotStarted,
    /// Positioned on `entries[index]`.
    Positioned(usize),
    /// The range is exhausted; `next()` stays false.
    Exhausted,
    /// Released; terminal.
    Released,
}

/// An iterator over a range snapshot taken at scan start.
///
/// Entries are held in yield order: ascending for forward scans, descending
/// for reverse scans (the adapter reverses before construction).
pub struct SnapshotIter {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    state: State,
    error: Option<KvError>,
}

impl SnapshotIter {
    /// Creates an iterator over entries already in yield order.
    #[must_use]
    pub fn new(entries: Vec<(Vec<u8>, Vec<u8>)>) -> Self {
        Self {
            entries,
            state: State::NotStarted,
            error: None,
        }
    }

    /// Creates an iterator whose setup already failed.
    ///
    /// It yields nothing and reports `error` from [`Iter::error`], so a
    /// failed `scan` surfaces as an empty sequence plus a recorded failure
    /// rather than a crash at the call site.
    #[must_use]
    pub fn failed(error: KvError) -> Self {
        Self {
            entries: Vec::new(),
            state: State::Exhausted,
            error: Some(error),
        }
    }

    /// Creates an iterator over the entries retrieved before a failure.
    ///
    /// The collected entries are still yielded; `error` is reported from
    /// [`Iter::error`] so callers can tell a truncated sequence from a
    /// complete one.
    #[must_use]
    pub fn partial(entries: Vec<(Vec<u8>, Vec<u8>)>, error: KvError) -> Self {
        Self {
            entries,
            state: State::NotStarted,
            error: Some(error),
        }
    }

    fn current(&self) -> Option<&(Vec<u8>, Vec<u8>)> {
        match self.state {
            State::Positioned(index) => self.entries.get(index),
            _ => None,
        }
    }
}

impl Iter for SnapshotIter {
    fn next(&mut self) -> bool {
        self.state = match self.state {
            State::NotStarted if !self.entries.is_empty() => State::Positioned(0),
            State::Positioned(index) if index + 1 < self.entries.len() => {
                State::Positioned(index + 1)
            }
            State::Released => State::Released,
            _ => State::Exhausted,
        };
        matches!(self.state, State::Positioned(_))
    }

    fn key(&self) -> Option<Vec<u8>> {
        self.current().map(|(key, _)| key.clone())
    }

    fn value(&self) -> Option<Vec<u8>> {
        self.current().map(|(_, value)| value.clone())
    }

    fn error(&self) -> Option<&KvError> {
        self.error.as_ref()
    }

    fn release(&mut self) {
        // Drop the snapshot now; the recorded error stays observable.
        self.entries = Vec::new();
        self.state = State::Released;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&[u8], &[u8])]) -> Vec<(Vec<u8>, Vec<u8>)> {
        items
            .iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect()
    }

    #[test]
    fn yields_entries_in_order_then_exhausts() {
        let mut it = SnapshotIter::new(pairs(&[(b"a", b"1"), (b"b", b"2")]));
        assert!(it.next());
        assert_eq!(it.key().as_deref(), Some(b"a".as_slice()));
        assert_eq!(it.value().as_deref(), Some(b"1".as_slice()));
        assert!(it.next());
        assert_eq!(it.key().as_deref(), Some(b"b".as_slice()));
        assert!(!it.next());
        assert!(!it.next());
        assert!(it.error().is_none());
    }

    #[test]
    fn sentinel_before_first_advance() {
        let it = SnapshotIter::new(pairs(&[(b"a", b"1")]));
        assert!(it.key().is_none());
        assert!(it.value().is_none());
        assert!(it.error().is_none());
    }

    #[test]
    fn sentinel_after_exhaustion_never_stale() {
        let mut it = SnapshotIter::new(pairs(&[(b"a", b"1")]));
        assert!(it.next());
        assert!(!it.next());
        assert!(it.key().is_none());
        assert!(it.value().is_none());
    }

    #[test]
    fn empty_snapshot_exhausts_immediately() {
        let mut it = SnapshotIter::new(Vec::new());
        assert!(!it.next());
        assert!(it.key().is_none());
        assert!(it.error().is_none());
    }

    #[test]
    fn release_is_terminal_and_idempotent() {
        let mut it = SnapshotIter::new(pairs(&[(b"a", b"1")]));
        assert!(it.next());
        it.release();
        it.release();
        assert!(!it.next());
        assert!(it.key().is_none());
        assert!(it.value().is_none());
    }

    #[test]
    fn release_before_start_yields_nothing() {
        let mut it = SnapshotIter::new(pairs(&[(b"a", b"1")]));
        it.release();
        assert!(!it.next());
    }

    #[test]
    fn failed_iterator_reports_error_without_yielding() {
        let mut it = SnapshotIter::failed(KvError::protocol_violation("store is closed"));
        assert!(!it.next());
        assert!(matches!(
            it.error(),
            Some(KvError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn partial_iterator_yields_then_reports() {
        let mut it = SnapshotIter::partial(
            pairs(&[(b"a", b"1")]),
            KvError::io("value retrieval failed"),
        );
        assert!(it.next());
        assert_eq!(it.key().as_deref(), Some(b"a".as_slice()));
        assert!(!it.next());
        assert!(matches!(it.error(), Some(KvError::Io { .. })));
    }

    #[test]
    fn error_survives_release() {
        let mut it = SnapshotIter::failed(KvError::io("cursor setup failed"));
        it.release();
        assert!(it.error().is_some());
    }
}
