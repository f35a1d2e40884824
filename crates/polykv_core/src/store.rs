//! The Store/Batch/Iter contract every backend adapter implements.

use crate::context::Context;
use crate::error::{KvError, KvResult};

/// A key-value store over exactly one backend engine handle.
///
/// Implementations adapt a concrete embedded engine (redb, an in-memory
/// map, ...) to this contract. Application code depends only on the trait,
/// never on a concrete adapter, so engines can be swapped without touching
/// call sites.
///
/// # Failure normalization
///
/// The only failure modes an implementation may surface are the variants of
/// [`KvError`]. Engines that react to misuse by panicking must be wrapped so
/// that the panic never crosses this boundary; see [`crate::guard::recover`].
///
/// # Lifecycle
///
/// A store is `Open` from construction until [`Store::close`] succeeds, and
/// `Closed` forever after. Any operation against a closed store (including a
/// second `close`) reports [`KvError::ProtocolViolation`].
///
/// # Concurrency
///
/// Stores are `Send + Sync`; CRUD operations may run concurrently from
/// multiple threads, relying on whatever guarantees the wrapped engine
/// provides. Batches and iterators obtained from a store are single-owner
/// objects and must not be shared between threads mid-use.
pub trait Store: Send + Sync {
    /// Inserts or updates a key-value pair. Overwrites silently.
    ///
    /// # Errors
    ///
    /// `Cancelled`/`DeadlineExceeded` if `ctx` expired before the engine was
    /// touched, `ProtocolViolation` if the store is closed, `Io` on engine
    /// fault.
    fn put(&self, ctx: &Context, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Retrieves the value for a key as a defensive copy owned by the caller.
    ///
    /// # Errors
    ///
    /// `NotFound` if the key is absent — distinguishable from `Io`, which is
    /// reserved for genuine engine faults. Context and lifecycle errors as
    /// for [`Store::put`].
    fn get(&self, ctx: &Context, key: &[u8]) -> KvResult<Vec<u8>>;

    /// Removes a key-value pair. Deleting an absent key succeeds as a no-op.
    ///
    /// # Errors
    ///
    /// Context and lifecycle errors as for [`Store::put`].
    fn delete(&self, ctx: &Context, key: &[u8]) -> KvResult<()>;

    /// Creates a fresh batch in the `Open` state.
    ///
    /// Batches are single-use: once committed, discard the object and call
    /// this again. A batch created from a closed store reports the violation
    /// from every one of its operations.
    fn batch(&self) -> Box<dyn Batch>;

    /// Creates an iterator over all keys starting with `prefix`, in
    /// ascending lexicographic order.
    ///
    /// The iterator observes a snapshot of the store taken at this call.
    /// Failures during setup (including a closed store) are not reported
    /// here: the returned iterator yields nothing and records the failure
    /// for [`Iter::error`].
    fn scan(&self, prefix: &[u8]) -> Box<dyn Iter>;

    /// Like [`Store::scan`], but yields entries in strictly descending key
    /// order. Over the same key set, the sequence is the exact reverse of
    /// the forward scan.
    fn scan_reverse(&self, prefix: &[u8]) -> Box<dyn Iter>;

    /// Releases the engine handle.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if the store is already closed, `Io` if the
    /// engine fails to shut down cleanly.
    fn close(&self) -> KvResult<()>;
}

/// A staged, atomically-committed sequence of write operations.
///
/// Operations are applied in staging order at commit time; conflicting
/// operations on the same key resolve last-write-wins. Lifecycle is one-way:
/// `Open` → `Committed`, with no path back.
pub trait Batch {
    /// Stages an insert-or-update.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if the batch was already committed.
    fn put(&mut self, key: &[u8], value: &[u8]) -> KvResult<()>;

    /// Stages a delete.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if the batch was already committed.
    fn delete(&mut self, key: &[u8]) -> KvResult<()>;

    /// Flushes all staged operations atomically.
    ///
    /// The batch transitions to `Committed` before the flush starts, so a
    /// repeated call can never double-apply. The flush itself is
    /// all-or-nothing: either every staged operation becomes visible or
    /// none do.
    ///
    /// # Errors
    ///
    /// `Cancelled`/`DeadlineExceeded` if `ctx` expired first (the batch then
    /// stays `Open`), `ProtocolViolation` on a second commit or a closed
    /// store, `Io` if the engine rejects the flush (nothing applied).
    fn commit(&mut self, ctx: &Context) -> KvResult<()>;
}

/// A single-consumer lazy cursor over an ordered key range.
///
/// State machine: `NotStarted` → `Positioned` ↔ advance → `Exhausted`; any
/// state → `Released` (terminal). Dropping an iterator releases it, but
/// long-lived holders should call [`Iter::release`] explicitly to free the
/// snapshot early.
pub trait Iter {
    /// Advances to the next matching entry.
    ///
    /// From `NotStarted` this seeks to the first entry of the range. Returns
    /// true when positioned on an entry; false once the range is exhausted,
    /// and keeps returning false on every later call.
    fn next(&mut self) -> bool;

    /// The current key, as a defensive copy.
    ///
    /// `None` in every state except `Positioned` — never stale data from a
    /// prior position, never a panic.
    fn key(&self) -> Option<Vec<u8>>;

    /// The current value, as a defensive copy.
    ///
    /// `None` in every state except `Positioned`.
    fn value(&self) -> Option<Vec<u8>>;

    /// The most recently recorded retrieval failure, if any.
    ///
    /// Safe and side-effect-free in every state, including an iterator that
    /// never advanced or matched nothing.
    fn error(&self) -> Option<&KvError>;

    /// Releases the underlying cursor resources. Idempotent.
    fn release(&mut self);
}

/// A batch whose every operation reports the same protocol violation.
///
/// Returned by [`Store::batch`] on a closed store, so the misuse surfaces as
/// a recoverable outcome at the first operation instead of a crash.
pub struct RejectedBatch {
    message: String,
}

impl RejectedBatch {
    /// Creates a batch that rejects everything with the given violation.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn violation(&self) -> KvError {
        KvError::protocol_violation(self.message.clone())
    }
}

impl Batch for RejectedBatch {
    fn put(&mut self, _key: &[u8], _value: &[u8]) -> KvResult<()> {
        Err(self.violation())
    }

    fn delete(&mut self, _key: &[u8]) -> KvResult<()> {
        Err(self.violation())
    }

    fn commit(&mut self, ctx: &Context) -> KvResult<()> {
        ctx.check()?;
        Err(self.violation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_batch_refuses_everything() {
        let ctx = Context::background();
        let mut batch = RejectedBatch::new("store is closed");
        assert!(matches!(
            batch.put(b"k", b"v"),
            Err(KvError::ProtocolViolation { .. })
        ));
        assert!(matches!(
            batch.delete(b"k"),
            Err(KvError::ProtocolViolation { .. })
        ));
        assert!(matches!(
            batch.commit(&ctx),
            Err(KvError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn rejected_batch_still_honors_cancellation() {
        let (ctx, handle) = Context::cancellable();
        handle.cancel();
        let mut batch = RejectedBatch::new("store is closed");
        assert!(matches!(batch.commit(&ctx), Err(KvError::Cancelled)));
    }
}
