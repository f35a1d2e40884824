//! Staged write batches for the in-memory adapter.

use crate::store::Inner;
use polykv_core::{guard, Batch, Context, KvError, KvResult};
use std::sync::Arc;

enum StagedOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// A batch staged against a [`crate::MemoryStore`].
///
/// Operations accumulate in staging order and are applied under a single
/// write lock at commit, so the flush is atomic with respect to concurrent
/// readers and writers.
pub struct MemoryBatch {
    inner: Arc<Inner>,
    ops: Vec<StagedOp>,
    committed: bool,
}

impl MemoryBatch {
    pub(crate) fn new(inner: Arc<Inner>) -> Self {
        Self {
            inner,
            ops: Vec::new(),
            committed: false,
        }
    }

    fn ensure_uncommitted(&self) -> KvResult<()> {
        if self.committed {
            return Err(KvError::protocol_violation("batch already committed"));
        }
        Ok(())
    }
}

impl Batch for MemoryBatch {
    fn put(&mut self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.ensure_uncommitted()?;
        self.ops.push(StagedOp::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> KvResult<()> {
        self.ensure_uncommitted()?;
        self.ops.push(StagedOp::Delete { key: key.to_vec() });
        Ok(())
    }

    fn commit(&mut self, ctx: &Context) -> KvResult<()> {
        ctx.check()?;
        self.ensure_uncommitted()?;
        // Terminal from here on, even if the flush is refused below.
        self.committed = true;
        guard::recover("commit", || {
            self.inner.ensure_open()?;
            let mut map = self.inner.map.write();
            for op in self.ops.drain(..) {
                match op {
                    StagedOp::Put { key, value } => {
                        map.insert(key, value);
                    }
                    StagedOp::Delete { key } => {
                        map.remove(&key);
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::MemoryStore;
    use polykv_core::{Context, KvError, Store};

    #[test]
    fn commit_applies_all_staged_ops_in_order() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        store.put(&ctx, b"gone", b"x").unwrap();

        let mut batch = store.batch();
        batch.put(b"a", b"1").unwrap();
        batch.put(b"b", b"2").unwrap();
        batch.delete(b"gone").unwrap();
        batch.commit(&ctx).unwrap();

        assert_eq!(store.get(&ctx, b"a").unwrap(), b"1");
        assert_eq!(store.get(&ctx, b"b").unwrap(), b"2");
        assert!(store.get(&ctx, b"gone").unwrap_err().is_not_found());
    }

    #[test]
    fn nothing_visible_before_commit() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        let mut batch = store.batch();
        batch.put(b"a", b"1").unwrap();
        assert!(store.get(&ctx, b"a").unwrap_err().is_not_found());
        batch.commit(&ctx).unwrap();
        assert_eq!(store.get(&ctx, b"a").unwrap(), b"1");
    }

    #[test]
    fn same_key_resolves_last_write_wins() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        let mut batch = store.batch();
        batch.put(b"k", b"first").unwrap();
        batch.delete(b"k").unwrap();
        batch.put(b"k", b"last").unwrap();
        batch.commit(&ctx).unwrap();
        assert_eq!(store.get(&ctx, b"k").unwrap(), b"last");
    }

    #[test]
    fn committed_batch_rejects_further_use() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        let mut batch = store.batch();
        batch.put(b"a", b"1").unwrap();
        batch.commit(&ctx).unwrap();

        assert!(matches!(
            batch.put(b"b", b"2"),
            Err(KvError::ProtocolViolation { .. })
        ));
        assert!(matches!(
            batch.delete(b"a"),
            Err(KvError::ProtocolViolation { .. })
        ));
        assert!(matches!(
            batch.commit(&ctx),
            Err(KvError::ProtocolViolation { .. })
        ));
        // The second commit did not re-apply anything.
        assert_eq!(store.get(&ctx, b"a").unwrap(), b"1");
    }

    #[test]
    fn cancelled_commit_leaves_batch_open_and_store_untouched() {
        let store = MemoryStore::new();
        let background = Context::background();
        let mut batch = store.batch();
        batch.put(b"a", b"1").unwrap();

        let (cancelled, handle) = Context::cancellable();
        handle.cancel();
        assert!(matches!(batch.commit(&cancelled), Err(KvError::Cancelled)));
        assert!(store.get(&background, b"a").unwrap_err().is_not_found());

        // Still open: a later commit with a live context succeeds.
        batch.commit(&background).unwrap();
        assert_eq!(store.get(&background, b"a").unwrap(), b"1");
    }

    #[test]
    fn commit_against_closed_store_is_violation_with_no_effect() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        let mut batch = store.batch();
        batch.put(b"a", b"1").unwrap();
        store.close().unwrap();

        assert!(matches!(
            batch.commit(&ctx),
            Err(KvError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn batch_from_closed_store_rejects_staging() {
        let store = MemoryStore::new();
        store.close().unwrap();
        let mut batch = store.batch();
        assert!(matches!(
            batch.put(b"a", b"1"),
            Err(KvError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn empty_batch_commit_succeeds() {
        let store = MemoryStore::new();
        let ctx = Context::background();
        let mut batch = store.batch();
        batch.commit(&ctx).unwrap();
    }
}
