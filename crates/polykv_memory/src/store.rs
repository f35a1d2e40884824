//! The in-memory store adapter.

use crate::batch::MemoryBatch;
use polykv_core::{
    guard, prefix_end, Batch, Context, Iter, KvError, KvResult, RejectedBatch, SnapshotIter, Store,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared state behind a [`MemoryStore`] and its batches.
pub(crate) struct Inner {
    pub(crate) map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    pub(crate) closed: AtomicBool,
}

impl Inner {
    pub(crate) fn ensure_open(&self) -> KvResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(KvError::protocol_violation("store is closed"));
        }
        Ok(())
    }
}

/// A store backed by an ordered in-memory map.
///
/// Suitable for unit tests and ephemeral data. Honors the full contract,
/// including snapshot scans and the batch/iterator lifecycle rules, so code
/// exercised against it behaves identically on the persistent adapters.
///
/// # Example
///
/// ```rust
/// use polykv_core::{Context, Store};
/// use polykv_memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// let ctx = Context::background();
/// store.put(&ctx, b"greeting", b"hello").unwrap();
/// assert_eq!(store.get(&ctx, b"greeting").unwrap(), b"hello");
/// ```
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Creates an empty open store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                map: RwLock::new(BTreeMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Number of live entries. Test helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.map.read().len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot_range(&self, prefix: &[u8], reverse: bool) -> Box<dyn Iter> {
        if let Err(err) = self.inner.ensure_open() {
            return Box::new(SnapshotIter::failed(err));
        }
        let map = self.inner.map.read();
        let upper = prefix_end(prefix);
        let bounds = (
            Bound::Included(prefix),
            match upper.as_deref() {
                Some(end) => Bound::Excluded(end),
                None => Bound::Unbounded,
            },
        );
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = map
            .range::<[u8], _>(bounds)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if reverse {
            entries.reverse();
        }
        Box::new(SnapshotIter::new(entries))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn put(&self, ctx: &Context, key: &[u8], value: &[u8]) -> KvResult<()> {
        guard::recover("put", || {
            ctx.check()?;
            self.inner.ensure_open()?;
            self.inner.map.write().insert(key.to_vec(), value.to_vec());
            Ok(())
        })
    }

    fn get(&self, ctx: &Context, key: &[u8]) -> KvResult<Vec<u8>> {
        guard::recover("get", || {
            ctx.check()?;
            self.inner.ensure_open()?;
            self.inner
                .map
                .read()
                .get(key)
                .cloned()
                .ok_or(KvError::NotFound)
        })
    }

    fn delete(&self, ctx: &Context, key: &[u8]) -> KvResult<()> {
        guard::recover("delete", || {
            ctx.check()?;
            self.inner.ensure_open()?;
            self.inner.map.write().remove(key);
            Ok(())
        })
    }

    fn batch(&self) -> Box<dyn Batch> {
        if self.inner.ensure_open().is_err() {
            return Box::new(RejectedBatch::new("store is closed"));
        }
        Box::new(MemoryBatch::new(Arc::clone(&self.inner)))
    }

    fn scan(&self, prefix: &[u8]) -> Box<dyn Iter> {
        self.snapshot_range(prefix, false)
    }

    fn scan_reverse(&self, prefix: &[u8]) -> Box<dyn Iter> {
        self.snapshot_range(prefix, true)
    }

    fn close(&self) -> KvResult<()> {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Err(KvError::protocol_violation("store is closed"));
        }
        self.inner.map.write().clear();
        tracing::debug!("memory store closed");
        Ok(())
    }
}
