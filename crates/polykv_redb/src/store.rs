//! The redb store adapter.

use crate::batch::RedbBatch;
use crate::config::RedbConfig;
use polykv_core::{
    guard, prefix_end, Batch, Context, Iter, KvError, KvResult, RejectedBatch, SnapshotIter, Store,
};
use parking_lot::RwLock;
use redb::{Database, TableDefinition, TableError};
use std::fmt::Display;
use std::ops::Bound;
use std::sync::Arc;

/// All entries live in one table; keys and values are raw bytes.
pub(crate) const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("polykv");

/// The engine handle, shared with batches. `None` once the store is closed.
pub(crate) type DbHandle = Arc<RwLock<Option<Database>>>;

pub(crate) fn engine_failure(err: impl Display) -> KvError {
    KvError::io(err.to_string())
}

pub(crate) fn closed() -> KvError {
    KvError::protocol_violation("store is closed")
}

/// A store backed by a [redb](https://docs.rs/redb) database file.
///
/// Every `put`/`delete` runs in its own write transaction and is durable
/// when the call returns. Scans materialize their snapshot under a single
/// read transaction at scan time. redb aborts the process-local call stack
/// (panics) for some internal fault conditions; all entry points run inside
/// the recovery boundary so those surface as [`KvError::Io`] instead.
///
/// # Example
///
/// ```rust,no_run
/// use polykv_core::{Context, Store};
/// use polykv_redb::{RedbConfig, RedbStore};
///
/// let store = RedbStore::open(RedbConfig::new("data/store.redb")).unwrap();
/// let ctx = Context::background();
/// store.put(&ctx, b"k", b"v").unwrap();
/// store.close().unwrap();
/// ```
#[derive(Debug)]
pub struct RedbStore {
    db: DbHandle,
}

impl RedbStore {
    /// Opens or creates a database per the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the path is empty, `Io` if the engine cannot
    /// open or create the file (including a missing file when
    /// `create_if_missing` is false).
    pub fn open(config: RedbConfig) -> KvResult<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(KvError::invalid_argument("database path is empty"));
        }
        guard::recover("open", || {
            let mut builder = Database::builder();
            if let Some(bytes) = config.cache_size {
                builder.set_cache_size(bytes);
            }
            let db = if config.create_if_missing {
                builder.create(&config.path).map_err(engine_failure)?
            } else {
                builder.open(&config.path).map_err(engine_failure)?
            };
            tracing::debug!(path = %config.path.display(), "redb store opened");
            Ok(Self {
                db: Arc::new(RwLock::new(Some(db))),
            })
        })
    }

    /// Opens or creates a database at `path` with default configuration.
    ///
    /// # Errors
    ///
    /// As for [`RedbStore::open`].
    pub fn open_path(path: impl Into<std::path::PathBuf>) -> KvResult<Self> {
        Self::open(RedbConfig::new(path))
    }

    fn snapshot_range(&self, prefix: &[u8], reverse: bool) -> Box<dyn Iter> {
        let result = guard::recover("scan", || {
            let db = self.db.read();
            let db = db.as_ref().ok_or_else(closed)?;
            let txn = db.begin_read().map_err(engine_failure)?;
            let table = match txn.open_table(TABLE) {
                Ok(table) => table,
                // An engine with no table yet simply has no matches.
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(err) => return Err(engine_failure(err)),
            };
            let upper = prefix_end(prefix);
            let bounds = (
                Bound::Included(prefix),
                match upper.as_deref() {
                    Some(end) => Bound::Excluded(end),
                    None => Bound::Unbounded,
                },
            );
            let mut entries = Vec::new();
            for item in table.range::<&[u8]>(bounds).map_err(engine_failure)? {
                let (key, value) = item.map_err(engine_failure)?;
                entries.push((key.value().to_vec(), value.value().to_vec()));
            }
            if reverse {
                entries.reverse();
            }
            Ok(entries)
        });
        match result {
            Ok(entries) => Box::new(SnapshotIter::new(entries)),
            Err(err) => Box::new(SnapshotIter::failed(err)),
        }
    }
}

impl Store for RedbStore {
    fn put(&self, ctx: &Context, key: &[u8], value: &[u8]) -> KvResult<()> {
        guard::recover("put", || {
            ctx.check()?;
            let db = self.db.read();
            let db = db.as_ref().ok_or_else(closed)?;
            let txn = db.begin_write().map_err(engine_failure)?;
            {
                let mut table = txn.open_table(TABLE).map_err(engine_failure)?;
                table.insert(key, value).map_err(engine_failure)?;
            }
            txn.commit().map_err(engine_failure)
        })
    }

    fn get(&self, ctx: &Context, key: &[u8]) -> KvResult<Vec<u8>> {
        guard::recover("get", || {
            ctx.check()?;
            let db = self.db.read();
            let db = db.as_ref().ok_or_else(closed)?;
            let txn = db.begin_read().map_err(engine_failure)?;
            let table = match txn.open_table(TABLE) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Err(KvError::NotFound),
                Err(err) => return Err(engine_failure(err)),
            };
            table
                .get(key)
                .map_err(engine_failure)?
                .map(|value| value.value().to_vec())
                .ok_or(KvError::NotFound)
        })
    }

    fn delete(&self, ctx: &Context, key: &[u8]) -> KvResult<()> {
        guard::recover("delete", || {
            ctx.check()?;
            let db = self.db.read();
            let db = db.as_ref().ok_or_else(closed)?;
            let txn = db.begin_write().map_err(engine_failure)?;
            {
                let mut table = txn.open_table(TABLE).map_err(engine_failure)?;
                // Removing an absent key is a no-op, not an error.
                table.remove(key).map_err(engine_failure)?;
            }
            txn.commit().map_err(engine_failure)
        })
    }

    fn batch(&self) -> Box<dyn Batch> {
        if self.db.read().is_none() {
            return Box::new(RejectedBatch::new("store is closed"));
        }
        Box::new(RedbBatch::new(Arc::clone(&self.db)))
    }

    fn scan(&self, prefix: &[u8]) -> Box<dyn Iter> {
        self.snapshot_range(prefix, false)
    }

    fn scan_reverse(&self, prefix: &[u8]) -> Box<dyn Iter> {
        self.snapshot_range(prefix, true)
    }

    fn close(&self) -> KvResult<()> {
        guard::recover("close", || {
            let db = self.db.write().take().ok_or_else(closed)?;
            drop(db);
            tracing::debug!("redb store closed");
            Ok(())
        })
    }
}
