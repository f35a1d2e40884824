//! Staged write batches for the redb adapter.

use crate::store::{closed, engine_failure, DbHandle, TABLE};
use polykv_core::{guard, Batch, Context, KvError, KvResult};

enum StagedOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// A batch staged against a [`crate::RedbStore`].
///
/// Operations are buffered adapter-side and applied inside one redb write
/// transaction at commit. redb commits are atomic, so either the whole
/// batch becomes visible or, if the transaction is refused, nothing does
/// (the transaction aborts on drop).
pub struct RedbBatch {
    db: DbHandle,
    ops: Vec<StagedOp>,
    committed: bool,
}

impl RedbBatch {
    pub(crate) fn new(db: DbHandle) -> Self {
        Self {
            db,
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

impl Batch for RedbBatch {
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
        // Terminal from here on, even if the engine refuses the flush.
        self.committed = true;
        guard::recover("commit", || {
            let db = self.db.read();
            let db = db.as_ref().ok_or_else(closed)?;
            let txn = db.begin_write().map_err(engine_failure)?;
            {
                let mut table = txn.open_table(TABLE).map_err(engine_failure)?;
                for op in self.ops.drain(..) {
                    match op {
                        StagedOp::Put { key, value } => {
                            table
                                .insert(key.as_slice(), value.as_slice())
                                .map_err(engine_failure)?;
                        }
                        StagedOp::Delete { key } => {
                            table.remove(key.as_slice()).map_err(engine_failure)?;
                        }
                    }
                }
            }
            txn.commit().map_err(engine_failure)
        })
    }
}
