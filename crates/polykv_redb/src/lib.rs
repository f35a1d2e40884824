//! # polykv redb adapter
//!
//! A persistent implementation of the [`polykv_core::Store`] contract over
//! the [redb](https://docs.rs/redb) embedded engine.
//!
//! The adapter's job is normalization, not storage: redb already provides
//! atomic transactions and ordered range queries, so this crate maps those
//! onto the contract's lifecycle rules and translates every engine failure
//! signal — returned errors and panics alike — into the canonical
//! [`polykv_core::KvError`] set.
//!
//! ## Example
//!
//! ```rust,no_run
//! use polykv_core::{Context, Store};
//! use polykv_redb::{RedbConfig, RedbStore};
//!
//! let store = RedbStore::open(RedbConfig::new("data/store.redb")).unwrap();
//! let ctx = Context::background();
//!
//! let mut batch = store.batch();
//! batch.put(b"user/1", b"alice").unwrap();
//! batch.put(b"user/2", b"bob").unwrap();
//! batch.commit(&ctx).unwrap();
//!
//! let mut it = store.scan(b"user/");
//! while it.next() {
//!     println!("{:?}", it.key().unwrap());
//! }
//! it.release();
//! store.close().unwrap();
//! ```

mod batch;
mod config;
mod store;

pub use batch::RedbBatch;
pub use config::RedbConfig;
pub use store::RedbStore;
