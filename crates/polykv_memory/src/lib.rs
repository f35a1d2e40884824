//! # polykv memory adapter
//!
//! An in-memory implementation of the [`polykv_core::Store`] contract,
//! backed by an ordered map. It exists for tests and ephemeral stores, and
//! doubles as the reference adapter: every lifecycle rule the persistent
//! adapters must honor is honored here with no engine quirks in the way.
//!
//! ## Example
//!
//! ```rust
//! use polykv_core::{Context, Store};
//! use polykv_memory::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let ctx = Context::background();
//!
//! let mut batch = store.batch();
//! batch.put(b"a", b"1").unwrap();
//! batch.put(b"ab", b"2").unwrap();
//! batch.commit(&ctx).unwrap();
//!
//! let mut it = store.scan(b"a");
//! assert!(it.next());
//! assert_eq!(it.key().unwrap(), b"a");
//! it.release();
//! ```

mod batch;
mod store;

pub use batch::MemoryBatch;
pub use store::MemoryStore;
