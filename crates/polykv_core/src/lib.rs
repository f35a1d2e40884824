//! # polykv core
//!
//! The backend-agnostic key-value store contract: one [`Store`]/[`Batch`]/
//! [`Iter`] trait set that application code programs against, plus the
//! machinery every adapter shares to honor it uniformly:
//!
//! - the closed error taxonomy ([`KvError`]) that is the *only* failure
//!   surface an adapter may expose,
//! - cooperative cancellation ([`Context`]), checked at operation entry,
//! - the panic-recovery boundary ([`guard::recover`]) that keeps
//!   engine-native aborts from crossing into application code,
//! - the snapshot iterator ([`SnapshotIter`]) implementing the
//!   position/exhaustion/release protocol once for all adapters.
//!
//! ## Design principles
//!
//! - Adapters normalize behavior, they do not add it: no extra locking, no
//!   background threads, no persistence of their own.
//! - Keys and values are opaque bytes; returned bytes are defensive copies.
//! - Lifecycle misuse (committed batch reuse, operations after close) is a
//!   recoverable `ProtocolViolation` on every backend, never a crash.
//!
//! ## Example
//!
//! ```rust,ignore
//! use polykv_core::{Context, Store};
//!
//! fn count_users(store: &dyn Store) -> usize {
//!     let mut it = store.scan(b"user/");
//!     let mut count = 0;
//!     while it.next() {
//!         count += 1;
//!     }
//!     it.release();
//!     count
//! }
//! ```

mod context;
mod error;
mod iter;
mod prefix;
mod store;

pub mod guard;

pub use context::{CancelHandle, Context};
pub use error::{KvError, KvResult};
pub use iter::SnapshotIter;
pub use prefix::{has_prefix, prefix_end};
pub use store::{Batch, Iter, RejectedBatch, Store};
