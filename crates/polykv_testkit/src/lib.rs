//! # polykv testkit
//!
//! The conformance suite for polykv backend adapters, plus random-data
//! helpers and proptest strategies.
//!
//! The contract in `polykv_core` promises that all backends behave
//! identically at the boundary: same error taxonomy, same batch lifecycle,
//! same iterator protocol. This crate is that promise in executable form —
//! adapters run the suite from their integration tests, one fresh store per
//! check.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polykv_testkit::suite;
//!
//! #[test]
//! fn conformance() {
//!     suite::run_all(|| Box::new(MyStore::new()));
//! }
//! ```

pub mod generators;
pub mod suite;

pub use generators::{key_strategy, random_bytes, random_pairs, value_strategy};
