//! Conformance suite run against the in-memory adapter.

use polykv_core::{Context, Store};
use polykv_memory::MemoryStore;
use polykv_testkit::{key_strategy, suite, value_strategy};
use proptest::prelude::*;

fn fresh() -> MemoryStore {
    MemoryStore::new()
}

#[test]
fn round_trip() {
    suite::round_trip(&fresh());
}

#[test]
fn overwrite_is_silent() {
    suite::overwrite_is_silent(&fresh());
}

#[test]
fn get_absent_is_not_found() {
    suite::get_absent_is_not_found(&fresh());
}

#[test]
fn delete_idempotence() {
    suite::delete_idempotence(&fresh());
}

#[test]
fn empty_value_round_trip() {
    suite::empty_value_round_trip(&fresh());
}

#[test]
fn binary_keys_round_trip() {
    suite::binary_keys_round_trip(&fresh());
}

#[test]
fn batch_atomicity() {
    suite::batch_atomicity(&fresh());
}

#[test]
fn batch_last_write_wins() {
    suite::batch_last_write_wins(&fresh());
}

#[test]
fn batch_terminal_lockout() {
    suite::batch_terminal_lockout(&fresh());
}

#[test]
fn iterator_exhaustion() {
    suite::iterator_exhaustion(&fresh());
}

#[test]
fn iterator_error_is_safe_everywhere() {
    suite::iterator_error_is_safe_everywhere(&fresh());
}

#[test]
fn iterator_release_is_idempotent() {
    suite::iterator_release_is_idempotent(&fresh());
}

#[test]
fn reverse_symmetry() {
    suite::reverse_symmetry(&fresh());
}

#[test]
fn scan_prefix_scenario() {
    suite::scan_prefix_scenario(&fresh());
}

#[test]
fn scan_without_matches() {
    suite::scan_without_matches(&fresh());
}

#[test]
fn cancellation_short_circuit() {
    suite::cancellation_short_circuit(&fresh());
}

#[test]
fn deadline_short_circuit() {
    suite::deadline_short_circuit(&fresh());
}

#[test]
fn closed_store_lockout() {
    suite::closed_store_lockout(&fresh());
}

proptest! {
    #[test]
    fn any_pair_round_trips(key in key_strategy(), value in value_strategy()) {
        let store = fresh();
        let ctx = Context::background();
        store.put(&ctx, &key, &value).unwrap();
        prop_assert_eq!(store.get(&ctx, &key).unwrap(), value);
    }

    #[test]
    fn delete_always_removes(key in key_strategy(), value in value_strategy()) {
        let store = fresh();
        let ctx = Context::background();
        store.put(&ctx, &key, &value).unwrap();
        store.delete(&ctx, &key).unwrap();
        prop_assert!(store.get(&ctx, &key).unwrap_err().is_not_found());
    }
}
