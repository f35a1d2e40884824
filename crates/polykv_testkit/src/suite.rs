//! The adapter conformance suite.
//!
//! Every check takes a freshly opened, empty store and asserts one piece of
//! the contract. Adapters wire these into their integration tests so all
//! backends are held to identical behavior; a new adapter passes the suite
//! or it is not a conforming adapter.
//!
//! All checks panic (via `assert!`) on contract violations, matching how
//! they are consumed from `#[test]` functions.

use crate::generators::random_pairs;
use polykv_core::{Context, KvError, Store};
use std::time::{Duration, Instant};

/// Runs every check in the suite against stores produced by `factory`.
///
/// Each check gets a fresh store so earlier checks cannot mask later ones.
pub fn run_all(factory: impl Fn() -> Box<dyn Store>) {
    round_trip(factory().as_ref());
    overwrite_is_silent(factory().as_ref());
    get_absent_is_not_found(factory().as_ref());
    delete_idempotence(factory().as_ref());
    empty_value_round_trip(factory().as_ref());
    binary_keys_round_trip(factory().as_ref());
    batch_atomicity(factory().as_ref());
    batch_last_write_wins(factory().as_ref());
    batch_terminal_lockout(factory().as_ref());
    iterator_exhaustion(factory().as_ref());
    iterator_error_is_safe_everywhere(factory().as_ref());
    iterator_release_is_idempotent(factory().as_ref());
    reverse_symmetry(factory().as_ref());
    scan_prefix_scenario(factory().as_ref());
    scan_without_matches(factory().as_ref());
    cancellation_short_circuit(factory().as_ref());
    deadline_short_circuit(factory().as_ref());
    closed_store_lockout(factory().as_ref());
}

/// Put followed by Get returns exactly the stored value.
pub fn round_trip(store: &dyn Store) {
    let ctx = Context::background();
    for (key, value) in random_pairs(10) {
        store.put(&ctx, &key, &value).expect("put failed");
        assert_eq!(store.get(&ctx, &key).expect("get failed"), value);
    }
}

/// Put on an existing key overwrites with no error and no signal.
pub fn overwrite_is_silent(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"k", b"old").expect("put failed");
    store.put(&ctx, b"k", b"new").expect("overwrite failed");
    assert_eq!(store.get(&ctx, b"k").expect("get failed"), b"new");
}

/// Get on an absent key is `NotFound`, distinguishable from an I/O fault.
pub fn get_absent_is_not_found(store: &dyn Store) {
    let ctx = Context::background();
    let err = store.get(&ctx, b"absent").expect_err("get of absent key succeeded");
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
}

/// Delete of an absent key succeeds; repeating it stays a no-op.
pub fn delete_idempotence(store: &dyn Store) {
    let ctx = Context::background();
    store.delete(&ctx, b"absent").expect("delete of absent key failed");
    store.delete(&ctx, b"absent").expect("repeated delete failed");

    store.put(&ctx, b"k", b"v").expect("put failed");
    store.delete(&ctx, b"k").expect("delete failed");
    store.delete(&ctx, b"k").expect("delete after delete failed");
    assert!(store.get(&ctx, b"k").unwrap_err().is_not_found());
}

/// Empty values round-trip; they are data, not absence.
pub fn empty_value_round_trip(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"k", b"").expect("put of empty value failed");
    assert_eq!(store.get(&ctx, b"k").expect("get failed"), b"");
}

/// Keys containing NUL, 0xFF and control bytes store and scan correctly.
pub fn binary_keys_round_trip(store: &dyn Store) {
    let ctx = Context::background();
    let keys: [&[u8]; 4] = [
        b"pre_\x00key1",
        b"pre_\xffkey2",
        b"pre_\x01key3",
        b"pre_key\x00end",
    ];
    for (index, key) in keys.iter().enumerate() {
        store.put(&ctx, key, &[index as u8]).expect("put failed");
    }

    let mut it = store.scan(b"pre_");
    let mut found = 0;
    while it.next() {
        let key = it.key().expect("positioned iterator without key");
        assert!(keys.contains(&key.as_slice()), "unexpected key {key:?}");
        found += 1;
    }
    assert_eq!(found, keys.len());
    assert!(it.error().is_none());
    it.release();
}

/// After a successful commit all staged operations are visible; before it,
/// none are.
pub fn batch_atomicity(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"stale", b"x").expect("put failed");

    let pairs = random_pairs(5);
    let mut batch = store.batch();
    for (key, value) in &pairs {
        batch.put(key, value).expect("staging put failed");
    }
    batch.delete(b"stale").expect("staging delete failed");

    // Nothing visible while staged.
    for (key, _) in &pairs {
        assert!(store.get(&ctx, key).unwrap_err().is_not_found());
    }
    assert_eq!(store.get(&ctx, b"stale").expect("get failed"), b"x");

    batch.commit(&ctx).expect("commit failed");

    for (key, value) in &pairs {
        assert_eq!(&store.get(&ctx, key).expect("get after commit failed"), value);
    }
    assert!(store.get(&ctx, b"stale").unwrap_err().is_not_found());
}

/// Conflicting staged operations on one key resolve in staging order.
pub fn batch_last_write_wins(store: &dyn Store) {
    let ctx = Context::background();
    let mut batch = store.batch();
    batch.put(b"k", b"first").expect("staging failed");
    batch.delete(b"k").expect("staging failed");
    batch.put(b"k", b"last").expect("staging failed");
    batch.commit(&ctx).expect("commit failed");
    assert_eq!(store.get(&ctx, b"k").expect("get failed"), b"last");
}

/// A committed batch rejects put/delete/commit with `ProtocolViolation`,
/// never succeeds, never crashes.
pub fn batch_terminal_lockout(store: &dyn Store) {
    let ctx = Context::background();
    let mut batch = store.batch();
    batch.put(b"a", b"1").expect("staging failed");
    batch.commit(&ctx).expect("commit failed");

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
    // The rejected operations left the store untouched.
    assert_eq!(store.get(&ctx, b"a").expect("get failed"), b"1");
    assert!(store.get(&ctx, b"b").unwrap_err().is_not_found());
}

/// N matching keys yield N `next() == true` in order, then false forever.
pub fn iterator_exhaustion(store: &dyn Store) {
    let ctx = Context::background();
    let mut pairs = random_pairs(10);
    for pair in &mut pairs {
        let mut prefixed = b"pre_".to_vec();
        prefixed.extend_from_slice(&pair.0);
        pair.0 = prefixed;
        store.put(&ctx, &pair.0, &pair.1).expect("put failed");
    }
    pairs.sort();

    let mut it = store.scan(b"pre_");
    for (key, value) in &pairs {
        assert!(it.next(), "iterator exhausted early");
        assert_eq!(it.key().as_ref(), Some(key));
        assert_eq!(it.value().as_ref(), Some(value));
    }
    assert!(!it.next());
    assert!(!it.next(), "exhaustion must be terminal");
    assert!(it.key().is_none(), "no stale key after exhaustion");
    assert!(it.value().is_none(), "no stale value after exhaustion");
    assert!(it.error().is_none());
    it.release();
}

/// `error()` is defined and side-effect-free in every state.
pub fn iterator_error_is_safe_everywhere(store: &dyn Store) {
    // Never advanced.
    let it = store.scan(b"none_");
    assert!(it.error().is_none());

    // Zero matches, advanced to exhaustion.
    let mut it = store.scan(b"none_");
    assert!(!it.next());
    assert!(it.error().is_none());
    assert!(it.key().is_none());
    assert!(it.value().is_none());

    // Released.
    let mut it = store.scan(b"none_");
    it.release();
    assert!(it.error().is_none());
}

/// `release()` may be called repeatedly and from any state.
pub fn iterator_release_is_idempotent(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"k", b"v").expect("put failed");

    let mut it = store.scan(b"k");
    assert!(it.next());
    it.release();
    it.release();
    assert!(!it.next());
    assert!(it.key().is_none());
}

/// Forward scan reversed equals reverse scan, over the same key set.
pub fn reverse_symmetry(store: &dyn Store) {
    let ctx = Context::background();
    for (key, value) in random_pairs(10) {
        let mut prefixed = b"pre_".to_vec();
        prefixed.extend_from_slice(&key);
        store.put(&ctx, &prefixed, &value).expect("put failed");
    }

    let mut forward = Vec::new();
    let mut it = store.scan(b"pre_");
    while it.next() {
        forward.push(it.key().expect("positioned without key"));
    }
    it.release();

    let mut backward = Vec::new();
    let mut it = store.scan_reverse(b"pre_");
    while it.next() {
        backward.push(it.key().expect("positioned without key"));
    }
    it.release();

    assert!(forward.windows(2).all(|w| w[0] < w[1]), "forward not ascending");
    let mut reversed = forward;
    reversed.reverse();
    assert_eq!(reversed, backward, "reverse scan is not the mirror image");
}

/// Put("a","1"), Put("ab","2"), Put("b","3"): Scan("a") yields exactly
/// ("a","1") then ("ab","2").
pub fn scan_prefix_scenario(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"a", b"1").expect("put failed");
    store.put(&ctx, b"ab", b"2").expect("put failed");
    store.put(&ctx, b"b", b"3").expect("put failed");

    let mut it = store.scan(b"a");
    assert!(it.next());
    assert_eq!(it.key().as_deref(), Some(b"a".as_slice()));
    assert_eq!(it.value().as_deref(), Some(b"1".as_slice()));
    assert!(it.next());
    assert_eq!(it.key().as_deref(), Some(b"ab".as_slice()));
    assert_eq!(it.value().as_deref(), Some(b"2".as_slice()));
    assert!(!it.next());
    assert!(it.error().is_none());
    it.release();
}

/// A prefix with no matches exhausts immediately with the null sentinel.
pub fn scan_without_matches(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"other_1", b"x").expect("put failed");
    store.put(&ctx, b"other_2", b"y").expect("put failed");

    let mut it = store.scan(b"pre_");
    assert!(!it.next());
    assert!(it.key().is_none());
    assert!(it.value().is_none());
    assert!(it.error().is_none());
    it.release();
}

/// An already-cancelled context returns `Cancelled` from every operation,
/// with no observable mutation.
pub fn cancellation_short_circuit(store: &dyn Store) {
    let live = Context::background();
    store.put(&live, b"existing", b"v").expect("put failed");

    let (ctx, handle) = Context::cancellable();
    handle.cancel();

    assert!(matches!(store.put(&ctx, b"k", b"v"), Err(KvError::Cancelled)));
    assert!(matches!(store.get(&ctx, b"existing"), Err(KvError::Cancelled)));
    assert!(matches!(
        store.delete(&ctx, b"existing"),
        Err(KvError::Cancelled)
    ));

    let mut batch = store.batch();
    batch.put(b"staged", b"v").expect("staging failed");
    assert!(matches!(batch.commit(&ctx), Err(KvError::Cancelled)));

    // No mutation leaked through.
    assert!(store.get(&live, b"k").unwrap_err().is_not_found());
    assert!(store.get(&live, b"staged").unwrap_err().is_not_found());
    assert_eq!(store.get(&live, b"existing").expect("get failed"), b"v");
}

/// An already-expired deadline returns `DeadlineExceeded` immediately.
pub fn deadline_short_circuit(store: &dyn Store) {
    let ctx = Context::with_deadline(Instant::now() - Duration::from_secs(1));
    assert!(matches!(
        store.put(&ctx, b"k", b"v"),
        Err(KvError::DeadlineExceeded)
    ));
    assert!(matches!(
        store.get(&ctx, b"k"),
        Err(KvError::DeadlineExceeded)
    ));
}

/// After close, every operation is a `ProtocolViolation` — reported, never
/// ignored, never a crash.
pub fn closed_store_lockout(store: &dyn Store) {
    let ctx = Context::background();
    store.put(&ctx, b"k", b"v").expect("put failed");
    store.close().expect("close failed");

    assert!(matches!(
        store.put(&ctx, b"k", b"v"),
        Err(KvError::ProtocolViolation { .. })
    ));
    assert!(matches!(
        store.get(&ctx, b"k"),
        Err(KvError::ProtocolViolation { .. })
    ));
    assert!(matches!(
        store.delete(&ctx, b"k"),
        Err(KvError::ProtocolViolation { .. })
    ));
    assert!(matches!(
        store.close(),
        Err(KvError::ProtocolViolation { .. })
    ));

    let mut it = store.scan(b"");
    assert!(!it.next());
    assert!(matches!(
        it.error(),
        Some(KvError::ProtocolViolation { .. })
    ));

    let mut batch = store.batch();
    assert!(matches!(
        batch.put(b"k", b"v"),
        Err(KvError::ProtocolViolation { .. })
    ));
    assert!(matches!(
        batch.commit(&ctx),
        Err(KvError::ProtocolViolation { .. })
    ));
}
