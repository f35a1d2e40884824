//! Random data helpers and proptest strategies for adapter tests.

use proptest::prelude::*;
use rand::RngCore;

/// Returns `len` random bytes.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Returns `count` random key/value pairs with 16-byte keys and 32-byte
/// values, all keys distinct.
#[must_use]
pub fn random_pairs(count: usize) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut pairs = Vec::with_capacity(count);
    let mut seen = std::collections::HashSet::new();
    while pairs.len() < count {
        let key = random_bytes(16);
        if seen.insert(key.clone()) {
            pairs.push((key, random_bytes(32)));
        }
    }
    pairs
}

/// Strategy for arbitrary keys, including empty and binary ones.
pub fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Strategy for arbitrary values, including empty ones.
pub fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..1024)
}
