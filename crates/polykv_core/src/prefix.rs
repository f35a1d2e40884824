//! Prefix range math shared by the backend adapters.

/// Returns the smallest key strictly greater than every key carrying
/// `prefix`, for use as an exclusive upper bound in engine range queries.
///
/// Returns `None` when no such key exists (empty prefix, or a prefix of all
/// `0xff` bytes), meaning the range is unbounded above.
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < 0xff {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

/// Returns true if `key` starts with `prefix`.
#[must_use]
pub fn has_prefix(key: &[u8], prefix: &[u8]) -> bool {
    key.len() >= prefix.len() && &key[..prefix.len()] == prefix
}
