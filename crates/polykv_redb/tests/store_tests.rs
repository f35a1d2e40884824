//! redb-specific behavior: persistence, configuration, snapshot scans.

use polykv_core::{Context, KvError, Store};
use polykv_redb::{RedbConfig, RedbStore};
use tempfile::TempDir;

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.redb");
    let ctx = Context::background();

    let store = RedbStore::open_path(&path).unwrap();
    store.put(&ctx, b"k", b"v").unwrap();
    store.close().unwrap();

    let store = RedbStore::open_path(&path).unwrap();
    assert_eq!(store.get(&ctx, b"k").unwrap(), b"v");
    store.close().unwrap();
}

#[test]
fn batch_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.redb");
    let ctx = Context::background();

    let store = RedbStore::open_path(&path).unwrap();
    let mut batch = store.batch();
    batch.put(b"a", b"1").unwrap();
    batch.put(b"b", b"2").unwrap();
    batch.commit(&ctx).unwrap();
    store.close().unwrap();

    let store = RedbStore::open_path(&path).unwrap();
    assert_eq!(store.get(&ctx, b"a").unwrap(), b"1");
    assert_eq!(store.get(&ctx, b"b").unwrap(), b"2");
    store.close().unwrap();
}

#[test]
fn empty_path_is_invalid_argument() {
    let err = RedbStore::open(RedbConfig::new("")).unwrap_err();
    assert!(matches!(err, KvError::InvalidArgument { .. }));
}

#[test]
fn missing_file_without_create_is_io_failure() {
    let dir = TempDir::new().unwrap();
    let config = RedbConfig::new(dir.path().join("absent.redb")).create_if_missing(false);
    let err = RedbStore::open(config).unwrap_err();
    assert!(matches!(err, KvError::Io { .. }));
}

#[test]
fn open_with_cache_size() {
    let dir = TempDir::new().unwrap();
    let config = RedbConfig::new(dir.path().join("store.redb")).cache_size(4 * 1024 * 1024);
    let store = RedbStore::open(config).unwrap();
    let ctx = Context::background();
    store.put(&ctx, b"k", b"v").unwrap();
    assert_eq!(store.get(&ctx, b"k").unwrap(), b"v");
    store.close().unwrap();
}

#[test]
fn scan_observes_snapshot_at_creation() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open_path(dir.path().join("store.redb")).unwrap();
    let ctx = Context::background();
    store.put(&ctx, b"a", b"1").unwrap();

    let mut it = store.scan(b"");
    store.put(&ctx, b"b", b"2").unwrap();

    assert!(it.next());
    assert_eq!(it.key().as_deref(), Some(b"a".as_slice()));
    assert!(!it.next(), "entry written after scan start must not appear");
    it.release();
    store.close().unwrap();
}

#[test]
fn empty_key_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open_path(dir.path().join("store.redb")).unwrap();
    let ctx = Context::background();
    store.put(&ctx, b"", b"root").unwrap();
    assert_eq!(store.get(&ctx, b"").unwrap(), b"root");
    store.close().unwrap();
}

#[test]
fn scan_on_fresh_store_is_empty_without_error() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open_path(dir.path().join("store.redb")).unwrap();
    let mut it = store.scan(b"pre_");
    assert!(!it.next());
    assert!(it.error().is_none());
    it.release();
    store.close().unwrap();
}

#[test]
fn get_on_fresh_store_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = RedbStore::open_path(dir.path().join("store.redb")).unwrap();
    let ctx = Context::background();
    assert!(store.get(&ctx, b"k").unwrap_err().is_not_found());
    store.close().unwrap();
}
