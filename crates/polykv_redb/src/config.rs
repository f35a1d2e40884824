//! Configuration for opening a redb-backed store.

use std::path::PathBuf;

/// Configuration for [`crate::RedbStore::open`].
#[derive(Debug, Clone)]
pub struct RedbConfig {
    /// Path of the database file. redb stores the whole database in a
    /// single file, so this names a file, not a directory.
    pub path: PathBuf,

    /// Page cache size in bytes. `None` uses redb's default.
    pub cache_size: Option<usize>,

    /// Whether to create the database file if it doesn't exist.
    pub create_if_missing: bool,
}

impl RedbConfig {
    /// Creates a configuration for the given database file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache_size: None,
            create_if_missing: true,
        }
    }

    /// Sets the page cache size in bytes.
    #[must_use]
    pub const fn cache_size(mut self, bytes: usize) -> Self {
        self.cache_size = Some(bytes);
        self
    }

    /// Sets whether to create the database file if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }
}
