use std::path::Path;

use async_trait::async_trait;

use crate::error::{CacheError, FetchError, IoError};

/// Filesystem operations the asset cache needs.
#[async_trait]
pub trait AssetStorage: Send + Sync {
    async fn file_exists(&self, path: &Path) -> bool;

    /// Replaces the whole file.
    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), IoError>;
}

/// Recursive directory creation. Optional for an [`AssetCache`](super::AssetCache);
/// without one, callers are expected to have created the cache directory.
#[async_trait]
pub trait DirectoryMaker: Send + Sync {
    async fn make_dir(&self, path: &Path) -> Result<(), IoError>;
}

#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn get_file_data(&self, url: &str) -> Result<String, FetchError>;
}

/// Key-value state that outlives a single refresh, e.g. the last URL an
/// asset was downloaded from.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}
