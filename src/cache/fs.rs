use std::path::Path;

use async_trait::async_trait;

use super::capabilities::{AssetStorage, DirectoryMaker};
use crate::error::IoError;

/// Local disk backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

#[async_trait]
impl AssetStorage for TokioFileSystem {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), IoError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| IoError::write_error(path, e))
    }
}

#[async_trait]
impl DirectoryMaker for TokioFileSystem {
    async fn make_dir(&self, path: &Path) -> Result<(), IoError> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| IoError::create_dir_error(path, e))
    }
}
