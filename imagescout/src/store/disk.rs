//! Filesystem-backed image store with atomic writes.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::{ImageStore, StoreError};
use crate::http::BoxFuture;

/// Suffix for in-progress writes, renamed away on completion.
const PARTIAL_SUFFIX: &str = ".part";

/// Stores images as files under a root directory.
///
/// Writes go to a `.part` sibling first and are renamed into place, so a
/// crash or cancellation mid-write never leaves a truncated file at the
/// target path.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Creates a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    async fn write_atomic(&self, key: String, bytes: Vec<u8>) -> Result<PathBuf, StoreError> {
        let target = self.path_for(&key);

        // Idempotent per key: keep an existing object untouched.
        if fs::try_exists(&target).await.unwrap_or(false) {
            debug!(path = %target.display(), "object already stored, keeping existing");
            return Ok(target);
        }

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::CreateDirFailed {
                path: self.root.clone(),
                source: e,
            })?;

        let partial = self.root.join(format!("{}{}", key, PARTIAL_SUFFIX));
        if let Err(e) = fs::write(&partial, &bytes).await {
            // Leave nothing behind on a failed write.
            let _ = fs::remove_file(&partial).await;
            return Err(StoreError::WriteFailed {
                path: partial,
                source: e,
            });
        }

        if let Err(e) = fs::rename(&partial, &target).await {
            let _ = fs::remove_file(&partial).await;
            return Err(StoreError::WriteFailed {
                path: target,
                source: e,
            });
        }

        debug!(path = %target.display(), bytes = bytes.len(), "object stored");
        Ok(target)
    }
}

impl ImageStore for DiskStore {
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        let path = self.path_for(key);
        Box::pin(async move { Ok(fs::try_exists(&path).await.unwrap_or(false)) })
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<PathBuf, StoreError>> {
        let key = key.to_string();
        Box::pin(self.write_atomic(key, bytes))
    }

    fn size(&self, path: &Path) -> BoxFuture<'_, Result<u64, StoreError>> {
        let path = path.to_path_buf();
        Box::pin(async move {
            let metadata = fs::metadata(&path)
                .await
                .map_err(|e| StoreError::ReadFailed {
                    path: path.clone(),
                    source: e,
                })?;
            Ok(metadata.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_exists_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        assert!(!store.exists("widget.jpg").await.unwrap());

        let path = store.write("widget.jpg", vec![7u8; 2048]).await.unwrap();
        assert!(store.exists("widget.jpg").await.unwrap());
        assert_eq!(store.size(&path).await.unwrap(), 2048);
    }

    #[tokio::test]
    async fn test_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        store.write("widget.jpg", vec![1u8; 1500]).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["widget.jpg"]);
    }

    #[tokio::test]
    async fn test_write_is_idempotent_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let first = store.write("widget.jpg", vec![1, 2, 3]).await.unwrap();
        let second = store.write("widget.jpg", vec![9, 9, 9, 9]).await.unwrap();

        assert_eq!(first, second);
        // Original bytes are preserved.
        assert_eq!(std::fs::read(&first).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_write_creates_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = DiskStore::new(&nested);

        let path = store.write("widget.png", vec![5u8; 100]).await.unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_size_of_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        let result = store.size(Path::new("/nonexistent/file.jpg")).await;
        assert!(matches!(result, Err(StoreError::ReadFailed { .. })));
    }
}
