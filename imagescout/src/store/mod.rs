//! Image storage boundary.
//!
//! The pipeline never assumes a specific filesystem; it requires only the
//! three operations on [`ImageStore`] plus atomic-write semantics. The
//! shipped implementation is [`DiskStore`].

mod disk;
mod naming;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::http::BoxFuture;

pub use disk::DiskStore;
pub use naming::file_stem;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read a stored object or its metadata.
    #[error("failed to read {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a stored object.
    #[error("failed to write {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create the storage directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDirFailed { path: PathBuf, source: io::Error },
}

/// Key-addressed byte store for acquired images.
///
/// Keys are flat file-name-like strings. Implementations must provide
/// atomic writes: after `write` returns, the object at the returned path
/// is complete; a failed or interrupted write leaves nothing at that
/// path. Dyn-compatible via [`BoxFuture`].
pub trait ImageStore: Send + Sync {
    /// Whether an object is already stored under the key.
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Stores bytes under the key and returns the resulting path.
    ///
    /// Writing is idempotent per key: if an object already exists under
    /// the key it is kept as-is and its path returned, so re-acquiring a
    /// product never clobbers an earlier download.
    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<PathBuf, StoreError>>;

    /// Size in bytes of the stored object at the path.
    fn size(&self, path: &Path) -> BoxFuture<'_, Result<u64, StoreError>>;
}

impl<T: ImageStore + ?Sized> ImageStore for std::sync::Arc<T> {
    fn exists(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>> {
        (**self).exists(key)
    }

    fn write(&self, key: &str, bytes: Vec<u8>) -> BoxFuture<'_, Result<PathBuf, StoreError>> {
        (**self).write(key, bytes)
    }

    fn size(&self, path: &Path) -> BoxFuture<'_, Result<u64, StoreError>> {
        (**self).size(path)
    }
}
