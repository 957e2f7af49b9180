//! Storage abstraction trait
//!
//! This module defines the Storage trait that destination backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use resizer_core::UploadError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid filename: {0}")]
    InvalidKey(String),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(message) => UploadError::Input(message),
            StorageError::AlreadyExists(path) => UploadError::filesystem(
                path,
                io::Error::new(io::ErrorKind::AlreadyExists, "file already exists"),
            ),
            StorageError::Io { path, source } => UploadError::Filesystem { path, source },
        }
    }
}

/// How a write treats an existing file with the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace any existing file
    Overwrite,
    /// Fail with [`StorageError::AlreadyExists`] instead of replacing
    CreateNew,
}

/// Storage abstraction trait
///
/// A storage instance is bound to one destination directory. The directory
/// exists once the instance has been constructed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Absolute path of the destination directory
    fn root(&self) -> &Path;

    /// Names of the regular files currently in the destination directory
    async fn list(&self) -> StorageResult<Vec<String>>;

    /// Write `data` under `filename` and return the absolute path written
    async fn write(&self, filename: &str, data: Bytes, mode: WriteMode) -> StorageResult<PathBuf>;
}
