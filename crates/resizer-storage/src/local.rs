use crate::traits::{Storage, StorageError, StorageResult, WriteMode};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// Creates `base_path` and any missing parents. Calling this for an
    /// existing directory is a no-op apart from resolving its absolute path.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path)
            .await
            .map_err(|e| StorageError::io(&base_path, e))?;

        let base_path = fs::canonicalize(&base_path)
            .await
            .map_err(|e| StorageError::io(&base_path, e))?;

        tracing::debug!(path = %base_path.display(), "Destination directory ready");

        Ok(LocalStorage { base_path })
    }

    /// Convert a filename to a path inside the destination directory
    ///
    /// Rejects anything that could resolve outside of it.
    fn key_to_path(&self, filename: &str) -> StorageResult<PathBuf> {
        if filename.is_empty()
            || filename.contains("..")
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "'{}' is not a plain filename",
                filename
            )));
        }

        Ok(self.base_path.join(filename))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn root(&self) -> &Path {
        &self.base_path
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StorageError::io(&self.base_path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.base_path, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    async fn write(&self, filename: &str, data: Bytes, mode: WriteMode) -> StorageResult<PathBuf> {
        let path = self.key_to_path(filename)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut open = fs::OpenOptions::new();
        open.write(true);
        match mode {
            WriteMode::Overwrite => open.create(true).truncate(true),
            WriteMode::CreateNew => open.create_new(true),
        };

        let mut file = open.open(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(path.clone())
            } else {
                StorageError::io(&path, e)
            }
        })?;

        file.write_all(&data)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        file.sync_all()
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(path)
    }
}
