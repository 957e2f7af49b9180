//! Types for the upload pipeline.

use bytes::Bytes;
use resizer_core::{UploadError, UploadResult};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A byte stream paired with the filename it was declared under.
pub struct UploadFile {
    original_filename: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl UploadFile {
    pub fn new(
        original_filename: impl Into<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            reader: Box::new(reader),
        }
    }

    /// In-memory upload
    pub fn from_bytes(original_filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(original_filename, Cursor::new(data.into()))
    }

    /// Stream a file from disk, declared under its own filename
    pub async fn open(path: impl AsRef<Path>) -> UploadResult<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| UploadError::filesystem(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, file))
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Declared filename with its directory and extension stripped
    pub fn base_name(&self) -> String {
        Path::new(&self.original_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extend `buf` until it holds `len` bytes or the stream ends.
    ///
    /// Returns `true` once the stream is exhausted. Never pulls more than
    /// `max + 1` bytes in total, so an oversized stream is rejected early.
    pub async fn read_head(
        &mut self,
        buf: &mut Vec<u8>,
        len: usize,
        max: Option<usize>,
    ) -> UploadResult<bool> {
        let target = max.map_or(len, |max| len.min(max.saturating_add(1)));
        let wanted = target.saturating_sub(buf.len());
        let read = (&mut self.reader)
            .take(wanted as u64)
            .read_to_end(buf)
            .await
            .map_err(|e| UploadError::filesystem(&self.original_filename, e))?;
        check_ceiling(buf.len(), max)?;
        Ok(read < wanted)
    }

    /// Drain the rest of the stream after the bytes already in `head`.
    pub async fn read_rest(&mut self, mut head: Vec<u8>, max: Option<usize>) -> UploadResult<Bytes> {
        let read = match max {
            Some(max) => {
                let remaining = (max as u64 + 1).saturating_sub(head.len() as u64);
                (&mut self.reader)
                    .take(remaining)
                    .read_to_end(&mut head)
                    .await
            }
            None => self.reader.read_to_end(&mut head).await,
        };
        read.map_err(|e| UploadError::filesystem(&self.original_filename, e))?;
        check_ceiling(head.len(), max)?;

        Ok(Bytes::from(head))
    }
}

fn check_ceiling(len: usize, max: Option<usize>) -> UploadResult<()> {
    match max {
        Some(max) if len > max => Err(UploadError::FileTooLarge { max }),
        _ => Ok(()),
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("original_filename", &self.original_filename)
            .finish_non_exhaustive()
    }
}
