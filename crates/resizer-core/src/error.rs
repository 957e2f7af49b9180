//! Error types module
//!
//! Every failure of an upload call is reported as an [`UploadError`]. The
//! variants follow the ingestion pipeline: caller input, limits, detected
//! format, pixel bounds, codec work and filesystem work.
//!
//! Files already written before a failure are left in place. Callers that
//! need atomicity must clean up the destination themselves.

use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for caller mistakes like missing arguments
    Debug,
    /// Warning level - for rejected uploads (limits, formats, bounds)
    Warn,
    /// Error level - for unexpected codec or disk failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Too many files: {count} supplied (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("File too large: more than {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Unsupported format: {format} (allowed: {allowed:?})")]
    Format { format: String, allowed: Vec<String> },

    #[error("Image has {pixels} pixels, outside [{min}, {max}]")]
    Dimension { pixels: u64, min: u64, max: u64 },

    #[error("Image processing error: {0}")]
    Codec(String),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for upload operations
pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn input(message: impl Into<String>) -> Self {
        UploadError::Input(message.into())
    }

    pub fn codec(message: impl Into<String>) -> Self {
        UploadError::Codec(message.into())
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        UploadError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Machine-readable error code (e.g., "FORMAT_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Input(_) => "INPUT_ERROR",
            UploadError::TooManyFiles { .. } | UploadError::FileTooLarge { .. } => "LIMIT_ERROR",
            UploadError::Format { .. } => "FORMAT_ERROR",
            UploadError::Dimension { .. } => "DIMENSION_ERROR",
            UploadError::Codec(_) => "CODEC_ERROR",
            UploadError::Filesystem { .. } => "FILESYSTEM_ERROR",
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Input(_) => LogLevel::Debug,
            UploadError::TooManyFiles { .. }
            | UploadError::FileTooLarge { .. }
            | UploadError::Format { .. }
            | UploadError::Dimension { .. } => LogLevel::Warn,
            UploadError::Codec(_) | UploadError::Filesystem { .. } => LogLevel::Error,
        }
    }

    /// True for errors caused by the request itself rather than the host.
    pub fn is_rejection(&self) -> bool {
        !matches!(self.log_level(), LogLevel::Error)
    }
}
