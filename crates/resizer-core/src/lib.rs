//! Resizer Core Library
//!
//! This crate provides the domain types shared by every resizer component:
//! upload options and their defaults, version specs, result descriptors,
//! the one-or-many normalization type, and the unified error taxonomy.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::UploadOptions;
pub use error::{LogLevel, UploadError, UploadResult};
pub use format::ImageKind;
pub use models::{OneOrMany, UploadOutcome, VersionDetails, VersionSpec};
