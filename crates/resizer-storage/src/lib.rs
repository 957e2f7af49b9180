//! Resizer Storage Library
//!
//! This crate provides the destination-directory side of an upload: the
//! [`Storage`] trait, the local filesystem implementation, and the naming
//! resolver that picks collision-free discriminators.
//!
//! # Filenames
//!
//! Storage works with bare filenames relative to the destination directory.
//! Filenames must not contain a path separator or `..`.

pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use naming::{NameLocks, NamingResolver};
pub use traits::{Storage, StorageError, StorageResult, WriteMode};
