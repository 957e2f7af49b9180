//! Resizer Processing Library
//!
//! Image ingestion: read and validate each uploaded stream, derive the
//! configured versions, write them to the destination directory and return
//! descriptors of what was written.
//!
//! Entry point is [`BatchDispatcher::process`]; [`ImageHandler`] does the
//! work for a single file.

pub mod image;
pub mod upload;
pub mod validator;

pub use crate::image::{ImageEncoder, ImageProcessor, ImageResize, ResizePlan};
pub use upload::{BatchDispatcher, ImageHandler, UploadFile};
pub use validator::{UploadValidator, ValidationError};

pub use resizer_core::{
    ImageKind, OneOrMany, UploadError, UploadOptions, UploadOutcome, UploadResult,
    VersionDetails, VersionSpec,
};
