//! Image processing module
//!
//! This module wraps the codec for the upload pipeline:
//! - Format detection, header probing and decoding (processor)
//! - Version geometry and resampling (resize)
//! - Re-encoding in the source format (encoder)

pub mod encoder;
pub mod processor;
pub mod resize;

pub use encoder::ImageEncoder;
pub use processor::ImageProcessor;
pub use resize::{ImageResize, ResizePlan};
