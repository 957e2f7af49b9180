//! Image processor - format detection, header probing and decoding

use image::{DynamicImage, ImageFormat, ImageReader};
use resizer_core::{ImageKind, UploadError, UploadResult};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Detect the container format from the leading magic bytes.
    ///
    /// Returns the lowercase name of the detected format when it is not one
    /// the pipeline can write back, or `"unknown"` when nothing matched.
    pub fn detect_format(data: &[u8]) -> Result<ImageKind, String> {
        match image::guess_format(data) {
            Ok(format) => {
                Self::kind_of(format).ok_or_else(|| format!("{:?}", format).to_lowercase())
            }
            Err(_) => Err("unknown".to_string()),
        }
    }

    /// Read width and height from the image header without decoding pixels
    pub fn read_dimensions(data: &[u8], kind: ImageKind) -> UploadResult<(u32, u32)> {
        ImageReader::with_format(Cursor::new(data), Self::image_format(kind))
            .into_dimensions()
            .map_err(|e| UploadError::codec(format!("failed to read {} header: {}", kind, e)))
    }

    /// Decode the full image
    pub fn decode(data: &[u8], kind: ImageKind) -> UploadResult<DynamicImage> {
        image::load_from_memory_with_format(data, Self::image_format(kind))
            .map_err(|e| UploadError::codec(format!("failed to decode {} image: {}", kind, e)))
    }

    pub fn image_format(kind: ImageKind) -> ImageFormat {
        match kind {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Webp => ImageFormat::WebP,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }

    pub fn kind_of(format: ImageFormat) -> Option<ImageKind> {
        match format {
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::WebP => Some(ImageKind::Webp),
            ImageFormat::Gif => Some(ImageKind::Gif),
            _ => None,
        }
    }
}
