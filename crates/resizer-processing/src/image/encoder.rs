use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use resizer_core::{ImageKind, UploadError, UploadResult};
use std::io::Cursor;

/// Re-encodes resized versions in the format of their source
pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode `img` as `kind`. `quality` (1-100) applies to JPEG and WebP.
    pub fn encode(img: &DynamicImage, kind: ImageKind, quality: u8) -> UploadResult<Bytes> {
        let (width, height) = (img.width(), img.height());
        tracing::debug!(
            format = %kind,
            width = width,
            height = height,
            quality = quality,
            "Encoding version"
        );

        match kind {
            ImageKind::Jpeg => Self::encode_jpeg(img, quality),
            ImageKind::Png => Self::encode_lossless(img, ImageFormat::Png),
            ImageKind::Gif => Self::encode_lossless(img, ImageFormat::Gif),
            ImageKind::Webp => Self::encode_webp(img, quality),
        }
    }

    fn encode_jpeg(img: &DynamicImage, quality: u8) -> UploadResult<Bytes> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let estimated_size = (rgb.width() as usize) * (rgb.height() as usize) / 4;
        let mut buffer = Vec::with_capacity(estimated_size);
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| UploadError::codec(format!("JPEG encoding failed: {}", e)))?;
        Ok(Bytes::from(buffer))
    }

    fn encode_lossless(img: &DynamicImage, format: ImageFormat) -> UploadResult<Bytes> {
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
        let mut buffer = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(|e| UploadError::codec(format!("{:?} encoding failed: {}", format, e)))?;
        Ok(Bytes::from(buffer))
    }

    fn encode_webp(img: &DynamicImage, quality: u8) -> UploadResult<Bytes> {
        let (width, height) = (img.width(), img.height());

        // Convert to RGBA for WebP encoding
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
