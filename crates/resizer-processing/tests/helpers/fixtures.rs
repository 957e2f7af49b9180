//! Test fixtures: encoded images of a given size and format.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resizer_processing::UploadFile;
use std::io::Cursor;

/// Gradient image encoded as `format`.
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut img = RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]);
    }
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(img)
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    create_test_image(width, height, ImageFormat::Png)
}

/// In-memory upload of a PNG declared as `filename`.
pub fn png_upload(filename: &str, width: u32, height: u32) -> UploadFile {
    UploadFile::from_bytes(filename, create_test_png(width, height))
}

/// Minimal BMP header, a format the pipeline never accepts.
pub fn create_test_bmp() -> Vec<u8> {
    let mut bmp = Vec::new();
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&[0u8; 52]);
    bmp
}
