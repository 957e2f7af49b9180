use resizer_core::{ImageKind, UploadError, UploadOptions};

/// Validation errors for uploaded images
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: more than {max} bytes")]
    FileTooLarge { max: usize },

    #[error("Unsupported format: {format} (allowed: {allowed:?})")]
    UnsupportedFormat { format: String, allowed: Vec<String> },

    #[error("Image has {pixels} pixels, outside [{min}, {max}]")]
    PixelsOutOfRange { pixels: u64, min: u64, max: u64 },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for UploadError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { max } => UploadError::FileTooLarge { max },
            ValidationError::UnsupportedFormat { format, allowed } => {
                UploadError::Format { format, allowed }
            }
            ValidationError::PixelsOutOfRange { pixels, min, max } => {
                UploadError::Dimension { pixels, min, max }
            }
            ValidationError::InvalidFilename(_) | ValidationError::EmptyFile => {
                UploadError::Input(err.to_string())
            }
        }
    }
}

/// Upload validator
///
/// Checks run in pipeline order: size while reading, then detected format,
/// then pixel count from the header. Pixels are only decoded once all of
/// them pass.
pub struct UploadValidator {
    formats: Vec<ImageKind>,
    min_pixels: u64,
    max_pixels: u64,
    max_file_size: Option<usize>,
}

impl UploadValidator {
    pub fn new(
        formats: Vec<ImageKind>,
        min_pixels: u64,
        max_pixels: u64,
        max_file_size: Option<usize>,
    ) -> Self {
        Self {
            formats,
            min_pixels,
            max_pixels,
            max_file_size,
        }
    }

    pub fn from_options(options: &UploadOptions) -> Self {
        Self::new(
            options.formats.clone(),
            options.min_pixels,
            options.max_pixels,
            options.max_file_size,
        )
    }

    pub fn max_file_size(&self) -> Option<usize> {
        self.max_file_size
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if let Some(max) = self.max_file_size {
            if size > max {
                return Err(ValidationError::FileTooLarge { max });
            }
        }

        Ok(())
    }

    /// Validate the detected format against the allow-list
    pub fn validate_format(
        &self,
        detected: Result<ImageKind, String>,
    ) -> Result<ImageKind, ValidationError> {
        match detected {
            Ok(kind) if self.formats.contains(&kind) => Ok(kind),
            Ok(kind) => Err(self.unsupported(kind.to_string())),
            Err(format) => Err(self.unsupported(format)),
        }
    }

    /// Validate `width * height` against the inclusive pixel bounds
    pub fn validate_pixels(&self, width: u32, height: u32) -> Result<u64, ValidationError> {
        let pixels = width as u64 * height as u64;
        if pixels < self.min_pixels || pixels > self.max_pixels {
            return Err(ValidationError::PixelsOutOfRange {
                pixels,
                min: self.min_pixels,
                max: self.max_pixels,
            });
        }
        Ok(pixels)
    }

    /// Validate an explicitly requested base name
    pub fn validate_base_name(&self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(ValidationError::InvalidFilename(name.to_string()));
        }
        Ok(())
    }

    fn unsupported(&self, format: String) -> ValidationError {
        ValidationError::UnsupportedFormat {
            format,
            allowed: self.formats.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(
            vec![ImageKind::Jpeg, ImageKind::Png],
            100,
            10_000,
            Some(1024 * 1024), // 1MB
        )
    }

    #[test]
    fn test_validate_file_size() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_file_size_unlimited() {
        let validator = UploadValidator::new(vec![ImageKind::Png], 1, 10, None);
        assert!(validator.validate_file_size(usize::MAX).is_ok());
    }

    #[test]
    fn test_validate_format() {
        let validator = test_validator();
        assert_eq!(
            validator.validate_format(Ok(ImageKind::Png)).unwrap(),
            ImageKind::Png
        );

        match validator.validate_format(Ok(ImageKind::Gif)) {
            Err(ValidationError::UnsupportedFormat { format, allowed }) => {
                assert_eq!(format, "gif");
                assert_eq!(allowed, vec!["jpeg".to_string(), "png".to_string()]);
            }
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }

        assert!(validator.validate_format(Err("bmp".to_string())).is_err());
    }

    #[test]
    fn test_validate_pixels_bounds_are_inclusive() {
        let validator = test_validator();
        assert_eq!(validator.validate_pixels(10, 10).unwrap(), 100);
        assert_eq!(validator.validate_pixels(100, 100).unwrap(), 10_000);
        assert!(validator.validate_pixels(9, 11).is_err());
        assert!(validator.validate_pixels(101, 100).is_err());
    }

    #[test]
    fn test_validate_pixels_no_overflow() {
        let validator = test_validator();
        assert!(validator.validate_pixels(u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn test_validate_base_name() {
        let validator = test_validator();
        assert!(validator.validate_base_name("holiday").is_ok());
        assert!(validator.validate_base_name("../etc").is_err());
        assert!(validator.validate_base_name("a/b").is_err());
        assert!(validator.validate_base_name("  ").is_err());
    }

    #[test]
    fn test_conversion_into_upload_error() {
        let err: UploadError = ValidationError::PixelsOutOfRange {
            pixels: 1,
            min: 2,
            max: 3,
        }
        .into();
        assert_eq!(err.error_code(), "DIMENSION_ERROR");

        let err: UploadError = ValidationError::EmptyFile.into();
        assert_eq!(err.error_code(), "INPUT_ERROR");

        let err: UploadError = ValidationError::FileTooLarge { max: 1 }.into();
        assert_eq!(err.error_code(), "LIMIT_ERROR");
    }
}
