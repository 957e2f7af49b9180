//! Configuration module
//!
//! [`UploadOptions`] is resolved once at the entry of an upload call. Every
//! field has an explicit default so a caller only sets what it cares about:
//!
//! | field           | default                          |
//! |-----------------|----------------------------------|
//! | `dest`          | none, must be set                |
//! | `names`         | empty (derive from filenames)    |
//! | `safe_name`     | `false`                          |
//! | `formats`       | `jpeg`, `png`, `webp`, `gif`     |
//! | `max_files`     | `10`                             |
//! | `min_pixels`    | `1`                              |
//! | `max_pixels`    | `100_000_000`                    |
//! | `versions`      | empty (store the original only)  |
//! | `add_original`  | `false`                          |
//! | `quality`       | `80`                             |
//! | `max_file_size` | `None` (unlimited)               |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{UploadError, UploadResult};
use crate::format::ImageKind;
use crate::models::{OneOrMany, VersionSpec};

// Common constants
pub const DEFAULT_MAX_FILES: usize = 10;
pub const DEFAULT_MIN_PIXELS: u64 = 1;
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;
pub const DEFAULT_QUALITY: u8 = 80;

fn default_formats() -> Vec<ImageKind> {
    ImageKind::ALL.to_vec()
}

fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

fn default_min_pixels() -> u64 {
    DEFAULT_MIN_PIXELS
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

/// Options shared by every file of one upload call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    /// Destination directory; created with its parents when missing
    pub dest: PathBuf,
    /// Requested base names, paired with input files by position
    #[serde(default)]
    pub names: OneOrMany<String>,
    /// Append a numeric discriminator instead of overwriting existing files
    #[serde(default, alias = "safe_name")]
    pub safe_name: bool,
    /// Allow-list of detected input formats
    #[serde(default = "default_formats")]
    pub formats: Vec<ImageKind>,
    #[serde(default = "default_max_files", alias = "max_files")]
    pub max_files: usize,
    /// Inclusive lower bound on `width * height` of the source
    #[serde(default = "default_min_pixels", alias = "min_pixels")]
    pub min_pixels: u64,
    /// Inclusive upper bound on `width * height` of the source
    #[serde(default = "default_max_pixels", alias = "max_pixels")]
    pub max_pixels: u64,
    #[serde(default)]
    pub versions: Vec<VersionSpec>,
    /// Also store an unmodified copy next to the resized versions
    #[serde(default, alias = "add_original")]
    pub add_original: bool,
    /// Encoder quality for lossy re-encodes (1-100)
    #[serde(default = "default_quality")]
    pub quality: u8,
    /// Reject streams longer than this many bytes
    #[serde(default, alias = "max_file_size")]
    pub max_file_size: Option<usize>,
}

impl UploadOptions {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            names: OneOrMany::default(),
            safe_name: false,
            formats: default_formats(),
            max_files: DEFAULT_MAX_FILES,
            min_pixels: DEFAULT_MIN_PIXELS,
            max_pixels: DEFAULT_MAX_PIXELS,
            versions: Vec::new(),
            add_original: false,
            quality: DEFAULT_QUALITY,
            max_file_size: None,
        }
    }

    /// Load options from the environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build options from any key lookup, using the `RESIZER_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        const MB: usize = 1024 * 1024;

        let dest = lookup("RESIZER_DEST").unwrap_or_default();
        let mut options = Self::new(dest);

        if let Some(value) = lookup("RESIZER_SAFE_NAME") {
            options.safe_name = parse_bool("RESIZER_SAFE_NAME", &value)?;
        }
        if let Some(value) = lookup("RESIZER_FORMATS") {
            options.formats = value
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<ImageKind>())
                .collect::<Result<_, _>>()?;
        }
        if let Some(value) = lookup("RESIZER_MAX_FILES") {
            options.max_files = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("RESIZER_MAX_FILES must be a valid number"))?;
        }
        if let Some(value) = lookup("RESIZER_MIN_PIXELS") {
            options.min_pixels = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("RESIZER_MIN_PIXELS must be a valid number"))?;
        }
        if let Some(value) = lookup("RESIZER_MAX_PIXELS") {
            options.max_pixels = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("RESIZER_MAX_PIXELS must be a valid number"))?;
        }
        if let Some(value) = lookup("RESIZER_VERSIONS") {
            options.versions = value
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| VersionSpec::parse(s.trim()))
                .collect::<Result<_, _>>()?;
        }
        if let Some(value) = lookup("RESIZER_ADD_ORIGINAL") {
            options.add_original = parse_bool("RESIZER_ADD_ORIGINAL", &value)?;
        }
        if let Some(value) = lookup("RESIZER_QUALITY") {
            options.quality = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("RESIZER_QUALITY must be a number between 1 and 100"))?;
        }
        if let Some(value) = lookup("RESIZER_MAX_FILE_SIZE_MB") {
            let mb: usize = value
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("RESIZER_MAX_FILE_SIZE_MB must be a valid number"))?;
            options.max_file_size = Some(mb.saturating_mul(MB));
        }

        Ok(options)
    }

    /// Check the options before any file is touched.
    pub fn validate(&self) -> UploadResult<()> {
        if self.dest.as_os_str().is_empty() {
            return Err(UploadError::input("destination directory is required"));
        }
        if self.formats.is_empty() {
            return Err(UploadError::input("at least one allowed format is required"));
        }
        if self.max_files == 0 {
            return Err(UploadError::input("max_files must be at least 1"));
        }
        if self.min_pixels > self.max_pixels {
            return Err(UploadError::input(format!(
                "min_pixels ({}) exceeds max_pixels ({})",
                self.min_pixels, self.max_pixels
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(UploadError::input(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        for (index, version) in self.versions.iter().enumerate() {
            if version.width == Some(0) || version.height == Some(0) {
                return Err(UploadError::input(format!(
                    "version {} has a zero dimension",
                    index
                )));
            }
            if let Some(suffix) = &version.suffix {
                if suffix.contains(|c| c == '/' || c == '\\') || suffix.contains("..") {
                    return Err(UploadError::input(format!(
                        "version {} suffix '{}' contains a path separator",
                        index, suffix
                    )));
                }
            }
        }
        Ok(())
    }

    /// Requested names normalized to a positional list.
    pub fn name_list(&self) -> Vec<String> {
        self.names.clone().into_vec()
    }

    /// Whether the untouched source is stored next to the versions
    pub fn stores_original(&self) -> bool {
        self.versions.is_empty() || self.add_original
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, anyhow::Error> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(anyhow::anyhow!("{} must be a boolean, got '{}'", key, value)),
    }
}
