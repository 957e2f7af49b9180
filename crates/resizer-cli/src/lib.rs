//! Command-line host for the resizer pipeline.
//!
//! Options come from `RESIZER_*` environment variables (and `.env`), with
//! command-line flags taking precedence.

use clap::Parser;
use resizer_core::{ImageKind, OneOrMany, UploadError, UploadOptions, UploadOutcome, VersionSpec};
use resizer_processing::{BatchDispatcher, UploadFile};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resizer", about = "Validate images and write resized versions")]
pub struct Cli {
    /// Image files to ingest
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Destination directory (created when missing)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Base name for the file at the same position
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Add a numeric discriminator instead of overwriting
    #[arg(long)]
    pub safe_name: bool,

    /// Allowed input format (jpeg, png, webp, gif)
    #[arg(long = "format")]
    pub formats: Vec<ImageKind>,

    #[arg(long)]
    pub max_files: Option<usize>,

    #[arg(long)]
    pub min_pixels: Option<u64>,

    #[arg(long)]
    pub max_pixels: Option<u64>,

    /// Version to produce, e.g. `320x240`, `800x+` or `100x100:_thumb`
    #[arg(long = "version")]
    pub versions: Vec<VersionSpec>,

    /// Also store the untouched original next to the versions
    #[arg(long)]
    pub add_original: bool,

    /// Encoder quality for JPEG and WebP (1-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Layer the flags that were given over `options`.
    pub fn apply(&self, options: &mut UploadOptions) {
        if let Some(dest) = &self.dest {
            options.dest = dest.clone();
        }
        if !self.names.is_empty() {
            options.names = OneOrMany::Many(self.names.clone());
        }
        if !self.formats.is_empty() {
            options.formats = self.formats.clone();
        }
        if !self.versions.is_empty() {
            options.versions = self.versions.clone();
        }
        if let Some(max_files) = self.max_files {
            options.max_files = max_files;
        }
        if let Some(min_pixels) = self.min_pixels {
            options.min_pixels = min_pixels;
        }
        if let Some(max_pixels) = self.max_pixels {
            options.max_pixels = max_pixels;
        }
        if let Some(quality) = self.quality {
            options.quality = quality;
        }
        options.safe_name |= self.safe_name;
        options.add_original |= self.add_original;
    }

    /// Open every file and run them through the dispatcher as one batch.
    ///
    /// A single path is submitted as a single upload, so its result is
    /// returned unwrapped.
    pub async fn run(&self, options: UploadOptions) -> Result<UploadOutcome, UploadError> {
        let mut files = Vec::with_capacity(self.files.len());
        for path in &self.files {
            files.push(UploadFile::open(path).await?);
        }

        BatchDispatcher::process(files, options).await
    }
}

/// JSON body printed for a failed run
pub fn error_body(error: &UploadError) -> serde_json::Value {
    serde_json::json!({
        "error": error.error_code(),
        "message": error.to_string(),
    })
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
