//! Single-file processing: read header, validate, name, derive versions, write.

use bytes::Bytes;
use image::DynamicImage;
use std::collections::HashSet;
use std::sync::Arc;

use resizer_core::{
    ImageKind, OneOrMany, UploadError, UploadOptions, UploadResult, VersionDetails,
};
use resizer_storage::{NameLocks, NamingResolver, Storage, WriteMode};

use super::join_all_ordered;
use super::types::UploadFile;
use crate::image::{ImageEncoder, ImageProcessor, ImageResize, ResizePlan};
use crate::validator::UploadValidator;

/// Bytes read before the format check
const HEADER_PREFIX: usize = 64 * 1024;

/// Processes one upload end to end.
///
/// Cheap to clone; clones share storage and name locks.
#[derive(Clone)]
pub struct ImageHandler {
    storage: Arc<dyn Storage>,
    options: Arc<UploadOptions>,
    validator: Arc<UploadValidator>,
    locks: NameLocks,
}

/// One file to write for an upload
struct PlannedWrite {
    filename: String,
    plan: Option<ResizePlan>,
}

impl ImageHandler {
    pub fn new(storage: Arc<dyn Storage>, options: Arc<UploadOptions>, locks: NameLocks) -> Self {
        let validator = Arc::new(UploadValidator::from_options(&options));
        Self {
            storage,
            options,
            validator,
            locks,
        }
    }

    /// Process `file` under `name`, or under the base of its declared
    /// filename when no name is given.
    ///
    /// Returns the single descriptor when one file was written, otherwise
    /// every descriptor in order with the original copy first. Nothing is
    /// written unless the stream passes every check.
    pub async fn handle(
        &self,
        mut file: UploadFile,
        name: Option<String>,
    ) -> UploadResult<OneOrMany<VersionDetails>> {
        let base_name = self.resolve_base_name(&file, name)?;

        let (data, kind, width, height) = self.read_checked(&mut file).await?;

        let ext = kind.extension();

        // Held until the last write so no sibling computes the same discriminator
        let name_guard = if self.options.safe_name {
            Some(self.locks.acquire(&base_name, ext).await)
        } else {
            None
        };
        let discriminator = if self.options.safe_name {
            NamingResolver::resolve(self.storage.as_ref(), &base_name, ext).await?
        } else {
            String::new()
        };

        let source = if self.options.versions.is_empty() {
            None
        } else {
            Some(Arc::new(Self::decode(data.clone(), kind).await?))
        };
        let source_dims = source
            .as_ref()
            .map_or((width, height), |img| (img.width(), img.height()));

        let writes = self.plan_writes(&base_name, &discriminator, ext, source_dims)?;
        let mode = if self.options.safe_name {
            WriteMode::CreateNew
        } else {
            WriteMode::Overwrite
        };

        let mut jobs = Vec::with_capacity(writes.len());
        for write in writes {
            let storage = self.storage.clone();
            match (write.plan, &source) {
                (Some(plan), Some(source)) => {
                    let source = source.clone();
                    let quality = self.options.quality;
                    jobs.push(tokio::spawn(async move {
                        let encoded = tokio::task::spawn_blocking(move || {
                            let resized = ImageResize::apply(&source, plan);
                            ImageEncoder::encode(&resized, kind, quality)
                        })
                        .await
                        .map_err(|e| UploadError::codec(format!("resize task failed: {}", e)))??;
                        Self::store(storage, write.filename, encoded, mode).await
                    }));
                }
                _ => {
                    let data = data.clone();
                    jobs.push(tokio::spawn(async move {
                        Self::store(storage, write.filename, data, mode).await
                    }));
                }
            }
        }

        let details = join_all_ordered(jobs).await?;
        drop(name_guard);

        tracing::info!(
            original_filename = %file.original_filename(),
            base_name = %base_name,
            format = %kind,
            width = width,
            height = height,
            written = details.len(),
            "Image processed"
        );

        Ok(OneOrMany::from_vec(details))
    }

    /// Check format and pixel bounds on a header prefix, then drain the
    /// rest of the stream.
    ///
    /// The prefix doubles while the header is still incomplete, so a
    /// non-image stream is rejected after `HEADER_PREFIX` bytes.
    async fn read_checked(
        &self,
        file: &mut UploadFile,
    ) -> UploadResult<(Bytes, ImageKind, u32, u32)> {
        let max = self.validator.max_file_size();
        let mut head = Vec::with_capacity(HEADER_PREFIX);
        let mut exhausted = file.read_head(&mut head, HEADER_PREFIX, max).await?;
        self.validator.validate_file_size(head.len())?;

        let kind = self
            .validator
            .validate_format(ImageProcessor::detect_format(&head))?;

        let (width, height) = loop {
            match ImageProcessor::read_dimensions(&head, kind) {
                Ok(dims) => break dims,
                Err(e) if exhausted => return Err(e),
                Err(_) => {
                    let len = head.len().saturating_mul(2);
                    exhausted = file.read_head(&mut head, len, max).await?;
                }
            }
        };
        self.validator.validate_pixels(width, height)?;

        let data = if exhausted {
            Bytes::from(head)
        } else {
            file.read_rest(head, max).await?
        };
        self.validator.validate_file_size(data.len())?;

        Ok((data, kind, width, height))
    }

    fn resolve_base_name(&self, file: &UploadFile, name: Option<String>) -> UploadResult<String> {
        match name.filter(|n| !n.is_empty()) {
            Some(name) => {
                self.validator.validate_base_name(&name)?;
                Ok(name)
            }
            None => {
                let derived = file.base_name();
                if derived.is_empty() {
                    return Err(UploadError::input(format!(
                        "cannot derive a base name from '{}'",
                        file.original_filename()
                    )));
                }
                Ok(derived)
            }
        }
    }

    /// Filenames for every output, original copy first.
    ///
    /// Rejects the upload when two outputs would share a filename.
    fn plan_writes(
        &self,
        base_name: &str,
        discriminator: &str,
        ext: &str,
        source_dims: (u32, u32),
    ) -> UploadResult<Vec<PlannedWrite>> {
        let mut writes = Vec::with_capacity(self.options.versions.len() + 1);

        if self.options.stores_original() {
            writes.push(PlannedWrite {
                filename: format!("{}{}.{}", base_name, discriminator, ext),
                plan: None,
            });
        }

        for spec in &self.options.versions {
            let plan = ImageResize::plan(source_dims, spec);
            let suffix = match &spec.suffix {
                Some(suffix) => suffix.clone(),
                None => {
                    let (w, h) = plan.output_dimensions(source_dims);
                    format!("-{}x{}", w, h)
                }
            };
            let filename = format!("{}{}{}.{}", base_name, suffix, discriminator, ext);
            tracing::debug!(filename = %filename, plan = ?plan, "Planned version");
            writes.push(PlannedWrite {
                filename,
                plan: Some(plan),
            });
        }

        let mut seen = HashSet::with_capacity(writes.len());
        for write in &writes {
            if !seen.insert(write.filename.as_str()) {
                return Err(UploadError::input(format!(
                    "two outputs resolve to the same filename '{}'",
                    write.filename
                )));
            }
        }

        Ok(writes)
    }

    async fn decode(data: Bytes, kind: ImageKind) -> UploadResult<DynamicImage> {
        tokio::task::spawn_blocking(move || ImageProcessor::decode(&data, kind))
            .await
            .map_err(|e| UploadError::codec(format!("decode task failed: {}", e)))?
    }

    async fn store(
        storage: Arc<dyn Storage>,
        filename: String,
        data: Bytes,
        mode: WriteMode,
    ) -> UploadResult<VersionDetails> {
        let path = storage.write(&filename, data, mode).await?;
        Ok(VersionDetails { filename, path })
    }
}
