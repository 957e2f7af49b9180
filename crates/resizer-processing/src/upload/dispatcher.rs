//! Batch entry point: request checks, fan-out to handlers, result shaping.

use std::sync::Arc;

use resizer_core::{LogLevel, OneOrMany, UploadError, UploadOptions, UploadOutcome, UploadResult};
use resizer_storage::{LocalStorage, NameLocks, Storage};

use super::handler::ImageHandler;
use super::join_all_ordered;
use super::types::UploadFile;

pub struct BatchDispatcher;

impl BatchDispatcher {
    /// Process one or many uploads into `options.dest`.
    ///
    /// The destination directory (and its parents) is created before any
    /// file is processed. Files run concurrently, each paired by position
    /// with `options.names`; a missing or empty name falls back to the
    /// file's declared filename.
    ///
    /// Exactly one input stream yields its handler result directly, however
    /// it was passed in; several yield one entry per input in input order.
    ///
    /// The first failing file rejects the whole call. Files written before
    /// that point, by the failing file or by its siblings, are left on disk;
    /// callers needing atomicity must clean up the destination themselves.
    pub async fn process(
        inputs: impl Into<OneOrMany<UploadFile>>,
        options: UploadOptions,
    ) -> UploadResult<UploadOutcome> {
        let inputs = inputs.into();
        Self::check_request(&inputs, &options)?;

        let storage = LocalStorage::new(&options.dest).await?;
        Self::dispatch(inputs, options, Arc::new(storage)).await
    }

    /// Like [`process`](Self::process), writing through an already opened storage.
    pub async fn process_with_storage(
        inputs: impl Into<OneOrMany<UploadFile>>,
        options: UploadOptions,
        storage: Arc<dyn Storage>,
    ) -> UploadResult<UploadOutcome> {
        let inputs = inputs.into();
        Self::check_request(&inputs, &options)?;
        Self::dispatch(inputs, options, storage).await
    }

    async fn dispatch(
        inputs: OneOrMany<UploadFile>,
        options: UploadOptions,
        storage: Arc<dyn Storage>,
    ) -> UploadResult<UploadOutcome> {
        let files = inputs.into_vec();
        let single = files.len() == 1;
        let names = options.name_list();
        let file_count = files.len();

        tracing::debug!(
            dest = %storage.root().display(),
            files = file_count,
            versions = options.versions.len(),
            safe_name = options.safe_name,
            "Dispatching upload batch"
        );

        let handler = ImageHandler::new(storage, Arc::new(options), NameLocks::new());

        let jobs = files
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let handler = handler.clone();
                let name = names.get(index).cloned();
                tokio::spawn(async move { handler.handle(file, name).await })
            })
            .collect();

        let mut results = match join_all_ordered(jobs).await {
            Ok(results) => results,
            Err(e) => {
                log_failure(&e);
                return Err(e);
            }
        };

        tracing::info!(files = file_count, "Upload batch completed");

        if single {
            if let Some(result) = results.pop() {
                return Ok(OneOrMany::One(result));
            }
        }
        Ok(OneOrMany::Many(results))
    }

    fn check_request(inputs: &OneOrMany<UploadFile>, options: &UploadOptions) -> UploadResult<()> {
        if inputs.is_empty() {
            return Err(UploadError::input("no files supplied"));
        }
        options.validate()?;

        if inputs.len() > options.max_files {
            return Err(UploadError::TooManyFiles {
                count: inputs.len(),
                max: options.max_files,
            });
        }
        Ok(())
    }
}

fn log_failure(error: &UploadError) {
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = error.error_code(), "Upload batch rejected")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = error.error_code(), "Upload batch rejected")
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = error.error_code(), "Upload batch failed")
        }
    }
}
