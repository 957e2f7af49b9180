//! Shared helpers for upload integration tests.

#![allow(dead_code)]

pub mod fixtures;

use resizer_processing::{OneOrMany, UploadOptions, UploadOutcome, VersionDetails};
use std::path::Path;

/// Options writing into `dest` with every other field at its default.
pub fn options_for(dest: &Path) -> UploadOptions {
    UploadOptions::new(dest)
}

/// Sorted names of the regular files in `dir`.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Filenames of a single-file outcome, in result order.
pub fn filenames(outcome: &OneOrMany<VersionDetails>) -> Vec<String> {
    outcome
        .clone()
        .into_vec()
        .into_iter()
        .map(|details| details.filename)
        .collect()
}

/// Unwrap a single-file outcome.
pub fn single(outcome: UploadOutcome) -> OneOrMany<VersionDetails> {
    match outcome {
        OneOrMany::One(result) => result,
        OneOrMany::Many(results) => panic!("expected one file result, got {}", results.len()),
    }
}

/// Pixel dimensions of an image on disk.
pub fn dimensions_of(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}
