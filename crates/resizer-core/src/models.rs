//! Upload data model
//!
//! Inputs (`VersionSpec`, one-or-many values) and outputs (`VersionDetails`)
//! of the ingestion pipeline. Outputs are created once per written file and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// A single value or an ordered list of values.
///
/// Used at the boundary for inputs that may be given either way (files,
/// requested names) and for results, whose wrapping depends on how many
/// files and versions were involved. Serialized untagged: a bare value or
/// a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Wrap a list, unwrapping it when it holds exactly one element.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return OneOrMany::One(item);
            }
        }
        OneOrMany::Many(items)
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_one(&self) -> Option<&T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[T]> {
        match self {
            OneOrMany::One(_) => None,
            OneOrMany::Many(items) => Some(items),
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// One configured resize target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionSpec {
    /// Target width (None = derived from height, keeping aspect ratio)
    pub width: Option<u32>,
    /// Target height (None = derived from width, keeping aspect ratio)
    pub height: Option<u32>,
    /// Allow the output to be larger than the source
    pub enlargement: bool,
    /// Explicit filename suffix; when absent the actual `-<w>x<h>` is used
    pub suffix: Option<String>,
}

impl VersionSpec {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_enlargement(mut self, enlargement: bool) -> Self {
        self.enlargement = enlargement;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Parse `<W>x<H>[+][:<suffix>]`, e.g. `320x240`, `640x`, `x480+`, `150x150:-thumb`.
    ///
    /// Either side of the `x` may be empty, not both. A trailing `+` allows
    /// enlargement.
    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        let (dims, suffix) = match s.split_once(':') {
            Some((dims, suffix)) if !suffix.is_empty() => (dims, Some(suffix.to_string())),
            Some((dims, _)) => (dims, None),
            None => (s, None),
        };
        let dims = dims.trim();
        let (dims, enlargement) = match dims.strip_suffix('+') {
            Some(rest) => (rest, true),
            None => (dims, false),
        };

        let (w, h) = dims
            .split_once(|c| c == 'x' || c == 'X')
            .ok_or_else(|| anyhow::anyhow!("Invalid version '{}': expected <W>x<H>", s))?;

        let parse_side = |side: &str| -> Result<Option<u32>, anyhow::Error> {
            if side.is_empty() {
                return Ok(None);
            }
            side.parse::<u32>()
                .map(Some)
                .map_err(|_| anyhow::anyhow!("Invalid version '{}': '{}' is not a size", s, side))
        };

        let width = parse_side(w)?;
        let height = parse_side(h)?;
        if width.is_none() && height.is_none() {
            return Err(anyhow::anyhow!(
                "Invalid version '{}': width or height is required",
                s
            ));
        }

        Ok(Self {
            width,
            height,
            enlargement,
            suffix,
        })
    }
}

impl FromStr for VersionSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Descriptor of one written file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetails {
    pub filename: String,
    pub path: PathBuf,
}

/// Result of one dispatcher call.
///
/// One file yields its handler result directly; several files yield one
/// entry per file in input order. Each handler result is a single
/// descriptor or the ordered list of its versions.
pub type UploadOutcome = OneOrMany<OneOrMany<VersionDetails>>;
