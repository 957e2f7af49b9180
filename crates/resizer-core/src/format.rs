use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Image formats the pipeline can detect and write back
///
/// The lowercase identifier doubles as the file extension of every file
/// produced from an image of that format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    pub const ALL: [ImageKind; 4] = [
        ImageKind::Jpeg,
        ImageKind::Png,
        ImageKind::Webp,
        ImageKind::Gif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
            ImageKind::Gif => "gif",
        }
    }

    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for ImageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(ImageKind::Jpeg),
            "png" => Ok(ImageKind::Png),
            "webp" => Ok(ImageKind::Webp),
            "gif" => Ok(ImageKind::Gif),
            _ => Err(anyhow::anyhow!("Invalid image format: {}", s)),
        }
    }
}

impl Display for ImageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
