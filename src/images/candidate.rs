//! Image candidates produced by providers before they become references.

use std::path::PathBuf;

use artsync_common::{ImageFormat, ImageType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::directory::FileMetadata;

/// An image file found next to an entry by a local provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImageCandidate {
    pub image_type: ImageType,
    pub file: FileMetadata,
}

impl LocalImageCandidate {
    pub fn new(image_type: ImageType, file: FileMetadata) -> Self {
        Self { image_type, file }
    }
}

/// A downloadable image offered by a remote provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteImageCandidate {
    pub image_type: ImageType,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// ISO 639-1 language code, `None` for language-neutral art.
    pub language: Option<String>,
    /// Position in the provider's returned list. Lower is preferred.
    pub rank: usize,
    /// Name of the provider that returned this candidate.
    pub provider_name: String,
}

impl RemoteImageCandidate {
    pub fn new(image_type: ImageType, url: impl Into<String>) -> Self {
        Self {
            image_type,
            url: url.into(),
            width: None,
            height: None,
            language: None,
            rank: 0,
            provider_name: String::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether the candidate is at least `min_width` wide. Unknown widths pass.
    pub fn meets_min_width(&self, min_width: u32) -> bool {
        self.width.map_or(true, |w| w >= min_width)
    }
}

/// Where a dynamically generated image can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicImageSource {
    /// Must be downloaded like a remote candidate.
    Network(String),
    /// Read directly from a file on disk.
    LocalFile(PathBuf),
    /// Generated in memory.
    Inline(Bytes),
}

/// Result of asking a dynamic provider for one image type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicImageResult {
    /// Declared format. When absent it is inferred from the source.
    pub format: Option<ImageFormat>,
    /// `None` when the provider has nothing for this type.
    pub source: Option<DynamicImageSource>,
}

impl DynamicImageResult {
    /// The provider has no image for this type.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn network(url: impl Into<String>) -> Self {
        Self {
            format: None,
            source: Some(DynamicImageSource::Network(url.into())),
        }
    }

    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension);
        Self {
            format,
            source: Some(DynamicImageSource::LocalFile(path)),
        }
    }

    pub fn inline(format: ImageFormat, data: impl Into<Bytes>) -> Self {
        Self {
            format: Some(format),
            source: Some(DynamicImageSource::Inline(data.into())),
        }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_some()
    }
}
