use artsync_common::{ImageType, ItemKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub library: LibraryOptions,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Root directory for downloaded and generated images
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./data/images")
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Number of entries refreshed at the same time during a library scan
    #[serde(default = "default_max_concurrent_entries")]
    pub max_concurrent_entries: usize,
}

fn default_max_concurrent_entries() -> usize {
    4
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent_entries: default_max_concurrent_entries(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// TMDB v3 API key. The TMDB provider is disabled without one.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Preferred artwork language (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// Also accept artwork tagged with other languages
    #[serde(default)]
    pub include_all_languages: bool,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            language: default_language(),
            include_all_languages: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryOptions {
    #[serde(default)]
    pub type_options: Vec<TypeOptions>,
}

impl LibraryOptions {
    /// Capacity policy for an entry kind, falling back to the defaults.
    pub fn for_kind(&self, kind: ItemKind) -> TypeOptions {
        self.type_options
            .iter()
            .find(|o| o.kind == kind)
            .cloned()
            .unwrap_or_else(|| TypeOptions::new(kind))
    }
}

/// Per-kind image capacity policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeOptions {
    pub kind: ItemKind,

    #[serde(default)]
    pub images: Vec<ImageOption>,
}

impl TypeOptions {
    /// Policy with no explicit image options.
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            images: Vec::new(),
        }
    }

    /// Builder-style override for one image type.
    pub fn with_image(mut self, image_type: ImageType, limit: usize, min_width: u32) -> Self {
        self.images.retain(|o| o.image_type != image_type);
        self.images.push(ImageOption {
            image_type,
            limit,
            min_width,
        });
        self
    }

    fn option(&self, image_type: ImageType) -> Option<&ImageOption> {
        self.images.iter().find(|o| o.image_type == image_type)
    }

    /// How many images of this type the entry should hold. Singular types
    /// never exceed 1.
    pub fn limit(&self, image_type: ImageType) -> usize {
        let limit = self
            .option(image_type)
            .map(|o| o.limit)
            .unwrap_or_else(|| default_limit(image_type));

        if image_type.is_repeatable() {
            limit
        } else {
            limit.min(1)
        }
    }

    /// Minimum pixel width for remote images of this type.
    pub fn min_width(&self, image_type: ImageType) -> u32 {
        self.option(image_type).map(|o| o.min_width).unwrap_or(0)
    }

    pub fn is_enabled(&self, image_type: ImageType) -> bool {
        self.limit(image_type) > 0
    }
}

fn default_limit(image_type: ImageType) -> usize {
    match image_type {
        ImageType::Primary | ImageType::Backdrop => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageOption {
    #[serde(rename = "type")]
    pub image_type: ImageType,

    #[serde(default = "default_option_limit")]
    pub limit: usize,

    #[serde(default)]
    pub min_width: u32,
}

fn default_option_limit() -> usize {
    1
}
