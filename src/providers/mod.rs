//! Image provider system.
//!
//! Providers come in three capabilities, modelled as the closed
//! [`ImageProvider`] enum:
//!
//! - [`LocalImageProvider`] -- scans the files next to an entry.
//! - [`DynamicImageProvider`] -- produces exactly one image per supported type.
//! - [`RemoteImageProvider`] -- lists ranked candidates and fetches them by URL.
//!
//! # Module layout
//!
//! - [`http`] -- Plain HTTP GET used by the default `fetch` implementations.
//! - [`registry`] -- Ordered provider registry with capability filtering.
//! - [`local`] -- Folder naming convention provider.
//! - [`tmdb`] -- TMDB remote artwork provider.

pub mod http;
pub mod local;
pub mod registry;
pub mod tmdb;

use std::fmt;
use std::sync::Arc;

use artsync_common::{ImageFormat, ImageType};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::directory::DirectoryService;
use crate::images::{
    CatalogEntry, DynamicImageResult, LocalImageCandidate, RemoteImageCandidate,
};

pub use local::FolderImageProvider;
pub use registry::ProviderRegistry;
pub use tmdb::TmdbImageProvider;

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Why downloading one image failed. Callers move on to the next candidate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },
}

/// Downloaded image bytes.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data: Bytes,
    /// `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
}

impl FetchedImage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: None,
        }
    }

    /// Format from the content type, falling back to the URL's extension and
    /// then to JPEG.
    pub fn format(&self, url: &str) -> ImageFormat {
        self.content_type
            .as_deref()
            .and_then(ImageFormat::from_mime)
            .or_else(|| format_from_url(url))
            .unwrap_or_default()
    }
}

fn format_from_url(url: &str) -> Option<ImageFormat> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    ImageFormat::from_extension(ext)
}

// ---------------------------------------------------------------------------
// Remote query
// ---------------------------------------------------------------------------

/// Per-type hints passed to remote providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub image_type: ImageType,
    /// How many images the pass could still take.
    pub limit: usize,
    pub min_width: u32,
}

/// What a refresh pass is asking remote providers for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteImageQuery {
    pub slots: Vec<SlotRequest>,
    /// Preferred artwork language (ISO 639-1).
    pub language: Option<String>,
    /// Whether candidates in other languages should be returned too.
    pub include_all_languages: bool,
}

impl RemoteImageQuery {
    /// Whether the query asks for any image of this type.
    pub fn wants(&self, image_type: ImageType) -> bool {
        self.slots.iter().any(|s| s.image_type == image_type)
    }

    pub fn slot(&self, image_type: ImageType) -> Option<&SlotRequest> {
        self.slots.iter().find(|s| s.image_type == image_type)
    }
}

// ---------------------------------------------------------------------------
// Provider traits
// ---------------------------------------------------------------------------

/// Discovers image files stored alongside an entry.
pub trait LocalImageProvider: Send + Sync {
    /// Short, lowercase identifier (e.g. `"folder"`).
    fn name(&self) -> &'static str;

    /// Whether this provider knows how to scan this kind of entry.
    fn supports(&self, _entry: &CatalogEntry) -> bool {
        true
    }

    /// Scan for images. Order within a type is priority order.
    fn images(
        &self,
        entry: &CatalogEntry,
        directory: &dyn DirectoryService,
    ) -> anyhow::Result<Vec<LocalImageCandidate>>;
}

/// Generates a single image per supported type (e.g. a video frame grab).
#[async_trait]
pub trait DynamicImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn supported_types(&self, entry: &CatalogEntry) -> Vec<ImageType>;

    /// Produce the image for `image_type`, or an unavailable result.
    async fn image(
        &self,
        entry: &CatalogEntry,
        image_type: ImageType,
    ) -> anyhow::Result<DynamicImageResult>;

    /// Download a [`DynamicImageSource::Network`](crate::images::DynamicImageSource::Network) result.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        http::get_image(http::shared_client(), url).await
    }
}

/// Lists downloadable artwork from an external service.
#[async_trait]
pub trait RemoteImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn supported_types(&self, entry: &CatalogEntry) -> Vec<ImageType>;

    /// Ranked candidates for the requested types, best first.
    async fn candidates(
        &self,
        entry: &CatalogEntry,
        query: &RemoteImageQuery,
    ) -> anyhow::Result<Vec<RemoteImageCandidate>>;

    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        http::get_image(http::shared_client(), url).await
    }
}

/// One provider, tagged with its capability.
#[derive(Clone)]
pub enum ImageProvider {
    Local(Arc<dyn LocalImageProvider>),
    Dynamic(Arc<dyn DynamicImageProvider>),
    Remote(Arc<dyn RemoteImageProvider>),
}

impl ImageProvider {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local(p) => p.name(),
            Self::Dynamic(p) => p.name(),
            Self::Remote(p) => p.name(),
        }
    }

    pub fn as_local(&self) -> Option<&Arc<dyn LocalImageProvider>> {
        match self {
            Self::Local(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&Arc<dyn DynamicImageProvider>> {
        match self {
            Self::Dynamic(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_remote(&self) -> Option<&Arc<dyn RemoteImageProvider>> {
        match self {
            Self::Remote(p) => Some(p),
            _ => None,
        }
    }

    /// Whether the provider applies to `entry` for at least one of `types`.
    ///
    /// Local providers scan every type at once, so only their entry check
    /// applies.
    pub fn supports(&self, entry: &CatalogEntry, types: &[ImageType]) -> bool {
        match self {
            Self::Local(p) => p.supports(entry),
            Self::Dynamic(p) => p.supported_types(entry).iter().any(|t| types.contains(t)),
            Self::Remote(p) => p.supported_types(entry).iter().any(|t| types.contains(t)),
        }
    }
}

impl fmt::Debug for ImageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Local(_) => "Local",
            Self::Dynamic(_) => "Dynamic",
            Self::Remote(_) => "Remote",
        };
        f.debug_tuple(kind).field(&self.name()).finish()
    }
}

impl From<Arc<dyn LocalImageProvider>> for ImageProvider {
    fn from(p: Arc<dyn LocalImageProvider>) -> Self {
        Self::Local(p)
    }
}

impl From<Arc<dyn DynamicImageProvider>> for ImageProvider {
    fn from(p: Arc<dyn DynamicImageProvider>) -> Self {
        Self::Dynamic(p)
    }
}

impl From<Arc<dyn RemoteImageProvider>> for ImageProvider {
    fn from(p: Arc<dyn RemoteImageProvider>) -> Self {
        Self::Remote(p)
    }
}

/// A provider call that failed during a pass. The pass carries on without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub message: String,
}

impl ProviderFailure {
    pub fn new(provider: &str, error: &anyhow::Error) -> Self {
        Self {
            provider: provider.to_string(),
            message: format!("{error:#}"),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.message)
    }
}
