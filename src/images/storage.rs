//! Filesystem-level image storage with content-hash naming.
//!
//! Saved images live under `{base_dir}/{item_id}/{type}_{hash}.{ext}`. The
//! store assigns the final path; callers decide where the returned reference
//! goes in the entry's slots.

use std::path::{Path, PathBuf};

use artsync_common::{Error, ImageFormat, ImageType, ItemId, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::model::{CatalogEntry, ImageReference};

/// Bytes to persist for one slot of an entry.
#[derive(Debug, Clone)]
pub struct SaveImageRequest {
    pub image_type: ImageType,
    /// Index the reference will occupy once placed.
    pub index: usize,
    pub format: ImageFormat,
    pub data: Bytes,
}

/// Storage collaborator used by the refresh pass.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist image bytes and return a reference to the stored file.
    async fn save(&self, entry: &CatalogEntry, request: SaveImageRequest) -> Result<ImageReference>;

    /// Length in bytes of the file at `path`.
    async fn file_length(&self, path: &str) -> Result<u64>;

    /// Remove the file behind a reference that was dropped from an entry.
    ///
    /// Stores only delete what they own; anything else is left alone.
    async fn release(&self, reference: &ImageReference) -> Result<()>;
}

/// [`ImageStore`] writing into a directory tree on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    base_dir: PathBuf,
}

impl FsImageStore {
    /// Create a new `FsImageStore` rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path a given image would be stored at.
    pub fn path_for(
        &self,
        item_id: &ItemId,
        image_type: ImageType,
        hash: &str,
        format: ImageFormat,
    ) -> PathBuf {
        self.base_dir
            .join(item_id.to_string())
            .join(format_filename(image_type, hash, format))
    }

    fn owns(&self, path: &Path) -> bool {
        path.starts_with(&self.base_dir)
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn save(&self, entry: &CatalogEntry, request: SaveImageRequest) -> Result<ImageReference> {
        let hash = compute_hash(&request.data);
        let target = self.path_for(&entry.id, request.image_type, &hash, request.format);

        let item_dir = target
            .parent()
            .ok_or_else(|| Error::storage(format!("No parent for {}", target.display())))?;
        tokio::fs::create_dir_all(item_dir).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create image directory {}: {e}",
                item_dir.display()
            ))
        })?;

        if tokio::fs::try_exists(&target).await? {
            debug!(path = %target.display(), "Image content already stored");
        } else {
            let tmp = target.with_extension(format!("{}.tmp", request.format.extension()));
            tokio::fs::write(&tmp, &request.data).await.map_err(|e| {
                Error::storage(format!("Failed to write image file {}: {e}", tmp.display()))
            })?;
            tokio::fs::rename(&tmp, &target).await.map_err(|e| {
                Error::storage(format!("Failed to move image into {}: {e}", target.display()))
            })?;
        }

        let metadata = tokio::fs::metadata(&target).await?;
        let date_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        debug!(
            item_id = %entry.id,
            image_type = %request.image_type,
            index = request.index,
            bytes = request.data.len(),
            path = %target.display(),
            "Saved image"
        );

        Ok(ImageReference {
            image_type: request.image_type,
            path: target.to_string_lossy().into_owned(),
            date_modified,
            width: 0,
            height: 0,
        })
    }

    async fn file_length(&self, path: &str) -> Result<u64> {
        match tokio::fs::metadata(path).await {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found(format!("Image file {path}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn release(&self, reference: &ImageReference) -> Result<()> {
        let path = Path::new(&reference.path);
        if !reference.is_local_file() || !self.owns(path) {
            return Ok(());
        }

        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted image file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!(
                "Failed to delete image file {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Compute the content hash for image data.
///
/// Returns the first 16 hex characters of the SHA-256 digest.
fn compute_hash(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(&digest[..8])
}

fn format_filename(image_type: ImageType, hash: &str, format: ImageFormat) -> String {
    format!("{}_{}.{}", image_type, hash, format.extension())
}
