//! Named policy checks applied while acquiring images.

use artsync_common::paths::is_remote_location;
use artsync_common::{ImageType, ItemKind};
use tracing::trace;

use crate::images::{CatalogEntry, ImageStore};

/// Whether the entry has no local content to store images next to.
///
/// Stub entries never download bytes. Selected URLs are recorded as the
/// reference paths instead.
pub fn is_stub_entry(entry: &CatalogEntry) -> bool {
    if entry.kind == ItemKind::TvProgram {
        return true;
    }

    match entry.path.as_deref() {
        None => true,
        Some(path) => is_remote_location(&path.to_string_lossy()),
    }
}

/// Whether a downloaded image of `length` bytes is already held in the slot.
///
/// Compares against the stored length of every local reference of
/// `image_type`. References whose length cannot be read never match.
pub async fn matches_stored_length(
    store: &dyn ImageStore,
    entry: &CatalogEntry,
    image_type: ImageType,
    length: u64,
) -> bool {
    for reference in entry.images.get(image_type) {
        if !reference.is_local_file() {
            continue;
        }
        match store.file_length(&reference.path).await {
            Ok(stored) if stored == length => return true,
            Ok(_) => {}
            Err(e) => trace!(path = %reference.path, error = %e, "Stored length unavailable"),
        }
    }
    false
}
