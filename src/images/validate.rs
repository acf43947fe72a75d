//! Pruning references to local files that no longer exist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use artsync_common::paths::same_location;
use artsync_common::ItemKind;
use tracing::{debug, warn};

use super::merge::merge_images;
use super::model::CatalogEntry;
use crate::directory::DirectoryService;
use crate::providers::{LocalImageProvider, ProviderFailure};

/// Result of [`validate_images`].
#[derive(Debug, Default)]
pub struct Validation {
    /// Whether any reference was removed, added or reset.
    pub changed: bool,
    /// Local providers that failed to scan the entry.
    pub failures: Vec<ProviderFailure>,
}

/// Drop references whose file has disappeared, then merge in whatever the
/// local providers find.
///
/// Each reference's parent directory is listed once through `directory`.
/// Remote references are never pruned here.
pub fn validate_images(
    entry: &mut CatalogEntry,
    local_providers: &[Arc<dyn LocalImageProvider>],
    directory: &dyn DirectoryService,
) -> Validation {
    let mut validation = Validation::default();

    if entry.images.is_empty() && local_providers.is_empty() {
        return validation;
    }

    validation.changed |= prune_missing(entry, directory);

    // A photo is its own primary image.
    if entry.kind == ItemKind::Photo || local_providers.is_empty() {
        return validation;
    }

    let mut candidates = Vec::new();
    for provider in local_providers {
        match provider.images(entry, directory) {
            Ok(found) => candidates.extend(found),
            Err(e) => {
                warn!(
                    item_id = %entry.id,
                    provider = provider.name(),
                    error = %e,
                    "Local image provider failed"
                );
                validation
                    .failures
                    .push(ProviderFailure::new(provider.name(), &e));
            }
        }
    }

    validation.changed |= merge_images(entry, &candidates);
    validation
}

fn prune_missing(entry: &mut CatalogEntry, directory: &dyn DirectoryService) -> bool {
    let mut listings: HashMap<PathBuf, Vec<String>> = HashMap::new();
    for reference in entry.images.iter().filter(|r| r.is_local_file()) {
        let dir = parent_dir(&reference.path);
        if !listings.contains_key(&dir) {
            let files = directory
                .file_paths(&dir)
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            listings.insert(dir, files);
        }
    }

    if listings.is_empty() {
        return false;
    }

    let item_id = entry.id;
    let removed = entry.images.retain(|reference| {
        if !reference.is_local_file() {
            return true;
        }
        let exists = listings
            .get(&parent_dir(&reference.path))
            .is_some_and(|files| files.iter().any(|f| same_location(f, &reference.path)));
        if !exists {
            debug!(
                %item_id,
                image_type = %reference.image_type,
                path = %reference.path,
                "Removing image whose file is gone"
            );
        }
        exists
    });

    removed > 0
}

fn parent_dir(path: &str) -> PathBuf {
    Path::new(path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
