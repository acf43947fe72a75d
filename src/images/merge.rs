//! Folding freshly discovered local images into an entry.

use artsync_common::paths::same_location;
use artsync_common::ImageType;
use tracing::debug;

use super::candidate::LocalImageCandidate;
use super::model::{CatalogEntry, ImageReference};

/// Merge local candidates into the entry's references.
///
/// Singular types take the first candidate of their type. Repeatable types
/// append every candidate whose path is not already held. A held path whose
/// file time moved keeps its place but gets the new time and loses its
/// measured size. No capacity limit is applied here.
///
/// Returns `true` if any reference was added, replaced or reset.
pub fn merge_images(entry: &mut CatalogEntry, candidates: &[LocalImageCandidate]) -> bool {
    let mut changed = false;

    for image_type in ImageType::ALL {
        let mut of_type = candidates.iter().filter(|c| c.image_type == image_type);

        if image_type.is_repeatable() {
            for candidate in of_type {
                changed |= merge_repeatable(entry, candidate);
            }
        } else if let Some(candidate) = of_type.next() {
            changed |= merge_singular(entry, candidate);
        }
    }

    changed
}

fn merge_singular(entry: &mut CatalogEntry, candidate: &LocalImageCandidate) -> bool {
    let location = candidate.file.location();

    if let Some(existing) = entry.images.get_at_mut(candidate.image_type, 0) {
        if same_location(&existing.path, &location) {
            return refresh_timestamp(existing, candidate);
        }
    }

    debug!(
        item_id = %entry.id,
        image_type = %candidate.image_type,
        path = %location,
        "Setting local image"
    );
    entry
        .images
        .set_at(0, ImageReference::from_file(candidate.image_type, &candidate.file));
    true
}

fn merge_repeatable(entry: &mut CatalogEntry, candidate: &LocalImageCandidate) -> bool {
    let location = candidate.file.location();

    if let Some(index) = entry.images.position(candidate.image_type, &location) {
        return entry
            .images
            .get_at_mut(candidate.image_type, index)
            .is_some_and(|existing| refresh_timestamp(existing, candidate));
    }

    let index = entry
        .images
        .push(ImageReference::from_file(candidate.image_type, &candidate.file));
    debug!(
        item_id = %entry.id,
        image_type = %candidate.image_type,
        index,
        path = %location,
        "Added local image"
    );
    true
}

/// Record a changed file time. Dimensions are cleared so they get measured
/// again.
fn refresh_timestamp(existing: &mut ImageReference, candidate: &LocalImageCandidate) -> bool {
    if existing.date_modified == candidate.file.last_modified {
        return false;
    }

    existing.date_modified = candidate.file.last_modified;
    existing.width = 0;
    existing.height = 0;
    true
}
