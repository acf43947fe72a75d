//! Image slot model: typed, ordered image references attached to an entry.
//!
//! References are grouped per [`ImageType`]. Inside a group the position of a
//! reference is its index, so indices are always contiguous from 0 and a lower
//! index means a higher priority. Singular types never hold more than one
//! reference.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use artsync_common::paths::{is_remote_location, same_location};
use artsync_common::{ImageType, ItemId, ItemKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::FileMetadata;

/// One stored image for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Slot this image fills.
    pub image_type: ImageType,
    /// Local filesystem path or remote URL.
    pub path: String,
    /// Modification time recorded at the last validation or merge.
    pub date_modified: DateTime<Utc>,
    /// Pixel width, 0 when not yet measured.
    pub width: u32,
    /// Pixel height, 0 when not yet measured.
    pub height: u32,
}

impl ImageReference {
    /// Reference to a local file, not yet measured.
    pub fn from_file(image_type: ImageType, file: &FileMetadata) -> Self {
        Self {
            image_type,
            path: file.location(),
            date_modified: file.last_modified,
            width: 0,
            height: 0,
        }
    }

    /// Reference that records a remote location without downloading it.
    pub fn remote(image_type: ImageType, url: impl Into<String>) -> Self {
        Self {
            image_type,
            path: url.into(),
            date_modified: DateTime::<Utc>::UNIX_EPOCH,
            width: 0,
            height: 0,
        }
    }

    /// Whether the path names a local file rather than a remote resource.
    pub fn is_local_file(&self) -> bool {
        !is_remote_location(&self.path)
    }

    /// Whether width and height have been measured.
    pub fn is_measured(&self) -> bool {
        self.width > 0 || self.height > 0
    }
}

/// An entry's image references, grouped by slot type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSlots(BTreeMap<ImageType, Vec<ImageReference>>);

impl ImageSlots {
    /// Empty slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// References of one type, in priority order.
    pub fn get(&self, image_type: ImageType) -> &[ImageReference] {
        self.0.get(&image_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reference at `index` within a type.
    pub fn get_at(&self, image_type: ImageType, index: usize) -> Option<&ImageReference> {
        self.get(image_type).get(index)
    }

    /// Mutable reference at `index` within a type.
    pub fn get_at_mut(
        &mut self,
        image_type: ImageType,
        index: usize,
    ) -> Option<&mut ImageReference> {
        self.0.get_mut(&image_type)?.get_mut(index)
    }

    /// Number of references of one type.
    pub fn len(&self, image_type: ImageType) -> usize {
        self.get(image_type).len()
    }

    /// Whether at least one reference of this type exists.
    pub fn has(&self, image_type: ImageType) -> bool {
        self.len(image_type) > 0
    }

    /// Whether no reference of any type exists.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of references across all types.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// All references, grouped by type in [`ImageType`] order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageReference> {
        self.0.values().flatten()
    }

    /// Index of the reference whose path matches `location`.
    pub fn position(&self, image_type: ImageType, location: &str) -> Option<usize> {
        self.get(image_type)
            .iter()
            .position(|r| same_location(&r.path, location))
    }

    /// Whether any reference of any type has this path.
    pub fn contains_location(&self, location: &str) -> bool {
        self.iter().any(|r| same_location(&r.path, location))
    }

    /// Store `reference` at `index` of its type and return the index used.
    ///
    /// Singular types always write index 0, replacing what was there. For
    /// repeatable types an index inside the list replaces, anything past the
    /// end appends.
    pub fn set_at(&mut self, index: usize, reference: ImageReference) -> usize {
        let image_type = reference.image_type;
        if !image_type.is_repeatable() {
            self.0.insert(image_type, vec![reference]);
            return 0;
        }

        let slot = self.0.entry(image_type).or_default();
        if index < slot.len() {
            slot[index] = reference;
            index
        } else {
            slot.push(reference);
            slot.len() - 1
        }
    }

    /// Append for repeatable types, replace for singular ones.
    pub fn push(&mut self, reference: ImageReference) -> usize {
        let next = self.len(reference.image_type);
        self.set_at(next, reference)
    }

    /// Keep only the references for which `keep` returns true. Returns the
    /// number removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ImageReference) -> bool,
    {
        let before = self.total();
        for slot in self.0.values_mut() {
            slot.retain(|r| keep(r));
        }
        self.0.retain(|_, slot| !slot.is_empty());
        before - self.total()
    }

    /// Remove the first `count` references of a type, shifting the rest down.
    pub fn remove_front(&mut self, image_type: ImageType, count: usize) -> Vec<ImageReference> {
        let Some(slot) = self.0.get_mut(&image_type) else {
            return Vec::new();
        };
        let removed: Vec<_> = slot.drain(..count.min(slot.len())).collect();
        if slot.is_empty() {
            self.0.remove(&image_type);
        }
        removed
    }
}

/// One catalog item and the images recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Backing media file or folder. `None` for entries with no local content.
    pub path: Option<PathBuf>,
    /// External identifiers keyed by provider name (e.g. `"tmdb"`).
    #[serde(default)]
    pub provider_ids: HashMap<String, String>,
    #[serde(default)]
    pub images: ImageSlots,
}

impl CatalogEntry {
    /// New entry with no path and no images.
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            kind,
            path: None,
            provider_ids: HashMap::new(),
            images: ImageSlots::new(),
        }
    }

    /// Builder-style setter for the backing path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Builder-style setter for an external identifier.
    pub fn with_provider_id(mut self, provider: impl Into<String>, id: impl Into<String>) -> Self {
        self.provider_ids.insert(provider.into(), id.into());
        self
    }

    /// External identifier for `provider`, if known.
    pub fn provider_id(&self, provider: &str) -> Option<&str> {
        self.provider_ids.get(provider).map(String::as_str)
    }
}
