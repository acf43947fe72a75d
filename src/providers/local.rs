//! Local provider recognising conventional artwork file names.
//!
//! Looks at the entry's content folder (the entry path itself for folder
//! kinds, the parent directory for media files):
//!
//! | file stem                                    | type      |
//! |----------------------------------------------|-----------|
//! | `poster`, `folder`, `cover`, `default`, ...   | Primary   |
//! | `backdrop`, `fanart`, `background`, `art` + N | Backdrop  |
//! | `logo`, `clearlogo`                           | Logo      |
//! | `banner`                                      | Banner    |
//! | `thumb`, `landscape`                          | Thumb     |
//! | `disc`, `cdart`, `discart`                    | Disc      |
//! | `clearart`                                    | Art       |
//! | `box`, `boxrear`/`back`, `menu`               | Box, ...  |
//!
//! Media files also match `<video>-<name>` and a bare `<video>` stem
//! (primary). Every image in `extrafanart/` or `backdrops/` is a backdrop.

use std::path::{Path, PathBuf};

use artsync_common::paths::{is_image_file, lowercase_stem};
use artsync_common::{ImageType, ItemKind};
use tracing::trace;

use super::LocalImageProvider;
use crate::directory::DirectoryService;
use crate::images::{CatalogEntry, LocalImageCandidate};

const BACKDROP_FOLDERS: &[&str] = &["extrafanart", "backdrops"];

/// [`LocalImageProvider`] for Kodi/Jellyfin style artwork naming.
#[derive(Debug, Default, Clone)]
pub struct FolderImageProvider;

impl FolderImageProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LocalImageProvider for FolderImageProvider {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn supports(&self, entry: &CatalogEntry) -> bool {
        entry.path.is_some() && entry.kind != ItemKind::TvProgram
    }

    fn images(
        &self,
        entry: &CatalogEntry,
        directory: &dyn DirectoryService,
    ) -> anyhow::Result<Vec<LocalImageCandidate>> {
        let Some(folder) = content_folder(entry) else {
            return Ok(Vec::new());
        };

        let video_stem = (!entry.kind.is_folder())
            .then(|| entry.path.as_deref().map(lowercase_stem))
            .flatten();
        let bare_names = uses_folder_names(entry.kind);

        let mut candidates = Vec::new();

        for file in directory.files(&folder) {
            if !is_image_file(&file.path) {
                continue;
            }

            let stem = lowercase_stem(&file.path);
            let image_type = match video_stem.as_deref() {
                Some(video) if stem == video => Some(ImageType::Primary),
                Some(video) => match stem.strip_prefix(video).and_then(|s| s.strip_prefix('-')) {
                    Some(suffix) => classify(suffix),
                    None if bare_names => classify(&stem),
                    None => None,
                },
                None => classify(&stem),
            };

            if let Some(image_type) = image_type {
                trace!(path = %file.path.display(), %image_type, "Matched local image");
                candidates.push(LocalImageCandidate::new(image_type, file));
            }
        }

        if bare_names {
            for name in BACKDROP_FOLDERS {
                for file in directory.files(&folder.join(name)) {
                    if is_image_file(&file.path) {
                        candidates.push(LocalImageCandidate::new(ImageType::Backdrop, file));
                    }
                }
            }
        }

        Ok(candidates)
    }
}

/// Folder holding the entry's artwork.
fn content_folder(entry: &CatalogEntry) -> Option<PathBuf> {
    let path = entry.path.as_deref()?;
    if entry.kind.is_folder() {
        Some(path.to_path_buf())
    } else {
        path.parent().map(Path::to_path_buf)
    }
}

/// Whether `poster.jpg` style names in the content folder belong to this
/// entry. Episodes and tracks share their folder with siblings, so they only
/// claim `<video>-poster.jpg` style names.
fn uses_folder_names(kind: ItemKind) -> bool {
    kind.is_folder() || matches!(kind, ItemKind::Movie | ItemKind::Video)
}

/// Map a lowercase file stem to an image type.
fn classify(stem: &str) -> Option<ImageType> {
    let image_type = match stem {
        "poster" | "folder" | "cover" | "default" | "movie" | "show" | "jacket" => {
            ImageType::Primary
        }
        "logo" | "clearlogo" => ImageType::Logo,
        "banner" => ImageType::Banner,
        "thumb" | "landscape" => ImageType::Thumb,
        "disc" | "cdart" | "discart" => ImageType::Disc,
        "clearart" => ImageType::Art,
        "box" => ImageType::Box,
        "boxrear" | "back" => ImageType::BoxRear,
        "menu" => ImageType::Menu,
        _ => {
            let base = stem
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .trim_end_matches('-');
            return matches!(base, "backdrop" | "fanart" | "background" | "art")
                .then_some(ImageType::Backdrop);
        }
    };
    Some(image_type)
}
