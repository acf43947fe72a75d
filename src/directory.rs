//! Directory listing capability.
//!
//! Validation and local image discovery both need to know which files exist
//! next to an item. They receive a [`DirectoryService`] explicitly instead of
//! consulting any process-wide filesystem handle, which keeps every pass
//! testable with an in-memory listing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

/// Metadata for one file as seen at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Last write time in UTC.
    pub last_modified: DateTime<Utc>,
    /// File length in bytes.
    pub length: u64,
}

impl FileMetadata {
    /// The path rendered as an image location string.
    pub fn location(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Non-recursive directory listings.
///
/// Implementations return an empty list for directories that do not exist or
/// cannot be read; a missing folder simply has no images in it.
pub trait DirectoryService: Send + Sync {
    /// Files directly inside `dir`, sorted by file name.
    fn files(&self, dir: &Path) -> Vec<FileMetadata>;

    /// Paths of the files directly inside `dir`.
    fn file_paths(&self, dir: &Path) -> Vec<PathBuf> {
        self.files(dir).into_iter().map(|f| f.path).collect()
    }
}

/// [`DirectoryService`] backed by the local filesystem.
///
/// Listings are cached for the lifetime of the service, so one instance
/// should be created per refresh pass.
#[derive(Debug, Default)]
pub struct LocalDirectoryService {
    cache: Mutex<HashMap<PathBuf, Vec<FileMetadata>>>,
}

impl LocalDirectoryService {
    /// Create a service with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached listing.
    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    fn read_dir(dir: &Path) -> Vec<FileMetadata> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Failed to stat file");
                    continue;
                }
            };

            let last_modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

            files.push(FileMetadata {
                path: entry.into_path(),
                last_modified,
                length: metadata.len(),
            });
        }

        files
    }
}

impl DirectoryService for LocalDirectoryService {
    fn files(&self, dir: &Path) -> Vec<FileMetadata> {
        if let Some(cached) = self.cache.lock().get(dir) {
            return cached.clone();
        }

        let files = Self::read_dir(dir);
        self.cache.lock().insert(dir.to_path_buf(), files.clone());
        files
    }
}
