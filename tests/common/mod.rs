//! Shared fakes for integration tests.
//!
//! [`MemoryDirectory`] and [`RecordingStore`] stand in for the filesystem;
//! the provider fakes return canned results and count how often they are
//! called.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use artsync::directory::{DirectoryService, FileMetadata};
use artsync::images::{
    CatalogEntry, DynamicImageResult, ImageReference, ImageStore, LocalImageCandidate,
    RemoteImageCandidate, SaveImageRequest,
};
use artsync::providers::{
    DynamicImageProvider, FetchError, FetchedImage, LocalImageProvider, RemoteImageProvider,
    RemoteImageQuery,
};
use artsync_common::{Error, ImageType, ItemKind};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Fixed timestamp used for every fake file.
pub fn file_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// A movie entry backed by `/media/<name>/<name>.mkv`.
pub fn movie(name: &str) -> CatalogEntry {
    CatalogEntry::new(name, ItemKind::Movie).with_path(format!("/media/{name}/{name}.mkv"))
}

/// A local reference with the fixed file timestamp.
pub fn local_ref(image_type: ImageType, path: &str) -> ImageReference {
    ImageReference {
        image_type,
        path: path.to_string(),
        date_modified: file_time(),
        width: 0,
        height: 0,
    }
}

/// Image bytes whose length identifies them.
pub fn body(len: usize) -> Bytes {
    Bytes::from(vec![0xAB; len])
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// In-memory [`DirectoryService`].
#[derive(Default)]
pub struct MemoryDirectory {
    files: Mutex<HashMap<PathBuf, Vec<FileMetadata>>>,
    listings: AtomicUsize,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, length: u64) -> Self {
        self.add_file(path, length);
        self
    }

    pub fn add_file(&self, path: &str, length: u64) {
        let path = PathBuf::from(path);
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut files = self.files.lock();
        let listing = files.entry(dir).or_default();
        listing.retain(|f| f.path != path);
        listing.push(FileMetadata {
            path,
            last_modified: file_time(),
            length,
        });
        listing.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn remove_file(&self, path: &str) {
        let path = PathBuf::from(path);
        for listing in self.files.lock().values_mut() {
            listing.retain(|f| f.path != path);
        }
    }

    /// Number of directories listed so far.
    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }
}

impl DirectoryService for MemoryDirectory {
    fn files(&self, dir: &Path) -> Vec<FileMetadata> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        self.files.lock().get(dir).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// [`ImageStore`] that records calls and keeps lengths in memory.
///
/// Saved files are written under `/store/<item id>/` and, when a directory is
/// attached, also appear in its listings.
#[derive(Default)]
pub struct RecordingStore {
    saves: Mutex<Vec<SaveImageRequest>>,
    released: Mutex<Vec<ImageReference>>,
    lengths: Mutex<HashMap<String, u64>>,
    fail_saves: AtomicBool,
    cancel_on_save: Mutex<Option<CancellationToken>>,
    directory: Option<Arc<MemoryDirectory>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(directory: Arc<MemoryDirectory>) -> Self {
        Self {
            directory: Some(directory),
            ..Self::default()
        }
    }

    pub fn set_length(&self, path: &str, length: u64) {
        self.lengths.lock().insert(path.to_string(), length);
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// Cancel `token` once the next save has completed.
    pub fn cancel_on_save(&self, token: CancellationToken) {
        *self.cancel_on_save.lock() = Some(token);
    }

    pub fn saves(&self) -> Vec<SaveImageRequest> {
        self.saves.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().len()
    }

    pub fn released(&self) -> Vec<ImageReference> {
        self.released.lock().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingStore {
    async fn save(
        &self,
        entry: &CatalogEntry,
        request: SaveImageRequest,
    ) -> artsync_common::Result<ImageReference> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::storage("disk full"));
        }

        let mut saves = self.saves.lock();
        let path = format!(
            "/store/{}/{}_{}.{}",
            entry.id,
            request.image_type,
            saves.len(),
            request.format.extension()
        );
        let length = request.data.len() as u64;
        self.lengths.lock().insert(path.clone(), length);
        if let Some(directory) = &self.directory {
            directory.add_file(&path, length);
        }

        let reference = local_ref(request.image_type, &path);
        saves.push(request);
        if let Some(token) = self.cancel_on_save.lock().take() {
            token.cancel();
        }
        Ok(reference)
    }

    async fn file_length(&self, path: &str) -> artsync_common::Result<u64> {
        self.lengths
            .lock()
            .get(path)
            .copied()
            .ok_or_else(|| Error::not_found(path))
    }

    async fn release(&self, reference: &ImageReference) -> artsync_common::Result<()> {
        self.released.lock().push(reference.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Local provider returning a fixed list of files.
pub struct StaticLocal {
    pub candidates: Vec<LocalImageCandidate>,
}

impl StaticLocal {
    pub fn new(files: &[(ImageType, &str)]) -> Self {
        let candidates = files
            .iter()
            .map(|&(image_type, path)| {
                LocalImageCandidate::new(
                    image_type,
                    FileMetadata {
                        path: PathBuf::from(path),
                        last_modified: file_time(),
                        length: 100,
                    },
                )
            })
            .collect();
        Self { candidates }
    }
}

impl LocalImageProvider for StaticLocal {
    fn name(&self) -> &'static str {
        "static-local"
    }

    fn images(
        &self,
        _entry: &CatalogEntry,
        _directory: &dyn DirectoryService,
    ) -> anyhow::Result<Vec<LocalImageCandidate>> {
        Ok(self.candidates.clone())
    }
}

/// Dynamic provider with one canned result per type.
pub struct StaticDynamic {
    pub results: HashMap<ImageType, DynamicImageResult>,
    pub bodies: HashMap<String, Bytes>,
    pub calls: AtomicUsize,
}

impl StaticDynamic {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
            bodies: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, image_type: ImageType, result: DynamicImageResult) -> Self {
        self.results.insert(image_type, result);
        self
    }

    pub fn with_body(mut self, url: &str, data: Bytes) -> Self {
        self.bodies.insert(url.to_string(), data);
        self
    }
}

#[async_trait]
impl DynamicImageProvider for StaticDynamic {
    fn name(&self) -> &'static str {
        "static-dynamic"
    }

    fn supported_types(&self, _entry: &CatalogEntry) -> Vec<ImageType> {
        let mut types: Vec<ImageType> = self.results.keys().copied().collect();
        types.sort();
        types
    }

    async fn image(
        &self,
        _entry: &CatalogEntry,
        image_type: ImageType,
    ) -> anyhow::Result<DynamicImageResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.get(&image_type).cloned().unwrap_or_default())
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        self.bodies
            .get(url)
            .cloned()
            .map(FetchedImage::new)
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

/// Remote provider serving canned candidates and bodies.
pub struct StaticRemote {
    pub name: &'static str,
    pub types: Vec<ImageType>,
    pub candidates: Vec<RemoteImageCandidate>,
    pub bodies: HashMap<String, Bytes>,
    pub queries: Mutex<Vec<RemoteImageQuery>>,
    pub fetches: Mutex<Vec<String>>,
}

impl StaticRemote {
    pub fn new(name: &'static str, types: &[ImageType]) -> Self {
        Self {
            name,
            types: types.to_vec(),
            candidates: Vec::new(),
            bodies: HashMap::new(),
            queries: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
        }
    }

    /// Offer `url` as the next candidate and serve `len` bytes for it.
    pub fn offer(mut self, image_type: ImageType, url: &str, len: usize) -> Self {
        self.candidates.push(RemoteImageCandidate::new(image_type, url));
        self.bodies.insert(url.to_string(), body(len));
        self
    }

    /// Offer `url` as a candidate whose download fails.
    pub fn offer_tagged(
        mut self,
        image_type: ImageType,
        url: &str,
        len: usize,
        language: &str,
    ) -> Self {
        self.candidates
            .push(RemoteImageCandidate::new(image_type, url).with_language(language));
        self.bodies.insert(url.to_string(), body(len));
        self
    }

    pub fn offer_broken(mut self, image_type: ImageType, url: &str) -> Self {
        self.candidates.push(RemoteImageCandidate::new(image_type, url));
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl RemoteImageProvider for StaticRemote {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supported_types(&self, _entry: &CatalogEntry) -> Vec<ImageType> {
        self.types.clone()
    }

    async fn candidates(
        &self,
        _entry: &CatalogEntry,
        query: &RemoteImageQuery,
    ) -> anyhow::Result<Vec<RemoteImageCandidate>> {
        self.queries.lock().push(query.clone());
        Ok(self.candidates.clone())
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        self.fetches.lock().push(url.to_string());
        match self.bodies.get(url) {
            Some(data) => Ok(FetchedImage::new(data.clone())),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            }),
        }
    }
}

/// Remote provider whose listing call always fails.
pub struct FailingRemote;

#[async_trait]
impl RemoteImageProvider for FailingRemote {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn supported_types(&self, _entry: &CatalogEntry) -> Vec<ImageType> {
        vec![ImageType::Primary, ImageType::Backdrop]
    }

    async fn candidates(
        &self,
        _entry: &CatalogEntry,
        _query: &RemoteImageQuery,
    ) -> anyhow::Result<Vec<RemoteImageCandidate>> {
        anyhow::bail!("service unavailable")
    }
}

/// Remote provider that cancels the pass and then never answers.
pub struct CancellingRemote {
    pub token: CancellationToken,
}

#[async_trait]
impl RemoteImageProvider for CancellingRemote {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    fn supported_types(&self, _entry: &CatalogEntry) -> Vec<ImageType> {
        vec![ImageType::Primary, ImageType::Backdrop]
    }

    async fn candidates(
        &self,
        _entry: &CatalogEntry,
        _query: &RemoteImageQuery,
    ) -> anyhow::Result<Vec<RemoteImageCandidate>> {
        self.token.cancel();
        std::future::pending().await
    }
}
