//! Refresh orchestration: one image pass per catalog entry.
//!
//! A pass runs, in order:
//!
//! 1. Validation of the current references plus the local provider merge.
//! 2. Dynamic providers, in list order.
//! 3. Remote providers, in list order, skipped when no type needs an image.
//! 4. Removal of replaced images once their replacements are in place.
//!
//! The pass reports `updated` when the entry's references differ from what
//! they were when it started.

mod policy;

pub use policy::{is_stub_entry, matches_stored_length};

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use artsync_common::paths::same_location;
use artsync_common::{ImageFormat, ImageType};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TypeOptions;
use crate::directory::DirectoryService;
use crate::images::{
    validate_images, CatalogEntry, DynamicImageSource, ImageReference, ImageSlots, ImageStore,
    RemoteImageCandidate, SaveImageRequest, Validation,
};
use crate::providers::{
    DynamicImageProvider, FetchError, FetchedImage, ImageProvider, LocalImageProvider,
    ProviderFailure, RemoteImageProvider, RemoteImageQuery, SlotRequest,
};

/// How far a pass may go in discarding existing images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Only fill missing capacity.
    #[default]
    Incremental,
    /// Existing images of replaced types may be swapped for new ones.
    Full,
}

/// Per-call refresh instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshDirective {
    pub mode: RefreshMode,
    /// Replace every image type.
    pub replace_all: bool,
    /// Replace only these types.
    pub replace_types: Vec<ImageType>,
}

impl RefreshDirective {
    pub fn incremental() -> Self {
        Self::default()
    }

    /// Full refresh that keeps existing images.
    pub fn full() -> Self {
        Self {
            mode: RefreshMode::Full,
            ..Self::default()
        }
    }

    /// Full refresh replacing every type.
    pub fn replace_all() -> Self {
        Self {
            mode: RefreshMode::Full,
            replace_all: true,
            replace_types: Vec::new(),
        }
    }

    /// Full refresh replacing the given types.
    pub fn replacing(types: impl IntoIterator<Item = ImageType>) -> Self {
        Self {
            mode: RefreshMode::Full,
            replace_all: false,
            replace_types: types.into_iter().collect(),
        }
    }

    /// Whether existing images of `image_type` are being replaced.
    pub fn is_replacing(&self, image_type: ImageType) -> bool {
        self.mode == RefreshMode::Full
            && (self.replace_all || self.replace_types.contains(&image_type))
    }
}

/// What a pass did to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    /// The entry's references differ from before the pass.
    pub updated: bool,
    /// The pass stopped early on cancellation. Work done before that is kept.
    pub cancelled: bool,
    /// Providers that failed during the pass.
    pub provider_errors: Vec<ProviderFailure>,
}

/// Runs refresh passes against one image store.
///
/// # Example
///
/// ```rust,ignore
/// let refresher = ImageRefresher::new(Arc::new(FsImageStore::new("/data/images")));
/// let outcome = refresher
///     .refresh(&mut entry, &options, &providers, &directive, &directory, &cancel)
///     .await;
/// if outcome.updated {
///     catalog.save(&entry)?;
/// }
/// ```
pub struct ImageRefresher {
    store: Arc<dyn ImageStore>,
    language: Option<String>,
    include_all_languages: bool,
}

impl ImageRefresher {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self {
            store,
            language: None,
            include_all_languages: false,
        }
    }

    /// Language hint forwarded to remote providers.
    pub fn with_language(mut self, language: impl Into<String>, include_all: bool) -> Self {
        self.language = Some(language.into());
        self.include_all_languages = include_all;
        self
    }

    /// Full pass: validation and local merge, then dynamic and remote
    /// providers.
    pub async fn refresh(
        &self,
        entry: &mut CatalogEntry,
        options: &TypeOptions,
        providers: &[ImageProvider],
        directive: &RefreshDirective,
        directory: &dyn DirectoryService,
        cancel: &CancellationToken,
    ) -> RefreshOutcome {
        let before = entry.images.clone();
        let validation = validate_images(entry, &local_providers(providers), directory);
        self.refresh_validated(entry, &before, validation, options, providers, directive, cancel)
            .await
    }

    /// Rest of a full pass once validation has already run on `entry`.
    ///
    /// `before` is the entry's references as they were before validation, so
    /// changes made by validation count towards `updated`. Lets callers run
    /// the blocking validation step off the async runtime.
    #[allow(clippy::too_many_arguments)]
    pub async fn refresh_validated(
        &self,
        entry: &mut CatalogEntry,
        before: &ImageSlots,
        validation: Validation,
        options: &TypeOptions,
        providers: &[ImageProvider],
        directive: &RefreshDirective,
        cancel: &CancellationToken,
    ) -> RefreshOutcome {
        let mut outcome = self.run_providers(entry, options, providers, directive, cancel).await;
        let mut provider_errors = validation.failures;
        provider_errors.append(&mut outcome.provider_errors);
        outcome.provider_errors = provider_errors;

        self.complete(entry, before, outcome).await
    }

    /// Dynamic and remote providers only. The entry's current references are
    /// taken as already validated.
    pub async fn refresh_from_providers(
        &self,
        entry: &mut CatalogEntry,
        options: &TypeOptions,
        providers: &[ImageProvider],
        directive: &RefreshDirective,
        cancel: &CancellationToken,
    ) -> RefreshOutcome {
        let before = entry.images.clone();
        let outcome = self.run_providers(entry, options, providers, directive, cancel).await;
        self.complete(entry, &before, outcome).await
    }

    async fn run_providers(
        &self,
        entry: &mut CatalogEntry,
        options: &TypeOptions,
        providers: &[ImageProvider],
        directive: &RefreshDirective,
        cancel: &CancellationToken,
    ) -> RefreshOutcome {
        let mut pass = Pass::new(self.store.as_ref(), entry, options, directive, cancel);

        for provider in providers.iter().filter_map(ImageProvider::as_dynamic) {
            if pass.check_cancelled() {
                break;
            }
            pass.run_dynamic(entry, provider).await;
        }

        for provider in providers.iter().filter_map(ImageProvider::as_remote) {
            if pass.check_cancelled() {
                break;
            }
            pass.run_remote(entry, provider, self.language.clone(), self.include_all_languages)
                .await;
        }

        pass.finish(entry);
        pass.outcome
    }

    async fn complete(
        &self,
        entry: &CatalogEntry,
        before: &ImageSlots,
        mut outcome: RefreshOutcome,
    ) -> RefreshOutcome {
        outcome.updated = entry.images != *before;

        if outcome.updated {
            for dropped in before
                .iter()
                .filter(|r| r.is_local_file() && !entry.images.contains_location(&r.path))
            {
                if let Err(e) = self.store.release(dropped).await {
                    warn!(item_id = %entry.id, path = %dropped.path, error = %e, "Failed to release image");
                }
            }
        }

        info!(
            item_id = %entry.id,
            updated = outcome.updated,
            cancelled = outcome.cancelled,
            images = entry.images.total(),
            provider_errors = outcome.provider_errors.len(),
            "Image refresh complete"
        );
        outcome
    }
}

/// Result of trying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// A reference was saved or recorded.
    Placed,
    /// The image is already held; nothing to do.
    Skipped,
    /// The download failed; try the next candidate.
    Failed,
    /// Saving failed; give up on this type.
    Stop,
    Cancelled,
}

/// Mutable state of one pass over one entry.
struct Pass<'a> {
    store: &'a dyn ImageStore,
    options: &'a TypeOptions,
    directive: &'a RefreshDirective,
    cancel: &'a CancellationToken,
    stub: bool,
    /// Number of leading references per replaced type that belong to the old set.
    old_len: HashMap<ImageType, usize>,
    /// Types that received a new image during this pass.
    filled: HashSet<ImageType>,
    outcome: RefreshOutcome,
}

impl<'a> Pass<'a> {
    fn new(
        store: &'a dyn ImageStore,
        entry: &CatalogEntry,
        options: &'a TypeOptions,
        directive: &'a RefreshDirective,
        cancel: &'a CancellationToken,
    ) -> Self {
        let old_len = ImageType::ALL
            .into_iter()
            .filter(|&t| options.is_enabled(t) && directive.is_replacing(t))
            .map(|t| (t, entry.images.len(t)))
            .filter(|&(_, len)| len > 0)
            .collect();

        Self {
            store,
            options,
            directive,
            cancel,
            stub: is_stub_entry(entry),
            old_len,
            filled: HashSet::new(),
            outcome: RefreshOutcome::default(),
        }
    }

    fn check_cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.outcome.cancelled = true;
        }
        self.outcome.cancelled
    }

    /// How many references the slot may hold while the pass runs. Replaced
    /// repeatable types make room for their old set until the pass ends.
    fn capacity(&self, image_type: ImageType) -> usize {
        let limit = self.options.limit(image_type);
        if image_type.is_repeatable() {
            limit + self.old_len.get(&image_type).copied().unwrap_or(0)
        } else {
            limit
        }
    }

    fn needs_image(&self, entry: &CatalogEntry, image_type: ImageType) -> bool {
        if !self.options.is_enabled(image_type) {
            return false;
        }
        let replacing = self.directive.is_replacing(image_type) && !self.filled.contains(&image_type);
        replacing || entry.images.len(image_type) < self.capacity(image_type)
    }

    fn remaining(&self, entry: &CatalogEntry, image_type: ImageType) -> usize {
        self.capacity(image_type)
            .saturating_sub(entry.images.len(image_type))
            .max(1)
    }

    fn next_index(entry: &CatalogEntry, image_type: ImageType) -> usize {
        if image_type.is_repeatable() {
            entry.images.len(image_type)
        } else {
            0
        }
    }

    fn provider_failed(&mut self, entry: &CatalogEntry, provider: &str, error: anyhow::Error) {
        warn!(item_id = %entry.id, provider, error = %error, "Image provider failed");
        self.outcome
            .provider_errors
            .push(ProviderFailure::new(provider, &error));
    }

    async fn run_dynamic(&mut self, entry: &mut CatalogEntry, provider: &Arc<dyn DynamicImageProvider>) {
        for image_type in provider.supported_types(entry) {
            if !self.needs_image(entry, image_type) {
                continue;
            }

            let Some(result) = cancellable(self.cancel, provider.image(entry, image_type)).await else {
                self.outcome.cancelled = true;
                return;
            };
            let result = match result {
                Ok(result) => result,
                Err(e) => {
                    self.provider_failed(entry, provider.name(), e);
                    return;
                }
            };

            let Some(source) = result.source else {
                debug!(item_id = %entry.id, provider = provider.name(), %image_type, "No dynamic image available");
                continue;
            };

            let step = match source {
                DynamicImageSource::Network(url) if self.stub => self.record_url(entry, image_type, &url),
                DynamicImageSource::Network(url) => {
                    self.download(entry, image_type, &url, provider.fetch(&url)).await
                }
                DynamicImageSource::LocalFile(path) => {
                    match cancellable(self.cancel, tokio::fs::read(&path)).await {
                        None => {
                            self.outcome.cancelled = true;
                            Step::Cancelled
                        }
                        Some(Ok(data)) => {
                            let format = result.format.unwrap_or_default();
                            self.save(entry, image_type, format, Bytes::from(data)).await
                        }
                        Some(Err(e)) => {
                            warn!(
                                item_id = %entry.id,
                                provider = provider.name(),
                                path = %path.display(),
                                error = %e,
                                "Failed to read generated image"
                            );
                            Step::Failed
                        }
                    }
                }
                DynamicImageSource::Inline(data) => {
                    let format = result.format.unwrap_or_default();
                    self.save(entry, image_type, format, data).await
                }
            };

            if step == Step::Cancelled {
                return;
            }
        }
    }

    async fn run_remote(
        &mut self,
        entry: &mut CatalogEntry,
        provider: &Arc<dyn RemoteImageProvider>,
        language: Option<String>,
        include_all_languages: bool,
    ) {
        let wanted: Vec<ImageType> = provider
            .supported_types(entry)
            .into_iter()
            .filter(|&t| self.needs_image(entry, t))
            .collect();

        if wanted.is_empty() {
            debug!(item_id = %entry.id, provider = provider.name(), "All supported image types are filled");
            return;
        }

        let query = RemoteImageQuery {
            slots: wanted
                .iter()
                .map(|&image_type| SlotRequest {
                    image_type,
                    limit: self.remaining(entry, image_type),
                    min_width: self.options.min_width(image_type),
                })
                .collect(),
            language,
            include_all_languages,
        };

        let Some(result) = cancellable(self.cancel, provider.candidates(entry, &query)).await else {
            self.outcome.cancelled = true;
            return;
        };
        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                self.provider_failed(entry, provider.name(), e);
                return;
            }
        };

        debug!(
            item_id = %entry.id,
            provider = provider.name(),
            count = candidates.len(),
            "Received remote image candidates"
        );

        for image_type in wanted {
            let ranked = rank_candidates(&candidates, image_type, self.options.min_width(image_type));

            for candidate in ranked {
                if !self.needs_image(entry, image_type) {
                    break;
                }

                let step = if self.stub {
                    self.record_url(entry, image_type, &candidate.url)
                } else {
                    self.download(entry, image_type, &candidate.url, provider.fetch(&candidate.url))
                        .await
                };

                match step {
                    Step::Placed | Step::Skipped | Step::Failed => {}
                    Step::Stop => break,
                    Step::Cancelled => return,
                }
            }
        }
    }

    /// Record a URL as the reference path without downloading it.
    fn record_url(&mut self, entry: &mut CatalogEntry, image_type: ImageType, url: &str) -> Step {
        // While replacing, only references added by this pass count as held.
        let from = self.old_len.get(&image_type).copied().unwrap_or(0);
        if entry
            .images
            .get(image_type)
            .iter()
            .skip(from)
            .any(|r| same_location(&r.path, url))
        {
            return Step::Skipped;
        }

        let index = Self::next_index(entry, image_type);
        entry
            .images
            .set_at(index, ImageReference::remote(image_type, url));
        self.filled.insert(image_type);
        debug!(item_id = %entry.id, %image_type, index, url, "Recorded remote image");
        Step::Placed
    }

    async fn download<F>(
        &mut self,
        entry: &mut CatalogEntry,
        image_type: ImageType,
        url: &str,
        fetch: F,
    ) -> Step
    where
        F: Future<Output = Result<FetchedImage, FetchError>>,
    {
        let Some(fetched) = cancellable(self.cancel, fetch).await else {
            self.outcome.cancelled = true;
            return Step::Cancelled;
        };

        let image = match fetched {
            Ok(image) => image,
            Err(e) => {
                warn!(item_id = %entry.id, %image_type, error = %e, "Image download failed");
                return Step::Failed;
            }
        };

        let length = image.data.len() as u64;
        if !self.directive.is_replacing(image_type)
            && matches_stored_length(self.store, entry, image_type, length).await
        {
            debug!(item_id = %entry.id, %image_type, url, length, "Image already present, skipping");
            return Step::Skipped;
        }

        let format = image.format(url);
        self.save(entry, image_type, format, image.data).await
    }

    /// Not raced against cancellation. A started save runs to completion and
    /// its reference is kept; the next suspension point sees the cancellation.
    async fn save(
        &mut self,
        entry: &mut CatalogEntry,
        image_type: ImageType,
        format: ImageFormat,
        data: Bytes,
    ) -> Step {
        let index = Self::next_index(entry, image_type);
        let request = SaveImageRequest {
            image_type,
            index,
            format,
            data,
        };

        match self.store.save(entry, request).await {
            Ok(reference) => {
                entry.images.set_at(index, reference);
                self.filled.insert(image_type);
                Step::Placed
            }
            Err(e) => {
                warn!(item_id = %entry.id, %image_type, error = %e, "Failed to save image");
                Step::Stop
            }
        }
    }

    /// Drop the old set of every replaced repeatable type that got at least
    /// one new image. Singular types were already overwritten in place.
    fn finish(&mut self, entry: &mut CatalogEntry) {
        for (&image_type, &old) in &self.old_len {
            if image_type.is_repeatable() && self.filled.contains(&image_type) {
                let dropped = entry.images.remove_front(image_type, old);
                debug!(
                    item_id = %entry.id,
                    %image_type,
                    count = dropped.len(),
                    "Removed replaced images"
                );
            }
        }
    }
}

/// The local providers of a provider list, in list order.
pub fn local_providers(providers: &[ImageProvider]) -> Vec<Arc<dyn LocalImageProvider>> {
    providers
        .iter()
        .filter_map(ImageProvider::as_local)
        .cloned()
        .collect()
}

/// Candidates of one type that pass the width floor, in provider order.
/// Language preference is the provider's business; the order is never changed here.
fn rank_candidates(
    candidates: &[RemoteImageCandidate],
    image_type: ImageType,
    min_width: u32,
) -> Vec<RemoteImageCandidate> {
    candidates
        .iter()
        .filter(|c| c.image_type == image_type)
        .cloned()
        .enumerate()
        .map(|(rank, mut c)| {
            c.rank = rank;
            c
        })
        .filter(|c| c.meets_min_width(min_width))
        .collect()
}

async fn cancellable<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
