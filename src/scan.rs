//! Library scan: image refresh passes for many entries.
//!
//! Passes for different entries share nothing mutable, so they run
//! concurrently, bounded by `scan.max_concurrent_entries`. Every pass gets its
//! own [`LocalDirectoryService`] so listings are never stale across entries,
//! and the listing-heavy validation step runs under `spawn_blocking`.

use std::path::Path;
use std::sync::Arc;

use artsync_common::paths::is_video_file;
use artsync_common::{ImageType, ItemKind};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::config::LibraryOptions;
use crate::directory::LocalDirectoryService;
use crate::images::{validate_images, CatalogEntry};
use crate::providers::ProviderRegistry;
use crate::refresh::{local_providers, ImageRefresher, RefreshDirective, RefreshOutcome};

const DEFAULT_MAX_CONCURRENT: usize = 4;

/// An entry after its pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedEntry {
    pub entry: CatalogEntry,
    pub outcome: RefreshOutcome,
}

/// Totals over a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub entries: usize,
    pub updated: usize,
    pub cancelled: usize,
    pub provider_errors: usize,
}

impl ScanSummary {
    pub fn from_results(results: &[ScannedEntry]) -> Self {
        results.iter().fold(Self::default(), |mut summary, r| {
            summary.entries += 1;
            summary.updated += usize::from(r.outcome.updated);
            summary.cancelled += usize::from(r.outcome.cancelled);
            summary.provider_errors += r.outcome.provider_errors.len();
            summary
        })
    }
}

/// Runs refresh passes over a set of entries.
pub struct LibraryScan {
    refresher: Arc<ImageRefresher>,
    registry: ProviderRegistry,
    library: LibraryOptions,
    max_concurrent: usize,
}

impl LibraryScan {
    pub fn new(
        refresher: Arc<ImageRefresher>,
        registry: ProviderRegistry,
        library: LibraryOptions,
    ) -> Self {
        Self {
            refresher,
            registry,
            library,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Number of passes allowed to run at once. Values below 1 are raised to 1.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Refresh one entry with the providers and policy that apply to it.
    pub async fn refresh_entry(
        &self,
        mut entry: CatalogEntry,
        directive: &RefreshDirective,
        cancel: &CancellationToken,
    ) -> ScannedEntry {
        if cancel.is_cancelled() {
            debug!(item_id = %entry.id, "Scan cancelled, entry not refreshed");
            let outcome = RefreshOutcome {
                cancelled: true,
                ..RefreshOutcome::default()
            };
            return ScannedEntry { entry, outcome };
        }

        let options = self.library.for_kind(entry.kind);
        let enabled: Vec<ImageType> = ImageType::ALL
            .into_iter()
            .filter(|&t| options.is_enabled(t))
            .collect();
        let providers = self.registry.for_entry(&entry, &enabled);
        let before = entry.images.clone();

        // Directory listings block, so validation runs on the blocking pool.
        let local = local_providers(&providers);
        let original = entry.clone();
        let validated = tokio::task::spawn_blocking(move || {
            let directory = LocalDirectoryService::new();
            let validation = validate_images(&mut entry, &local, &directory);
            (entry, validation)
        })
        .await;

        let (mut entry, validation) = match validated {
            Ok(validated) => validated,
            Err(e) => {
                error!(item_id = %original.id, error = %e, "Image validation task failed");
                return ScannedEntry {
                    entry: original,
                    outcome: RefreshOutcome::default(),
                };
            }
        };

        let outcome = self
            .refresher
            .refresh_validated(
                &mut entry,
                &before,
                validation,
                &options,
                &providers,
                directive,
                cancel,
            )
            .await;

        ScannedEntry { entry, outcome }
    }

    /// Refresh every entry. Results come back in completion order.
    pub async fn run(
        &self,
        entries: Vec<CatalogEntry>,
        directive: &RefreshDirective,
        cancel: &CancellationToken,
    ) -> Vec<ScannedEntry> {
        info!(
            entries = entries.len(),
            max_concurrent = self.max_concurrent,
            "Starting image scan"
        );

        let results: Vec<ScannedEntry> = stream::iter(entries)
            .map(|entry| self.refresh_entry(entry, directive, cancel))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let summary = ScanSummary::from_results(&results);
        info!(
            entries = summary.entries,
            updated = summary.updated,
            cancelled = summary.cancelled,
            provider_errors = summary.provider_errors,
            "Image scan complete"
        );

        results
    }
}

/// Build entries for the media found under `root`.
///
/// Folder kinds get one entry per immediate subdirectory. Every other kind
/// gets one entry per video file, searched recursively.
pub fn discover_entries(root: &Path, kind: ItemKind) -> Vec<CatalogEntry> {
    let walker = if kind.is_folder() {
        WalkDir::new(root).min_depth(1).max_depth(1)
    } else {
        WalkDir::new(root).min_depth(1)
    };

    let mut entries = Vec::new();
    for dir_entry in walker.sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let path = dir_entry.path();
        let matches = if kind.is_folder() {
            dir_entry.file_type().is_dir()
        } else {
            dir_entry.file_type().is_file() && is_video_file(path)
        };
        if !matches {
            continue;
        }

        let name = if kind.is_folder() {
            path.file_name()
        } else {
            path.file_stem()
        }
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

        entries.push(CatalogEntry::new(name, kind).with_path(path));
    }

    debug!(root = %root.display(), %kind, count = entries.len(), "Discovered entries");
    entries
}
