//! Integration tests for the refresh pass.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use artsync::config::TypeOptions;
use artsync::images::{CatalogEntry, DynamicImageResult, ImageReference};
use artsync::providers::{FolderImageProvider, ImageProvider};
use artsync::refresh::{ImageRefresher, RefreshDirective};
use artsync_common::{ImageFormat, ImageType, ItemKind};
use tokio_util::sync::CancellationToken;

use common::{
    body, local_ref, movie, CancellingRemote, FailingRemote, MemoryDirectory, RecordingStore,
    StaticDynamic, StaticRemote,
};

fn backdrops(limit: usize) -> TypeOptions {
    TypeOptions::new(ItemKind::Movie).with_image(ImageType::Backdrop, limit, 0)
}

fn paths(entry: &CatalogEntry, image_type: ImageType) -> Vec<String> {
    entry
        .images
        .get(image_type)
        .iter()
        .map(|r| r.path.clone())
        .collect()
}

#[tokio::test]
async fn replace_all_with_dynamic_image_leaves_single_backdrop() {
    let directory = MemoryDirectory::new()
        .with_file("/media/Heat/backdrop.jpg", 100)
        .with_file("/media/Heat/backdrop1.jpg", 100)
        .with_file("/media/Heat/backdrop2.jpg", 100);
    let store = Arc::new(RecordingStore::new());

    let mut entry = movie("Heat");
    for path in [
        "/media/Heat/backdrop.jpg",
        "/media/Heat/backdrop1.jpg",
        "/media/Heat/backdrop2.jpg",
    ] {
        entry.images.push(local_ref(ImageType::Backdrop, path));
    }

    let dynamic = StaticDynamic::new().with(
        ImageType::Backdrop,
        DynamicImageResult::inline(ImageFormat::Jpg, body(10)),
    );
    let providers = vec![ImageProvider::Dynamic(Arc::new(dynamic))];

    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(3),
            &providers,
            &RefreshDirective::replace_all(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert!(!outcome.cancelled);
    let kept = paths(&entry, ImageType::Backdrop);
    assert_eq!(kept.len(), 1);
    assert!(kept[0].starts_with("/store/"));
    assert_eq!(store.released().len(), 3);
}

#[tokio::test]
async fn remote_candidates_fill_up_to_limit_in_rank_order() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer(ImageType::Backdrop, "https://img/b0.jpg", 10)
            .offer(ImageType::Backdrop, "https://img/b1.jpg", 11)
            .offer(ImageType::Backdrop, "https://img/b2.jpg", 12)
            .offer(ImageType::Backdrop, "https://img/b3.jpg", 13),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(entry.images.len(ImageType::Backdrop), 2);
    assert_eq!(remote.fetched(), vec!["https://img/b0.jpg", "https://img/b1.jpg"]);

    let lengths: Vec<usize> = store.saves().iter().map(|s| s.data.len()).collect();
    assert_eq!(lengths, vec![10, 11]);

    let indices: Vec<usize> = store.saves().iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 1]);

    let queries = remote.queries.lock();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].slot(ImageType::Backdrop).map(|s| s.limit), Some(2));
}

#[tokio::test]
async fn incremental_with_full_slot_and_no_providers_is_unchanged() {
    let directory = MemoryDirectory::new()
        .with_file("/media/Heat/backdrop.jpg", 100)
        .with_file("/media/Heat/backdrop1.jpg", 100);
    let store = Arc::new(RecordingStore::new());

    let mut entry = movie("Heat");
    entry
        .images
        .push(local_ref(ImageType::Backdrop, "/media/Heat/backdrop.jpg"));
    entry
        .images
        .push(local_ref(ImageType::Backdrop, "/media/Heat/backdrop1.jpg"));

    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &[],
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(!outcome.updated);
    assert_eq!(entry.images.len(ImageType::Backdrop), 2);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn download_matching_stored_length_is_not_saved() {
    let directory = MemoryDirectory::new().with_file("/media/Heat/fanart.jpg", 5);
    let store = Arc::new(RecordingStore::new());
    store.set_length("/media/Heat/fanart.jpg", 5);

    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop]).offer(
            ImageType::Backdrop,
            "https://img/same.jpg",
            5,
        ),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    entry
        .images
        .push(local_ref(ImageType::Backdrop, "/media/Heat/fanart.jpg"));

    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(remote.fetched(), vec!["https://img/same.jpg"]);
    assert_eq!(store.save_count(), 0);
    assert!(!outcome.updated);
    assert_eq!(paths(&entry, ImageType::Backdrop), vec!["/media/Heat/fanart.jpg"]);
}

#[tokio::test]
async fn replacing_ignores_stored_length() {
    let directory = MemoryDirectory::new().with_file("/media/Heat/poster.jpg", 5);
    let store = Arc::new(RecordingStore::new());
    store.set_length("/media/Heat/poster.jpg", 5);

    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary]).offer(
            ImageType::Primary,
            "https://img/p.jpg",
            5,
        ),
    );
    let providers = vec![ImageProvider::Remote(remote)];

    let mut entry = movie("Heat");
    entry
        .images
        .push(local_ref(ImageType::Primary, "/media/Heat/poster.jpg"));

    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::replacing([ImageType::Primary]),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(store.save_count(), 1);
    let primary = paths(&entry, ImageType::Primary);
    assert_eq!(primary.len(), 1);
    assert!(primary[0].starts_with("/store/"));

    let released: Vec<String> = store.released().into_iter().map(|r| r.path).collect();
    assert_eq!(released, vec!["/media/Heat/poster.jpg"]);
}

#[tokio::test]
async fn second_refresh_with_same_inputs_is_unchanged() {
    let directory = Arc::new(MemoryDirectory::new().with_file("/media/Heat/poster.jpg", 100));
    let store = Arc::new(RecordingStore::with_directory(directory.clone()));
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary, ImageType::Backdrop])
            .offer(ImageType::Primary, "https://img/p.jpg", 30)
            .offer(ImageType::Backdrop, "https://img/b.jpg", 20),
    );
    let providers = vec![
        ImageProvider::Local(Arc::new(FolderImageProvider::new())),
        ImageProvider::Remote(remote.clone()),
    ];
    let options = TypeOptions::new(ItemKind::Movie);
    let refresher = ImageRefresher::new(store.clone());
    let cancel = CancellationToken::new();

    let mut entry = movie("Heat");
    let first = refresher
        .refresh(
            &mut entry,
            &options,
            &providers,
            &RefreshDirective::incremental(),
            directory.as_ref(),
            &cancel,
        )
        .await;

    assert!(first.updated);
    assert_eq!(paths(&entry, ImageType::Primary), vec!["/media/Heat/poster.jpg"]);
    assert_eq!(entry.images.len(ImageType::Backdrop), 1);
    assert_eq!(remote.fetched(), vec!["https://img/b.jpg"]);

    let second = refresher
        .refresh(
            &mut entry,
            &options,
            &providers,
            &RefreshDirective::incremental(),
            directory.as_ref(),
            &cancel,
        )
        .await;

    assert!(!second.updated);
    assert_eq!(remote.query_count(), 1);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn stub_entries_record_urls_without_downloading() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary, ImageType::Backdrop])
            .offer(ImageType::Primary, "https://img/p.jpg", 30)
            .offer(ImageType::Backdrop, "https://img/b.jpg", 20),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];
    let refresher = ImageRefresher::new(store.clone());

    let mut entry = CatalogEntry::new("Live Channel", ItemKind::Video);
    let outcome = refresher
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Video),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert!(remote.fetched().is_empty());
    assert_eq!(store.save_count(), 0);
    assert_eq!(
        entry.images.get_at(ImageType::Primary, 0),
        Some(&ImageReference::remote(ImageType::Primary, "https://img/p.jpg"))
    );
    assert_eq!(paths(&entry, ImageType::Backdrop), vec!["https://img/b.jpg"]);

    let again = refresher
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Video),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;
    assert!(!again.updated);
}

#[tokio::test]
async fn failed_download_falls_through_to_next_candidate() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer_broken(ImageType::Backdrop, "https://img/broken.jpg")
            .offer(ImageType::Backdrop, "https://img/good.jpg", 12),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(1),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert!(outcome.provider_errors.is_empty());
    assert_eq!(
        remote.fetched(),
        vec!["https://img/broken.jpg", "https://img/good.jpg"]
    );
    assert_eq!(entry.images.len(ImageType::Backdrop), 1);
}

#[tokio::test]
async fn failed_save_stops_the_type() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    store.fail_saves();
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer(ImageType::Backdrop, "https://img/b0.jpg", 10)
            .offer(ImageType::Backdrop, "https://img/b1.jpg", 11),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(!outcome.updated);
    assert_eq!(remote.fetched(), vec!["https://img/b0.jpg"]);
    assert!(entry.images.is_empty());
}

#[tokio::test]
async fn provider_failure_does_not_stop_the_pass() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary]).offer(
            ImageType::Primary,
            "https://img/p.jpg",
            30,
        ),
    );
    let providers = vec![
        ImageProvider::Remote(Arc::new(FailingRemote)),
        ImageProvider::Remote(remote),
    ];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store)
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(outcome.provider_errors.len(), 1);
    assert_eq!(outcome.provider_errors[0].provider, "failing");
    assert!(outcome.provider_errors[0].message.contains("service unavailable"));
    assert_eq!(entry.images.len(ImageType::Primary), 1);
}

#[tokio::test]
async fn dynamic_images_win_over_remote_for_the_same_type() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let dynamic = Arc::new(StaticDynamic::new().with(
        ImageType::Primary,
        DynamicImageResult::inline(ImageFormat::Png, body(40)),
    ));
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary]).offer(
            ImageType::Primary,
            "https://img/p.jpg",
            30,
        ),
    );
    // Remote is listed first; dynamic providers still run before it.
    let providers = vec![
        ImageProvider::Remote(remote.clone()),
        ImageProvider::Dynamic(dynamic.clone()),
    ];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(dynamic.calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote.query_count(), 0);

    let saves = store.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].format, ImageFormat::Png);
}

#[tokio::test]
async fn dynamic_network_image_is_downloaded() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let dynamic = StaticDynamic::new()
        .with(
            ImageType::Primary,
            DynamicImageResult::network("https://tuner/frame.png"),
        )
        .with_body("https://tuner/frame.png", body(7));
    let providers = vec![ImageProvider::Dynamic(Arc::new(dynamic))];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    let saves = store.saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].format, ImageFormat::Png);
    assert_eq!(saves[0].data.len(), 7);
}

#[tokio::test]
async fn cancellation_keeps_completed_work() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let cancel = CancellationToken::new();

    let dynamic = StaticDynamic::new().with(
        ImageType::Backdrop,
        DynamicImageResult::inline(ImageFormat::Jpg, body(10)),
    );
    let later = Arc::new(
        StaticRemote::new("later", &[ImageType::Primary]).offer(
            ImageType::Primary,
            "https://img/p.jpg",
            30,
        ),
    );
    let providers = vec![
        ImageProvider::Dynamic(Arc::new(dynamic)),
        ImageProvider::Remote(Arc::new(CancellingRemote {
            token: cancel.clone(),
        })),
        ImageProvider::Remote(later.clone()),
    ];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store)
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &cancel,
        )
        .await;

    assert!(outcome.cancelled);
    assert!(outcome.updated);
    assert_eq!(entry.images.len(ImageType::Backdrop), 1);
    assert!(!entry.images.has(ImageType::Primary));
    assert_eq!(later.query_count(), 0);
}

#[tokio::test]
async fn already_cancelled_pass_runs_no_providers() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Primary]).offer(
            ImageType::Primary,
            "https://img/p.jpg",
            30,
        ),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store)
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &cancel,
        )
        .await;

    assert!(outcome.cancelled);
    assert!(!outcome.updated);
    assert_eq!(remote.query_count(), 0);
}

#[tokio::test]
async fn missing_files_are_pruned_with_one_listing_per_folder() {
    let directory = MemoryDirectory::new().with_file("/media/Heat/poster.jpg", 100);
    let store = Arc::new(RecordingStore::new());

    let mut entry = movie("Heat");
    entry
        .images
        .push(local_ref(ImageType::Primary, "/media/Heat/poster.jpg"));
    entry
        .images
        .push(local_ref(ImageType::Backdrop, "/media/Heat/fanart.jpg"));

    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &[],
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(directory.listings(), 1);
    assert_eq!(paths(&entry, ImageType::Primary), vec!["/media/Heat/poster.jpg"]);
    assert!(!entry.images.has(ImageType::Backdrop));

    let released: Vec<String> = store.released().into_iter().map(|r| r.path).collect();
    assert_eq!(released, vec!["/media/Heat/fanart.jpg"]);
}

#[tokio::test]
async fn refresh_from_providers_skips_validation() {
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop]).offer(
            ImageType::Backdrop,
            "https://img/b.jpg",
            20,
        ),
    );
    let providers = vec![ImageProvider::Remote(remote)];

    // Not listed anywhere; a full pass would prune it.
    let mut entry = movie("Heat");
    entry
        .images
        .push(local_ref(ImageType::Primary, "/media/Heat/poster.jpg"));

    let outcome = ImageRefresher::new(store)
        .refresh_from_providers(
            &mut entry,
            &TypeOptions::new(ItemKind::Movie),
            &providers,
            &RefreshDirective::incremental(),
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(paths(&entry, ImageType::Primary), vec!["/media/Heat/poster.jpg"]);
    assert_eq!(entry.images.len(ImageType::Backdrop), 1);
}

#[tokio::test]
async fn tagged_candidates_keep_provider_rank_order() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer_tagged(ImageType::Backdrop, "https://img/b0.jpg", 10, "en")
            .offer_tagged(ImageType::Backdrop, "https://img/b1.jpg", 11, "en")
            .offer(ImageType::Backdrop, "https://img/b2.jpg", 12)
            .offer(ImageType::Backdrop, "https://img/b3.jpg", 13),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.updated);
    assert_eq!(remote.fetched(), vec!["https://img/b0.jpg", "https://img/b1.jpg"]);

    let lengths: Vec<usize> = store.saves().iter().map(|s| s.data.len()).collect();
    assert_eq!(lengths, vec![10, 11]);
}

#[tokio::test]
async fn forced_refresh_of_stub_replaces_local_images_with_urls() {
    let directory = MemoryDirectory::new()
        .with_file("/images/live/backdrop0.jpg", 100)
        .with_file("/images/live/backdrop1.jpg", 100);
    let store = Arc::new(RecordingStore::new());
    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer(ImageType::Backdrop, "https://img/b0.jpg", 10)
            .offer(ImageType::Backdrop, "https://img/b1.jpg", 11),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];
    let refresher = ImageRefresher::new(store.clone());
    let options = TypeOptions::new(ItemKind::Video).with_image(ImageType::Backdrop, 2, 0);

    let stub = || {
        let mut entry = CatalogEntry::new("Live Channel", ItemKind::Video);
        entry
            .images
            .push(local_ref(ImageType::Backdrop, "/images/live/backdrop0.jpg"));
        entry
            .images
            .push(local_ref(ImageType::Backdrop, "/images/live/backdrop1.jpg"));
        entry
    };

    let mut untouched = stub();
    let outcome = refresher
        .refresh(
            &mut untouched,
            &options,
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &CancellationToken::new(),
        )
        .await;
    assert!(!outcome.updated);
    assert_eq!(remote.query_count(), 0);
    assert_eq!(
        paths(&untouched, ImageType::Backdrop),
        vec!["/images/live/backdrop0.jpg", "/images/live/backdrop1.jpg"]
    );

    let mut forced = stub();
    let outcome = refresher
        .refresh(
            &mut forced,
            &options,
            &providers,
            &RefreshDirective::replace_all(),
            &directory,
            &CancellationToken::new(),
        )
        .await;

    // Recording URLs on a stub is reported as a change.
    assert!(outcome.updated);
    assert!(remote.fetched().is_empty());
    assert_eq!(store.save_count(), 0);
    assert_eq!(
        paths(&forced, ImageType::Backdrop),
        vec!["https://img/b0.jpg", "https://img/b1.jpg"]
    );
    assert_eq!(store.released().len(), 2);
}

#[tokio::test]
async fn cancellation_during_save_keeps_saved_image() {
    let directory = MemoryDirectory::new();
    let store = Arc::new(RecordingStore::new());
    let cancel = CancellationToken::new();
    store.cancel_on_save(cancel.clone());

    let remote = Arc::new(
        StaticRemote::new("remote", &[ImageType::Backdrop])
            .offer(ImageType::Backdrop, "https://img/b0.jpg", 10)
            .offer(ImageType::Backdrop, "https://img/b1.jpg", 11),
    );
    let providers = vec![ImageProvider::Remote(remote.clone())];

    let mut entry = movie("Heat");
    let outcome = ImageRefresher::new(store.clone())
        .refresh(
            &mut entry,
            &backdrops(2),
            &providers,
            &RefreshDirective::incremental(),
            &directory,
            &cancel,
        )
        .await;

    assert!(outcome.cancelled);
    assert!(outcome.updated);
    assert_eq!(store.save_count(), 1);
    assert_eq!(remote.fetched(), vec!["https://img/b0.jpg"]);
    assert_eq!(paths(&entry, ImageType::Backdrop).len(), 1);
}
