mod cli;

use artsync::{
    config::{self, Config},
    images::{CatalogEntry, FsImageStore},
    providers::{tmdb, FolderImageProvider, ProviderRegistry, TmdbImageProvider},
    refresh::{ImageRefresher, RefreshDirective},
    scan::{self, LibraryScan, ScanSummary, ScannedEntry},
};
use artsync_common::{ImageType, ItemKind};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Refresher and providers built from the loaded config.
fn build_scan(config: &Config) -> Result<LibraryScan> {
    let store = Arc::new(FsImageStore::new(&config.images.storage_dir));
    let refresher = ImageRefresher::new(store).with_language(
        config.metadata.language.clone(),
        config.metadata.include_all_languages,
    );

    let mut registry = ProviderRegistry::new();
    registry.register_local(Arc::new(FolderImageProvider::new()));

    match config.metadata.tmdb_api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            let provider = TmdbImageProvider::new(key.to_string(), config.metadata.language.clone())?;
            registry.register_remote(Arc::new(provider));
        }
        _ => tracing::debug!("No TMDB API key configured, remote images disabled"),
    }

    tracing::debug!(providers = registry.len(), "Image providers registered");

    Ok(LibraryScan::new(Arc::new(refresher), registry, config.library.clone())
        .with_max_concurrent(config.scan.max_concurrent_entries))
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling refresh");
            trigger.cancel();
        }
    });
    token
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "artsync=trace,artsync_common=debug".to_string()
        } else {
            "artsync=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Refresh {
            path,
            entry,
            kind,
            tmdb_id,
            mode,
            json,
        } => {
            let request = RefreshRequest {
                path,
                entry_file: entry,
                kind,
                tmdb_id,
                directive: mode.directive(),
                json,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(refresh_entry(request, cli.config.as_deref()))
        }
        Commands::Scan {
            dir,
            kind,
            mode,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(scan_library(
                &dir,
                kind,
                mode.directive(),
                json,
                cli.config.as_deref(),
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("artsync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

struct RefreshRequest {
    path: Option<PathBuf>,
    entry_file: Option<PathBuf>,
    kind: ItemKind,
    tmdb_id: Option<String>,
    directive: RefreshDirective,
    json: bool,
}

async fn refresh_entry(request: RefreshRequest, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let mut entry = match (&request.entry_file, &request.path) {
        (Some(file), _) => read_entry(file)?,
        (None, Some(path)) => {
            if !path.exists() {
                anyhow::bail!("Media path does not exist: {:?}", path);
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            CatalogEntry::new(name, request.kind).with_path(path)
        }
        (None, None) => anyhow::bail!("Either a media path or --entry must be given"),
    };

    if let Some(id) = request.tmdb_id {
        entry.provider_ids.insert(tmdb::PROVIDER_ID.to_string(), id);
    }

    let scan = build_scan(&config)?;
    let cancel = cancel_on_interrupt();

    tracing::info!(item_id = %entry.id, name = %entry.name, "Refreshing images");
    let scanned = scan.refresh_entry(entry, &request.directive, &cancel).await;

    if let (Some(file), true) = (&request.entry_file, scanned.outcome.updated) {
        write_entry(file, &scanned.entry)?;
        tracing::info!("Updated entry written to {:?}", file);
    }

    if request.json {
        println!("{}", serde_json::to_string_pretty(&scanned)?);
    } else {
        print_entry(&scanned);
    }

    Ok(())
}

async fn scan_library(
    dir: &Path,
    kind: ItemKind,
    directive: RefreshDirective,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !dir.is_dir() {
        anyhow::bail!("Library directory does not exist: {:?}", dir);
    }

    let entries = scan::discover_entries(dir, kind);
    if entries.is_empty() {
        println!("No {} entries found under {}", kind, dir.display());
        return Ok(());
    }

    let library = build_scan(&config)?;
    let cancel = cancel_on_interrupt();
    let results = library.run(entries, &directive, &cancel).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for scanned in &results {
        print_entry(scanned);
    }

    let summary = ScanSummary::from_results(&results);
    println!();
    println!(
        "Entries: {}  Updated: {}  Cancelled: {}  Provider errors: {}",
        summary.entries, summary.updated, summary.cancelled, summary.provider_errors
    );

    Ok(())
}

fn read_entry(file: &Path) -> Result<CatalogEntry> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read entry file: {:?}", file))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse entry file: {:?}", file))
}

fn write_entry(file: &Path, entry: &CatalogEntry) -> Result<()> {
    let content = serde_json::to_string_pretty(entry)?;
    std::fs::write(file, content).with_context(|| format!("Failed to write entry file: {:?}", file))
}

fn print_entry(scanned: &ScannedEntry) {
    let entry = &scanned.entry;
    let outcome = &scanned.outcome;

    let status = match (outcome.cancelled, outcome.updated) {
        (true, _) => "cancelled",
        (false, true) => "updated",
        (false, false) => "unchanged",
    };
    println!("{} ({}) [{}]", entry.name, entry.kind, status);

    for image_type in ImageType::ALL {
        for (index, reference) in entry.images.get(image_type).iter().enumerate() {
            println!("  {}[{}] {}", image_type, index, reference.path);
        }
    }

    for failure in &outcome.provider_errors {
        println!("  ! {}", failure);
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Image storage: {}", config.images.storage_dir.display());
    println!("  Concurrent entries: {}", config.scan.max_concurrent_entries);
    println!("  Language: {}", config.metadata.language);
    println!(
        "  TMDB: {}",
        if config.metadata.tmdb_api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            "enabled"
        } else {
            "disabled"
        }
    );
    for kind in ItemKind::ALL {
        let options = config.library.for_kind(kind);
        let limits: Vec<String> = ImageType::ALL
            .into_iter()
            .filter(|&t| options.is_enabled(t))
            .map(|t| format!("{}={}", t, options.limit(t)))
            .collect();
        println!("  {}: {}", kind, limits.join(", "));
    }

    Ok(())
}
