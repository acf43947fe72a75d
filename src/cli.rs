use artsync::refresh::RefreshDirective;
use artsync_common::{ImageType, ItemKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artsync")]
#[command(author, version, about = "Image reconciliation for media catalog entries")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the images of a single entry
    Refresh {
        /// Media file or folder backing the entry
        path: Option<PathBuf>,

        /// Catalog entry JSON to refresh; rewritten when images change
        #[arg(long, conflicts_with = "path")]
        entry: Option<PathBuf>,

        /// Entry kind when building the entry from a path
        #[arg(long, default_value = "movie")]
        kind: ItemKind,

        /// TMDB identifier for remote artwork
        #[arg(long)]
        tmdb_id: Option<String>,

        #[command(flatten)]
        mode: ModeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discover entries under a directory and refresh all of them
    Scan {
        /// Library root
        #[arg(required = true)]
        dir: PathBuf,

        /// Kind of the entries found under the root
        #[arg(long, default_value = "movie")]
        kind: ItemKind,

        #[command(flatten)]
        mode: ModeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Refresh mode flags shared by `refresh` and `scan`.
#[derive(Args, Debug, Clone, Default)]
pub struct ModeArgs {
    /// Full refresh; existing images are kept unless replaced
    #[arg(long)]
    pub full: bool,

    /// Replace every image type (implies --full)
    #[arg(long)]
    pub replace_all: bool,

    /// Replace images of this type (implies --full, repeatable)
    #[arg(long = "replace", value_name = "TYPE")]
    pub replace: Vec<ImageType>,
}

impl ModeArgs {
    pub fn directive(&self) -> RefreshDirective {
        if self.replace_all {
            RefreshDirective::replace_all()
        } else if !self.replace.is_empty() {
            RefreshDirective::replacing(self.replace.iter().copied())
        } else if self.full {
            RefreshDirective::full()
        } else {
            RefreshDirective::incremental()
        }
    }
}
