mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./artsync.toml",
        "~/.config/artsync/config.toml",
        "/etc/artsync/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.scan.max_concurrent_entries == 0 {
        anyhow::bail!("scan.max_concurrent_entries cannot be 0");
    }

    if config.metadata.tmdb_api_key.as_deref() == Some("") {
        tracing::warn!("metadata.tmdb_api_key is empty; TMDB images are disabled");
    }

    let mut kinds = HashSet::new();
    for options in &config.library.type_options {
        if !kinds.insert(options.kind) {
            anyhow::bail!("Image options for '{}' are defined more than once", options.kind);
        }

        let mut types = HashSet::new();
        for option in &options.images {
            if !types.insert(option.image_type) {
                anyhow::bail!(
                    "Image type '{}' is listed twice for '{}'",
                    option.image_type,
                    options.kind
                );
            }
            if !option.image_type.is_repeatable() && option.limit > 1 {
                tracing::warn!(
                    "'{}' images of '{}' hold at most one image; limit {} is treated as 1",
                    option.image_type,
                    options.kind,
                    option.limit
                );
            }
        }
    }

    Ok(())
}
