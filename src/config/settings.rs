use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::SearchConfig;

const APP_NAME: &str = "ListingSearch";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "listingsearch", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path() -> Option<PathBuf> {
    get_config_directory().map(|dir| dir.join(CONFIG_FILE))
}

fn resolve_path(path_override: Option<&Path>) -> Result<PathBuf> {
    match path_override {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the configuration from `path_override` or the platform config file.
/// If the file doesn't exist, it creates a default one.
/// Fields missing from the file take their default values. If the file cannot
/// be parsed at all, it logs a warning and falls back to the defaults.
pub fn load_config(path_override: Option<&Path>) -> Result<SearchConfig> {
    let config_path = resolve_path(path_override)?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = SearchConfig::default();
        save_config(&default_config, Some(config_path.as_path()))?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {:?}", config_path))?;

    match serde_json::from_str::<SearchConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(SearchConfig::default())
        }
    }
}

/// Saves the configuration to `path_override` or the platform config file.
pub fn save_config(config: &SearchConfig, path_override: Option<&Path>) -> Result<()> {
    let config_path = resolve_path(path_override)?;

    if let Some(config_dir) = config_path.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            tracing::info!("Created config directory: {:?}", config_dir);
        }
    }

    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}
