use anyhow::Result;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "AITransformer";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("io", "kamaal", APP_NAME).map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

fn resolve_config_directory(custom_dir: Option<&Path>) -> Result<PathBuf> {
    match custom_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => get_config_directory().ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Returns the full path to the configuration file.
pub fn get_config_file_path(custom_dir: Option<&Path>) -> Result<PathBuf> {
    resolve_config_directory(custom_dir).map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from `custom_dir`, or from the platform config
/// directory when `None`.
///
/// A missing file is created with defaults. A file that cannot be parsed is
/// logged and replaced by defaults in memory; it is left untouched on disk.
pub fn load_config(custom_dir: Option<&Path>) -> Result<AppConfig> {
    let config_path = get_config_file_path(custom_dir)?;

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, custom_dir)?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)?;
    match serde_json::from_str::<AppConfig>(&config_content) {
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
            Ok(AppConfig::default())
        }
    }
}

/// Saves the configuration, creating the directory if needed.
pub fn save_config(config: &AppConfig, custom_dir: Option<&Path>) -> Result<()> {
    let config_dir = resolve_config_directory(custom_dir)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        tracing::info!("Created config directory: {:?}", config_dir);
    }

    let config_path = config_dir.join(CONFIG_FILE);
    let config_json = serde_json::to_string_pretty(config)?;

    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

/// Exports the configuration to a user-chosen JSON file.
pub fn export_config(config: &AppConfig, export_path: &Path) -> Result<()> {
    let config_json = serde_json::to_string_pretty(config)?;
    fs::write(export_path, config_json)?;
    tracing::info!("Exported config to {:?}", export_path);
    Ok(())
}

/// Imports a configuration from a user-chosen JSON file. Unlike
/// [`load_config`], a malformed file is an error.
pub fn import_config(import_path: &Path) -> Result<AppConfig> {
    let config_content = fs::read_to_string(import_path)?;
    let config = serde_json::from_str::<AppConfig>(&config_content)?;
    tracing::info!("Imported config from {:?}", import_path);
    Ok(config)
}
