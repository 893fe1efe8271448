use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::models::settings::{AppConfig, ConfigError};

const CONFIG_FILE_NAME: &str = "config.toml";
const DATABASE_FILE_NAME: &str = "tariff.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "TariffUi", "DemandEditor")
}

/// Loads and stores the TOML configuration file.
pub struct SettingsService;

impl SettingsService {
    /// Platform config file location, e.g. `~/.config/demandeditor/config.toml`.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Read and validate a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
        if !path.exists() {
            log::info!("No config file at {:?}, using defaults", path);
            return Ok(AppConfig::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the platform config file.
    ///
    /// Defaults are used only when no config directory or file exists. A file
    /// that fails to read, parse or validate is an error.
    pub fn load() -> Result<AppConfig, ConfigError> {
        match Self::default_config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Could not resolve a config directory, using defaults");
                Ok(AppConfig::default())
            }
        }
    }

    /// Write `config` as TOML, creating parent directories.
    pub fn save_to(path: &Path, config: &AppConfig) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(path, contents).with_context(|| format!("Failed to write config {:?}", path))?;
        Ok(())
    }

    /// Database file to open: the configured path, else the platform data
    /// directory. Debug builds keep the database in the working directory.
    pub fn database_path(config: &AppConfig) -> Result<PathBuf> {
        if let Some(path) = &config.database.path {
            return Ok(path.clone());
        }

        if cfg!(debug_assertions) {
            return Ok(PathBuf::from(DATABASE_FILE_NAME));
        }

        match project_dirs() {
            Some(dirs) => {
                let data_dir = dirs.data_dir();
                fs::create_dir_all(data_dir)
                    .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
                Ok(data_dir.join(DATABASE_FILE_NAME))
            }
            None => Ok(PathBuf::from(DATABASE_FILE_NAME)),
        }
    }
}
