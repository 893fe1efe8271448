// Settings module
// Application configuration loaded from config.toml

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::time::{SlotGrid, DEFAULT_SLOT_MINUTES};

pub const DEFAULT_SCHEME_NAME: &str = "Default tariff";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Slot width of {0} minutes must evenly divide an hour")]
    InvalidSlotMinutes(u32),
    #[error("Scheme name cannot be empty")]
    EmptySchemeName,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridConfig,
    pub editor: EditorConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub slot_minutes: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub read_only: bool,
    pub scheme_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            scheme_name: DEFAULT_SCHEME_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Overrides the platform data directory when set.
    pub path: Option<PathBuf>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slot_grid()?;
        if self.editor.scheme_name.trim().is_empty() {
            return Err(ConfigError::EmptySchemeName);
        }
        Ok(())
    }

    pub fn slot_grid(&self) -> Result<SlotGrid, ConfigError> {
        SlotGrid::new(self.grid.slot_minutes)
            .ok_or(ConfigError::InvalidSlotMinutes(self.grid.slot_minutes))
    }
}
