//! User configuration and defaults

use crate::engine::{Mode, SourceSpec, DEFAULT_WORKERS};
use crate::error::{FsortError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted defaults, overridden by command line flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Directory the organized folder is created in
    pub destination_base: Option<PathBuf>,
    /// Fixed organized folder name; a timestamped one is used when unset
    pub folder_name: Option<String>,
    pub mode: Mode,
    pub workers: usize,
    pub recurse: bool,
    /// Categories selected when none are given on the command line
    pub categories: Vec<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            destination_base: None,
            folder_name: None,
            mode: Mode::Simple,
            workers: DEFAULT_WORKERS,
            recurse: false,
            categories: Vec::new(),
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/fsort/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fsort").join("config.json"))
    }

    /// Load config from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            FsortError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            FsortError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            FsortError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| {
            FsortError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FsortError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FsortError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            FsortError::ConfigError(format!("Failed to write config file: {}", e))
        })
    }

    /// Configured destination base, falling back to the Desktop
    pub fn destination_base_or_default(&self) -> PathBuf {
        self.destination_base
            .clone()
            .unwrap_or_else(default_destination_base)
    }
}

/// The user's Desktop, or the home directory when there is none
pub fn default_destination_base() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `Organized_<YYYYMMDD_HHMMSS>`
pub fn default_folder_name(now: DateTime<Local>) -> String {
    format!("Organized_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Desktop, Downloads and Documents, when they exist
pub fn default_sources() -> Vec<SourceSpec> {
    [
        ("Desktop", dirs::desktop_dir()),
        ("Downloads", dirs::download_dir()),
        ("Documents", dirs::document_dir()),
    ]
    .into_iter()
    .filter_map(|(label, dir)| dir.filter(|d| d.is_dir()).map(|d| SourceSpec::new(label, d)))
    .collect()
}
