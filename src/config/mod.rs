//! Application configuration persisted to disk between sessions.
//!
//! Remembers the last opened map and a bounded list of recently opened
//! maps. A corrupt or unreadable file resets to defaults and records the
//! reason so the host can tell the user what happened.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::constants::MAX_RECENT_MAPS;

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfigData {
    /// Last opened map file path (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_map_path: Option<PathBuf>,

    /// Recently opened maps for quick access
    #[serde(default)]
    pub recent_maps: Vec<PathBuf>,
}

/// Runtime configuration state
#[derive(Debug)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Result of loading config from disk
#[derive(Debug)]
pub struct LoadConfigResult {
    pub config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    pub reset_reason: Option<String>,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate location.
    pub fn load() -> LoadConfigResult {
        Self::load_from(crate::paths::config_file())
    }

    /// Load configuration from `config_path`.
    pub fn load_from(config_path: PathBuf) -> LoadConfigResult {
        let (data, reset_reason) = if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(json) => match serde_json::from_str(&json) {
                    Ok(data) => {
                        info!("Loaded config from {:?}", config_path);
                        (data, None)
                    }
                    Err(e) => {
                        warn!("Failed to parse config file: {}", e);
                        (
                            AppConfigData::default(),
                            Some(format!("Configuration file was corrupted: {}", e)),
                        )
                    }
                },
                Err(e) => {
                    warn!("Failed to read config file: {}", e);
                    (
                        AppConfigData::default(),
                        Some(format!("Could not read configuration file: {}", e)),
                    )
                }
            }
        } else {
            info!("No config file found, using defaults");
            (AppConfigData::default(), None)
        };

        LoadConfigResult {
            config: AppConfig {
                data,
                config_path,
                dirty: false,
            },
            reset_reason,
        }
    }

    /// Save configuration to disk and clear the dirty flag.
    pub fn save(&mut self) {
        match serde_json::to_string_pretty(&self.data) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.config_path, json) {
                    error!("Failed to save config: {}", e);
                } else {
                    info!("Config saved to {:?}", self.config_path);
                    self.dirty = false;
                }
            }
            Err(e) => {
                error!("Failed to serialize config: {}", e);
            }
        }
    }

    /// Save only when something changed since the last save.
    pub fn save_if_dirty(&mut self) {
        if self.dirty {
            self.save();
        }
    }

    /// Remember `path` as the last opened map.
    pub fn set_last_map(&mut self, path: &Path) {
        if self.data.last_map_path.as_deref() != Some(path) {
            self.data.last_map_path = Some(path.to_path_buf());
            self.dirty = true;
        }
    }

    /// Put `path` at the front of the recent-maps list.
    ///
    /// Duplicates move to the front instead of repeating; the list is
    /// truncated to [`MAX_RECENT_MAPS`].
    pub fn add_recent_map(&mut self, path: &Path) {
        self.data.recent_maps.retain(|p| p != path);
        self.data.recent_maps.insert(0, path.to_path_buf());
        self.data.recent_maps.truncate(MAX_RECENT_MAPS);
        self.dirty = true;
    }
}
