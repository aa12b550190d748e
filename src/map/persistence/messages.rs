//! Message types for map persistence operations.

use std::path::PathBuf;

use crate::map::MapConfiguration;

/// Request to load and normalize a map configuration file.
#[derive(Debug)]
pub struct LoadMapRequest {
    pub path: PathBuf,
}

/// Request to export a configuration in portable form.
#[derive(Debug)]
pub struct SaveMapRequest {
    pub path: PathBuf,
    pub configuration: MapConfiguration,
}
