//! Result types for async map operations.

use std::path::PathBuf;

use crate::error::MapError;

use super::load::LoadedMap;

/// Result of an async load operation
#[derive(Debug)]
pub struct LoadResult {
    pub path: PathBuf,
    /// The normalized map; `None` when the load failed or was cancelled.
    pub loaded: Option<LoadedMap>,
    /// True when the user cancelled at a prompt.
    pub cancelled: bool,
    pub error: Option<MapError>,
}

/// Result of an async save operation
#[derive(Debug)]
pub struct SaveResult {
    pub path: PathBuf,
    pub error: Option<MapError>,
}

impl SaveResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}
