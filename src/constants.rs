//! Centralized constants used across the crate.
//!
//! This module contains magic numbers and conventions that are used in
//! multiple places or would benefit from being named constants.

/// Extensions accepted for map-configuration files, in picker order.
pub const MAP_FILE_EXTENSIONS: &[&str] = &["map.json", "mapconfig", "json", "config"];

/// Extensions searched for string-referenced layer configurations,
/// in per-file priority order.
pub const LAYER_FILE_EXTENSIONS: &[&str] = &[".layerconfig", ".json", ".config"];

/// Maximum number of recent maps to remember in config
pub const MAX_RECENT_MAPS: usize = 5;

/// Default tile size (pixels) for new tile, csv and guide layers.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default zoom range for new tile layers.
pub const DEFAULT_MIN_ZOOM: u32 = 0;
pub const DEFAULT_MAX_ZOOM: u32 = 10;
