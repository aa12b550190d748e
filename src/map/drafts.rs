//! Draft builders for freshly created layers.
//!
//! Hosts collect these fields in their "add layer" dialogs and call
//! [`TileLayerDraft::build`] (and friends) to get a canonical
//! [`LayerConfiguration`] carrying the conventional defaults for each kind.

use serde_json::{Map, Value, json};

use crate::constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_TILE_SIZE};

use super::layer::{LayerConfiguration, LayerKind};

/// A well-known public tile service offered as a starting point when
/// creating a tile layer.
#[derive(Debug, Clone, Copy)]
pub struct TilePreset {
    pub name: &'static str,
    pub url: &'static str,
    pub tile_size: u32,
    pub attribution: Option<&'static str>,
    /// False for overlays meant to be drawn on top of another base layer.
    pub base_layer: bool,
}

/// Built-in tile services selectable from the new-tile-layer flow.
pub const TILE_PRESETS: &[TilePreset] = &[
    TilePreset {
        name: "Wikimedia Maps",
        url: "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png",
        tile_size: 256,
        attribution: Some(
            "Wikimedia maps | &copy<a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
        ),
        base_layer: true,
    },
    TilePreset {
        name: "OpenStreetMap Standard",
        url: "http://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
        tile_size: 256,
        attribution: Some(
            "&copy<a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
        ),
        base_layer: true,
    },
    TilePreset {
        name: "OpenSkyMap",
        url: "http://tiles.skimap.org/openskimap/{z}/{x}/{y}.png",
        tile_size: 256,
        attribution: None,
        base_layer: false,
    },
];

/// Fields of a new tile layer.
#[derive(Debug, Clone)]
pub struct TileLayerDraft {
    pub name: String,
    pub url: String,
    pub base_layer: bool,
    pub tile_size: u32,
    pub min_zoom: u32,
    pub max_zoom: u32,
    /// Level range, only meaningful for multi-level URLs (`{level}`).
    pub min_level: u32,
    pub max_level: u32,
    pub attribution: Option<String>,
}

impl Default for TileLayerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            base_layer: true,
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            min_level: 0,
            max_level: 0,
            attribution: None,
        }
    }
}

impl TileLayerDraft {
    /// A draft prefilled from one of [`TILE_PRESETS`].
    pub fn from_preset(preset: &TilePreset) -> Self {
        Self {
            name: preset.name.to_string(),
            url: preset.url.to_string(),
            base_layer: preset.base_layer,
            tile_size: preset.tile_size,
            attribution: preset.attribution.map(str::to_string),
            ..Self::default()
        }
    }

    /// The canonical layer this draft describes.
    ///
    /// An empty name is left unset so the map normalizer assigns a
    /// synthetic one. A URL carrying `{level}` marks the layer multi-level.
    pub fn build(self) -> LayerConfiguration {
        let multi_level = self.url.contains("{level}");

        let mut options = Map::new();
        options.insert("tileSize".to_string(), json!(self.tile_size));
        options.insert("minNativeZoom".to_string(), json!(self.min_zoom));
        options.insert("maxNativeZoom".to_string(), json!(self.max_zoom));
        options.insert("minZoom".to_string(), json!(self.min_zoom));
        options.insert("maxZoom".to_string(), json!(self.max_zoom));
        options.insert("minLevel".to_string(), json!(self.min_level));
        options.insert("maxLevel".to_string(), json!(self.max_level));
        if let Some(attribution) = &self.attribution {
            options.insert("attribution".to_string(), json!(attribution));
        }

        let mut rest = Map::new();
        rest.insert("baseLayer".to_string(), json!(self.base_layer));
        rest.insert("multiLevel".to_string(), json!(multi_level));

        LayerConfiguration {
            name: non_empty(self.name),
            kind: LayerKind::Tile,
            url: non_empty(self.url),
            options,
            layers: Map::new(),
            rest,
        }
    }
}

/// Fields of a new csvTiles layer: tiled CSV point data with a column
/// mapping into the map's coordinate space.
#[derive(Debug, Clone)]
pub struct CsvTilesDraft {
    pub name: String,
    pub url: String,
    pub tile_size: u32,
    pub size: u32,
    /// `[[south, west], [north, east]]`.
    pub bounds: [[f64; 2]; 2],
    pub min_zoom: u32,
    pub max_zoom: u32,
    pub local_rs: bool,
    pub grid: bool,
    pub column_x: u32,
    pub column_y: u32,
    pub column_z: Option<u32>,
}

impl Default for CsvTilesDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            tile_size: DEFAULT_TILE_SIZE,
            size: DEFAULT_TILE_SIZE,
            bounds: [[-256.0, 0.0], [0.0, 256.0]],
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            local_rs: true,
            grid: true,
            column_x: 0,
            column_y: 1,
            column_z: None,
        }
    }
}

impl CsvTilesDraft {
    pub fn build(self) -> LayerConfiguration {
        let mut columns = Map::new();
        columns.insert("x".to_string(), json!(self.column_x));
        columns.insert("y".to_string(), json!(self.column_y));
        if let Some(z) = self.column_z {
            columns.insert("z".to_string(), json!(z));
        }

        let mut options = Map::new();
        options.insert("tileSize".to_string(), json!(self.tile_size));
        options.insert("size".to_string(), json!(self.size));
        options.insert("bounds".to_string(), json!(self.bounds));
        options.insert("minZoom".to_string(), json!(self.min_zoom));
        options.insert("maxZoom".to_string(), json!(self.max_zoom));
        options.insert("localRS".to_string(), json!(self.local_rs));
        options.insert("grid".to_string(), json!(self.grid));
        options.insert("columns".to_string(), Value::Object(columns));

        LayerConfiguration {
            name: non_empty(self.name),
            kind: LayerKind::CsvTiles,
            url: non_empty(self.url),
            options,
            layers: Map::new(),
            rest: Map::new(),
        }
    }
}

/// Fields of a new guide layer. Guide layers keep their size fields at the
/// top level of the layer object, as historical files do.
#[derive(Debug, Clone)]
pub struct GuideLayerDraft {
    pub name: String,
    pub size: u32,
    pub tile_size: u32,
}

impl Default for GuideLayerDraft {
    fn default() -> Self {
        Self {
            name: "guide".to_string(),
            size: DEFAULT_TILE_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl GuideLayerDraft {
    pub fn build(self) -> LayerConfiguration {
        let mut rest = Map::new();
        rest.insert("size".to_string(), json!(self.size));
        rest.insert("tileSize".to_string(), json!(self.tile_size));

        LayerConfiguration {
            name: non_empty(self.name),
            kind: LayerKind::Guide,
            url: None,
            options: Map::new(),
            layers: Map::new(),
            rest,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
