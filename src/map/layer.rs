use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Canonical layer kind, stored in the `type` field of a layer configuration.
///
/// Legacy configuration files use a number of historical spellings
/// (`tilesLayer`, `drawnPolygons`, ...); [`LayerKind::from_raw`] collapses
/// them. Raw types that match nothing are preserved verbatim in `Other` so
/// a map never loses a layer it merely doesn't understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Tile,
    Points,
    CsvTiles,
    Pixels,
    Guide,
    Grid,
    Image,
    /// A group of drawn child shapes (polygons or markers) rather than a
    /// tiled raster/data source.
    FeatureGroup,
    /// Unrecognized raw type, kept as-is.
    Other(String),
}

/// Field holding feature-group children in legacy files, and the default
/// `type` its entries get when moved into the canonical `layers` map.
pub(crate) struct ShapeSource {
    pub field: &'static str,
    pub child_kind: &'static str,
}

/// Which legacy field carries the child shapes for a raw feature-group
/// type, if any.
pub(crate) fn shape_source(raw_type: &str) -> Option<ShapeSource> {
    if raw_type.contains("drawnMarkers") {
        return Some(ShapeSource {
            field: "markers",
            child_kind: "marker",
        });
    }
    if raw_type.contains("drawnPolygons") || raw_type.contains("polygons") {
        return Some(ShapeSource {
            field: "polygons",
            child_kind: "polygon",
        });
    }
    None
}

impl LayerKind {
    /// Canonicalizes a raw `type` string.
    ///
    /// Exact canonical spellings pass straight through; legacy spellings are
    /// matched by substring, the way historical files used them.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "tileLayer" | "tilesLayer" => return Self::Tile,
            "pointsLayer" => return Self::Points,
            "csvTiles" => return Self::CsvTiles,
            "pixelsLayer" => return Self::Pixels,
            "guideLayer" => return Self::Guide,
            "gridLayer" => return Self::Grid,
            "imageLayer" => return Self::Image,
            "featureGroup" => return Self::FeatureGroup,
            _ => {}
        }
        if shape_source(raw).is_some() {
            Self::FeatureGroup
        } else if raw.contains("pointsLayer") {
            Self::Points
        } else if raw.contains("csvTiles") {
            Self::CsvTiles
        } else if raw.contains("pixelsLayer") {
            Self::Pixels
        } else if raw.contains("guideLayer") {
            Self::Guide
        } else if raw.contains("gridLayer") {
            Self::Grid
        } else if raw.contains("imageLayer") {
            Self::Image
        } else {
            Self::Other(raw.to_string())
        }
    }

    /// The canonical `type` string written to disk.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tile => "tileLayer",
            Self::Points => "pointsLayer",
            Self::CsvTiles => "csvTiles",
            Self::Pixels => "pixelsLayer",
            Self::Guide => "guideLayer",
            Self::Grid => "gridLayer",
            Self::Image => "imageLayer",
            Self::FeatureGroup => "featureGroup",
            Self::Other(raw) => raw,
        }
    }

    /// Returns true if this kind's `url` is made relative again on export
    /// by stripping the map's base path.
    pub fn strips_base_path_on_export(&self) -> bool {
        matches!(self, Self::Tile | Self::Points | Self::Pixels | Self::Image)
    }
}

impl Serialize for LayerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// How one entry of a layer collection was described in the on-disk map.
///
/// Legacy files mix inline layer objects with bare strings naming a
/// subdirectory that holds the layer's configuration file.
#[derive(Debug, Clone)]
pub enum LayerSource {
    Inline(Map<String, Value>),
    FileReference(String),
}

impl LayerSource {
    /// Classifies one raw collection entry. Anything that is neither an
    /// object nor a string cannot describe a layer.
    pub fn classify(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::FileReference(name.clone())),
            Value::Object(map) => Some(Self::Inline(map.clone())),
            _ => None,
        }
    }
}

/// One canonical entry of a map's `layers` mapping.
///
/// Produced by normalization; every URL is resolved, every legacy alias
/// field is gone, and feature-group children live under `layers`. Fields
/// the normalizer does not interpret ride along in `rest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: LayerKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Layer-kind-specific options: zoom bounds, tile size, CSV column
    /// mapping and the like. Free-form.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    /// Child shapes; only populated for `featureGroup` layers.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub layers: Map<String, Value>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl LayerConfiguration {
    /// An empty layer of the given kind.
    pub fn new(kind: LayerKind) -> Self {
        Self {
            name: None,
            kind,
            url: None,
            options: Map::new(),
            layers: Map::new(),
            rest: Map::new(),
        }
    }
}
