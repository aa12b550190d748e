//! Normalization of raw map and layer configurations.
//!
//! On-disk map files accumulated years of synonymous fields: layers spread
//! over `tilesLayers`/`pointsLayers`/`polygons`/..., URLs under half a dozen
//! template keys, layers referenced either inline or by directory name.
//! [`normalize_map`] folds all of that into one canonical
//! [`MapConfiguration`], collecting per-layer problems instead of aborting
//! on the first bad entry.
//!
//! All transformations here are pure: inputs are never mutated, outputs are
//! freshly built.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{LayerIssue, MapError};
use crate::paths;

use super::configuration::{MapConfiguration, Source};
use super::layer::{LayerConfiguration, LayerKind, LayerSource, shape_source};
use super::locate::find_layer_configuration;

/// Legacy layer-collection fields, processed in this order.
///
/// All collections feed one flat `layers` mapping; on key collision the
/// last-processed field wins.
const LAYER_COLLECTIONS: &[&str] = &[
    "layers",
    "tilesLayers",
    "tileLayers",
    "pointsLayers",
    "pixelsLayers",
    "guideLayers",
    "gridLayers",
    "polygons",
    "regions",
];

/// Alternate names a layer's URL may hide under, in extraction priority
/// order. All of them are consumed; the first string value wins.
const URL_ALIASES: &[&str] = &[
    "url",
    "urlTemplate",
    "tilesUrlTemplate",
    "tileUrlTemplate",
    "pointsUrlTemplate",
    "imageUrl",
];

/// Outcome of a whole-map normalization pass: the canonical configuration
/// plus whatever individual layers could not be adopted.
#[derive(Debug)]
pub struct NormalizedMap {
    pub configuration: MapConfiguration,
    pub issues: Vec<LayerIssue>,
}

/// Normalizes one raw layer object into canonical form.
///
/// `base_path` is the owning map's base path for inline layers, or the
/// referenced directory for layers loaded through
/// [`find_layer_configuration`]. The input map is left untouched.
pub fn normalize_layer(
    key: &str,
    raw: &Map<String, Value>,
    base_path: &str,
) -> Result<LayerConfiguration, MapError> {
    let mut obj = raw.clone();

    let mut url = None;
    for alias in URL_ALIASES {
        match obj.remove(*alias) {
            Some(Value::String(s)) if url.is_none() => url = Some(s),
            _ => {}
        }
    }
    let url = url.map(|u| paths::resolve(base_path, &u));

    let raw_type = match obj.remove("type") {
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(MapError::MalformedLayer {
                key: key.to_string(),
                reason: "type is not a string".to_string(),
            });
        }
        None => {
            return Err(MapError::MalformedLayer {
                key: key.to_string(),
                reason: "missing type field".to_string(),
            });
        }
    };
    let kind = LayerKind::from_raw(&raw_type);

    let name = match obj.remove("name") {
        Some(Value::String(s)) => Some(s),
        _ => None,
    };

    let options = match obj.remove("options") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    // Children already under `layers` survive; legacy shape fields are
    // folded in with their default child type.
    let mut layers = match obj.remove("layers") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    if let Some(shapes) = shape_source(&raw_type) {
        if let Some(Value::Object(children)) = obj.remove(shapes.field) {
            for (child_key, mut child) in children {
                if let Value::Object(child_obj) = &mut child {
                    child_obj
                        .entry("type")
                        .or_insert_with(|| json!(shapes.child_kind));
                }
                layers.insert(child_key, child);
            }
        }
    }

    // The base path is the map's business, never stored per layer.
    obj.remove("basePath");

    Ok(LayerConfiguration {
        name,
        kind,
        url,
        options,
        layers,
        rest: obj,
    })
}

/// Normalizes a whole raw map object (as parsed from JSON) into a canonical
/// [`MapConfiguration`].
///
/// The map's `basePath` field is expected to be already set by the loader;
/// an absent one resolves layer URLs against the empty base. Per-layer
/// failures end up in [`NormalizedMap::issues`], never aborting the walk.
pub fn normalize_map(raw: Map<String, Value>) -> NormalizedMap {
    let mut obj = raw;
    let mut issues = Vec::new();

    let base_path = obj
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let declared_source = obj
        .remove("source")
        .and_then(|value| serde_json::from_value::<Source>(value).ok());
    let source = Source::classify(&base_path)
        .or(declared_source)
        .unwrap_or_default();

    let mut layers = BTreeMap::new();
    let mut index = 0usize;

    for field in LAYER_COLLECTIONS {
        let Some(collection) = obj.remove(*field) else {
            continue;
        };
        let Value::Object(entries) = collection else {
            debug!("Ignoring non-object layer collection '{}'", field);
            continue;
        };
        for (key, value) in entries {
            match LayerSource::classify(&value) {
                Some(LayerSource::FileReference(reference)) => {
                    let dir = Path::new(&base_path).join(&reference);
                    match find_layer_configuration(&dir, &reference) {
                        Ok(located) => {
                            // Only adopt configurations that can actually be
                            // classified; a stray directory of unrelated JSON
                            // is not a layer.
                            if located.get("type").map(Value::is_string).unwrap_or(false) {
                                let layer_base = dir.to_string_lossy();
                                match normalize_layer(&key, &located, &layer_base) {
                                    Ok(layer) => insert_named(&mut layers, key, layer, &mut index),
                                    Err(error) => issues.push(LayerIssue { key, error }),
                                }
                            } else {
                                debug!(
                                    "Skipping layer '{}': reference '{}' has no typed configuration",
                                    key, reference
                                );
                            }
                        }
                        Err(error) => issues.push(LayerIssue { key, error }),
                    }
                }
                Some(LayerSource::Inline(inline)) => {
                    match normalize_layer(&key, &inline, &base_path) {
                        Ok(layer) => insert_named(&mut layers, key, layer, &mut index),
                        Err(error) => issues.push(LayerIssue { key, error }),
                    }
                }
                None => {
                    let error = MapError::MalformedLayer {
                        key: key.clone(),
                        reason: "neither an object nor a file reference".to_string(),
                    };
                    issues.push(LayerIssue { key, error });
                }
            }
        }
    }

    // Superseded by `authors`; old files carry both.
    obj.remove("author");

    let kind = match obj.remove("type") {
        Some(Value::String(s)) => s,
        _ => "undefined".to_string(),
    };
    let name = match obj.remove("name") {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    let authors = take_string(&mut obj, "authors");
    let date = take_string(&mut obj, "date");
    obj.remove("basePath");

    let configuration = MapConfiguration {
        kind,
        name,
        authors,
        date,
        base_path: Some(base_path),
        source,
        layers,
        newly_loaded: false,
        rest: obj,
    };
    NormalizedMap {
        configuration,
        issues,
    }
}

/// Removes `field` when it holds a string; non-string values stay in the
/// passthrough map untouched.
fn take_string(obj: &mut Map<String, Value>, field: &str) -> Option<String> {
    match obj.get(field) {
        Some(Value::String(_)) => match obj.remove(field) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Inserts a normalized layer, assigning `<kind>_<index>` when it has no
/// name. The index is shared across all collections of one pass and only
/// advances when a name is actually assigned.
fn insert_named(
    layers: &mut BTreeMap<String, LayerConfiguration>,
    key: String,
    mut layer: LayerConfiguration,
    index: &mut usize,
) {
    if layer.name.is_none() {
        layer.name = Some(format!("{}_{}", layer.kind.as_str(), *index));
        *index += 1;
    }
    layers.insert(key, layer);
}
