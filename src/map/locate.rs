//! Locates the configuration file for a string-referenced layer.
//!
//! A layer referenced by name instead of an inline object points at a
//! subdirectory; the best-matching `.layerconfig`/`.json`/`.config` file in
//! that directory describes the layer.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::LAYER_FILE_EXTENSIONS;
use crate::error::MapError;

/// Finds and parses the configuration file for a layer referenced as
/// `hint` inside `dir`.
///
/// Files are scanned in directory-listing order. The first file with a
/// recognized extension whose name contains the hint wins immediately;
/// failing a name match, the first file with a recognized extension is
/// used. No candidates at all yields an empty object, which callers treat
/// as "nothing to adopt".
pub fn find_layer_configuration(dir: &Path, hint: &str) -> Result<Map<String, Value>, MapError> {
    let entries = fs::read_dir(dir).map_err(|_| MapError::ConfigNotFound {
        dir: dir.to_path_buf(),
        hint: hint.to_string(),
    })?;

    let mut fallback = None;
    for entry in entries.flatten() {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        for extension in LAYER_FILE_EXTENSIONS {
            if file_name.ends_with(extension) {
                if file_name.contains(hint) {
                    return read_json_object(&entry.path());
                }
                if fallback.is_none() {
                    fallback = Some(entry.path());
                }
                break;
            }
        }
    }

    match fallback {
        Some(path) => read_json_object(&path),
        None => {
            debug!("No layer configuration candidates for '{}' in {:?}", hint, dir);
            Ok(Map::new())
        }
    }
}

/// Reads a JSON file into an object map. Valid JSON that is not an object
/// comes back empty so the caller skips it instead of failing.
fn read_json_object(path: &Path) -> Result<Map<String, Value>, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| MapError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => {
            debug!("Layer configuration {:?} is not a JSON object", path);
            Ok(Map::new())
        }
    }
}
