//! Map load pipeline: read, parse, interactive checks, normalization.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value, json};
use tracing::info;

use crate::dialog::{BasePathChoice, MapPrompts, TypeMismatchChoice};
use crate::error::{LayerIssue, MapError};
use crate::map::{MapConfiguration, normalize_map};
use crate::paths;

/// A successfully loaded and normalized map.
#[derive(Debug)]
pub struct LoadedMap {
    pub configuration: MapConfiguration,
    /// Per-layer problems encountered during normalization.
    pub issues: Vec<LayerIssue>,
}

/// Loads, checks and normalizes one map configuration file.
///
/// The declared `type` is expected to contain `"map"`; anything else is a
/// question for `prompts`, which can cancel the load (`Ok(None)`), coerce
/// the type, or let the file through as-is. When the file declares its own
/// base path, `prompts` also decides whether to keep it or use the file's
/// directory.
///
/// The result is merged over [`MapConfiguration::base`], so missing
/// metadata gets freshly generated defaults.
pub fn load_map(path: &Path, prompts: &dyn MapPrompts) -> Result<Option<LoadedMap>, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut obj: Map<String, Value> =
        serde_json::from_str(&text).map_err(|source| MapError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let kind = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("undefined")
        .to_string();
    obj.insert("type".to_string(), json!(kind));

    if !kind.contains("map") {
        match prompts.confirm_unexpected_type(&kind) {
            TypeMismatchChoice::Cancel => {
                info!("Load of {:?} cancelled at type confirmation", path);
                return Ok(None);
            }
            TypeMismatchChoice::ForceMapType => {
                obj.insert("type".to_string(), json!("map"));
            }
            TypeMismatchChoice::AddAnyway => {}
        }
    }

    let declared = obj
        .get("basePath")
        .and_then(Value::as_str)
        .map(str::to_string);
    let candidates = paths::derive_base_path(declared.as_deref(), Some(path));
    let base_path = if candidates.needs_choice() {
        let existing = candidates.existing.clone().unwrap_or_default();
        match prompts.choose_base_path(&existing, &candidates.from_file) {
            BasePathChoice::KeepExisting => existing,
            BasePathChoice::UseFileDirectory => candidates.from_file.clone(),
        }
    } else {
        candidates.resolved().to_string()
    };
    obj.insert("basePath".to_string(), json!(base_path));

    let normalized = normalize_map(obj);
    let mut configuration = normalized.configuration.merged_over_base();
    configuration.newly_loaded = true;

    info!("Map loaded from {:?}", path);
    Ok(Some(LoadedMap {
        configuration,
        issues: normalized.issues,
    }))
}
