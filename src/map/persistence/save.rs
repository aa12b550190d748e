//! Map export: portable transformation and file write.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::MapError;
use crate::map::{MapConfiguration, Source};
use crate::paths;

/// The portable form of `configuration`, as it would be written to `target`.
///
/// Tile, points, pixels and image layer URLs under the target directory
/// become relative again; per-layer base paths and preview images are
/// dropped; a local map loses its top-level base path so the next load
/// re-derives it from wherever the file ends up.
pub fn portable_configuration(configuration: &MapConfiguration, target: &Path) -> MapConfiguration {
    let base_path = paths::directory_of(target);
    let mut portable = configuration.clone();
    portable.newly_loaded = false;

    for layer in portable.layers.values_mut() {
        if layer.kind.strips_base_path_on_export() {
            if let Some(url) = &layer.url {
                if let Some(relative) = url.strip_prefix(&base_path) {
                    layer.url = Some(relative.to_string());
                }
            }
        }
        layer.rest.remove("basePath");
        // regenerated from the tile URLs on next load
        layer.rest.remove("previewImageUrl");
    }

    if portable.source == Source::Local {
        portable.base_path = None;
    }
    portable
}

/// Writes the portable form of `configuration` to `target`.
///
/// The caller's configuration is never mutated.
pub fn export_configuration(configuration: &MapConfiguration, target: &Path) -> Result<(), MapError> {
    let portable = portable_configuration(configuration, target);
    let json = serde_json::to_string_pretty(&portable).map_err(|source| MapError::Parse {
        path: target.to_path_buf(),
        source,
    })?;
    fs::write(target, json).map_err(|source| MapError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    info!("Map exported to {:?}", target);
    Ok(())
}
