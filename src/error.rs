//! Error types for map-configuration loading and export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by loading, locating and exporting map configurations.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A layer object that cannot be classified (missing or non-string `type`).
    #[error("layer '{key}' cannot be classified: {reason}")]
    MalformedLayer { key: String, reason: String },

    /// A string-referenced layer whose directory has no readable configuration.
    #[error("no configuration found for layer '{hint}' under {dir}")]
    ConfigNotFound { dir: PathBuf, hint: String },
}

/// A per-layer problem collected while normalizing a map.
///
/// One bad layer never aborts the whole map; the failing key and its error
/// are reported next to the partially-normalized configuration.
#[derive(Debug)]
pub struct LayerIssue {
    /// Key of the layer inside its collection field.
    pub key: String,
    pub error: MapError,
}
