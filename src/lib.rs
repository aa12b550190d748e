//! Map-configuration loading, normalization and export for desktop
//! map-authoring tools.
//!
//! On-disk map files are loosely structured JSON with years of legacy
//! spellings: layers spread over `tilesLayers`/`pointsLayers`/`polygons`
//! collections, URLs hiding under template aliases, layers referenced
//! either inline or by directory name. This crate folds all of that into
//! one canonical [`map::MapConfiguration`] with resolved URLs, and writes
//! it back in a portable form (relative URLs, no baked-in base path).
//!
//! The interactive questions a load can raise (unexpected `type`, ambiguous
//! base path) go through the [`dialog::MapPrompts`] trait, so any host UI —
//! or a headless policy like [`dialog::AcceptDefaults`] — can answer them.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use mapwright::dialog::AcceptDefaults;
//! use mapwright::map::persistence::{export_configuration, load_map};
//!
//! # fn run() -> Result<(), mapwright::error::MapError> {
//! if let Some(loaded) = load_map(Path::new("harbor.map.json"), &AcceptDefaults)? {
//!     for issue in &loaded.issues {
//!         eprintln!("skipped layer: {}", issue.error);
//!     }
//!     export_configuration(&loaded.configuration, Path::new("harbor.out.map.json"))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dialog;
pub mod error;
pub mod logging;
pub mod map;
pub mod paths;

pub use error::{LayerIssue, MapError};
pub use map::{LayerConfiguration, LayerKind, MapConfiguration, Source};
pub use map::persistence::{LoadedMap, export_configuration, load_map, portable_configuration};
