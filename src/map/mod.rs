mod configuration;
mod drafts;
mod layer;
mod locate;
mod normalize;
pub mod persistence;

pub use configuration::{MapConfiguration, Source};
pub use drafts::{CsvTilesDraft, GuideLayerDraft, TILE_PRESETS, TileLayerDraft, TilePreset};
pub use layer::{LayerConfiguration, LayerKind, LayerSource};
pub use locate::find_layer_configuration;
pub use normalize::{NormalizedMap, normalize_layer, normalize_map};
