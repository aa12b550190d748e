use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::LayerConfiguration;

/// Where a map's data lives, derived from its base path on load.
///
/// Local maps get their base path stripped on export and re-derived from
/// the file location on the next load; remote maps keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Local,
    Remote,
}

impl Source {
    /// Classifies a base path by prefix, or `None` when the prefix says
    /// nothing either way.
    pub fn classify(base_path: &str) -> Option<Self> {
        if base_path.starts_with("http") {
            return Some(Self::Remote);
        }
        if base_path.starts_with("/home")
            || base_path.starts_with("file://")
            || has_drive_prefix(base_path)
        {
            return Some(Self::Local);
        }
        None
    }
}

/// `C:`-style Windows drive prefix.
fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// A map configuration in canonical, fully normalized form.
///
/// Every layer lives in `layers` under its original key; legacy collection
/// fields never survive normalization. Top-level fields the normalizer does
/// not interpret ride along in `rest` and are written back on export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfiguration {
    /// Loose on-disk type tag, expected to contain `"map"`.
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Directory or URL prefix relative layer URLs were resolved against.
    /// Absent after a local export; re-derived on the next load.
    #[serde(rename = "basePath", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub layers: BTreeMap<String, LayerConfiguration>,

    /// Set on configurations that just came from disk; never serialized.
    #[serde(skip)]
    pub newly_loaded: bool,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

fn default_kind() -> String {
    "map".to_string()
}

impl MapConfiguration {
    /// A fresh, empty configuration: current OS user as author, today's
    /// date, no layers.
    pub fn base() -> Self {
        Self {
            kind: "map".to_string(),
            name: "new map".to_string(),
            authors: Some(current_username()),
            date: Some(today()),
            base_path: Some(String::new()),
            source: Source::Local,
            layers: BTreeMap::new(),
            newly_loaded: false,
            rest: Map::new(),
        }
    }

    /// A fresh configuration with a user-chosen name (the "create new map"
    /// flow).
    pub fn named(name: impl Into<String>) -> Self {
        let mut configuration = Self::base();
        configuration.name = name.into();
        configuration
    }

    /// Fills every field the loaded file left empty from [`Self::base`],
    /// loaded values taking precedence.
    pub fn merged_over_base(mut self) -> Self {
        let base = Self::base();
        if self.name.is_empty() {
            self.name = base.name;
        }
        if self.authors.is_none() {
            self.authors = base.authors;
        }
        if self.date.is_none() {
            self.date = base.date;
        }
        if self.base_path.is_none() {
            self.base_path = base.base_path;
        }
        self
    }
}

fn current_username() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn today() -> String {
    chrono::Local::now().format("%a %b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification_remote() {
        assert_eq!(Source::classify("http://tiles.example.org/"), Some(Source::Remote));
        assert_eq!(Source::classify("https://tiles.example.org/"), Some(Source::Remote));
    }

    #[test]
    fn test_source_classification_local() {
        assert_eq!(Source::classify("/home/user/maps/"), Some(Source::Local));
        assert_eq!(Source::classify("file:///data/maps/"), Some(Source::Local));
        assert_eq!(Source::classify("C:\\maps\\"), Some(Source::Local));
        assert_eq!(Source::classify("d:\\maps\\"), Some(Source::Local));
    }

    #[test]
    fn test_source_classification_unknown_prefix() {
        assert_eq!(Source::classify("/srv/maps/"), None);
        assert_eq!(Source::classify(""), None);
    }

    #[test]
    fn test_base_configuration_defaults() {
        let configuration = MapConfiguration::base();
        assert_eq!(configuration.kind, "map");
        assert_eq!(configuration.name, "new map");
        assert!(configuration.authors.is_some());
        assert!(configuration.date.is_some());
        assert_eq!(configuration.base_path.as_deref(), Some(""));
        assert_eq!(configuration.source, Source::Local);
        assert!(configuration.layers.is_empty());
        assert!(!configuration.newly_loaded);
    }

    #[test]
    fn test_named_configuration() {
        let configuration = MapConfiguration::named("dungeon level 2");
        assert_eq!(configuration.name, "dungeon level 2");
        assert_eq!(configuration.kind, "map");
    }

    #[test]
    fn test_merge_fills_missing_fields_only() {
        let mut loaded = MapConfiguration::base();
        loaded.name = "atlas".to_string();
        loaded.authors = None;
        loaded.date = Some("Mon Jan 01 2001".to_string());

        let merged = loaded.merged_over_base();
        assert_eq!(merged.name, "atlas");
        assert!(merged.authors.is_some());
        assert_eq!(merged.date.as_deref(), Some("Mon Jan 01 2001"));
    }

    #[test]
    fn test_newly_loaded_is_not_serialized() {
        let mut configuration = MapConfiguration::base();
        configuration.newly_loaded = true;
        let json = serde_json::to_value(&configuration).unwrap();
        assert!(json.as_object().unwrap().get("newly_loaded").is_none());
        assert!(json.as_object().unwrap().get("new").is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let configuration = MapConfiguration::named("roundtrip");
        let json = serde_json::to_string(&configuration).unwrap();
        let deserialized: MapConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.name, "roundtrip");
        assert_eq!(deserialized.source, Source::Local);
    }
}
