//! Unit tests for the persistence module.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tempfile::tempdir;

use crate::dialog::{AcceptDefaults, BasePathChoice, MapPrompts, TypeMismatchChoice};
use crate::error::MapError;
use crate::map::{LayerKind, MapConfiguration, Source};

use super::load::load_map;
use super::messages::{LoadMapRequest, SaveMapRequest};
use super::save::{export_configuration, portable_configuration};
use super::tasks::MapTasks;

/// Prompt double with canned answers, recording every question asked.
struct ScriptedPrompts {
    type_choice: TypeMismatchChoice,
    base_choice: BasePathChoice,
    type_questions: Mutex<Vec<String>>,
    base_questions: Mutex<Vec<(String, String)>>,
}

impl ScriptedPrompts {
    fn new(type_choice: TypeMismatchChoice, base_choice: BasePathChoice) -> Self {
        Self {
            type_choice,
            base_choice,
            type_questions: Mutex::new(Vec::new()),
            base_questions: Mutex::new(Vec::new()),
        }
    }

    fn type_questions(&self) -> Vec<String> {
        self.type_questions.lock().unwrap().clone()
    }

    fn base_questions(&self) -> Vec<(String, String)> {
        self.base_questions.lock().unwrap().clone()
    }
}

impl MapPrompts for ScriptedPrompts {
    fn confirm_unexpected_type(&self, found: &str) -> TypeMismatchChoice {
        self.type_questions.lock().unwrap().push(found.to_string());
        self.type_choice
    }

    fn choose_base_path(&self, existing: &str, file_directory: &str) -> BasePathChoice {
        self.base_questions
            .lock()
            .unwrap()
            .push((existing.to_string(), file_directory.to_string()));
        self.base_choice
    }
}

fn write_map(dir: &Path, name: &str, value: Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
    path
}

fn dir_with_separator(dir: &Path) -> String {
    format!("{}{}", dir.to_string_lossy(), std::path::MAIN_SEPARATOR)
}

// load_map

#[test]
fn test_load_derives_base_path_and_resolves_layer_urls() {
    let dir = tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "site.map.json",
        json!({
            "type": "map",
            "basePath": "",
            "layers": {"a": {"type": "tileLayer", "url": "tiles/{z}/{x}/{y}.png"}}
        }),
    );

    let loaded = load_map(&path, &AcceptDefaults).unwrap().unwrap();
    assert!(loaded.issues.is_empty());

    let base = dir_with_separator(dir.path());
    let configuration = &loaded.configuration;
    assert_eq!(configuration.base_path.as_deref(), Some(base.as_str()));
    assert!(configuration.newly_loaded);
    assert_eq!(
        configuration.layers["a"].url.as_deref(),
        Some(format!("{base}tiles/{{z}}/{{x}}/{{y}}.png").as_str())
    );
}

#[test]
fn test_type_containing_map_does_not_prompt() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "mymap", "layers": {}}));

    let prompts =
        ScriptedPrompts::new(TypeMismatchChoice::Cancel, BasePathChoice::KeepExisting);
    let loaded = load_map(&path, &prompts).unwrap().unwrap();
    assert!(prompts.type_questions().is_empty());
    assert_eq!(loaded.configuration.kind, "mymap");
}

#[test]
fn test_unexpected_type_can_cancel_the_load() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "collection"}));

    let prompts =
        ScriptedPrompts::new(TypeMismatchChoice::Cancel, BasePathChoice::KeepExisting);
    let result = load_map(&path, &prompts).unwrap();
    assert!(result.is_none());
    assert_eq!(prompts.type_questions(), vec!["collection".to_string()]);
}

#[test]
fn test_unexpected_type_can_be_forced_to_map() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "collection"}));

    let prompts = ScriptedPrompts::new(
        TypeMismatchChoice::ForceMapType,
        BasePathChoice::KeepExisting,
    );
    let loaded = load_map(&path, &prompts).unwrap().unwrap();
    assert_eq!(loaded.configuration.kind, "map");
}

#[test]
fn test_unexpected_type_can_be_added_as_is() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "collection"}));

    let prompts =
        ScriptedPrompts::new(TypeMismatchChoice::AddAnyway, BasePathChoice::KeepExisting);
    let loaded = load_map(&path, &prompts).unwrap().unwrap();
    assert_eq!(loaded.configuration.kind, "collection");
}

#[test]
fn test_missing_type_defaults_to_undefined_and_prompts() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"name": "untyped"}));

    let prompts =
        ScriptedPrompts::new(TypeMismatchChoice::AddAnyway, BasePathChoice::KeepExisting);
    let loaded = load_map(&path, &prompts).unwrap().unwrap();
    assert_eq!(prompts.type_questions(), vec!["undefined".to_string()]);
    assert_eq!(loaded.configuration.kind, "undefined");
}

#[test]
fn test_declared_base_path_can_be_kept() {
    let dir = tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "m.json",
        json!({
            "type": "map",
            "basePath": "/elsewhere/",
            "layers": {"a": {"type": "tileLayer", "url": "tiles/0.png"}}
        }),
    );

    let prompts =
        ScriptedPrompts::new(TypeMismatchChoice::AddAnyway, BasePathChoice::KeepExisting);
    let loaded = load_map(&path, &prompts).unwrap().unwrap();

    let questions = prompts.base_questions();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].0, "/elsewhere/");
    assert_eq!(questions[0].1, dir_with_separator(dir.path()));

    let configuration = &loaded.configuration;
    assert_eq!(configuration.base_path.as_deref(), Some("/elsewhere/"));
    assert_eq!(
        configuration.layers["a"].url.as_deref(),
        Some("/elsewhere/tiles/0.png")
    );
}

#[test]
fn test_declared_base_path_can_be_replaced_by_file_directory() {
    let dir = tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "m.json",
        json!({"type": "map", "basePath": "/elsewhere/", "layers": {}}),
    );

    let prompts = ScriptedPrompts::new(
        TypeMismatchChoice::AddAnyway,
        BasePathChoice::UseFileDirectory,
    );
    let loaded = load_map(&path, &prompts).unwrap().unwrap();
    assert_eq!(
        loaded.configuration.base_path.as_deref(),
        Some(dir_with_separator(dir.path()).as_str())
    );
}

#[test]
fn test_load_merges_defaults_for_missing_metadata() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "map"}));

    let loaded = load_map(&path, &AcceptDefaults).unwrap().unwrap();
    let configuration = &loaded.configuration;
    assert_eq!(configuration.name, "new map");
    assert!(configuration.authors.is_some());
    assert!(configuration.date.is_some());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_map(&dir.path().join("gone.map.json"), &AcceptDefaults).unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
}

#[test]
fn test_invalid_json_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.map.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_map(&path, &AcceptDefaults).unwrap_err();
    assert!(matches!(err, MapError::Parse { .. }));
}

#[test]
fn test_bad_layers_are_reported_next_to_the_map() {
    let dir = tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "m.json",
        json!({
            "type": "map",
            "layers": {
                "ok": {"type": "guideLayer"},
                "bad": {"url": "no-type.png"}
            }
        }),
    );

    let loaded = load_map(&path, &AcceptDefaults).unwrap().unwrap();
    assert_eq!(loaded.configuration.layers.len(), 1);
    assert_eq!(loaded.issues.len(), 1);
    assert_eq!(loaded.issues[0].key, "bad");
}

// portable_configuration / export_configuration

fn local_map_with_tile_layer(base: &str, url: &str) -> MapConfiguration {
    let mut configuration = MapConfiguration::named("export test");
    configuration.base_path = Some(base.to_string());
    configuration.source = Source::Local;

    let mut layer = crate::map::LayerConfiguration::new(LayerKind::Tile);
    layer.name = Some("base".to_string());
    layer.url = Some(url.to_string());
    configuration.layers.insert("a".to_string(), layer);
    configuration
}

#[test]
fn test_portable_form_strips_base_path_from_urls() {
    let configuration = local_map_with_tile_layer("/maps/", "/maps/tiles/x.png");
    let portable = portable_configuration(&configuration, Path::new("/maps/out.map.json"));

    assert_eq!(portable.layers["a"].url.as_deref(), Some("tiles/x.png"));
    assert!(portable.base_path.is_none());

    let json = serde_json::to_value(&portable).unwrap();
    assert!(!json.as_object().unwrap().contains_key("basePath"));
}

#[test]
fn test_portable_form_leaves_foreign_urls_alone() {
    let configuration =
        local_map_with_tile_layer("/maps/", "http://tiles.example.org/{z}/{x}/{y}.png");
    let portable = portable_configuration(&configuration, Path::new("/maps/out.map.json"));
    assert_eq!(
        portable.layers["a"].url.as_deref(),
        Some("http://tiles.example.org/{z}/{x}/{y}.png")
    );
}

#[test]
fn test_portable_form_only_strips_raster_and_points_urls() {
    let mut configuration = local_map_with_tile_layer("/maps/", "/maps/tiles/x.png");
    let mut guide = crate::map::LayerConfiguration::new(LayerKind::Guide);
    guide.url = Some("/maps/guide/grid.png".to_string());
    configuration.layers.insert("g".to_string(), guide);

    let portable = portable_configuration(&configuration, Path::new("/maps/out.map.json"));
    assert_eq!(portable.layers["a"].url.as_deref(), Some("tiles/x.png"));
    assert_eq!(
        portable.layers["g"].url.as_deref(),
        Some("/maps/guide/grid.png")
    );
}

#[test]
fn test_remote_maps_keep_their_base_path() {
    let mut configuration =
        local_map_with_tile_layer("http://maps.example.org/", "http://maps.example.org/t/x.png");
    configuration.source = Source::Remote;

    let portable = portable_configuration(&configuration, Path::new("/maps/out.map.json"));
    assert_eq!(
        portable.base_path.as_deref(),
        Some("http://maps.example.org/")
    );
}

#[test]
fn test_export_does_not_mutate_the_caller() {
    let dir = tempdir().unwrap();
    let base = dir_with_separator(dir.path());
    let configuration =
        local_map_with_tile_layer(&base, &format!("{base}tiles/x.png"));
    let before = serde_json::to_value(&configuration).unwrap();

    export_configuration(&configuration, &dir.path().join("out.map.json")).unwrap();
    assert_eq!(serde_json::to_value(&configuration).unwrap(), before);
}

#[test]
fn test_export_write_failure_is_io_error() {
    let dir = tempdir().unwrap();
    let configuration = MapConfiguration::named("nowhere");
    let target = dir.path().join("missing").join("out.map.json");
    let err = export_configuration(&configuration, &target).unwrap_err();
    assert!(matches!(err, MapError::Io { .. }));
}

#[test]
fn test_local_export_round_trip_is_stable() {
    let dir = tempdir().unwrap();
    let original = write_map(
        dir.path(),
        "site.map.json",
        json!({
            "type": "map",
            "name": "harbor",
            "basePath": "",
            "layers": {
                "a": {"type": "tileLayer", "url": "tiles/{z}/{x}/{y}.png"},
                "b": {"type": "pointsLayer", "pointsUrlTemplate": "points/{x}_{y}.json"}
            }
        }),
    );

    let first = load_map(&original, &AcceptDefaults).unwrap().unwrap();
    let exported = dir.path().join("out.map.json");
    export_configuration(&first.configuration, &exported).unwrap();

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    assert!(!written.as_object().unwrap().contains_key("basePath"));

    let second = load_map(&exported, &AcceptDefaults).unwrap().unwrap();
    for key in ["a", "b"] {
        assert_eq!(
            first.configuration.layers[key].url, second.configuration.layers[key].url,
            "layer {key} url drifted across export/reload"
        );
    }
}

// MapTasks

fn poll_until<T>(mut poll: impl FnMut() -> Option<T>) -> T {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(result) = poll() {
            return result;
        }
        assert!(Instant::now() < deadline, "worker did not complete in time");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_async_load_completes_through_poll() {
    let dir = tempdir().unwrap();
    let path = write_map(
        dir.path(),
        "site.map.json",
        json!({"type": "map", "layers": {"a": {"type": "guideLayer"}}}),
    );

    let mut tasks = MapTasks::new(Arc::new(AcceptDefaults));
    tasks.request_load(LoadMapRequest { path: path.clone() });
    assert!(tasks.operation.is_busy());

    let result = poll_until(|| tasks.poll_load());
    assert!(!tasks.operation.is_busy());
    assert!(result.error.is_none());
    assert!(!result.cancelled);
    assert_eq!(result.loaded.unwrap().configuration.layers.len(), 1);
    assert_eq!(tasks.current_file.path.as_deref(), Some(path.as_path()));
}

#[test]
fn test_async_save_completes_through_poll() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.map.json");

    let mut tasks = MapTasks::new(Arc::new(AcceptDefaults));
    tasks.request_save(SaveMapRequest {
        path: path.clone(),
        configuration: MapConfiguration::named("saved"),
    });

    let result = poll_until(|| tasks.poll_save());
    assert!(result.success());
    assert!(path.exists());
    assert!(!tasks.operation.is_busy());
}

#[test]
fn test_overlapping_operations_are_refused() {
    let dir = tempdir().unwrap();
    let path = write_map(dir.path(), "m.json", json!({"type": "map"}));

    let mut tasks = MapTasks::new(Arc::new(AcceptDefaults));
    tasks.request_load(LoadMapRequest { path });
    tasks.request_save(SaveMapRequest {
        path: dir.path().join("out.map.json"),
        configuration: MapConfiguration::named("refused"),
    });
    assert!(tasks.operation.is_loading);
    assert!(!tasks.operation.is_saving);

    let _ = poll_until(|| tasks.poll_load());
}
