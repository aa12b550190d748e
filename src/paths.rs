//! Path resolution: layer-URL joining against a map's base path, and
//! platform-appropriate user data directories.
//!
//! Layer URLs inside a map file may be absolute (`http:`, `file:`, OS paths)
//! or relative to the map's base path; [`resolve`] decides which and joins
//! accordingly. The base path itself is derived from the location of the
//! loaded file by [`derive_base_path`].
//!
//! In development mode (cargo run), app paths resolve to local directories.
//! In installed mode, paths resolve to platform-specific locations:
//! - Windows: `%APPDATA%\Mapwright\`
//! - macOS: `~/Library/Application Support/Mapwright/`
//! - Linux: `~/.config/mapwright/` (config), `~/.local/share/mapwright/` (data)

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Returns true when `s` needs no base path: a `http:`/`https:`/`file:` URL
/// or an OS-absolute filesystem path.
///
/// Pure predicate, no I/O.
pub fn is_absolute(s: &str) -> bool {
    s.starts_with("http:")
        || s.starts_with("https:")
        || s.starts_with("file:")
        || Path::new(s).is_absolute()
}

/// Resolves a raw URL against a base path.
///
/// Absolute URLs come back unchanged. A URL that already starts with the
/// base path also comes back unchanged, so resolving twice never joins
/// twice. Everything else is joined onto the base path.
pub fn resolve(base_path: &str, raw: &str) -> String {
    if is_absolute(raw) || raw.starts_with(base_path) {
        return raw.to_string();
    }
    Path::new(base_path).join(raw).to_string_lossy().into_owned()
}

/// The directory containing `file`, trailing separator included.
///
/// Base paths keep their trailing separator so that prefix stripping on
/// export leaves a clean relative URL behind.
pub fn directory_of(file: &Path) -> String {
    let s = file.to_string_lossy();
    match s.rfind(MAIN_SEPARATOR) {
        Some(i) => s[..=i].to_string(),
        None => String::new(),
    }
}

/// The two candidate base paths for a freshly loaded map.
///
/// When the file already declares a base path the caller has to pick one of
/// the two (interactively, via [`crate::dialog::MapPrompts`]); otherwise
/// [`BasePathCandidates::resolved`] is the only sensible value.
#[derive(Debug, Clone)]
pub struct BasePathCandidates {
    /// Base path already present in the configuration, if any.
    pub existing: Option<String>,
    /// Directory containing the loaded file (empty when loading from memory).
    pub from_file: String,
}

impl BasePathCandidates {
    /// True when the configuration declared its own base path and the caller
    /// must choose between keeping it and the loaded file's directory.
    pub fn needs_choice(&self) -> bool {
        self.existing.is_some()
    }

    /// The single candidate when no choice is needed.
    pub fn resolved(&self) -> &str {
        self.existing.as_deref().unwrap_or(&self.from_file)
    }
}

/// Computes the base-path candidates for a configuration loaded from
/// `loaded_file`. An empty pre-existing base path counts as absent.
pub fn derive_base_path(existing: Option<&str>, loaded_file: Option<&Path>) -> BasePathCandidates {
    BasePathCandidates {
        existing: existing.filter(|s| !s.is_empty()).map(str::to_string),
        from_file: loaded_file.map(directory_of).unwrap_or_default(),
    }
}

/// Returns true when running in development mode (cargo run).
///
/// Detection methods:
/// - `CARGO` env var is set (cargo run sets this)
/// - Debug assertions enabled (debug builds)
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Platform-appropriate config directory.
///
/// - Dev mode: current directory
/// - Linux: `~/.config/mapwright/`
/// - Windows/macOS: same as data_dir
pub fn config_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir().map(|p| p.join("mapwright"))
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

/// Platform-appropriate data directory.
///
/// - Dev mode: current directory
/// - Windows: `%APPDATA%\Mapwright\`
/// - macOS: `~/Library/Application Support/Mapwright/`
/// - Linux: `~/.local/share/mapwright/`
pub fn data_dir() -> Option<PathBuf> {
    if is_dev_mode() {
        return Some(PathBuf::from("."));
    }

    dirs::data_dir().map(|p| p.join("mapwright"))
}

/// Path to the application config file.
///
/// - Dev mode: `./config.json`
/// - Installed: `{config_dir}/config.json`
pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join("config.json"))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Path to the logs directory.
///
/// - Dev mode: `./logs/`
/// - Installed: `{data_dir}/logs/`
pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Ensure all required directories exist.
///
/// Called early in startup to create config and data directories.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        // In dev mode, directories are local and typically exist
        return Ok(());
    }

    if let Some(config) = config_dir() {
        std::fs::create_dir_all(&config)?;
    }
    if let Some(data) = data_dir() {
        std::fs::create_dir_all(&data)?;
        std::fs::create_dir_all(data.join("logs"))?;
    }
    Ok(())
}
