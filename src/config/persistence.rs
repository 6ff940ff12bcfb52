//! Configuration file persistence for Inkpad
//!
//! Loads and saves `Settings` as pretty JSON in the platform config
//! directory, and resolves the data directory used by the key-value store.
//! Writes go through `write_atomic` so a crash mid-write never leaves a
//! truncated file behind.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config and data directories
const APP_NAME: &str = "inkpad";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix of the scratch file written before the atomic rename
const TEMP_SUFFIX: &str = "tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\inkpad\`
/// - **macOS**: `~/Library/Application Support/inkpad/`
/// - **Linux**: `~/.config/inkpad/`
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the platform-specific data directory holding the editor's store.
///
/// Falls back to the config directory on platforms without a data dir.
pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|base| base.join(APP_NAME))
        .map_or_else(get_config_dir, Ok)
}

/// Ensure a directory exists, creating it if necessary.
fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Write `contents` to `path` by writing a sibling temp file and renaming it
/// over the target. Creates the parent directory if needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let temp_path = path.with_extension(TEMP_SUFFIX);
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// A missing, empty, or corrupted file yields `Settings::default()`; the
/// failure is logged at warning level.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load and sanitize settings from `config.json` inside `dir`.
pub fn load_config_from(dir: &Path) -> Result<Settings> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Save settings as pretty JSON to `config.json` inside `dir`.
pub fn save_config_to(dir: &Path, settings: &Settings) -> Result<()> {
    ensure_dir(dir)?;
    let config_path = dir.join(CONFIG_FILE_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    write_atomic(&config_path, json.as_bytes()).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    debug!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Save configuration, logging instead of returning errors.
///
/// Returns `true` if the save was successful.
pub fn save_config_silent(settings: &Settings) -> bool {
    match save_config(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save configuration: {}", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_config_dir_contains_app_name() {
        if let Ok(path) = get_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_config_from(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "   \n").unwrap();
        let settings = load_config_from(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_corrupted_config_returns_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ invalid json }").unwrap();
        let result = load_config_from(dir.path());
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_load_sanitizes_values() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"autosave_delay_ms": 1, "undo_capacity": 5000}"#,
        )
        .unwrap();
        let settings = load_config_from(dir.path()).unwrap();
        assert_eq!(settings.autosave_delay_ms, Settings::MIN_AUTOSAVE_DELAY_MS);
        assert_eq!(settings.undo_capacity, Settings::MAX_UNDO_CAPACITY);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        let original = Settings {
            autosave_delay_ms: 750,
            gist_public: true,
            ..Settings::default()
        };

        save_config_to(&nested, &original).unwrap();
        let loaded = load_config_from(&nested).unwrap();

        assert_eq!(loaded, original);
        assert!(!nested.join("config.tmp").exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
