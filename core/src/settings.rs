//! Settings persistence
//!
//! Settings live in a small JSON file. A missing or unreadable file is
//! replaced with defaults, which are written back immediately; a failed
//! save is logged and otherwise ignored so the host never sees an error.

use std::fs;
use std::path::{Path, PathBuf};

use hudsprite_types::Settings;

use crate::error::SettingsError;

pub const SETTINGS_FILE_NAME: &str = "HudSpriteSettings.json";

/// `<user data>/Storage/HudSpriteSettings.json`
pub fn settings_path(user_data_dir: &Path) -> PathBuf {
    user_data_dir.join("Storage").join(SETTINGS_FILE_NAME)
}

/// Settings path for hosts that do not provide a user data directory
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("HudSprite").join(SETTINGS_FILE_NAME))
}

/// Read settings from `path`
pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| SettingsError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write settings to `path`, creating parent directories
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, content).map_err(io_err)
}

/// Load settings, recreating the file with defaults when it is missing or
/// corrupt.
pub fn load_or_create(path: &Path) -> Settings {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Settings not found, initializing defaults");
        return create_default(path);
    }

    match load(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::info!(error = %e, "Could not load settings, initializing defaults");
            create_default(path)
        }
    }
}

/// Save, logging instead of failing
pub fn save_or_log(path: &Path, settings: &Settings) {
    if let Err(e) = save(path, settings) {
        tracing::warn!(error = %e, "Could not save settings");
    }
}

fn create_default(path: &Path) -> Settings {
    let settings = Settings::default();
    save_or_log(path, &settings);
    settings
}
