//! Editor settings persistence.
//!
//! Stores user preferences in a JSON file at an OS-appropriate location.
//! A missing or unreadable file means defaults; it never blocks editing.

use crate::{Result, DEFAULT_NEW_FIELD_PREFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// SQLite file holding table records and their history.
    pub database_path: String,
    /// Placeholder name prefix for newly inserted fields.
    pub new_field_prefix: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path().to_string_lossy().to_string(),
            new_field_prefix: DEFAULT_NEW_FIELD_PREFIX.to_string(),
        }
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/schemaboard/settings.json`
/// - Windows: `%APPDATA%/Schemaboard/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Schemaboard").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("schemaboard").join("settings.json")
    }
}

/// Returns the default database location: `<data dir>/schemaboard/graph.db`.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("schemaboard")
        .join("graph.db")
}

/// Loads settings from the default location.
pub fn load_settings() -> EditorSettings {
    load_settings_from(&settings_file_path())
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from(path: &Path) -> EditorSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring unreadable settings file {}: {e}", path.display());
            EditorSettings::default()
        }),
        Err(_) => EditorSettings::default(),
    }
}

/// Saves settings to the default location.
///
/// # Errors
///
/// Returns [`crate::SchemaboardError::Io`] or [`crate::SchemaboardError::Json`].
pub fn save_settings(settings: &EditorSettings) -> Result<()> {
    save_settings_to(settings, &settings_file_path())
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::SchemaboardError::Io`] or [`crate::SchemaboardError::Json`].
pub fn save_settings_to(settings: &EditorSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
