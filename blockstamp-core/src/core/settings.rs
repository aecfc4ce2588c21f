//! Plugin settings and their JSON persistence.
//!
//! Hosts usually own the settings store and hand a [`PluginSettings`] value to
//! the plugin. The file helpers here serve hosts that keep settings on disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::rewriter::{resolve_format, DEFAULT_FORMAT};
use crate::{BlockstampError, Result};

/// Default shortcut for manual insertion.
pub const DEFAULT_KEYBINDING: &str = "mod+t";

/// User-settable plugin configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    /// Format used both to render new stamps and to recognise existing ones.
    pub timestamp_format: String,
    /// Keyboard shortcut that triggers manual insertion.
    pub keybinding: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_FORMAT.to_string(),
            keybinding: DEFAULT_KEYBINDING.to_string(),
        }
    }
}

impl PluginSettings {
    /// The configured format, or the default when it is blank.
    #[must_use]
    pub fn effective_format(&self) -> &str {
        resolve_format(&self.timestamp_format)
    }
}

/// Returns the path to the settings JSON file.
///
/// - macOS / Linux: `~/.config/blockstamp/settings.json`
/// - Windows: `%APPDATA%/Blockstamp/settings.json`
pub fn settings_file_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("Blockstamp").join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("blockstamp").join("settings.json")
    }
}

/// Loads settings from `path`. Keys missing from the file take their defaults.
///
/// # Errors
///
/// Returns [`BlockstampError::SettingsUnavailable`] if the file cannot be read,
/// or [`BlockstampError::Json`] if it is not valid settings JSON.
pub fn load_settings(path: &Path) -> Result<PluginSettings> {
    let content = fs::read_to_string(path).map_err(|e| {
        log::warn!("could not read settings at {}: {e}", path.display());
        BlockstampError::SettingsUnavailable
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`BlockstampError::Io`] or [`BlockstampError::Json`] on failure.
pub fn save_settings(path: &Path, settings: &PluginSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
