//! Persisted settings, currently just window placement.
//!
//! Loaded once at startup and written back on the closing transition to a
//! `settings.toml` under the platform config directory. The settings value
//! is owned by the window, not a global.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_DIR: &str = "quickview";

/// Where the window was when the app last closed.
///
/// `position` and `size` always hold the restored (non-maximized) bounds;
/// the flags record which state to reapply on top of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub position: Option<(f32, f32)>,
    pub size: (f32, f32),
    #[serde(default)]
    pub maximized: bool,
    #[serde(default)]
    pub minimized: bool,
}

impl Default for WindowPlacement {
    fn default() -> Self {
        Self {
            position: None,
            size: (1024.0, 768.0),
            maximized: false,
            minimized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub window: WindowPlacement,
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads settings from the default location, falling back to defaults when
/// the file does not exist yet.
pub fn load() -> Result<Settings> {
    if let Some(path) = default_settings_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Settings::default())
}

/// Writes settings to the default location.
pub fn save(settings: &Settings) -> Result<()> {
    if let Some(path) = default_settings_path() {
        return save_to_path(settings, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| AppError::Settings(e.to_string()))?;
    // A corrupt file falls back to defaults rather than blocking startup.
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::Settings(e.to_string()))?;
    }
    let content =
        toml::to_string_pretty(settings).map_err(|e| AppError::Settings(e.to_string()))?;
    fs::write(path, content).map_err(|e| AppError::Settings(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn placement_round_trip_reproduces_maximized_window() {
        let settings = Settings {
            window: WindowPlacement {
                position: Some((10.0, 20.0)),
                size: (640.0, 480.0),
                maximized: true,
                minimized: false,
            },
        };
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("settings.toml");

        save_to_path(&settings, &path).expect("failed to save settings");
        let loaded = load_from_path(&path).expect("failed to load settings");

        assert!(loaded.window.maximized);
        assert!(!loaded.window.minimized);
        assert_eq!(loaded.window.position, Some((10.0, 20.0)));
        assert_eq!(loaded.window.size, (640.0, 480.0));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("deep").join("nested").join("settings.toml");

        save_to_path(&Settings::default(), &path).expect("save should create directories");
        assert!(path.exists());
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("settings.toml");
        fs::write(&path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&path).expect("load should not error");
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn default_placement_has_no_position() {
        let placement = WindowPlacement::default();
        assert_eq!(placement.position, None);
        assert!(!placement.maximized);
        assert!(!placement.minimized);
    }
}
