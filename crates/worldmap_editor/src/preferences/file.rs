//! Preferences file save/load operations

use super::EditorPreferences;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl EditorPreferences {
    /// Get the config directory path for the editor
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "worldmap_editor", "worldmap_editor")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the preferences file path
    pub fn preferences_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(PREFERENCES_FILE))
    }

    /// Load preferences from file, returning defaults if not found
    pub fn load() -> Self {
        let loaded = Self::preferences_path()
            .ok_or(PreferencesError::NoConfigDir)
            .and_then(|path| Self::load_from(&path));
        match loaded {
            Ok(prefs) => prefs,
            Err(e) => {
                bevy::log::warn!("Could not load preferences: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load preferences from a specific file; a missing file yields defaults.
    ///
    /// The recent map list comes back deduplicated and bounded.
    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| PreferencesError::IoError(e.to_string()))?;

        let mut preferences: Self = serde_json::from_str(&content)
            .map_err(|e| PreferencesError::ParseError(e.to_string()))?;
        let stored = preferences.recent_maps.len();
        preferences.tidy_recent_maps();
        if preferences.recent_maps.len() != stored {
            bevy::log::debug!(
                "Trimmed recent maps from {} to {}",
                stored,
                preferences.recent_maps.len()
            );
        }
        Ok(preferences)
    }

    /// Save preferences to file
    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::preferences_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)?;
        bevy::log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Save preferences to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| PreferencesError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PreferencesError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| PreferencesError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(PREFERENCES_FILE);

        let mut preferences = EditorPreferences::default();
        preferences.add_recent_map(PathBuf::from("/maps/a.json"), "A".to_string());
        preferences.last_export_dir = Some(PathBuf::from("/exports"));
        preferences.save_to(&path).unwrap();

        assert_eq!(EditorPreferences::load_from(&path).unwrap(), preferences);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = EditorPreferences::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(loaded, EditorPreferences::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, r#"{ "auto_open_last_map": false }"#).unwrap();

        let loaded = EditorPreferences::load_from(&path).unwrap();
        assert!(!loaded.auto_open_last_map);
        assert!(loaded.recent_maps.is_empty());
    }

    #[test]
    fn test_recent_maps_tidied_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        let mut recent: Vec<_> = (0..12)
            .map(|n| format!(r#"{{ "path": "/maps/{n}.json", "name": "{n}" }}"#))
            .collect();
        recent.insert(1, r#"{ "path": "/maps/0.json", "name": "again" }"#.to_string());
        recent.insert(2, r#"{ "path": "", "name": "blank" }"#.to_string());
        std::fs::write(&path, format!(r#"{{ "recent_maps": [{}] }}"#, recent.join(","))).unwrap();

        let loaded = EditorPreferences::load_from(&path).unwrap();
        let names: Vec<_> = loaded.recent_maps.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        assert_eq!(loaded.last_map(), Some(PathBuf::from("/maps/0.json")));
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            EditorPreferences::load_from(&path),
            Err(PreferencesError::ParseError(_))
        ));
    }
}
