//! User preferences persisted between editor sessions

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Maximum number of remembered map documents
const MAX_RECENT_MAPS: usize = 10;

/// A recently opened or saved map document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMap {
    pub path: String,
    pub name: String,
}

/// Settings that outlive a single editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Most recent first
    pub recent_maps: Vec<RecentMap>,
    /// Reopen the most recent map on startup
    pub auto_open_last_map: bool,
    /// Directory of the last save or export dialog
    pub last_export_dir: Option<PathBuf>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            recent_maps: Vec::new(),
            auto_open_last_map: true,
            last_export_dir: None,
        }
    }
}

impl EditorPreferences {
    /// Remember a map document, moving it to the front of the recent list
    pub fn add_recent_map(&mut self, path: PathBuf, name: String) {
        let path = path.to_string_lossy().to_string();
        self.remove_recent_map(&path);
        self.recent_maps.insert(0, RecentMap { path, name });
        self.recent_maps.truncate(MAX_RECENT_MAPS);
    }

    pub fn remove_recent_map(&mut self, path: &str) {
        self.recent_maps.retain(|recent| recent.path != path);
    }

    pub fn clear_recent_maps(&mut self) {
        self.recent_maps.clear();
    }

    /// Drop blank and repeated entries and bound the recent list
    pub(crate) fn tidy_recent_maps(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.recent_maps
            .retain(|recent| !recent.path.is_empty() && seen.insert(recent.path.clone()));
        self.recent_maps.truncate(MAX_RECENT_MAPS);
    }

    /// Map to reopen on startup, if enabled
    pub fn last_map(&self) -> Option<PathBuf> {
        if !self.auto_open_last_map {
            return None;
        }
        self.recent_maps
            .first()
            .map(|recent| PathBuf::from(&recent.path))
    }
}
