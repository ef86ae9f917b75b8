//! Map documents for the world editor
//!
//! This module handles map document save/load and the CurrentMap resource.

mod file;

pub use file::*;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;
use worldmap_core::{CellRecord, MapError, WorldGrid, WorldSize};

use crate::EditorState;

/// Current document format version
pub const MAP_DOCUMENT_VERSION: u32 = 1;

/// A saved world map: the exported cell records plus identity and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub version: u32,
    pub id: Uuid,
    pub name: String,
    pub size: WorldSize,
    pub cells: Vec<CellRecord>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl MapDocument {
    /// Snapshot the world edited in `state`
    pub fn from_state(state: &EditorState, id: Uuid, name: impl Into<String>) -> Self {
        Self {
            version: MAP_DOCUMENT_VERSION,
            id,
            name: name.into(),
            size: state.grid().size(),
            cells: state.export(),
            path: None,
        }
    }

    /// Rebuild the world grid stored in this document
    pub fn to_grid(&self) -> Result<WorldGrid, MapError> {
        WorldGrid::import(self.size, self.cells.clone())
    }

    /// Replace the world edited in `state` with this document
    pub fn apply_to(&self, state: &mut EditorState) -> Result<(), MapError> {
        let grid = self.to_grid()?;
        state.replace_grid(grid);
        Ok(())
    }

    /// Display name, falling back to the file name
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

/// Identity of the document being edited
#[derive(Debug, Clone, Resource)]
pub struct CurrentMap {
    pub id: Uuid,
    pub name: String,
    pub path: Option<PathBuf>,
}

impl Default for CurrentMap {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Untitled".to_string(),
            path: None,
        }
    }
}

impl CurrentMap {
    /// Adopt the identity of a loaded or saved document
    pub fn adopt(&mut self, document: &MapDocument) {
        self.id = document.id;
        self.name = document.display_name();
        self.path = document.path.clone();
    }

    /// Document for the current world under this identity
    pub fn document(&self, state: &EditorState) -> MapDocument {
        let mut document = MapDocument::from_state(state, self.id, self.name.clone());
        document.path = self.path.clone();
        document
    }
}
