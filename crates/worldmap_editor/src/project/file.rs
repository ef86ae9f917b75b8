//! Map document save/load operations

use super::MapDocument;
use crate::EditorState;
use std::path::Path;
use thiserror::Error;
use worldmap_core::MapError;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("No file path set")]
    NoPath,
    #[error("Invalid map: {0}")]
    Map(#[from] MapError),
}

impl MapDocument {
    /// Load a map document from file
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let mut document: MapDocument =
            serde_json::from_str(&content).map_err(|e| ProjectError::ParseError(e.to_string()))?;

        // Reject documents whose cells do not fit the stored size
        document.to_grid()?;

        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Save map document to file
    pub fn save(&mut self, path: &Path) -> Result<(), ProjectError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ProjectError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))?;

        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save to current path if set
    pub fn save_current(&mut self) -> Result<(), ProjectError> {
        if let Some(path) = self.path.clone() {
            self.save(&path)
        } else {
            Err(ProjectError::NoPath)
        }
    }
}

/// Write the bare cell record array of the edited world
pub fn write_export(path: &Path, state: &EditorState) -> Result<(), ProjectError> {
    let content = state.export_json()?;
    std::fs::write(path, content).map_err(|e| ProjectError::IoError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::tests::edited_state;
    use super::*;
    use uuid::Uuid;
    use worldmap_core::{CellRecord, WorldGrid};

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overworld.json");

        let state = edited_state();
        let mut document = MapDocument::from_state(&state, Uuid::new_v4(), "Overworld");
        document.save(&path).unwrap();
        assert_eq!(document.path.as_deref(), Some(path.as_path()));

        let loaded = MapDocument::load(&path).unwrap();
        assert_eq!(loaded, document);
        assert_eq!(loaded.to_grid().unwrap(), *state.grid());
    }

    #[test]
    fn test_save_current_without_path() {
        let mut document = MapDocument::from_state(&edited_state(), Uuid::nil(), "");
        assert!(matches!(document.save_current(), Err(ProjectError::NoPath)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            MapDocument::load(&path),
            Err(ProjectError::ParseError(_))
        ));
        assert!(matches!(
            MapDocument::load(&dir.path().join("missing.json")),
            Err(ProjectError::IoError(_))
        ));
    }

    #[test]
    fn test_load_rejects_cells_outside_world() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shrunk.json");
        let mut document = MapDocument::from_state(&edited_state(), Uuid::nil(), "Shrunk");
        document.size = worldmap_core::WorldSize::new(1, 1);
        document.save(&path).unwrap();

        assert!(matches!(
            MapDocument::load(&path),
            Err(ProjectError::Map(MapError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_load_rejects_unindexable_world() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        let mut document = MapDocument::from_state(&edited_state(), Uuid::nil(), "Huge");
        document.size = worldmap_core::WorldSize::layered(u32::MAX, u32::MAX, 3);
        document.save(&path).unwrap();

        assert!(matches!(
            MapDocument::load(&path),
            Err(ProjectError::Map(MapError::InvalidWorldSize { .. }))
        ));
    }

    #[test]
    fn test_write_export_is_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        let state = edited_state();
        write_export(&path, &state).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<CellRecord> = serde_json::from_str(&content).unwrap();
        let grid = WorldGrid::import(state.grid().size(), records).unwrap();
        assert_eq!(grid, *state.grid());
    }
}
