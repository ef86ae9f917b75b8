//! worldmap_editor - Interactive editor for large tile-addressed world maps
//!
//! This crate provides the editing state engine and a Bevy adapter for it:
//! - Zoomable, scrollable viewport over a world far larger than the screen
//! - Placement and removal of stacked objects with ground replacement
//! - Gesture-batched undo/redo
//! - Paged catalog browser with scrollbar handles
//! - Map document save/load and bare cell-array export
//!
//! The engine ([`EditorState`]) never draws and never touches files; it consumes
//! [`input::InputEvent`]s and exposes [`EditorState::visible_state`] for renderers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use worldmap_editor::EditorPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(EditorPlugin::new().with_catalog_path("assets/catalog.json"))
//!         .run();
//! }
//! ```

pub mod commands;
pub mod config;
pub mod input;
pub mod pager;
pub mod preferences;
pub mod project;
pub mod render;
pub mod scrollbar;
pub mod state;
pub mod tools;
pub mod viewport;

pub use worldmap_core;

use bevy::prelude::*;
use std::path::PathBuf;
use worldmap_core::{Catalog, WorldSize};

use commands::handle_keyboard_shortcuts;
use preferences::EditorPreferences;
use project::{CurrentMap, MapDocument};
use render::MapRenderPlugin;
use tools::EditorToolsPlugin;

pub use commands::{Command, CommandBatch, CommandHistory};
pub use config::{ConfigError, EditorConfig};
pub use input::{EditorLayout, InputEvent, Key, KeyAction, Modifiers, PointerPos, Surface};
pub use pager::CatalogPager;
pub use render::{CatalogSlot, VisibleCell, VisibleState};
pub use state::{EditMode, EditorPhase, EditorState, PendingAction};
pub use viewport::{Viewport, ZOOM_IN, ZOOM_OUT};

/// Resource holding the catalog source file read at startup
#[derive(Resource, Debug, Clone, Default)]
pub struct CatalogPath(pub Option<PathBuf>);

/// Main editor plugin with configurable world and catalog
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use worldmap_editor::EditorPlugin;
/// use worldmap_editor::worldmap_core::WorldSize;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(
///         EditorPlugin::new()
///             .with_world_size(WorldSize::layered(500, 500, 4))
///             .with_catalog_grid(20, 10)
///             .with_catalog_path("assets/catalog.json")
///     )
///     .run();
/// ```
#[derive(Default)]
pub struct EditorPlugin {
    /// Session configuration. Invalid values fall back to the defaults.
    pub config: EditorConfig,
    /// Catalog source; without one the editor starts with an empty catalog.
    pub catalog_path: Option<PathBuf>,
}

impl EditorPlugin {
    /// Create an editor plugin with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the world dimensions (default: 1000x1000x1)
    pub fn with_world_size(mut self, size: WorldSize) -> Self {
        self.config.world = size;
        self
    }

    /// Set the largest zoom level (default: 1)
    pub fn with_max_zoom(mut self, max_zoom: f32) -> Self {
        self.config.max_zoom = max_zoom;
        self
    }

    /// Set the catalog source file
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Show the catalog as `rows` x `columns` instead of a flat list
    pub fn with_catalog_grid(mut self, rows: u32, columns: u32) -> Self {
        self.config.catalog_rows = rows;
        self.config.catalog_columns = columns;
        self
    }

    /// Configuration the plugin will actually run with
    fn effective_config(&self) -> EditorConfig {
        match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(e) => {
                bevy::log::error!("Invalid editor configuration: {}. Using defaults.", e);
                EditorConfig::default()
            }
        }
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let config = self.effective_config();
        bevy::log::info!(
            "EditorPlugin: {} world, {}x{} catalog",
            config.world,
            config.catalog_rows,
            config.catalog_columns
        );

        let editor_state = EditorState::new(config).unwrap_or_default();

        // Load user preferences
        let preferences = EditorPreferences::load();
        bevy::log::info!("Loaded editor preferences");

        app.add_plugins(MapRenderPlugin)
            .add_plugins(EditorToolsPlugin)
            .insert_resource(editor_state)
            .insert_resource(preferences)
            .insert_resource(CatalogPath(self.catalog_path.clone()))
            .init_resource::<CurrentMap>()
            .add_systems(Startup, (setup_editor_camera, load_catalog))
            .add_systems(Update, handle_keyboard_shortcuts);
    }
}

fn setup_editor_camera(mut commands: Commands, camera_query: Query<&Camera2d>) {
    // Only spawn if no Camera2d exists
    if camera_query.is_empty() {
        commands.spawn(Camera2d);
    }
}

/// Read the catalog source and open the engine for input
fn load_catalog(catalog_path: Res<CatalogPath>, mut editor_state: ResMut<EditorState>) {
    let catalog = match &catalog_path.0 {
        Some(path) => match read_catalog(path) {
            Ok(catalog) => {
                bevy::log::info!("Loaded {} catalog objects from {:?}", catalog.len(), path);
                catalog
            }
            Err(e) => {
                bevy::log::warn!("Could not load catalog {:?}: {}. Starting empty.", path, e);
                Catalog::default()
            }
        },
        None => {
            bevy::log::warn!("No catalog path set. Starting with an empty catalog.");
            Catalog::default()
        }
    };
    editor_state.ready(catalog);
}

fn read_catalog(path: &std::path::Path) -> Result<Catalog, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    Catalog::from_json(&content).map_err(|e| e.to_string())
}

/// Open a map document into the editor and remember it in the recent list.
/// Documents that fail to open are dropped from the recent list.
pub fn open_map(
    path: PathBuf,
    editor_state: &mut EditorState,
    current: &mut CurrentMap,
    preferences: &mut EditorPreferences,
) -> Result<(), project::ProjectError> {
    match MapDocument::load(&path).and_then(|document| {
        document.apply_to(editor_state)?;
        Ok(document)
    }) {
        Ok(document) => {
            current.adopt(&document);
            preferences.add_recent_map(path, document.display_name());
            Ok(())
        }
        Err(e) => {
            preferences.remove_recent_map(&path.to_string_lossy());
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldmap_core::GridCoordinate;

    #[test]
    fn test_builder() {
        let plugin = EditorPlugin::new()
            .with_world_size(WorldSize::layered(50, 60, 2))
            .with_max_zoom(2.0)
            .with_catalog_grid(20, 10)
            .with_catalog_path("catalog.json");
        assert_eq!(plugin.config.world, WorldSize::layered(50, 60, 2));
        assert_eq!(plugin.config.max_zoom, 2.0);
        assert_eq!(plugin.config.catalog_columns, 10);
        assert_eq!(plugin.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(plugin.effective_config(), plugin.config);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let plugin = EditorPlugin::new().with_max_zoom(3.0);
        assert_eq!(plugin.effective_config(), EditorConfig::default());
    }

    #[test]
    fn test_load_catalog_readies_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{ "sheets": [ { "file": "trees.png", "firstSpriteId": 5, "lastSpriteId": 9, "spriteType": 0 } ] }"#,
        )
        .unwrap();

        let mut app = App::new();
        app.insert_resource(EditorState::default())
            .insert_resource(CatalogPath(Some(path)))
            .add_systems(Startup, load_catalog);
        app.update();

        let state = app.world().resource::<EditorState>();
        assert!(state.is_ready());
        assert_eq!(state.catalog().len(), 5);
    }

    #[test]
    fn test_missing_catalog_starts_empty() {
        let mut app = App::new();
        app.insert_resource(EditorState::default())
            .insert_resource(CatalogPath(Some(PathBuf::from("/no/such/catalog.json"))))
            .add_systems(Startup, load_catalog);
        app.update();

        let state = app.world().resource::<EditorState>();
        assert!(state.is_ready());
        assert!(state.catalog().is_empty());
    }

    #[test]
    fn test_open_map_updates_recent_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("island.json");

        let mut source = EditorState::default();
        source.ready(Catalog::default());
        let mut grid = worldmap_core::WorldGrid::new(source.grid().size());
        grid.place(GridCoordinate::new(3, 4), &worldmap_core::ObjectRef::item(7))
            .unwrap();
        source.replace_grid(grid);
        MapDocument::from_state(&source, uuid::Uuid::nil(), "")
            .save(&path)
            .unwrap();

        let mut state = EditorState::default();
        let mut current = CurrentMap::default();
        let mut preferences = EditorPreferences::default();
        open_map(path.clone(), &mut state, &mut current, &mut preferences).unwrap();
        assert_eq!(state.grid(), source.grid());
        assert_eq!(current.name, "island");
        assert_eq!(preferences.last_map(), Some(path.clone()));

        std::fs::remove_file(&path).unwrap();
        assert!(open_map(path, &mut state, &mut current, &mut preferences).is_err());
        assert!(preferences.recent_maps.is_empty());
    }
}
