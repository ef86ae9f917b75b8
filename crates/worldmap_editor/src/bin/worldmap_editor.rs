//! Standalone world map editor binary
//!
//! Run with: worldmap_editor [catalog.json]

use bevy::prelude::*;
use bevy::window::WindowResolution;
use worldmap_editor::preferences::EditorPreferences;
use worldmap_editor::project::CurrentMap;
use worldmap_editor::{open_map, EditorConfig, EditorPlugin, EditorState};

fn main() {
    let catalog_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/catalog.json".to_string());
    let config = EditorConfig::default();
    let (width, height) = config.layout().window_size();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "World Map Editor".to_string(),
                // Layout is in physical pixels; avoid OS-level scaling
                resolution: WindowResolution::new(width.ceil() as u32, height.ceil() as u32)
                    .with_scale_factor_override(1.0),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(
            EditorPlugin::new()
                .with_config(config)
                .with_catalog_path(catalog_path),
        )
        .add_systems(Startup, auto_open_last_map)
        .run();
}

/// System to auto-open the last map on startup if enabled in preferences
fn auto_open_last_map(
    mut editor_state: ResMut<EditorState>,
    mut current: ResMut<CurrentMap>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let Some(path) = preferences.last_map() else {
        return;
    };

    info!("Auto-opening last map: {:?}", path);
    if let Err(e) = open_map(path, &mut editor_state, &mut current, &mut preferences) {
        warn!("Failed to auto-open last map: {}", e);
        if let Err(e) = preferences.save() {
            error!("Failed to save preferences: {}", e);
        }
    }
}
