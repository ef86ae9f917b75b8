//! Editor tools - pointer, scroll and file actions
//!
//! Translates Bevy window input into engine input events and carries out the
//! file work the engine requests.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use std::path::{Path, PathBuf};
use worldmap_core::ScreenPoint;

use crate::input::{Component, EditorLayout, InputEvent, Modifiers};
use crate::preferences::EditorPreferences;
use crate::project::{write_export, CurrentMap};
use crate::{EditorState, PendingAction};

/// Plugin for pointer input and file actions
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInputState>().add_systems(
            Update,
            (
                handle_pointer_input,
                handle_scroll_input,
                handle_pending_actions,
                update_window_title,
            ),
        );
    }
}

/// State for pointer input handling
#[derive(Resource, Default)]
pub struct PointerInputState {
    /// Last cursor position in window pixels
    pub last_cursor: Option<ScreenPoint>,
}

/// Button transitions of the primary pointer button in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

/// Engine events for one frame of pointer input.
///
/// While a button is held the pointer stays attached to the surface it went
/// down on, so a handle dragged past its track keeps scrolling.
fn pointer_events(
    layout: &EditorLayout,
    clicked: Component,
    last_cursor: Option<ScreenPoint>,
    cursor: Option<ScreenPoint>,
    buttons: ButtonFrame,
    modifiers: Modifiers,
) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let Some(cursor) = cursor.or(last_cursor) else {
        return events;
    };
    let held_pos = clicked
        .surface()
        .map(|surface| layout.relative_to(surface, cursor));

    if buttons.just_pressed {
        if let Some(pos) = layout.locate(cursor) {
            events.push(InputEvent::PointerDown { pos, modifiers });
        }
    } else if last_cursor != Some(cursor) {
        let pos = if buttons.pressed {
            held_pos.or_else(|| layout.locate(cursor))
        } else {
            layout.locate(cursor)
        };
        if let Some(pos) = pos {
            events.push(InputEvent::PointerMove { pos });
        }
    }

    if buttons.just_released {
        if let Some(pos) = held_pos.or_else(|| layout.locate(cursor)) {
            events.push(InputEvent::PointerUp { pos });
        }
    }
    events
}

fn handle_pointer_input(
    mut editor_state: ResMut<EditorState>,
    mut input_state: ResMut<PointerInputState>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window
        .cursor_position()
        .map(|position| ScreenPoint::new(position.x, position.y));
    let buttons = ButtonFrame {
        pressed: mouse_buttons.pressed(MouseButton::Left),
        just_pressed: mouse_buttons.just_pressed(MouseButton::Left),
        just_released: mouse_buttons.just_released(MouseButton::Left),
    };
    let modifiers = Modifiers {
        shift: keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight),
        ctrl: keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight),
    };

    let events = pointer_events(
        editor_state.layout(),
        editor_state.clicked(),
        input_state.last_cursor,
        cursor,
        buttons,
        modifiers,
    );
    for event in events {
        if let Err(e) = editor_state.handle(event) {
            warn!("Pointer input rejected: {}", e);
        }
    }
    if cursor.is_some() {
        input_state.last_cursor = cursor;
    }
}

#[allow(deprecated)]
fn handle_scroll_input(
    mut editor_state: ResMut<EditorState>,
    mut scroll_events: bevy::ecs::event::EventReader<MouseWheel>,
    windows: Query<&Window>,
) {
    let Ok(window) = windows.single() else { return };
    let Some(target) = window
        .cursor_position()
        .and_then(|position| {
            editor_state
                .layout()
                .locate(ScreenPoint::new(position.x, position.y))
        })
        .map(|pos| pos.surface)
    else {
        // Drain events that happened outside both surfaces
        scroll_events.clear();
        return;
    };

    for event in scroll_events.read() {
        // Wheel up is positive in Bevy; the engine treats negative as up
        if let Err(e) = editor_state.handle(InputEvent::Scroll {
            delta: -event.y,
            target,
        }) {
            warn!("Scroll rejected: {}", e);
        }
    }
}

/// Ask where to write a file. Without native dialogs the file goes into
/// `dir` or the working directory.
fn choose_save_path(title: &str, file_name: &str, dir: Option<&Path>) -> Option<PathBuf> {
    #[cfg(feature = "native")]
    {
        let mut dialog = rfd::FileDialog::new()
            .set_title(title)
            .add_filter("World Map", &["json"])
            .set_file_name(file_name);
        if let Some(dir) = dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }
    #[cfg(not(feature = "native"))]
    {
        debug!("{}: writing {} without a dialog", title, file_name);
        Some(dir.unwrap_or_else(|| Path::new(".")).join(file_name))
    }
}

fn handle_pending_actions(
    mut editor_state: ResMut<EditorState>,
    mut current: ResMut<CurrentMap>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let Some(action) = editor_state.pending_action.take() else {
        return;
    };

    match action {
        PendingAction::Save => {
            let path = match current.path.clone() {
                Some(path) => Some(path),
                None => choose_save_path(
                    "Save Map",
                    &format!("{}.json", current.name),
                    preferences.last_export_dir.as_deref(),
                ),
            };
            let Some(path) = path else {
                return;
            };
            let mut document = current.document(&editor_state);
            match document.save(&path) {
                Ok(()) => {
                    info!("Saved map to {:?}", path);
                    current.adopt(&document);
                    preferences.add_recent_map(path, document.display_name());
                    if let Err(e) = preferences.save() {
                        error!("Failed to save preferences: {}", e);
                    }
                }
                Err(e) => error!("Failed to save map: {}", e),
            }
        }
        PendingAction::Export => {
            let Some(path) = choose_save_path(
                "Export Cells",
                &format!("{}.cells.json", current.name),
                preferences.last_export_dir.as_deref(),
            ) else {
                return;
            };
            match write_export(&path, &editor_state) {
                Ok(()) => {
                    info!(
                        "Exported {} cells to {:?}",
                        editor_state.grid().len(),
                        path
                    );
                    preferences.last_export_dir = path.parent().map(Path::to_path_buf);
                    if let Err(e) = preferences.save() {
                        error!("Failed to save preferences: {}", e);
                    }
                }
                Err(e) => error!("Failed to export map: {}", e),
            }
        }
    }
}

/// Status line shown in the window title
fn status_line(editor_state: &EditorState, current: &CurrentMap) -> String {
    let viewport = editor_state.viewport();
    let origin = viewport.origin();
    let selection = match editor_state.active_object() {
        Some(object) => format!("object {}", object.id),
        None => "no object".to_string(),
    };
    format!(
        "World Map Editor - {} - {:?} ({}) - view {},{} zoom {} layer {}",
        current.name,
        editor_state.mode(),
        selection,
        origin.i,
        origin.j,
        viewport.zoom(),
        viewport.layer(),
    )
}

fn update_window_title(
    mut editor_state: ResMut<EditorState>,
    current: Res<CurrentMap>,
    mut windows: Query<&mut Window>,
) {
    if !editor_state.take_redraw() && !current.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let title = status_line(&editor_state, &current);
    if window.title != title {
        window.title = title;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerPos;
    use crate::EditorConfig;

    fn layout() -> EditorLayout {
        EditorConfig::default().layout()
    }

    fn press() -> ButtonFrame {
        ButtonFrame {
            pressed: true,
            just_pressed: true,
            just_released: false,
        }
    }

    fn held() -> ButtonFrame {
        ButtonFrame {
            pressed: true,
            ..ButtonFrame::default()
        }
    }

    #[test]
    fn test_press_becomes_pointer_down() {
        let events = pointer_events(
            &layout(),
            Component::None,
            None,
            Some(ScreenPoint::new(680.0, 40.0)),
            press(),
            Modifiers::SHIFT,
        );
        assert_eq!(
            events,
            vec![InputEvent::PointerDown {
                pos: PointerPos::catalog(10.0, 40.0),
                modifiers: Modifiers::SHIFT,
            }]
        );
    }

    #[test]
    fn test_held_pointer_stays_on_clicked_surface() {
        // Vertical handle dragged below the window
        let events = pointer_events(
            &layout(),
            Component::ViewportHandleVertical,
            Some(ScreenPoint::new(650.0, 300.0)),
            Some(ScreenPoint::new(650.0, 900.0)),
            held(),
            Modifiers::NONE,
        );
        assert_eq!(
            events,
            vec![InputEvent::PointerMove {
                pos: PointerPos::world(650.0, 900.0),
            }]
        );
    }

    #[test]
    fn test_hover_outside_surfaces_is_dropped() {
        let events = pointer_events(
            &layout(),
            Component::None,
            Some(ScreenPoint::new(10.0, 10.0)),
            Some(ScreenPoint::new(665.0, 10.0)),
            ButtonFrame::default(),
            Modifiers::NONE,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_release_uses_last_cursor_when_window_left() {
        let events = pointer_events(
            &layout(),
            Component::WorldWindow,
            Some(ScreenPoint::new(20.0, 20.0)),
            None,
            ButtonFrame {
                just_released: true,
                ..ButtonFrame::default()
            },
            Modifiers::NONE,
        );
        assert_eq!(
            events,
            vec![InputEvent::PointerUp {
                pos: PointerPos::world(20.0, 20.0),
            }]
        );
    }

    #[test]
    fn test_status_line() {
        let mut state = EditorState::new(EditorConfig::default()).unwrap();
        state.ready(worldmap_core::Catalog::default());
        state.pan(3, 4);
        let current = CurrentMap {
            name: "Overworld".to_string(),
            ..CurrentMap::default()
        };
        assert_eq!(
            status_line(&state, &current),
            "World Map Editor - Overworld - Place (no object) - view 3,4 zoom 1 layer 0"
        );
    }
}
