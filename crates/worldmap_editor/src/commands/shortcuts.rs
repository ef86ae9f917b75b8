//! Keyboard shortcut handling

use bevy::prelude::*;

use crate::input::{InputEvent, Key, Modifiers};
use crate::EditorState;

/// Bevy key codes and the editor keys they press
const KEY_BINDINGS: &[(KeyCode, Key)] = &[
    (KeyCode::ArrowLeft, Key::ArrowLeft),
    (KeyCode::ArrowRight, Key::ArrowRight),
    (KeyCode::ArrowUp, Key::ArrowUp),
    (KeyCode::ArrowDown, Key::ArrowDown),
    (KeyCode::NumpadAdd, Key::Plus),
    (KeyCode::Equal, Key::Plus),
    (KeyCode::NumpadSubtract, Key::Minus),
    (KeyCode::Minus, Key::Minus),
    (KeyCode::KeyZ, Key::Z),
    (KeyCode::KeyY, Key::Y),
    (KeyCode::KeyS, Key::S),
    (KeyCode::KeyD, Key::D),
    (KeyCode::KeyM, Key::M),
    (KeyCode::Escape, Key::Escape),
    (KeyCode::PageUp, Key::PageUp),
    (KeyCode::PageDown, Key::PageDown),
];

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut editor_state: ResMut<EditorState>,
) {
    let modifiers = Modifiers {
        ctrl: keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight),
        shift: keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight),
    };

    for &(code, key) in KEY_BINDINGS {
        if !keyboard.just_pressed(code) {
            continue;
        }
        if let Err(e) = editor_state.handle(InputEvent::Key { key, modifiers }) {
            warn!("Key {:?} rejected: {}", key, e);
        }
    }
}
