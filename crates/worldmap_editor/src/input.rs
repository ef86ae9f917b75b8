//! Toolkit-independent input events and the on-screen layout used to route them

use crate::config::EditorConfig;
use crate::scrollbar::ScrollTrack;
use worldmap_core::ScreenPoint;

/// Horizontal gap between the catalog entries and the catalog scrollbar
const CATALOG_GUTTER: f32 = 10.0;

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Plus,
    Minus,
    Z,
    Y,
    S,
    D,
    M,
    Escape,
    PageUp,
    PageDown,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
}

/// What a key press asks the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pan { di: i64, dj: i64 },
    ZoomIn,
    ZoomOut,
    Undo,
    Redo,
    Save,
    Export,
    ToggleDelete,
    ToggleMove,
    Cancel,
    LayerUp,
    LayerDown,
}

impl KeyAction {
    /// Map a key press to its action
    pub fn from_key(key: Key, modifiers: Modifiers) -> Self {
        match key {
            Key::ArrowLeft => KeyAction::Pan { di: -1, dj: 0 },
            Key::ArrowRight => KeyAction::Pan { di: 1, dj: 0 },
            Key::ArrowUp => KeyAction::Pan { di: 0, dj: -1 },
            Key::ArrowDown => KeyAction::Pan { di: 0, dj: 1 },
            Key::Plus => KeyAction::ZoomIn,
            Key::Minus => KeyAction::ZoomOut,
            // Shift+Z or Y - Redo
            Key::Z if modifiers.shift => KeyAction::Redo,
            Key::Z => KeyAction::Undo,
            Key::Y => KeyAction::Redo,
            Key::S if modifiers.shift => KeyAction::Export,
            Key::S => KeyAction::Save,
            Key::D => KeyAction::ToggleDelete,
            Key::M => KeyAction::ToggleMove,
            Key::Escape => KeyAction::Cancel,
            Key::PageUp => KeyAction::LayerUp,
            Key::PageDown => KeyAction::LayerDown,
        }
    }
}

/// Drawing surface an event happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// World view including its two scrollbars
    World,
    /// Catalog list including its scrollbar
    Catalog,
}

/// Pointer position relative to the top-left of a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub surface: Surface,
    pub point: ScreenPoint,
}

impl PointerPos {
    pub fn world(x: f32, y: f32) -> Self {
        Self {
            surface: Surface::World,
            point: ScreenPoint::new(x, y),
        }
    }

    pub fn catalog(x: f32, y: f32) -> Self {
        Self {
            surface: Surface::Catalog,
            point: ScreenPoint::new(x, y),
        }
    }
}

/// Raw input reported by a toolkit adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { key: Key, modifiers: Modifiers },
    PointerDown { pos: PointerPos, modifiers: Modifiers },
    PointerMove { pos: PointerPos },
    PointerUp { pos: PointerPos },
    /// Negative `delta` scrolls up
    Scroll { delta: f32, target: Surface },
}

/// Interactive part of the interface under the pointer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Component {
    #[default]
    None,
    WorldWindow,
    ViewportHandleHorizontal,
    ViewportHandleVertical,
    CatalogWindow,
    CatalogHandle,
}

impl Component {
    /// Surface the component belongs to
    pub fn surface(self) -> Option<Surface> {
        match self {
            Component::None => None,
            Component::WorldWindow
            | Component::ViewportHandleHorizontal
            | Component::ViewportHandleVertical => Some(Surface::World),
            Component::CatalogWindow | Component::CatalogHandle => Some(Surface::Catalog),
        }
    }

    pub fn is_handle(self) -> bool {
        matches!(
            self,
            Component::ViewportHandleHorizontal
                | Component::ViewportHandleVertical
                | Component::CatalogHandle
        )
    }
}

/// Pixel layout of the world view and catalog surfaces inside one window.
///
/// The world view is a square of `tile_window * tile_size` pixels with a
/// scrollbar below and one to the right. The catalog sits to the right of the
/// world surface with its own scrollbar after a small gutter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorLayout {
    /// Edge length of the world view in pixels
    pub view_size: f32,
    pub scrollbar_thickness: f32,
    pub handle_length: f32,
    /// Left edge of the catalog surface in window coordinates
    pub catalog_left: f32,
    pub catalog_width: f32,
    pub catalog_height: f32,
}

impl EditorLayout {
    pub fn from_config(config: &EditorConfig) -> Self {
        let view_size = config.tile_window as f32 * config.tile_size;
        Self {
            view_size,
            scrollbar_thickness: config.scrollbar_thickness,
            handle_length: config.handle_length,
            catalog_left: view_size + config.scrollbar_thickness + CATALOG_GUTTER,
            catalog_width: config.catalog_columns as f32 * config.tile_size,
            catalog_height: config.catalog_rows as f32 * config.tile_size,
        }
    }

    /// Width of the world surface including its vertical scrollbar
    fn world_extent(&self) -> f32 {
        self.view_size + self.scrollbar_thickness
    }

    /// Width of the catalog surface including its scrollbar
    fn catalog_extent(&self) -> f32 {
        self.catalog_width + CATALOG_GUTTER + self.scrollbar_thickness
    }

    /// Left edge of the catalog scrollbar in window coordinates
    pub fn catalog_handle_left(&self) -> f32 {
        self.catalog_left + self.catalog_width + CATALOG_GUTTER
    }

    /// Window size needed to show both surfaces
    pub fn window_size(&self) -> (f32, f32) {
        (
            self.catalog_left + self.catalog_extent(),
            self.world_extent().max(self.catalog_height),
        )
    }

    /// Track of the world view scrollbars
    pub fn world_track(&self) -> ScrollTrack {
        ScrollTrack::new(self.view_size, self.handle_length)
    }

    /// Track of the catalog scrollbar
    pub fn catalog_track(&self) -> ScrollTrack {
        ScrollTrack::new(self.catalog_height, self.handle_length)
    }

    /// Find the surface under a window position and make the point relative
    /// to it
    pub fn locate(&self, window_point: ScreenPoint) -> Option<PointerPos> {
        let ScreenPoint { x, y } = window_point;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        if x < self.world_extent() && y < self.world_extent() {
            return Some(PointerPos::world(x, y));
        }
        let catalog_x = x - self.catalog_left;
        if catalog_x >= 0.0 && catalog_x < self.catalog_extent() && y < self.catalog_height {
            return Some(PointerPos::catalog(catalog_x, y));
        }
        None
    }

    /// Express a window position relative to `surface`, even when it lies
    /// outside it (a handle dragged past the track end)
    pub fn relative_to(&self, surface: Surface, window_point: ScreenPoint) -> PointerPos {
        match surface {
            Surface::World => PointerPos::world(window_point.x, window_point.y),
            Surface::Catalog => {
                PointerPos::catalog(window_point.x - self.catalog_left, window_point.y)
            }
        }
    }

    /// Component under a surface-relative position
    pub fn hit_test(&self, pos: PointerPos) -> Component {
        let ScreenPoint { x, y } = pos.point;
        if x < 0.0 || y < 0.0 {
            return Component::None;
        }
        match pos.surface {
            Surface::World => {
                if x >= self.world_extent() || y >= self.world_extent() {
                    Component::None
                } else if y >= self.view_size {
                    Component::ViewportHandleHorizontal
                } else if x >= self.view_size {
                    Component::ViewportHandleVertical
                } else {
                    Component::WorldWindow
                }
            }
            Surface::Catalog => {
                if x >= self.catalog_extent() || y >= self.catalog_height {
                    Component::None
                } else if x >= self.catalog_width + CATALOG_GUTTER {
                    Component::CatalogHandle
                } else {
                    Component::CatalogWindow
                }
            }
        }
    }
}
