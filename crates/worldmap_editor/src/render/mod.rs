//! Visible-state snapshot for renderers, and a gizmo outline renderer
//!
//! The engine never draws. A renderer pulls [`EditorState::visible_state`]
//! and turns it into pixels; [`MapRenderPlugin`] does that with outline
//! gizmos, which is enough to edit without sprite assets.

use bevy::prelude::*;
use worldmap_core::{
    Drawable, GridCoordinate, ObjectId, ObjectRef, PlacedObject, ScreenPoint, SpriteRect,
    ViewWindow, GROUND_STACK_POSITION,
};

use crate::viewport::Axis;
use crate::{EditMode, EditorState};

/// One created cell inside the visible window
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleCell {
    pub position: GridCoordinate,
    /// Top-left pixel relative to the world view
    pub pixel: ScreenPoint,
    /// Stack in draw order
    pub objects: Vec<PlacedObject>,
}

/// One catalog entry on the visible catalog page
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSlot {
    /// Position in the catalog paging order
    pub index: usize,
    pub id: ObjectId,
    /// Sprite sheet file the entry is cut from
    pub sheet: String,
    pub sprite: SpriteRect,
    pub animated: bool,
    /// Top-left pixel relative to the catalog surface
    pub pixel: ScreenPoint,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleState {
    pub window: ViewWindow,
    pub layer: u32,
    pub mode: EditMode,
    pub active_position: GridCoordinate,
    /// Pixel of the active cell, `None` when it is scrolled out of view
    pub active_pixel: Option<ScreenPoint>,
    pub active_object: Option<ObjectRef>,
    /// Created cells in the visible window, row by row
    pub cells: Vec<VisibleCell>,
    pub catalog_page: Vec<CatalogSlot>,
    /// Leading edges of the three scrollbar handles
    pub horizontal_handle: f32,
    pub vertical_handle: f32,
    pub catalog_handle: f32,
}

impl EditorState {
    /// Snapshot of the visible window, catalog page and scrollbars
    pub fn visible_state(&self) -> VisibleState {
        let window = self.viewport().window();
        let origin = window.origin;
        let size = self.grid().size();
        let rows = window.extent.min(size.height.saturating_sub(origin.j));

        let cells = (origin.j..origin.j + rows)
            .flat_map(|j| {
                self.grid()
                    .row_segment(GridCoordinate::layered(origin.i, j, origin.k), window.extent)
            })
            .filter_map(|(_, cell)| {
                let pixel = window.grid_to_screen(cell.position())?;
                Some(VisibleCell {
                    position: cell.position(),
                    pixel,
                    objects: cell.objects().to_vec(),
                })
            })
            .collect();

        let pager = self.pager();
        let page = pager.page();
        let columns = pager.columns() as usize;
        let tile_size = self.config().tile_size;
        let catalog_page = page
            .clone()
            .filter_map(|index| {
                let definition = self.catalog().entry_at(index)?;
                let slot = index - page.start;
                Some(CatalogSlot {
                    index,
                    id: definition.id,
                    sheet: self
                        .catalog()
                        .sheets()
                        .get(definition.sheet)
                        .map(|sheet| sheet.file.clone())
                        .unwrap_or_default(),
                    sprite: definition.sprite_rect(),
                    animated: definition.is_animated(),
                    pixel: ScreenPoint::new(
                        (slot % columns) as f32 * tile_size,
                        (slot / columns) as f32 * tile_size,
                    ),
                })
            })
            .collect();

        let layout = self.layout();
        VisibleState {
            window,
            layer: origin.k,
            mode: self.mode(),
            active_position: self.active_position(),
            active_pixel: window.grid_to_screen(self.active_position()),
            active_object: self.active_object(),
            cells,
            catalog_page,
            horizontal_handle: self
                .viewport()
                .handle_position(Axis::Horizontal, layout.world_track()),
            vertical_handle: self
                .viewport()
                .handle_position(Axis::Vertical, layout.world_track()),
            catalog_handle: pager.handle_position(layout.catalog_track()),
        }
    }
}

/// Plugin drawing the visible state as outlines
pub struct MapRenderPlugin;

impl Plugin for MapRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_visible_state);
    }
}

/// Window pixel (top-left origin, y down) to 2D world space of a camera
/// centered on the window
fn to_world(window: &Window, x: f32, y: f32) -> Vec2 {
    Vec2::new(x - window.width() * 0.5, window.height() * 0.5 - y)
}

fn outline(gizmos: &mut Gizmos, window: &Window, x: f32, y: f32, size: Vec2, color: Color) {
    let center = to_world(window, x + size.x * 0.5, y + size.y * 0.5);
    gizmos.rect_2d(Isometry2d::from_translation(center), size, color);
}

fn draw_visible_state(
    mut gizmos: Gizmos,
    editor_state: Res<EditorState>,
    windows: Query<&Window>,
) {
    if !editor_state.is_ready() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let layout = editor_state.layout();
    let visible = editor_state.visible_state();
    let cell = visible.window.cell_pixels();

    let frame_color = Color::srgba(0.5, 0.5, 0.5, 0.5);
    let ground_color = Color::srgba(0.3, 0.7, 0.3, 0.6);
    let object_color = Color::srgba(0.9, 0.7, 0.2, 0.8);
    let handle_color = Color::srgba(0.8, 0.8, 0.8, 0.8);

    outline(
        &mut gizmos,
        window,
        0.0,
        0.0,
        Vec2::splat(layout.view_size),
        frame_color,
    );

    for visible_cell in &visible.cells {
        let Some(top) = visible_cell.objects.last() else {
            continue;
        };
        let color = if top.stack_position == GROUND_STACK_POSITION {
            ground_color
        } else {
            object_color
        };
        outline(
            &mut gizmos,
            window,
            visible_cell.pixel.x,
            visible_cell.pixel.y,
            Vec2::splat(cell),
            color,
        );
    }

    if let Some(pixel) = visible.active_pixel {
        let cursor_color = match visible.mode {
            EditMode::Place => Color::srgba(0.0, 0.8, 1.0, 0.9),
            EditMode::Delete => Color::srgba(0.8, 0.2, 0.2, 0.9),
            EditMode::Move => Color::srgba(0.9, 0.9, 0.2, 0.9),
        };
        outline(
            &mut gizmos,
            window,
            pixel.x,
            pixel.y,
            Vec2::splat(cell),
            cursor_color,
        );
    }

    // Scrollbar handles
    let thickness = layout.scrollbar_thickness;
    outline(
        &mut gizmos,
        window,
        visible.horizontal_handle,
        layout.view_size,
        Vec2::new(layout.handle_length, thickness),
        handle_color,
    );
    outline(
        &mut gizmos,
        window,
        layout.view_size,
        visible.vertical_handle,
        Vec2::new(thickness, layout.handle_length),
        handle_color,
    );
    outline(
        &mut gizmos,
        window,
        layout.catalog_handle_left(),
        visible.catalog_handle,
        Vec2::new(thickness, layout.handle_length),
        handle_color,
    );

    let tile_size = editor_state.config().tile_size;
    for slot in &visible.catalog_page {
        let selected = visible.active_object.map(|o| o.id) == Some(slot.id);
        let color = if selected { handle_color } else { frame_color };
        outline(
            &mut gizmos,
            window,
            layout.catalog_left + slot.pixel.x,
            slot.pixel.y,
            Vec2::splat(tile_size),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, PointerPos};
    use crate::EditorConfig;
    use worldmap_core::{Catalog, ObjectFlags, SpriteSheet, SpriteType};

    fn state() -> EditorState {
        let mut state = EditorState::new(EditorConfig::default()).unwrap();
        state.ready(
            Catalog::from_sheets(vec![SpriteSheet {
                file: "items.png".to_string(),
                first_sprite_id: 10,
                last_sprite_id: 49,
                sprite_type: SpriteType::Single,
                flags: ObjectFlags::default(),
            }])
            .unwrap(),
        );
        state
    }

    fn click_cell(state: &mut EditorState, i: u32, j: u32) {
        let pos = PointerPos::world(i as f32 * 32.0 + 1.0, j as f32 * 32.0 + 1.0);
        state.on_pointer_down(pos, Modifiers::NONE).unwrap();
        state.on_pointer_up(pos);
    }

    #[test]
    fn test_visible_cells_only_inside_window() {
        let mut state = state();
        state.select_object(10).unwrap();
        click_cell(&mut state, 0, 0);
        click_cell(&mut state, 19, 19);
        state.pan(5, 0);
        click_cell(&mut state, 0, 3);

        let visible = state.visible_state();
        let positions: Vec<_> = visible.cells.iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![GridCoordinate::new(5, 3), GridCoordinate::new(19, 19)]
        );
        assert_eq!(visible.cells[0].pixel, ScreenPoint::new(0.0, 96.0));
        assert_eq!(visible.cells[1].pixel, ScreenPoint::new(448.0, 608.0));
        assert_eq!(visible.cells[0].objects[0].id, 10);
    }

    #[test]
    fn test_active_pixel_hidden_when_scrolled_away() {
        let mut state = state();
        state.on_pointer_move(PointerPos::world(40.0, 40.0)).unwrap();
        assert_eq!(
            state.visible_state().active_pixel,
            Some(ScreenPoint::new(32.0, 32.0))
        );
        state.pan(10, 0);
        assert_eq!(state.visible_state().active_pixel, None);
    }

    #[test]
    fn test_catalog_page_slots() {
        let mut state = state();
        state.on_scroll(1.0, crate::input::Surface::Catalog).unwrap();
        let visible = state.visible_state();
        assert_eq!(visible.catalog_page.len(), 20);
        let first = &visible.catalog_page[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.id, 11);
        assert_eq!(first.sheet, "items.png");
        assert_eq!(first.pixel, ScreenPoint::new(0.0, 0.0));
        assert_eq!(visible.catalog_page[2].pixel, ScreenPoint::new(0.0, 64.0));
        assert_eq!(first.sprite, SpriteType::Single.sprite_rect(1));
        assert!(visible.catalog_handle > 0.0);
    }

    #[test]
    fn test_handles_track_viewport() {
        let mut state = state();
        assert_eq!(state.visible_state().vertical_handle, 0.0);
        state.pan(0, 980);
        let visible = state.visible_state();
        assert_eq!(visible.vertical_handle, 576.0);
        assert_eq!(visible.horizontal_handle, 0.0);
    }
}
