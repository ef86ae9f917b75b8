//! The editing state engine: one explicit state value fed by input events

use crate::commands::{Command, CommandHistory};
use crate::config::{ConfigError, EditorConfig};
use crate::input::{
    Component, EditorLayout, InputEvent, Key, KeyAction, Modifiers, PointerPos, Surface,
};
use crate::pager::CatalogPager;
use crate::viewport::{Axis, Viewport, ZOOM_IN, ZOOM_OUT};
use bevy::log::{debug, info};
use bevy::prelude::Resource;
use worldmap_core::{
    AddOutcome, Catalog, CellRecord, GridCoordinate, MapError, ObjectId, ObjectRef, ScreenPoint,
    Stackable, WorldGrid,
};

/// Startup phase of the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorPhase {
    /// Waiting for the catalog; input is ignored
    #[default]
    Loading,
    Ready,
}

/// What a click in the world window does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    /// Put the active object on the cell
    #[default]
    Place,
    /// Remove the top object of the cell
    Delete,
    /// Lift the top object of the cell and make it the active object
    Move,
}

/// File work requested by a key press, carried out by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Save the map document
    Save,
    /// Write the bare cell record array
    Export,
}

/// Complete state of an editing session.
///
/// All mutation goes through the input handlers and the operations below;
/// every change sets the redraw flag returned by [`EditorState::take_redraw`].
#[derive(Debug, Resource)]
pub struct EditorState {
    config: EditorConfig,
    layout: EditorLayout,
    phase: EditorPhase,
    catalog: Catalog,
    grid: WorldGrid,
    viewport: Viewport,
    history: CommandHistory,
    pager: CatalogPager,
    mode: EditMode,
    active_object: Option<ObjectRef>,
    /// Cell under the pointer, or the last one it was over
    active_position: GridCoordinate,
    pointer_down: bool,
    /// Component that received the pointer-down, until pointer-up
    clicked: Component,
    /// Whether moving the held pointer repeats the click action
    drag_paint: bool,
    /// Last clicked cell; Shift+click draws a line from here
    line_anchor: Option<GridCoordinate>,
    pub pending_action: Option<PendingAction>,
    needs_redraw: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_valid_config(EditorConfig::default())
    }
}

impl EditorState {
    /// Create an engine in the loading phase
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EditorConfig) -> Self {
        Self {
            layout: config.layout(),
            phase: EditorPhase::Loading,
            catalog: Catalog::default(),
            grid: WorldGrid::new(config.world),
            viewport: Viewport::new(&config),
            history: CommandHistory::new(config.history_limit),
            pager: CatalogPager::new(config.catalog_rows, config.catalog_columns, 0),
            mode: EditMode::Place,
            active_object: None,
            active_position: GridCoordinate::default(),
            pointer_down: false,
            clicked: Component::None,
            drag_paint: false,
            line_anchor: None,
            pending_action: None,
            needs_redraw: true,
            config,
        }
    }

    /// Install the loaded catalog and start accepting input
    pub fn ready(&mut self, catalog: Catalog) {
        info!("Editor ready with {} catalog objects", catalog.len());
        self.pager.set_total(catalog.len());
        self.catalog = catalog;
        self.phase = EditorPhase::Ready;
        self.needs_redraw = true;
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == EditorPhase::Ready
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn layout(&self) -> &EditorLayout {
        &self.layout
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn pager(&self) -> &CatalogPager {
        &self.pager
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn active_object(&self) -> Option<ObjectRef> {
        self.active_object
    }

    pub fn active_position(&self) -> GridCoordinate {
        self.active_position
    }

    /// Component holding the pointer, if a button is down
    pub fn clicked(&self) -> Component {
        self.clicked
    }

    /// Whether anything changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Route one input event
    pub fn handle(&mut self, event: InputEvent) -> Result<(), MapError> {
        if !self.is_ready() {
            debug!("Ignoring {:?} while loading", event);
            return Ok(());
        }
        match event {
            InputEvent::Key { key, modifiers } => self.on_key(key, modifiers),
            InputEvent::PointerDown { pos, modifiers } => self.on_pointer_down(pos, modifiers),
            InputEvent::PointerMove { pos } => self.on_pointer_move(pos),
            InputEvent::PointerUp { pos } => {
                self.on_pointer_up(pos);
                Ok(())
            }
            InputEvent::Scroll { delta, target } => self.on_scroll(delta, target),
        }
    }

    pub fn on_key(&mut self, key: Key, modifiers: Modifiers) -> Result<(), MapError> {
        match KeyAction::from_key(key, modifiers) {
            KeyAction::Pan { di, dj } => {
                self.pan(di, dj);
            }
            KeyAction::ZoomIn => {
                self.zoom(ZOOM_IN)?;
            }
            KeyAction::ZoomOut => {
                self.zoom(ZOOM_OUT)?;
            }
            KeyAction::Undo => {
                self.undo()?;
            }
            KeyAction::Redo => {
                self.redo()?;
            }
            KeyAction::Save => self.pending_action = Some(PendingAction::Save),
            KeyAction::Export => self.pending_action = Some(PendingAction::Export),
            KeyAction::ToggleDelete => self.toggle_delete(),
            KeyAction::ToggleMove => self.toggle_move(),
            KeyAction::Cancel => self.cancel(),
            KeyAction::LayerUp => {
                self.change_layer(1);
            }
            KeyAction::LayerDown => {
                self.change_layer(-1);
            }
        }
        Ok(())
    }

    pub fn on_pointer_down(
        &mut self,
        pos: PointerPos,
        modifiers: Modifiers,
    ) -> Result<(), MapError> {
        self.history.finish();
        self.pointer_down = true;
        self.clicked = self.layout.hit_test(pos);
        match self.clicked {
            Component::WorldWindow => {
                let coord = self.resolve(pos.point)?;
                self.set_active_position(coord);
                let description = self.gesture_description();
                self.history.begin(description);
                self.drag_paint = self.mode != EditMode::Move;
                match self.line_anchor {
                    Some(anchor) if modifiers.shift && anchor.k == coord.k => {
                        for cell in grid_line(anchor, coord).into_iter().skip(1) {
                            self.apply_click(cell)?;
                        }
                    }
                    _ => self.apply_click(coord)?,
                }
                self.line_anchor = Some(coord);
            }
            Component::ViewportHandleHorizontal
            | Component::ViewportHandleVertical
            | Component::CatalogHandle => self.drag_handle(pos.point),
            Component::CatalogWindow => self.pick(pos.point),
            Component::None => {}
        }
        Ok(())
    }

    pub fn on_pointer_move(&mut self, pos: PointerPos) -> Result<(), MapError> {
        if self.clicked.is_handle() {
            self.drag_handle(pos.point);
            return Ok(());
        }
        if self.layout.hit_test(pos) != Component::WorldWindow {
            return Ok(());
        }
        let coord = self.resolve(pos.point)?;
        if coord == self.active_position {
            return Ok(());
        }
        self.set_active_position(coord);
        if self.pointer_down && self.clicked == Component::WorldWindow && self.drag_paint {
            self.apply_click(coord)?;
            self.line_anchor = Some(coord);
        }
        Ok(())
    }

    /// End the gesture; its edits become one undo unit
    pub fn on_pointer_up(&mut self, _pos: PointerPos) {
        self.history.finish();
        self.pointer_down = false;
        self.clicked = Component::None;
        self.drag_paint = false;
    }

    /// Scrolling zooms the world view and pages the catalog
    pub fn on_scroll(&mut self, delta: f32, target: Surface) -> Result<(), MapError> {
        if delta == 0.0 || !delta.is_finite() {
            return Ok(());
        }
        let up = delta < 0.0;
        match target {
            Surface::World => {
                self.zoom(if up { ZOOM_IN } else { ZOOM_OUT })?;
            }
            Surface::Catalog => {
                if self.pager.scroll_by(if up { -1 } else { 1 }) {
                    self.needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Move the viewport by whole cells
    pub fn pan(&mut self, delta_i: i64, delta_j: i64) -> bool {
        let changed = self.viewport.pan(delta_i, delta_j);
        self.needs_redraw |= changed;
        changed
    }

    /// Zoom by exactly 0.5 or 2, recentering on the active position
    pub fn zoom(&mut self, factor: f32) -> Result<bool, MapError> {
        let changed = self.viewport.zoom_by(factor, self.active_position)?;
        self.needs_redraw |= changed;
        Ok(changed)
    }

    pub fn undo(&mut self) -> Result<bool, MapError> {
        let undone = self.history.undo(&mut self.grid)?;
        self.needs_redraw |= undone;
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, MapError> {
        let redone = self.history.redo(&mut self.grid)?;
        self.needs_redraw |= redone;
        Ok(redone)
    }

    pub fn toggle_delete(&mut self) {
        self.mode = match self.mode {
            EditMode::Delete => EditMode::Place,
            _ => EditMode::Delete,
        };
        if self.mode == EditMode::Delete {
            self.active_object = None;
        }
        info!("Edit mode: {:?}", self.mode);
        self.needs_redraw = true;
    }

    pub fn toggle_move(&mut self) {
        self.mode = match self.mode {
            EditMode::Move => EditMode::Place,
            _ => EditMode::Move,
        };
        if self.mode == EditMode::Move {
            self.active_object = None;
        }
        info!("Edit mode: {:?}", self.mode);
        self.needs_redraw = true;
    }

    /// Drop the active object and return to place mode
    pub fn cancel(&mut self) {
        self.active_object = None;
        self.mode = EditMode::Place;
        self.needs_redraw = true;
    }

    /// Make a catalog object the active object
    pub fn select_object(&mut self, id: ObjectId) -> Result<(), MapError> {
        let object = self.catalog.object_ref(id)?;
        self.active_object = Some(object);
        self.mode = EditMode::Place;
        self.needs_redraw = true;
        Ok(())
    }

    /// Show another layer, clamped to the world depth
    pub fn change_layer(&mut self, delta: i32) -> bool {
        let changed = self.viewport.change_layer(delta);
        if changed {
            self.active_position = self.active_position.with_layer(self.viewport.layer());
            self.line_anchor = None;
            debug!("Layer {}", self.viewport.layer());
            self.needs_redraw = true;
        }
        changed
    }

    /// Serializable snapshot of every created cell
    pub fn export(&self) -> Vec<CellRecord> {
        self.grid.export()
    }

    pub fn export_json(&self) -> Result<String, MapError> {
        self.grid.export_json()
    }

    /// Replace the world with imported records; history is cleared
    pub fn import(&mut self, records: Vec<CellRecord>) -> Result<(), MapError> {
        let grid = WorldGrid::import(self.grid.size(), records)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// Replace the world grid, adopting its size; history is cleared
    pub fn replace_grid(&mut self, grid: WorldGrid) {
        if grid.size() != self.config.world {
            self.config.world = grid.size();
            self.viewport = Viewport::new(&self.config);
            self.active_position = GridCoordinate::default();
        }
        self.grid = grid;
        self.history.clear();
        self.line_anchor = None;
        self.needs_redraw = true;
    }

    fn gesture_description(&self) -> &'static str {
        match self.mode {
            EditMode::Place => "Place",
            EditMode::Delete => "Delete",
            EditMode::Move => "Move",
        }
    }

    fn set_active_position(&mut self, coord: GridCoordinate) {
        self.active_position = coord;
        self.needs_redraw = true;
    }

    /// Grid cell under a world view point
    fn resolve(&self, point: ScreenPoint) -> Result<GridCoordinate, MapError> {
        let coord = self.viewport.window().screen_to_grid(point)?;
        self.grid.size().check(coord)?;
        Ok(coord)
    }

    /// Perform the current mode's action on one cell
    fn apply_click(&mut self, coord: GridCoordinate) -> Result<(), MapError> {
        let index = self.grid.index_of(coord)?;
        match self.mode {
            EditMode::Place => {
                let Some(object) = self.active_object else {
                    return Ok(());
                };
                let (index, outcome) = self.grid.place(coord, &object)?;
                let replaced = match outcome {
                    AddOutcome::ReplacedGround { previous } => Some(previous),
                    AddOutcome::Appended { .. } => None,
                };
                self.history.record(Command::Place {
                    index,
                    object,
                    replaced,
                });
            }
            EditMode::Delete => {
                let Some(removed) = self.grid.remove_top_object(index) else {
                    return Ok(());
                };
                self.history.record(Command::Delete { index, removed });
            }
            EditMode::Move => {
                let Some(removed) = self.grid.remove_top_object(index) else {
                    return Ok(());
                };
                let object = self
                    .catalog
                    .get(removed.id)
                    .map(|definition| definition.object_ref())
                    .unwrap_or(ObjectRef {
                        id: removed.id,
                        ground: removed.is_ground(),
                    });
                info!("Lifted object {} from {}", object.id, coord);
                self.history.record(Command::Delete { index, removed });
                self.active_object = Some(object);
                self.mode = EditMode::Place;
                self.drag_paint = false;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    fn drag_handle(&mut self, point: ScreenPoint) {
        let changed = match self.clicked {
            Component::ViewportHandleHorizontal => {
                self.viewport
                    .scroll_to_pixel(Axis::Horizontal, point.x, self.layout.world_track())
            }
            Component::ViewportHandleVertical => {
                self.viewport
                    .scroll_to_pixel(Axis::Vertical, point.y, self.layout.world_track())
            }
            Component::CatalogHandle => self
                .pager
                .scroll_to_pixel(point.y, self.layout.catalog_track()),
            _ => false,
        };
        self.needs_redraw |= changed;
    }

    /// Select the catalog entry under `point`; empty slots clear the selection
    fn pick(&mut self, point: ScreenPoint) {
        let picked = self
            .pager
            .index_at(point, self.config.tile_size)
            .and_then(|index| self.catalog.entry_at(index))
            .map(|definition| definition.object_ref());
        match picked {
            Some(object) => {
                debug!("Selected catalog object {}", object.id);
                self.active_object = Some(object);
                self.mode = EditMode::Place;
            }
            None => self.active_object = None,
        }
        self.needs_redraw = true;
    }
}

/// Cells on the straight line from `from` to `to`, both included
fn grid_line(from: GridCoordinate, to: GridCoordinate) -> Vec<GridCoordinate> {
    let (x0, y0) = (i64::from(from.i), i64::from(from.j));
    let (x1, y1) = (i64::from(to.i), i64::from(to.j));
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    let mut cells = Vec::new();

    loop {
        // Both endpoints are valid cells, so every point between them is too
        cells.push(GridCoordinate::layered(x as u32, y as u32, from.k));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}
