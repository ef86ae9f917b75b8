//! Viewport origin, zoom level and layer, clamped to the world

use crate::config::EditorConfig;
use crate::scrollbar::ScrollTrack;
use bevy::log::debug;
use worldmap_core::{GridCoordinate, MapError, ViewWindow, WorldSize};

/// Zoom factor that halves the visible extent
pub const ZOOM_IN: f32 = 2.0;
/// Zoom factor that doubles the visible extent
pub const ZOOM_OUT: f32 = 0.5;

/// Axis of a viewport scrollbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Cells visible along each axis at `zoom`
pub fn visible_extent(tile_window: u32, zoom: f32) -> u32 {
    (tile_window as f32 / zoom).round() as u32
}

/// Origin, zoom and layer of the visible part of the world.
///
/// Every mutation keeps `origin <= world - visible_extent` on both axes, so
/// the visible window never extends past the world edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    origin: GridCoordinate,
    zoom: f32,
    world: WorldSize,
    tile_window: u32,
    tile_size: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Viewport {
    /// Viewport at the world origin using the configured zoom bounds.
    ///
    /// Expects a config that passed [`EditorConfig::validate`].
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            origin: GridCoordinate::default(),
            zoom: config.initial_zoom.clamp(config.min_zoom, config.max_zoom),
            world: config.world,
            tile_window: config.tile_window,
            tile_size: config.tile_size,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    pub fn origin(&self) -> GridCoordinate {
        self.origin
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Layer currently shown
    pub fn layer(&self) -> u32 {
        self.origin.k
    }

    /// Cells visible along each axis at the current zoom
    pub fn visible_extent(&self) -> u32 {
        visible_extent(self.tile_window, self.zoom)
    }

    /// Largest allowed origin on each axis
    pub fn max_origin(&self) -> (u32, u32) {
        let extent = self.visible_extent();
        (
            self.world.width.saturating_sub(extent),
            self.world.height.saturating_sub(extent),
        )
    }

    /// Screen transform for the current origin and zoom
    pub fn window(&self) -> ViewWindow {
        ViewWindow {
            origin: self.origin,
            extent: self.visible_extent(),
            zoom: self.zoom,
            tile_size: self.tile_size,
        }
    }

    /// Move the origin by whole cells, clamping each axis independently.
    ///
    /// Returns whether the origin changed.
    pub fn pan(&mut self, delta_i: i64, delta_j: i64) -> bool {
        let i = i64::from(self.origin.i).saturating_add(delta_i);
        let j = i64::from(self.origin.j).saturating_add(delta_j);
        self.set_origin(i, j)
    }

    /// Multiply the zoom level by `factor` (exactly 0.5 or 2) and recenter on
    /// `focus`.
    ///
    /// The new zoom is clamped to the configured bounds. An unsupported factor
    /// fails with [`MapError::InvalidZoomFactor`] and changes nothing.
    pub fn zoom_by(&mut self, factor: f32, focus: GridCoordinate) -> Result<bool, MapError> {
        if factor != ZOOM_IN && factor != ZOOM_OUT {
            return Err(MapError::InvalidZoomFactor(factor));
        }
        let zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if zoom == self.zoom {
            debug!("Zoom already at bound {}", self.zoom);
            return Ok(false);
        }
        self.zoom = zoom;
        self.recenter(focus);
        Ok(true)
    }

    /// Put `focus` in the middle of the visible window, as far as the world
    /// edges allow
    pub fn recenter(&mut self, focus: GridCoordinate) -> bool {
        let half = i64::from(self.visible_extent() / 2);
        self.set_origin(i64::from(focus.i) - half, i64::from(focus.j) - half)
    }

    /// Set one origin axis from a scrollbar handle dragged to `pixel`
    pub fn scroll_to_pixel(&mut self, axis: Axis, pixel: f32, track: ScrollTrack) -> bool {
        let (max_i, max_j) = self.max_origin();
        match axis {
            Axis::Horizontal => {
                let i = track.offset_at(pixel, max_i);
                self.set_origin(i64::from(i), i64::from(self.origin.j))
            }
            Axis::Vertical => {
                let j = track.offset_at(pixel, max_j);
                self.set_origin(i64::from(self.origin.i), i64::from(j))
            }
        }
    }

    /// Leading edge of a scrollbar handle for the current origin
    pub fn handle_position(&self, axis: Axis, track: ScrollTrack) -> f32 {
        let (max_i, max_j) = self.max_origin();
        match axis {
            Axis::Horizontal => track.handle_position(self.origin.i, max_i),
            Axis::Vertical => track.handle_position(self.origin.j, max_j),
        }
    }

    /// Step to another layer, clamped to the world depth
    pub fn change_layer(&mut self, delta: i32) -> bool {
        let top = i64::from(self.world.depth.saturating_sub(1));
        let k = (i64::from(self.origin.k) + i64::from(delta)).clamp(0, top) as u32;
        let changed = k != self.origin.k;
        self.origin.k = k;
        changed
    }

    fn set_origin(&mut self, i: i64, j: i64) -> bool {
        let (max_i, max_j) = self.max_origin();
        let origin = self.origin;
        self.origin.i = i.clamp(0, i64::from(max_i)) as u32;
        self.origin.j = j.clamp(0, i64::from(max_j)) as u32;
        origin != self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(&EditorConfig::default())
    }

    fn assert_origin_in_bounds(viewport: &Viewport) {
        let (max_i, max_j) = viewport.max_origin();
        assert!(viewport.origin().i <= max_i);
        assert!(viewport.origin().j <= max_j);
    }

    #[test]
    fn test_visible_extent_follows_zoom() {
        assert_eq!(visible_extent(20, 1.0), 20);
        assert_eq!(visible_extent(20, 0.5), 40);
        assert_eq!(visible_extent(20, 0.125), 160);
        assert_eq!(visible_extent(20, 2.0), 10);
    }

    #[test]
    fn test_pan_clamps_each_axis() {
        let mut viewport = viewport();
        assert!(!viewport.pan(-1, 0));
        assert!(viewport.pan(5, 3));
        assert_eq!(viewport.origin(), GridCoordinate::new(5, 3));

        viewport.pan(10_000, -10);
        assert_eq!(viewport.origin(), GridCoordinate::new(980, 0));
    }

    #[test]
    fn test_zoom_out_recenters_on_focus() {
        let mut viewport = viewport();
        assert!(viewport
            .zoom_by(ZOOM_OUT, GridCoordinate::new(50, 50))
            .unwrap());
        assert_eq!(viewport.zoom(), 0.5);
        assert_eq!(viewport.visible_extent(), 40);
        assert_eq!(viewport.origin(), GridCoordinate::new(30, 30));
    }

    #[test]
    fn test_zoom_recenter_clamps_near_edges() {
        let mut viewport = viewport();
        viewport.zoom_by(ZOOM_OUT, GridCoordinate::new(5, 995)).unwrap();
        assert_eq!(viewport.origin(), GridCoordinate::new(0, 960));
    }

    #[test]
    fn test_invalid_zoom_factor_leaves_state() {
        let mut viewport = viewport();
        viewport.pan(7, 7);
        let before = viewport.clone();
        for factor in [0.0, 1.0, 3.0, 0.25, -2.0, f32::NAN] {
            assert!(matches!(
                viewport.zoom_by(factor, GridCoordinate::new(50, 50)),
                Err(MapError::InvalidZoomFactor(_))
            ));
            assert_eq!(viewport, before);
        }
    }

    #[test]
    fn test_zoom_clamped_to_bounds() {
        let mut viewport = viewport();
        assert!(!viewport.zoom_by(ZOOM_IN, GridCoordinate::new(0, 0)).unwrap());
        assert_eq!(viewport.zoom(), 1.0);

        for _ in 0..5 {
            viewport
                .zoom_by(ZOOM_OUT, GridCoordinate::new(500, 500))
                .unwrap();
        }
        assert_eq!(viewport.zoom(), 0.125);
        assert_eq!(viewport.visible_extent(), 160);
    }

    #[test]
    fn test_configurable_upper_zoom_bound() {
        let mut config = EditorConfig::default();
        config.max_zoom = 2.0;
        let mut viewport = Viewport::new(&config);
        viewport.zoom_by(ZOOM_IN, GridCoordinate::new(100, 100)).unwrap();
        assert_eq!(viewport.zoom(), 2.0);
        assert_eq!(viewport.visible_extent(), 10);
        assert_eq!(viewport.origin(), GridCoordinate::new(95, 95));
    }

    #[test]
    fn test_origin_stays_in_bounds_for_mixed_operations() {
        let mut viewport = viewport();
        let focus = GridCoordinate::new(990, 990);
        let steps: [(i64, i64, Option<f32>); 7] = [
            (1000, 1000, None),
            (0, 0, Some(ZOOM_IN)),
            (0, 0, Some(ZOOM_OUT)),
            (0, 0, Some(ZOOM_OUT)),
            (-3, 2, None),
            (0, 0, Some(ZOOM_IN)),
            (50, 50, None),
        ];
        for (di, dj, factor) in steps {
            viewport.pan(di, dj);
            if let Some(factor) = factor {
                viewport.zoom_by(factor, focus).unwrap();
            }
            assert_origin_in_bounds(&viewport);
        }
    }

    #[test]
    fn test_world_smaller_than_window() {
        let mut config = EditorConfig::default();
        config.world = WorldSize::new(8, 8);
        let mut viewport = Viewport::new(&config);
        assert_eq!(viewport.max_origin(), (0, 0));
        viewport.pan(3, 3);
        assert_eq!(viewport.origin(), GridCoordinate::new(0, 0));
    }

    #[test]
    fn test_pan_with_extreme_delta_clamps() {
        let mut viewport = viewport();
        assert!(viewport.pan(i64::MAX, i64::MAX));
        assert_eq!(viewport.origin(), GridCoordinate::new(980, 980));
        assert!(viewport.pan(i64::MIN, i64::MIN));
        assert_eq!(viewport.origin(), GridCoordinate::new(0, 0));
    }

    #[test]
    fn test_scrollbar_drag() {
        let mut viewport = viewport();
        let track = ScrollTrack::new(640.0, 64.0);
        assert!(viewport.scroll_to_pixel(Axis::Vertical, 320.0, track));
        assert_eq!(viewport.origin(), GridCoordinate::new(0, 490));
        assert_eq!(viewport.handle_position(Axis::Vertical, track), 288.0);
        assert_eq!(viewport.handle_position(Axis::Horizontal, track), 0.0);
    }

    #[test]
    fn test_change_layer_clamps() {
        let mut config = EditorConfig::default();
        config.world = WorldSize::layered(100, 100, 3);
        let mut viewport = Viewport::new(&config);
        assert!(!viewport.change_layer(-1));
        assert!(viewport.change_layer(5));
        assert_eq!(viewport.layer(), 2);
        assert_eq!(viewport.window().origin.k, 2);
    }
}
