//! Editor configuration

use crate::input::EditorLayout;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use worldmap_core::WorldSize;

/// Rejected editor configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("zoom level {0} is not a power of two")]
    ZoomNotPowerOfTwo(f32),
    #[error("minimum zoom {min} exceeds maximum zoom {max}")]
    ZoomRange { min: f32, max: f32 },
    #[error("initial zoom {zoom} lies outside {min}..={max}")]
    InitialZoom { zoom: f32, min: f32, max: f32 },
    #[error("{0}")]
    World(String),
}

/// Static configuration of an editing session
///
/// Use this to size the world and the on-screen windows when embedding the
/// editor. All values have defaults matching a 1000x1000 single-layer world
/// viewed through a 20x20 tile window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// World dimensions in cells
    pub world: WorldSize,
    /// Edge length of one cell at zoom 1, in pixels. Default: 32
    pub tile_size: f32,
    /// Cells visible along each axis at zoom 1. Default: 20
    pub tile_window: u32,
    /// Smallest zoom level. Default: 0.125
    pub min_zoom: f32,
    /// Largest zoom level. Default: 1 (single-layer worlds may use 2)
    pub max_zoom: f32,
    /// Zoom level at startup; a power of two within the bounds. Default: 1
    pub initial_zoom: f32,
    /// Visible catalog rows. Default: 20
    pub catalog_rows: u32,
    /// Catalog columns; 1 for a flat list. Default: 1
    pub catalog_columns: u32,
    /// Length of a scrollbar handle in pixels. Default: 64
    pub handle_length: f32,
    /// Thickness of the world view scrollbars in pixels. Default: 20
    pub scrollbar_thickness: f32,
    /// Undo units kept; `None` keeps everything. Default: 256
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            world: WorldSize::new(1000, 1000),
            tile_size: 32.0,
            tile_window: 20,
            min_zoom: 0.125,
            max_zoom: 1.0,
            initial_zoom: 1.0,
            catalog_rows: 20,
            catalog_columns: 1,
            handle_length: 64.0,
            scrollbar_thickness: 20.0,
            history_limit: Some(256),
        }
    }
}

impl EditorConfig {
    /// Check the configuration before an engine is built from it
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("world width", self.world.width),
            ("world height", self.world.height),
            ("world depth", self.world.depth),
            ("tile window", self.tile_window),
            ("catalog rows", self.catalog_rows),
            ("catalog columns", self.catalog_columns),
        ];
        if let Some(&(name, _)) = counts.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero(name));
        }
        self.world
            .validate()
            .map_err(|e| ConfigError::World(e.to_string()))?;
        if self.tile_size <= 0.0 {
            return Err(ConfigError::Zero("tile size"));
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Zero("history limit"));
        }
        for zoom in [self.min_zoom, self.max_zoom, self.initial_zoom] {
            if !is_power_of_two(zoom) {
                return Err(ConfigError::ZoomNotPowerOfTwo(zoom));
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ConfigError::InitialZoom {
                zoom: self.initial_zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }

    /// Pixel layout of the world view and catalog for this configuration
    pub fn layout(&self) -> EditorLayout {
        EditorLayout::from_config(self)
    }
}

fn is_power_of_two(value: f32) -> bool {
    value > 0.0 && value.is_finite() && value.log2().fract() == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EditorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut config = EditorConfig::default();
        config.world.depth = 0;
        assert_eq!(config.validate(), Err(ConfigError::Zero("world depth")));

        let mut config = EditorConfig::default();
        config.history_limit = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::Zero("history limit")));
    }

    #[test]
    fn test_rejects_bad_zoom_bounds() {
        let mut config = EditorConfig::default();
        config.max_zoom = 3.0;
        assert_eq!(config.validate(), Err(ConfigError::ZoomNotPowerOfTwo(3.0)));

        let mut config = EditorConfig::default();
        config.min_zoom = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZoomRange { .. })
        ));

        let mut config = EditorConfig::default();
        config.max_zoom = 2.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_initial_zoom() {
        let mut config = EditorConfig::default();
        config.initial_zoom = 0.3;
        assert_eq!(config.validate(), Err(ConfigError::ZoomNotPowerOfTwo(0.3)));

        config.initial_zoom = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialZoom { .. })
        ));

        config.initial_zoom = 0.25;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_unindexable_world() {
        let mut config = EditorConfig::default();
        config.world = WorldSize::layered(u32::MAX, u32::MAX, 3);
        assert!(matches!(config.validate(), Err(ConfigError::World(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "world": { "width": 64, "height": 32 }, "max_zoom": 2.0 }"#)
                .unwrap();
        assert_eq!(config.world, WorldSize::new(64, 32));
        assert_eq!(config.max_zoom, 2.0);
        assert_eq!(config.tile_window, 20);
    }
}
