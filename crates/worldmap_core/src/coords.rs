//! Cell addressing and the screen <-> grid <-> index transforms

use crate::MapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat storage index of a cell: `i + j * width + k * width * height`
pub type LinearIndex = usize;

/// Integer address of one world cell.
///
/// `k` is the layer and stays 0 in single-layer worlds; it is omitted from the
/// serialized form in that case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "RawPosition")]
pub struct GridCoordinate {
    pub i: u32,
    pub j: u32,
    #[serde(skip_serializing_if = "is_base_layer")]
    pub k: u32,
}

fn is_base_layer(k: &u32) -> bool {
    *k == 0
}

/// Untrusted position as it appears in imported JSON
#[derive(Deserialize)]
struct RawPosition {
    i: f64,
    j: f64,
    #[serde(default)]
    k: f64,
}

impl TryFrom<RawPosition> for GridCoordinate {
    type Error = MapError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::from_f64(raw.i, raw.j, raw.k)
    }
}

impl GridCoordinate {
    /// Create a coordinate on the base layer
    pub const fn new(i: u32, j: u32) -> Self {
        Self { i, j, k: 0 }
    }

    /// Create a coordinate on a specific layer
    pub const fn layered(i: u32, j: u32, k: u32) -> Self {
        Self { i, j, k }
    }

    /// Build a coordinate from untyped numeric input.
    ///
    /// Rejects fractional, negative and non-finite values with
    /// [`MapError::InvalidCoordinate`].
    pub fn from_f64(i: f64, j: f64, k: f64) -> Result<Self, MapError> {
        Ok(Self {
            i: axis_from_f64("i", i)?,
            j: axis_from_f64("j", j)?,
            k: axis_from_f64("k", k)?,
        })
    }

    /// Build a coordinate from signed axis values, rejecting negatives
    pub fn from_signed(i: i64, j: i64, k: i64) -> Result<Self, MapError> {
        let axis = |name: &str, value: i64| {
            u32::try_from(value).map_err(|_| {
                MapError::InvalidCoordinate(format!("{name} = {value} is not a valid grid axis"))
            })
        };
        Ok(Self {
            i: axis("i", i)?,
            j: axis("j", j)?,
            k: axis("k", k)?,
        })
    }

    /// Same position on another layer
    pub fn with_layer(self, k: u32) -> Self {
        Self { k, ..self }
    }
}

fn axis_from_f64(name: &str, value: f64) -> Result<u32, MapError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(MapError::InvalidCoordinate(format!(
            "{name} = {value} must be an integer"
        )));
    }
    if value < 0.0 || value > f64::from(u32::MAX) {
        return Err(MapError::InvalidCoordinate(format!(
            "{name} = {value} is not a valid grid axis"
        )));
    }
    Ok(value as u32)
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.k == 0 {
            write!(f, "({}, {})", self.i, self.j)
        } else {
            write!(f, "({}, {}, {})", self.i, self.j, self.k)
        }
    }
}

/// Fixed dimensions of the world in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_depth() -> u32 {
    1
}

impl Default for WorldSize {
    fn default() -> Self {
        Self::new(1000, 1000)
    }
}

impl fmt::Display for WorldSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth == 1 {
            write!(f, "{}x{}", self.width, self.height)
        } else {
            write!(f, "{}x{}x{}", self.width, self.height, self.depth)
        }
    }
}

impl WorldSize {
    /// Single-layer world
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Layered world
    pub const fn layered(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total number of addressable cells, saturating for sizes that fail
    /// [`Self::validate`]
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    fn checked_cell_count(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.depth as usize)
    }

    /// Reject empty axes and worlds whose cells cannot all be indexed
    pub fn validate(&self) -> Result<(), MapError> {
        let invalid = |reason: &str| MapError::InvalidWorldSize {
            size: *self,
            reason: reason.to_string(),
        };
        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(invalid("every axis must be at least one cell"));
        }
        self.checked_cell_count()
            .map(|_| ())
            .ok_or_else(|| invalid("too many cells to index"))
    }

    /// Whether every axis of `coord` lies inside the world
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.i < self.width && coord.j < self.height && coord.k < self.depth
    }

    /// Fail with [`MapError::OutOfBounds`] unless `coord` lies inside the world
    pub fn check(&self, coord: GridCoordinate) -> Result<(), MapError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(MapError::OutOfBounds {
                position: coord.to_string(),
                size: *self,
            })
        }
    }

    /// Grid coordinate to linear index
    pub fn index_of(&self, coord: GridCoordinate) -> Result<LinearIndex, MapError> {
        self.check(coord)?;
        let width = self.width as usize;
        width
            .checked_mul(self.height as usize)
            .and_then(|layer| layer.checked_mul(coord.k as usize))
            .and_then(|base| base.checked_add(coord.j as usize * width))
            .and_then(|base| base.checked_add(coord.i as usize))
            .ok_or_else(|| MapError::OutOfBounds {
                position: coord.to_string(),
                size: *self,
            })
    }

    /// Linear index back to its grid coordinate; exact inverse of [`Self::index_of`]
    pub fn coordinate_of(&self, index: LinearIndex) -> Result<GridCoordinate, MapError> {
        if index >= self.cell_count() {
            return Err(MapError::OutOfBounds {
                position: format!("index {index}"),
                size: *self,
            });
        }
        let width = self.width as usize;
        let layer = width.saturating_mul(self.height as usize);
        Ok(GridCoordinate::layered(
            (index % width) as u32,
            ((index % layer) / width) as u32,
            (index / layer) as u32,
        ))
    }
}

/// Pointer or pixel position relative to the top-left of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The part of one world layer currently mapped onto the screen.
///
/// `extent` is the number of cells visible along each axis; `zoom` scales the
/// on-screen size of a cell to `tile_size * zoom` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub origin: GridCoordinate,
    pub extent: u32,
    pub zoom: f32,
    pub tile_size: f32,
}

impl ViewWindow {
    /// On-screen size of one cell in pixels
    pub fn cell_pixels(&self) -> f32 {
        self.tile_size * self.zoom
    }

    /// Resolve a pointer position to the grid cell beneath it.
    ///
    /// Floors rather than truncates, so positions just left of or above the
    /// surface resolve to the previous cell (and fail if that is negative).
    pub fn screen_to_grid(&self, point: ScreenPoint) -> Result<GridCoordinate, MapError> {
        let cell = self.cell_pixels();
        let di = (point.x / cell).floor();
        let dj = (point.y / cell).floor();
        if !di.is_finite() || !dj.is_finite() {
            return Err(MapError::InvalidCoordinate(format!(
                "pointer ({}, {}) does not map to a cell",
                point.x, point.y
            )));
        }
        GridCoordinate::from_signed(
            i64::from(self.origin.i) + di as i64,
            i64::from(self.origin.j) + dj as i64,
            i64::from(self.origin.k),
        )
    }

    /// Whether `coord` is on the viewed layer and inside the visible square
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.k == self.origin.k
            && coord.i >= self.origin.i
            && coord.j >= self.origin.j
            && u64::from(coord.i) < u64::from(self.origin.i) + u64::from(self.extent)
            && u64::from(coord.j) < u64::from(self.origin.j) + u64::from(self.extent)
    }

    /// Top-left pixel of `coord`, or `None` when it is not visible
    pub fn grid_to_screen(&self, coord: GridCoordinate) -> Option<ScreenPoint> {
        if !self.contains(coord) {
            return None;
        }
        let cell = self.cell_pixels();
        Some(ScreenPoint::new(
            (coord.i - self.origin.i) as f32 * cell,
            (coord.j - self.origin.j) as f32 * cell,
        ))
    }
}
