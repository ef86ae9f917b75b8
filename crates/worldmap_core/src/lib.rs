//! Core data structures for the world map editor
//!
//! This crate provides the toolkit-independent types for a tile-addressed world:
//! - `GridCoordinate` / `WorldSize` - Cell addressing and the linear index mapping
//! - `ViewWindow` - Screen <-> grid transforms for the visible part of the world
//! - `WorldGrid` - Sparse store of cells, each holding an ordered object stack
//! - `Catalog` - Read-only table of placeable object definitions
//! - `CellRecord` - Serializable export format for a world grid

mod catalog;
mod cell;
mod coords;
mod error;
mod export;
mod grid;
mod object;

pub use catalog::{
    Catalog, CatalogSource, ObjectDefinition, SpriteSheet, SpriteType, MAX_CATALOG_ENTRIES,
};
pub use cell::{AddOutcome, Cell};
pub use coords::{GridCoordinate, LinearIndex, ScreenPoint, ViewWindow, WorldSize};
pub use error::MapError;
pub use export::CellRecord;
pub use grid::WorldGrid;
pub use object::{
    Drawable, ObjectFlags, ObjectId, ObjectRef, PlacedObject, SpriteRect, Stackable,
    GROUND_STACK_POSITION,
};
