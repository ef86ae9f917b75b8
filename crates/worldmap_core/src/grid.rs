//! Sparse world grid keyed by linear index

use crate::{
    AddOutcome, Cell, GridCoordinate, LinearIndex, MapError, ObjectId, PlacedObject, Stackable,
    WorldSize,
};
use std::collections::BTreeMap;

/// Sparse store of world cells.
///
/// Cells are created on first placement and kept for the lifetime of the grid
/// even when their stack becomes empty. Untouched regions cost nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrid {
    size: WorldSize,
    cells: BTreeMap<LinearIndex, Cell>,
}

impl WorldGrid {
    /// Create an empty grid
    pub fn new(size: WorldSize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> WorldSize {
        self.size
    }

    /// Number of cells that have been created
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a linear index, if it was ever created
    pub fn get_cell(&self, index: LinearIndex) -> Option<&Cell> {
        self.cells.get(&index)
    }

    /// Cell at a coordinate, if it was ever created
    pub fn cell_at(&self, coord: GridCoordinate) -> Option<&Cell> {
        let index = self.size.index_of(coord).ok()?;
        self.cells.get(&index)
    }

    /// Linear index of a coordinate in this grid
    pub fn index_of(&self, coord: GridCoordinate) -> Result<LinearIndex, MapError> {
        self.size.index_of(coord)
    }

    /// Get or lazily create the cell at `index`.
    ///
    /// `coord` must be the coordinate `index` maps to.
    pub fn ensure_cell(
        &mut self,
        index: LinearIndex,
        coord: GridCoordinate,
    ) -> Result<&mut Cell, MapError> {
        let expected = self.size.index_of(coord)?;
        if expected != index {
            return Err(MapError::InvalidCoordinate(format!(
                "{coord} maps to index {expected}, not {index}"
            )));
        }
        Ok(self.cells.entry(index).or_insert_with(|| {
            tracing::trace!(index, %coord, "cell created");
            Cell::new(coord)
        }))
    }

    /// Put an object on the cell at `index`, creating the cell if needed
    pub fn add_object<S: Stackable + ?Sized>(
        &mut self,
        index: LinearIndex,
        object: &S,
    ) -> Result<AddOutcome, MapError> {
        let coord = self.size.coordinate_of(index)?;
        Ok(self.ensure_cell(index, coord)?.add(object))
    }

    /// Put an object on the cell at `coord`, returning the cell's index
    pub fn place<S: Stackable + ?Sized>(
        &mut self,
        coord: GridCoordinate,
        object: &S,
    ) -> Result<(LinearIndex, AddOutcome), MapError> {
        let index = self.size.index_of(coord)?;
        let outcome = self.ensure_cell(index, coord)?.add(object);
        Ok((index, outcome))
    }

    /// Pop the most recently stacked object; `None` for absent or empty cells
    pub fn remove_top_object(&mut self, index: LinearIndex) -> Option<PlacedObject> {
        self.cells.get_mut(&index)?.pop_top()
    }

    /// Remove the most recently stacked instance of `id` at `index`
    pub fn remove_object(&mut self, index: LinearIndex, id: ObjectId) -> Option<PlacedObject> {
        self.cells.get_mut(&index)?.remove_latest(id)
    }

    /// Remove exactly `placed` from the cell at `index`
    pub fn remove_placed(
        &mut self,
        index: LinearIndex,
        placed: &PlacedObject,
    ) -> Option<PlacedObject> {
        self.cells.get_mut(&index)?.remove_placed(placed)
    }

    /// Put a removed object back at its recorded stack position.
    ///
    /// Returns the ground object it displaced, if any.
    pub fn restore_object(
        &mut self,
        index: LinearIndex,
        placed: PlacedObject,
    ) -> Result<Option<PlacedObject>, MapError> {
        let coord = self.size.coordinate_of(index)?;
        Ok(self.ensure_cell(index, coord)?.restore(placed))
    }

    /// All created cells in index order
    pub fn cells(&self) -> impl Iterator<Item = (LinearIndex, &Cell)> {
        self.cells.iter().map(|(&index, cell)| (index, cell))
    }

    /// Created cells of one row segment: `len` cells starting at `start`,
    /// clipped to the world edge
    pub fn row_segment(
        &self,
        start: GridCoordinate,
        len: u32,
    ) -> impl Iterator<Item = (LinearIndex, &Cell)> {
        let range = self.size.index_of(start).ok().map(|first| {
            let len = len.min(self.size.width - start.i) as usize;
            first..first + len
        });
        range
            .into_iter()
            .flat_map(move |range| self.cells.range(range))
            .map(|(&index, cell)| (index, cell))
    }

    /// Drop every cell
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub(crate) fn insert_cell(&mut self, index: LinearIndex, cell: Cell) -> Option<Cell> {
        self.cells.insert(index, cell)
    }
}
