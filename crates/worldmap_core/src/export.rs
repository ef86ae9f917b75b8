//! Export and import of a world grid as an array of cell records

use crate::{Cell, GridCoordinate, MapError, PlacedObject, Stackable, WorldGrid, WorldSize};
use serde::{Deserialize, Serialize};

/// Serialized form of one created cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub position: GridCoordinate,
    pub objects: Vec<PlacedObject>,
}

impl WorldGrid {
    /// One record per created cell, in index order.
    ///
    /// Emptied cells are included so that importing reproduces the same set of
    /// created cells.
    pub fn export(&self) -> Vec<CellRecord> {
        let records: Vec<CellRecord> = self
            .cells()
            .map(|(_, cell)| CellRecord {
                position: cell.position(),
                objects: cell.objects().to_vec(),
            })
            .collect();
        tracing::debug!(cells = records.len(), "world grid exported");
        records
    }

    /// [`Self::export`] encoded as a JSON array
    pub fn export_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string(&self.export())?)
    }

    /// Rebuild a grid from exported records.
    ///
    /// Rejects unindexable sizes, records outside `size`, duplicate positions
    /// and stacks holding more than one ground object.
    pub fn import(size: WorldSize, records: Vec<CellRecord>) -> Result<Self, MapError> {
        size.validate()?;
        let mut grid = WorldGrid::new(size);
        for record in records {
            let index = size.index_of(record.position)?;
            let grounds = record.objects.iter().filter(|o| o.is_ground()).count();
            if grounds > 1 {
                return Err(MapError::InvalidRecord {
                    position: record.position.to_string(),
                    reason: format!("{grounds} ground objects"),
                });
            }
            let cell = Cell::from_parts(record.position, record.objects);
            if grid.insert_cell(index, cell).is_some() {
                return Err(MapError::InvalidRecord {
                    position: record.position.to_string(),
                    reason: "duplicate cell".to_string(),
                });
            }
        }
        tracing::debug!(cells = grid.len(), %size, "world grid imported");
        Ok(grid)
    }

    /// Parse a JSON array of records and [`Self::import`] it
    pub fn import_json(size: WorldSize, json: &str) -> Result<Self, MapError> {
        let records: Vec<CellRecord> = serde_json::from_str(json)?;
        Self::import(size, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObjectRef;

    fn sample_grid() -> WorldGrid {
        let mut grid = WorldGrid::new(WorldSize::new(1000, 1000));
        for index in [0, 5, 999] {
            grid.add_object(index, &ObjectRef::item(20)).unwrap();
            grid.add_object(index, &ObjectRef::ground(1)).unwrap();
        }
        grid
    }

    #[test]
    fn test_round_trip_preserves_membership_and_order() {
        let grid = sample_grid();
        let json = grid.export_json().unwrap();
        let restored = WorldGrid::import_json(grid.size(), &json).unwrap();

        assert_eq!(restored, grid);
        let indices: Vec<_> = restored.cells().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![0, 5, 999]);
        for (_, cell) in restored.cells() {
            let ids: Vec<_> = cell.objects().iter().map(|o| o.id).collect();
            assert_eq!(ids, vec![1, 20]);
        }
    }

    #[test]
    fn test_export_format() {
        let mut grid = WorldGrid::new(WorldSize::new(10, 10));
        grid.add_object(12, &ObjectRef::ground(3)).unwrap();
        let json = grid.export_json().unwrap();
        assert_eq!(
            json,
            r#"[{"position":{"i":2,"j":1},"objects":[{"id":3,"stackPosition":0}]}]"#
        );
    }

    #[test]
    fn test_empty_cells_survive_round_trip() {
        let mut grid = WorldGrid::new(WorldSize::new(10, 10));
        grid.add_object(3, &ObjectRef::item(1)).unwrap();
        grid.remove_top_object(3);

        let restored = WorldGrid::import(grid.size(), grid.export()).unwrap();
        assert!(restored.get_cell(3).unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_bad_records() {
        let size = WorldSize::new(10, 10);
        let out_of_bounds = r#"[{"position":{"i":10,"j":0},"objects":[]}]"#;
        assert!(matches!(
            WorldGrid::import_json(size, out_of_bounds),
            Err(MapError::OutOfBounds { .. })
        ));

        let duplicate = r#"[
            {"position":{"i":1,"j":1},"objects":[]},
            {"position":{"i":1,"j":1},"objects":[]}
        ]"#;
        assert!(matches!(
            WorldGrid::import_json(size, duplicate),
            Err(MapError::InvalidRecord { .. })
        ));

        let two_grounds = r#"[{"position":{"i":1,"j":1},"objects":[
            {"id":1,"stackPosition":0},{"id":2,"stackPosition":0}
        ]}]"#;
        assert!(matches!(
            WorldGrid::import_json(size, two_grounds),
            Err(MapError::InvalidRecord { .. })
        ));

        let fractional = r#"[{"position":{"i":1.5,"j":1},"objects":[]}]"#;
        assert!(matches!(
            WorldGrid::import_json(size, fractional),
            Err(MapError::Serialization(_))
        ));
    }

    #[test]
    fn test_import_rejects_unindexable_size() {
        let records = r#"[{"position":{"i":0,"j":0,"k":2},"objects":[]}]"#;
        assert!(matches!(
            WorldGrid::import_json(WorldSize::layered(u32::MAX, u32::MAX, 3), records),
            Err(MapError::InvalidWorldSize { .. })
        ));
        assert!(matches!(
            WorldGrid::import_json(WorldSize::new(0, 10), "[]"),
            Err(MapError::InvalidWorldSize { .. })
        ));
    }

    #[test]
    fn test_import_sorts_stacks() {
        let size = WorldSize::new(10, 10);
        let json = r#"[{"position":{"i":0,"j":0},"objects":[
            {"id":8,"stackPosition":2},{"id":1,"stackPosition":0},{"id":5,"stackPosition":1}
        ]}]"#;
        let grid = WorldGrid::import_json(size, json).unwrap();
        let ids: Vec<_> = grid
            .get_cell(0)
            .unwrap()
            .objects()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![1, 5, 8]);
    }
}
