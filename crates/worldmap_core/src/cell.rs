//! A single world cell and its ordered object stack

use crate::{GridCoordinate, ObjectId, PlacedObject, Stackable, GROUND_STACK_POSITION};

/// Result of putting an object on a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Object went onto the stack at this position
    Appended { stack_position: u32 },
    /// Object took over the ground slot from `previous`
    ReplacedGround { previous: PlacedObject },
}

/// One addressable grid location and its stacked objects.
///
/// The stack is always sorted ascending by stack position, so the ground
/// object (position 0) comes first and later placements come last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: GridCoordinate,
    objects: Vec<PlacedObject>,
}

impl Cell {
    /// Create an empty cell
    pub fn new(position: GridCoordinate) -> Self {
        Self {
            position,
            objects: Vec::new(),
        }
    }

    pub fn position(&self) -> GridCoordinate {
        self.position
    }

    /// Objects in draw order (ground first)
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// The ground object, if any
    pub fn ground(&self) -> Option<&PlacedObject> {
        self.objects.first().filter(|o| o.is_ground())
    }

    /// The most recently stacked object
    pub fn top(&self) -> Option<&PlacedObject> {
        self.objects.last()
    }

    /// Put an object on the stack.
    ///
    /// A ground object replaces an existing ground object in place; otherwise
    /// it takes the ground slot. Any other object goes on top.
    pub fn add<S: Stackable + ?Sized>(&mut self, object: &S) -> AddOutcome {
        let outcome = if object.is_ground() {
            let placed = PlacedObject::new(object.object_id(), GROUND_STACK_POSITION);
            match self.objects.iter_mut().find(|o| o.is_ground()) {
                Some(existing) => AddOutcome::ReplacedGround {
                    previous: std::mem::replace(existing, placed),
                },
                None => {
                    self.objects.push(placed);
                    AddOutcome::Appended {
                        stack_position: GROUND_STACK_POSITION,
                    }
                }
            }
        } else {
            let stack_position = self.next_stack_position();
            self.objects
                .push(PlacedObject::new(object.object_id(), stack_position));
            AddOutcome::Appended { stack_position }
        };
        self.sort();
        outcome
    }

    /// Remove and return the top object
    pub fn pop_top(&mut self) -> Option<PlacedObject> {
        self.objects.pop()
    }

    /// Remove the most recently stacked instance of `id`
    pub fn remove_latest(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let position = self.objects.iter().rposition(|o| o.id == id)?;
        Some(self.objects.remove(position))
    }

    /// Remove the object equal to `placed`, searching from the top
    pub fn remove_placed(&mut self, placed: &PlacedObject) -> Option<PlacedObject> {
        let position = self.objects.iter().rposition(|o| o == placed)?;
        Some(self.objects.remove(position))
    }

    /// Put a previously removed object back at its recorded stack position.
    ///
    /// Restoring a ground object while another ground object is present swaps
    /// them and returns the displaced one.
    pub fn restore(&mut self, placed: PlacedObject) -> Option<PlacedObject> {
        let displaced = if placed.is_ground() {
            match self.objects.iter_mut().find(|o| o.is_ground()) {
                Some(existing) => Some(std::mem::replace(existing, placed)),
                None => {
                    self.objects.push(placed);
                    None
                }
            }
        } else {
            self.objects.push(placed);
            None
        };
        self.sort();
        displaced
    }

    fn next_stack_position(&self) -> u32 {
        self.objects
            .last()
            .map_or(GROUND_STACK_POSITION + 1, |top| top.stack_position + 1)
    }

    // Stable, so equal positions keep insertion order
    fn sort(&mut self) {
        self.objects.sort_by_key(|o| o.stack_position);
    }

    pub(crate) fn from_parts(position: GridCoordinate, mut objects: Vec<PlacedObject>) -> Self {
        objects.sort_by_key(|o| o.stack_position);
        Self { position, objects }
    }
}
