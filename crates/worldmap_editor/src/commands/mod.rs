//! Command system for undo/redo

mod shortcuts;

pub use shortcuts::handle_keyboard_shortcuts;

use bevy::log::debug;
use worldmap_core::{LinearIndex, MapError, ObjectRef, PlacedObject, WorldGrid};

/// A single reversible grid edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `object` was put on the cell at `index`; `replaced` is the ground
    /// object it displaced, if any
    Place {
        index: LinearIndex,
        object: ObjectRef,
        replaced: Option<PlacedObject>,
    },
    /// `removed` was taken off the cell at `index`
    Delete {
        index: LinearIndex,
        removed: PlacedObject,
    },
}

impl Command {
    pub fn index(&self) -> LinearIndex {
        match self {
            Command::Place { index, .. } | Command::Delete { index, .. } => *index,
        }
    }

    /// Perform the edit again
    pub fn apply(&self, grid: &mut WorldGrid) -> Result<(), MapError> {
        match self {
            Command::Place { index, object, .. } => {
                grid.add_object(*index, object)?;
            }
            Command::Delete { index, removed } => {
                grid.remove_placed(*index, removed);
            }
        }
        Ok(())
    }

    /// Undo the edit.
    ///
    /// Reverting a place removes the most recently stacked instance of the
    /// placed id, which is not necessarily the very object placed when the
    /// cell was edited again in between. A replaced ground object is put back.
    pub fn revert(&self, grid: &mut WorldGrid) -> Result<(), MapError> {
        match self {
            Command::Place {
                index,
                replaced: Some(previous),
                ..
            } => {
                grid.restore_object(*index, previous.clone())?;
            }
            Command::Place { index, object, .. } => {
                grid.remove_object(*index, object.id);
            }
            Command::Delete { index, removed } => {
                grid.restore_object(*index, removed.clone())?;
            }
        }
        Ok(())
    }
}

/// Commands undone and redone together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBatch {
    pub description: String,
    pub commands: Vec<Command>,
}

impl CommandBatch {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: Vec::new(),
        }
    }

    pub fn single(description: impl Into<String>, command: Command) -> Self {
        Self {
            description: description.into(),
            commands: vec![command],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Apply every command or none of them
    fn apply(&self, grid: &mut WorldGrid) -> Result<(), MapError> {
        let mut staged = grid.clone();
        for command in &self.commands {
            command.apply(&mut staged)?;
        }
        *grid = staged;
        Ok(())
    }

    /// Revert every command, newest first, or none of them
    fn revert(&self, grid: &mut WorldGrid) -> Result<(), MapError> {
        let mut staged = grid.clone();
        for command in self.commands.iter().rev() {
            command.revert(&mut staged)?;
        }
        *grid = staged;
        Ok(())
    }
}

/// Linear undo/redo history.
///
/// Between [`CommandHistory::begin`] and [`CommandHistory::finish`] recorded
/// commands collect into one batch, so a whole pointer gesture is a single
/// undo unit. Outside a gesture each recorded command is its own unit.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo_stack: Vec<CommandBatch>,
    redo_stack: Vec<CommandBatch>,
    limit: Option<usize>,
    recording: Option<CommandBatch>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(Some(256))
    }
}

impl CommandHistory {
    /// Create a history keeping at most `limit` undo units
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
            recording: None,
        }
    }

    /// Start collecting commands into one batch, committing any open batch
    pub fn begin(&mut self, description: impl Into<String>) {
        self.finish();
        self.recording = Some(CommandBatch::new(description));
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    /// Record an already applied command
    pub fn record(&mut self, command: Command) {
        match &mut self.recording {
            Some(batch) => batch.commands.push(command),
            None => self.push_undo(CommandBatch::single("Edit", command)),
        }
    }

    /// Commit the open batch. Empty batches are dropped.
    pub fn finish(&mut self) {
        if let Some(batch) = self.recording.take() {
            self.push_undo(batch);
        }
    }

    /// Commit a batch, invalidating the redo stack
    pub fn push_undo(&mut self, batch: CommandBatch) {
        if batch.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(batch);
        if let Some(limit) = self.limit {
            if self.undo_stack.len() > limit {
                let excess = self.undo_stack.len() - limit;
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Revert the most recent batch. Returns `Ok(false)` when there is
    /// nothing to undo.
    pub fn undo(&mut self, grid: &mut WorldGrid) -> Result<bool, MapError> {
        self.finish();
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = batch.revert(grid) {
            self.undo_stack.push(batch);
            return Err(err);
        }
        debug!("Undo: {}", batch.description);
        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Re-apply the most recently undone batch. Returns `Ok(false)` when
    /// there is nothing to redo.
    pub fn redo(&mut self, grid: &mut WorldGrid) -> Result<bool, MapError> {
        self.finish();
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = batch.apply(grid) {
            self.redo_stack.push(batch);
            return Err(err);
        }
        debug!("Redo: {}", batch.description);
        self.undo_stack.push(batch);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.recording.as_ref().is_some_and(|b| !b.is_empty())
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed undo units
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Description of the batch the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|b| b.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.recording = None;
    }
}
