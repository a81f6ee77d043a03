//! Linear undo/redo history of shortcut assignments
//!
//! Commands are plain values holding before/after records; there is no
//! command trait hierarchy. Applying a command goes through the
//! `CommandTarget` seam, which the `ActionRegistry` implements.
//!
//! ```text
//! commands: [c0, c1, c2, c3]
//!                     ^ cursor = 3   (c3 has been undone)
//! push(c4) → [c0, c1, c2, c4], cursor = 4
//! ```

use crate::core::registry::{ActionRegistry, RegistryError};
use crate::core::types::{ActionId, Shortcut, ShortcutChange};

/// Receiver of undo/redo mutations
///
/// `restore` must be all-or-nothing: on error nothing has been mutated.
pub trait CommandTarget {
    fn restore(&mut self, assignments: &[(ActionId, Shortcut)]) -> Result<Vec<ShortcutChange>, RegistryError>;
}

impl CommandTarget for ActionRegistry {
    fn restore(&mut self, assignments: &[(ActionId, Shortcut)]) -> Result<Vec<ShortcutChange>, RegistryError> {
        self.apply(assignments)
    }
}

/// One user-visible undo step
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// A single action's shortcut changed
    Assign(ShortcutChange),

    /// A conflicting holder was cleared and the shortcut given to another
    /// action. Both mutations undo and redo together.
    Reassign {
        cleared: Vec<ShortcutChange>,
        assigned: ShortcutChange,
    },

    /// Several changes recorded as one step (reset, settings import)
    Batch(Vec<ShortcutChange>),
}

impl Command {
    /// Changes in the order they were applied.
    pub fn changes(&self) -> Vec<&ShortcutChange> {
        match self {
            Command::Assign(change) => vec![change],
            Command::Reassign { cleared, assigned } => cleared.iter().chain(std::iter::once(assigned)).collect(),
            Command::Batch(changes) => changes.iter().collect(),
        }
    }

    pub fn into_changes(self) -> Vec<ShortcutChange> {
        match self {
            Command::Assign(change) => vec![change],
            Command::Reassign { mut cleared, assigned } => {
                cleared.push(assigned);
                cleared
            }
            Command::Batch(changes) => changes,
        }
    }

    /// Short description for an Edit menu
    pub fn label(&self) -> String {
        match self {
            Command::Assign(change) if change.after.is_empty() => format!("Clear shortcut of {}", change.id),
            Command::Assign(change) => format!("Assign {} to {}", change.after, change.id),
            Command::Reassign { assigned, .. } => format!("Reassign {} to {}", assigned.after, assigned.id),
            Command::Batch(changes) => format!("Change {} shortcuts", changes.len()),
        }
    }

    fn forward(&self) -> Vec<(ActionId, Shortcut)> {
        self.changes()
            .into_iter()
            .map(|change| (change.id.clone(), change.after.clone()))
            .collect()
    }

    fn inverse(&self) -> Vec<(ActionId, Shortcut)> {
        self.changes()
            .into_iter()
            .rev()
            .map(|change| (change.id.clone(), change.before.clone()))
            .collect()
    }
}

/// Vector-backed undo stack with a cursor
#[derive(Debug, Default)]
pub struct UndoStack {
    commands: Vec<Command>,
    /// Number of commands currently applied
    cursor: usize,
    /// Set while undo/redo runs; pushes are refused meanwhile
    executing: bool,
    /// Oldest commands are dropped past this many entries
    limit: Option<usize>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::default()
        }
    }

    /// Records a committed command, discarding any redo history.
    ///
    /// Returns false (and records nothing) while an undo or redo is executing.
    pub fn push(&mut self, command: Command) -> bool {
        if self.executing {
            return false;
        }

        self.commands.truncate(self.cursor);
        self.commands.push(command);
        self.cursor = self.commands.len();

        if let Some(limit) = self.limit {
            if self.commands.len() > limit {
                let excess = self.commands.len() - limit;
                self.commands.drain(..excess);
                self.cursor -= excess;
            }
        }

        true
    }

    /// Applies the inverse of the command before the cursor.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. On error the
    /// cursor does not move.
    pub fn undo<T: CommandTarget>(&mut self, target: &mut T) -> Result<Option<Vec<ShortcutChange>>, RegistryError> {
        let Some(index) = self.cursor.checked_sub(1) else {
            return Ok(None);
        };

        let inverse = self.commands[index].inverse();
        let changes = self.execute(target, &inverse)?;
        self.cursor = index;

        Ok(Some(changes))
    }

    /// Re-applies the command at the cursor.
    pub fn redo<T: CommandTarget>(&mut self, target: &mut T) -> Result<Option<Vec<ShortcutChange>>, RegistryError> {
        let Some(command) = self.commands.get(self.cursor) else {
            return Ok(None);
        };

        let forward = command.forward();
        let changes = self.execute(target, &forward)?;
        self.cursor += 1;

        Ok(Some(changes))
    }

    fn execute<T: CommandTarget>(
        &mut self,
        target: &mut T,
        assignments: &[(ActionId, Shortcut)],
    ) -> Result<Vec<ShortcutChange>, RegistryError> {
        self.executing = true;
        let result = target.restore(assignments);
        self.executing = false;
        result
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    pub fn undo_label(&self) -> Option<String> {
        self.cursor.checked_sub(1).map(|i| self.commands[i].label())
    }

    pub fn redo_label(&self) -> Option<String> {
        self.commands.get(self.cursor).map(Command::label)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }
}
