// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shortcut assignment engine
//!
//! Every change to an action's current shortcut goes through here. The
//! engine consults `find_conflict`, commits or reports a conflict, and
//! records each committed change on the undo stack.
//!
//! # State machine
//!
//! ```text
//!            request_assign (no conflict) ──► commit, Applied
//!   Idle ──┤
//!            request_assign (conflict) ──► AwaitingConfirmation
//!                                              │
//!                 confirm_reassign ◄───────────┤──► cancel ──► Idle
//!                 (clear holder + assign,      │
//!                  one undo step) ──► Idle     │
//! ```
//!
//! The engine never resolves a conflict on its own during interactive
//! assignment; the caller must confirm or cancel. An unresolved
//! confirmation is a valid idle state and simply leaves the candidate
//! shortcut unapplied.
//!
//! All calls are synchronous and run to completion on the calling thread.

use crate::core::conflict::find_conflict;
use crate::core::registry::{ActionRegistry, RegistryError};
use crate::core::types::{ActionId, Shortcut, ShortcutChange};
use crate::core::undo::{Command, UndoStack};

/// Result of an assignment request
#[derive(Clone, Debug, PartialEq)]
pub enum AssignOutcome {
    /// The action already had this shortcut; nothing was recorded
    Unchanged,

    /// The change was committed; one record per mutated action
    Applied(Vec<ShortcutChange>),

    /// Another action holds the shortcut; confirmation required
    ConflictDetected(ActionId),
}

/// An assignment waiting for the caller's decision
#[derive(Clone, Debug, PartialEq)]
pub struct PendingAssignment {
    pub action: ActionId,
    pub shortcut: Shortcut,
    /// Current holder of `shortcut`
    pub conflict: ActionId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum EngineState {
    #[default]
    Idle,
    AwaitingConfirmation(PendingAssignment),
}

/// Orchestrates assignment requests, conflict resolution and undo history.
///
/// Owns its registry and undo stack exclusively.
///
/// # Example
/// ```
/// use shortcut_editor::core::{ActionRegistry, AssignmentEngine, AssignOutcome};
///
/// let mut registry = ActionRegistry::new("app");
/// let new = registry.register("New", "File", "General", "Ctrl+N".parse()?)?;
/// let open = registry.register("Open", "File", "General", "Ctrl+O".parse()?)?;
///
/// let mut engine = AssignmentEngine::new(registry);
/// let outcome = engine.request_assign(&open, "Ctrl+N".parse()?)?;
/// assert_eq!(outcome, AssignOutcome::ConflictDetected(new.clone()));
///
/// engine.confirm_reassign(&open, "Ctrl+N".parse()?)?;
/// assert!(engine.registry().get(&new)?.shortcut().is_empty());
///
/// engine.undo()?; // restores both actions in one step
/// assert_eq!(engine.registry().get(&new)?.shortcut().to_string(), "Ctrl+N");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct AssignmentEngine {
    registry: ActionRegistry,
    history: UndoStack,
    state: EngineState,
    /// When set, committed changes are collected here instead of being
    /// pushed individually, and later recorded as one batch.
    group: Option<Vec<ShortcutChange>>,
}

impl AssignmentEngine {
    pub fn new(registry: ActionRegistry) -> Self {
        Self::with_history(registry, UndoStack::new())
    }

    pub fn with_history(registry: ActionRegistry, history: UndoStack) -> Self {
        Self {
            registry,
            history,
            state: EngineState::Idle,
            group: None,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingAssignment> {
        match &self.state {
            EngineState::AwaitingConfirmation(pending) => Some(pending),
            EngineState::Idle => None,
        }
    }

    /// Registers an action with the owned registry (features may register
    /// late in a session).
    pub fn register(
        &mut self,
        name: &str,
        context: &str,
        category: &str,
        default_shortcut: Shortcut,
    ) -> Result<ActionId, RegistryError> {
        self.registry.register(name, context, category, default_shortcut)
    }

    /// Requests that `id` be bound to `shortcut`.
    ///
    /// - Same as current: `Unchanged`
    /// - Empty shortcut: always applied, no conflict check
    /// - Free shortcut: applied and recorded as one undo step
    /// - Held by another action: `ConflictDetected`, engine awaits confirmation
    ///
    /// A new request supersedes any pending confirmation.
    pub fn request_assign(&mut self, id: &ActionId, shortcut: Shortcut) -> Result<AssignOutcome, RegistryError> {
        self.state = EngineState::Idle;

        if self.registry.get(id)?.shortcut() == &shortcut {
            return Ok(AssignOutcome::Unchanged);
        }

        if let Some(conflict) = find_conflict(&self.registry, &shortcut, id) {
            tracing::debug!(action = %id, %shortcut, conflict = %conflict, "conflict detected");
            self.state = EngineState::AwaitingConfirmation(PendingAssignment {
                action: id.clone(),
                shortcut,
                conflict: conflict.clone(),
            });
            return Ok(AssignOutcome::ConflictDetected(conflict));
        }

        let changes = self.registry.apply(&[(id.clone(), shortcut)])?;
        if let Some(change) = changes.first() {
            tracing::debug!(action = %id, before = %change.before, after = %change.after, "shortcut assigned");
            self.record(Command::Assign(change.clone()));
        }

        Ok(AssignOutcome::Applied(changes))
    }

    /// Clears every other holder of `shortcut`, then binds it to `id`.
    ///
    /// Both halves are committed all-or-nothing and recorded as a single
    /// composite undo step. If the conflict has disappeared in the
    /// meantime this degrades to a plain assignment.
    pub fn confirm_reassign(&mut self, id: &ActionId, shortcut: Shortcut) -> Result<AssignOutcome, RegistryError> {
        self.state = EngineState::Idle;

        if self.registry.get(id)?.shortcut() == &shortcut {
            return Ok(AssignOutcome::Unchanged);
        }

        let mut plan: Vec<(ActionId, Shortcut)> = self
            .registry
            .find_by_shortcut(&shortcut)
            .into_iter()
            .filter(|holder| holder != id)
            .map(|holder| (holder, Shortcut::empty()))
            .collect();
        plan.push((id.clone(), shortcut));

        let mut changes = self.registry.apply(&plan)?;

        let command = match changes.pop() {
            Some(assigned) if changes.is_empty() => Command::Assign(assigned),
            Some(assigned) => Command::Reassign {
                cleared: changes,
                assigned,
            },
            None => return Ok(AssignOutcome::Unchanged),
        };

        tracing::debug!(action = %id, label = %command.label(), "reassignment confirmed");
        let changes = command.changes().into_iter().cloned().collect();
        self.record(command);

        Ok(AssignOutcome::Applied(changes))
    }

    /// Abandons a pending confirmation without mutating anything.
    pub fn cancel(&mut self) -> Option<PendingAssignment> {
        match std::mem::take(&mut self.state) {
            EngineState::AwaitingConfirmation(pending) => {
                tracing::debug!(action = %pending.action, "reassignment cancelled");
                Some(pending)
            }
            EngineState::Idle => None,
        }
    }

    /// Undoes the most recent step. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<Vec<ShortcutChange>>, RegistryError> {
        self.state = EngineState::Idle;
        let changes = self.history.undo(&mut self.registry)?;
        if let Some(changes) = &changes {
            tracing::debug!(count = changes.len(), "undo");
        }
        Ok(changes)
    }

    /// Redoes the most recently undone step.
    pub fn redo(&mut self) -> Result<Option<Vec<ShortcutChange>>, RegistryError> {
        self.state = EngineState::Idle;
        let changes = self.history.redo(&mut self.registry)?;
        if let Some(changes) = &changes {
            tracing::debug!(count = changes.len(), "redo");
        }
        Ok(changes)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restores every action to its default as one undo step.
    ///
    /// Returns one change per action that actually changed; nothing is
    /// recorded when everything was already at its default.
    pub fn reset_all(&mut self) -> Vec<ShortcutChange> {
        self.state = EngineState::Idle;

        let changes = self.registry.reset_all();
        if !changes.is_empty() {
            tracing::debug!(count = changes.len(), "reset all shortcuts");
            self.record(Command::Batch(changes.clone()));
        }
        changes
    }

    /// Restores the listed actions to their defaults as one undo step.
    ///
    /// Any other action currently holding one of those defaults is cleared
    /// in the same step, so no shortcut ends up bound twice.
    pub fn reset(&mut self, ids: &[ActionId]) -> Result<Vec<ShortcutChange>, RegistryError> {
        self.state = EngineState::Idle;

        let mut clears: Vec<(ActionId, Shortcut)> = Vec::new();
        let mut assigns: Vec<(ActionId, Shortcut)> = Vec::new();

        for id in ids {
            let action = self.registry.get(id)?;
            if !action.is_customized() {
                continue;
            }

            let default = action.default_shortcut().clone();
            for holder in self.registry.find_by_shortcut(&default) {
                if !ids.contains(&holder) && !clears.iter().any(|(cleared, _)| *cleared == holder) {
                    clears.push((holder, Shortcut::empty()));
                }
            }
            assigns.push((id.clone(), default));
        }

        clears.extend(assigns);
        let changes = self.registry.apply(&clears)?;

        if !changes.is_empty() {
            tracing::debug!(count = changes.len(), "reset selected shortcuts");
            self.record(Command::Batch(changes.clone()));
        }
        Ok(changes)
    }

    /// Applies persisted customizations in order as one undo step.
    ///
    /// Conflicts are resolved in favour of the later entry. Unknown
    /// identities are skipped with a warning.
    pub fn apply_customizations(&mut self, entries: &[(ActionId, Shortcut)]) -> Vec<ShortcutChange> {
        self.group = Some(Vec::new());

        for (id, shortcut) in entries {
            let outcome = match self.request_assign(id, shortcut.clone()) {
                Ok(AssignOutcome::ConflictDetected(_)) => self.confirm_reassign(id, shortcut.clone()),
                other => other,
            };

            if let Err(e) = outcome {
                tracing::warn!(action = %id, error = %e, "skipping customization");
            }
        }

        let changes = self.group.take().unwrap_or_default();
        if !changes.is_empty() {
            tracing::debug!(count = changes.len(), "applied customizations");
            self.history.push(Command::Batch(changes.clone()));
        }
        changes
    }

    /// Drops all undo history (e.g. after the initial settings load).
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn record(&mut self, command: Command) {
        match &mut self.group {
            Some(group) => group.extend(command.into_changes()),
            None => {
                self.history.push(command);
            }
        }
    }
}
