//! Shortcut conflict detection
//!
//! Two entry points:
//! - `find_conflict`: the per-assignment check used by the engine. Scans the
//!   registry for another action already bound to a candidate shortcut.
//! - `ConflictDetector`: a bulk audit that indexes every binding by shortcut
//!   and reports each shortcut held by two or more actions. Duplicates can
//!   exist transiently after a bulk import or a reset to defaults.
//!
//! The empty shortcut never conflicts; any number of actions may be
//! unassigned at once.
//!
//! # Performance
//! - `find_conflict`: O(n) scan in registration order
//! - Audit add binding: O(1) average case
//! - List all conflicts: O(n) where n = number of distinct shortcuts

use std::collections::HashMap;

use crate::core::registry::ActionRegistry;
use crate::core::types::{ActionId, Shortcut};

/// Finds the action currently bound to `shortcut`, other than `excluding`.
///
/// Returns the earliest-registered holder, so ties are broken
/// deterministically. Always `None` for the empty shortcut.
pub fn find_conflict(
    registry: &ActionRegistry,
    shortcut: &Shortcut,
    excluding: &ActionId,
) -> Option<ActionId> {
    if shortcut.is_empty() {
        return None;
    }

    registry
        .iter()
        .find(|action| action.id() != excluding && action.shortcut() == shortcut)
        .map(|action| action.id().clone())
}

/// Detects duplicate bindings using HashMap-based indexing.
///
/// Keys are shortcuts, values are every action bound to that shortcut.
/// A conflict exists when any vector has length > 1.
#[derive(Debug, Default)]
pub struct ConflictDetector {
    /// Maps Shortcut to all actions using it.
    bindings: HashMap<Shortcut, Vec<ActionId>>,
    /// Shortcuts in first-seen order, for deterministic reporting
    order: Vec<Shortcut>,
}

/// A shortcut held by more than one action.
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    /// The shared shortcut
    pub shortcut: Shortcut,

    /// All actions bound to it (always 2 or more), in registration order
    pub actions: Vec<ActionId>,
}

impl ConflictDetector {
    /// Creates a new empty conflict detector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes every current binding of a registry.
    pub fn from_registry(registry: &ActionRegistry) -> Self {
        let mut detector = Self::new();
        for action in registry.iter() {
            detector.add_binding(action.id().clone(), action.shortcut().clone());
        }
        detector
    }

    /// Adds a binding. Unassigned shortcuts are ignored.
    ///
    /// Time complexity: O(1) average case
    pub fn add_binding(&mut self, id: ActionId, shortcut: Shortcut) {
        if shortcut.is_empty() {
            return;
        }

        let holders = self.bindings.entry(shortcut.clone()).or_default();
        if holders.is_empty() {
            self.order.push(shortcut);
        }
        holders.push(id);
    }

    /// Finds all conflicts (shortcuts with 2 or more actions).
    pub fn find_conflicts(&self) -> Vec<Conflict> {
        self.order
            .iter()
            .filter_map(|shortcut| {
                self.bindings
                    .get(shortcut)
                    .filter(|holders| holders.len() > 1)
                    .map(|holders| Conflict {
                        shortcut: shortcut.clone(),
                        actions: holders.clone(),
                    })
            })
            .collect()
    }

    /// Returns true if this shortcut has 2 or more actions.
    pub fn has_conflict(&self, shortcut: &Shortcut) -> bool {
        self.bindings
            .get(shortcut)
            .map(|holders| holders.len() > 1)
            .unwrap_or(false)
    }

    /// Returns the total number of assigned bindings tracked.
    pub fn total_bindings(&self) -> usize {
        self.bindings.values().map(|v| v.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(text: &str) -> Shortcut {
        text.parse().unwrap()
    }

    #[test]
    fn test_empty_shortcut_never_conflicts() {
        let mut registry = ActionRegistry::new("app");
        registry.register("A", "File", "General", Shortcut::empty()).unwrap();
        let b = registry.register("B", "File", "General", Shortcut::empty()).unwrap();

        assert_eq!(find_conflict(&registry, &Shortcut::empty(), &b), None);
    }

    #[test]
    fn test_excluded_action_is_not_its_own_conflict() {
        let mut registry = ActionRegistry::new("app");
        let a = registry.register("A", "File", "General", shortcut("Ctrl+N")).unwrap();

        assert_eq!(find_conflict(&registry, &shortcut("Ctrl+N"), &a), None);
    }

    #[test]
    fn test_detector_ignores_unassigned() {
        let mut detector = ConflictDetector::new();
        detector.add_binding(ActionId::from("app.A.A.A"), Shortcut::empty());
        detector.add_binding(ActionId::from("app.B.B.B"), Shortcut::empty());

        assert!(detector.find_conflicts().is_empty());
        assert_eq!(detector.total_bindings(), 0);
    }
}
