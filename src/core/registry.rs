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

//! Action registry with identity and grouping indexes
//!
//! The registry owns every registered `Action` in registration order and
//! maintains two derived indexes:
//! - identity → position (unique; duplicates are rejected)
//! - (context, category) → group slot, for the grouped `all()` view
//!
//! Contexts, categories and the actions inside each category keep their
//! declaration order. Nothing is sorted.
//!
//! # Performance
//! - Register: O(1) average case
//! - Lookup by identity: O(1) average case
//! - Grouped view: O(n)

use std::collections::HashMap;
use thiserror::Error;

use crate::core::types::{Action, ActionId, Shortcut, ShortcutChange};
use crate::core::validator::validate_segment;

/// Registry errors
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    /// Composed identity already exists (registration is rejected, registry untouched)
    #[error("Action '{0}' is already registered")]
    DuplicateIdentity(ActionId),

    /// Lookup of an unknown identity
    #[error("No action registered as '{0}'")]
    NotFound(ActionId),

    /// A context, category or name cannot form an identity segment
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),
}

/// Actions of one category, in registration order
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub name: &'a str,
    pub actions: Vec<&'a Action>,
}

/// Categories of one context, in first-declaration order
#[derive(Debug)]
pub struct ContextGroup<'a> {
    pub name: &'a str,
    pub categories: Vec<CategoryGroup<'a>>,
}

#[derive(Debug)]
struct CategorySlot {
    name: String,
    members: Vec<usize>,
}

#[derive(Debug)]
struct ContextSlot {
    name: String,
    categories: Vec<CategorySlot>,
}

/// Owns all registered actions.
///
/// An explicit instance per embedding application (or per test); there is
/// no global registry.
#[derive(Debug)]
pub struct ActionRegistry {
    /// First identity segment, fixed per embedding application
    domain: String,
    /// All actions in registration order
    actions: Vec<Action>,
    by_id: HashMap<ActionId, usize>,
    groups: Vec<ContextSlot>,
    /// (context, category) → (context slot, category slot)
    by_group: HashMap<(String, String), (usize, usize)>,
    /// Bumped on every registration
    revision: u64,
}

impl ActionRegistry {
    /// Creates an empty registry for the given identity domain.
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            actions: Vec::new(),
            by_id: HashMap::new(),
            groups: Vec::new(),
            by_group: HashMap::new(),
            revision: 0,
        }
    }

    /// Registers an action and returns its composed identity.
    ///
    /// The identity is `domain.context.category.name` with whitespace
    /// removed from each segment. The current shortcut starts equal to the
    /// default shortcut.
    ///
    /// # Errors
    /// - `DuplicateIdentity` if the composed identity is already taken
    /// - `InvalidIdentity` if a segment is empty or contains `;` or `.`
    ///
    /// # Example
    /// ```
    /// use shortcut_editor::core::{ActionRegistry, Shortcut};
    ///
    /// let mut registry = ActionRegistry::new("app");
    /// let id = registry.register("Save As", "File", "General", "Ctrl+Shift+S".parse()?)?;
    /// assert_eq!(id.as_str(), "app.File.General.SaveAs");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn register(
        &mut self,
        name: &str,
        context: &str,
        category: &str,
        default_shortcut: Shortcut,
    ) -> Result<ActionId, RegistryError> {
        let id = self.compose_id(name, context, category)?;

        if self.by_id.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentity(id));
        }

        let position = self.actions.len();
        self.actions.push(Action::new(id.clone(), name, context, category, default_shortcut));
        self.by_id.insert(id.clone(), position);
        self.index_group(context, category, position);
        self.revision += 1;

        tracing::debug!(id = %id, "registered action");
        Ok(id)
    }

    fn compose_id(&self, name: &str, context: &str, category: &str) -> Result<ActionId, RegistryError> {
        let segment = |s: &str| {
            validate_segment(s).map_err(|e| RegistryError::InvalidIdentity(e.to_string()))
        };

        Ok(ActionId::new(format!(
            "{}.{}.{}.{}",
            segment(&self.domain)?,
            segment(context)?,
            segment(category)?,
            segment(name)?,
        )))
    }

    fn index_group(&mut self, context: &str, category: &str, position: usize) {
        let key = (context.to_string(), category.to_string());

        if let Some(&(c, k)) = self.by_group.get(&key) {
            self.groups[c].categories[k].members.push(position);
            return;
        }

        let c = match self.groups.iter().position(|slot| slot.name == context) {
            Some(c) => c,
            None => {
                self.groups.push(ContextSlot {
                    name: context.to_string(),
                    categories: Vec::new(),
                });
                self.groups.len() - 1
            }
        };

        let categories = &mut self.groups[c].categories;
        categories.push(CategorySlot {
            name: category.to_string(),
            members: vec![position],
        });
        self.by_group.insert(key, (c, categories.len() - 1));
    }

    /// Looks up an action by identity.
    pub fn get(&self, id: &ActionId) -> Result<&Action, RegistryError> {
        self.by_id
            .get(id)
            .map(|&position| &self.actions[position])
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Registration-order position of an action
    pub fn position(&self, id: &ActionId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Grouped view: context → category → actions
    pub fn all(&self) -> Vec<ContextGroup<'_>> {
        self.groups
            .iter()
            .map(|context| ContextGroup {
                name: &context.name,
                categories: context
                    .categories
                    .iter()
                    .map(|category| CategoryGroup {
                        name: &category.name,
                        actions: category.members.iter().map(|&i| &self.actions[i]).collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Actions of one (context, category) group, in registration order.
    pub fn actions_in(&self, context: &str, category: &str) -> Vec<&Action> {
        self.by_group
            .get(&(context.to_string(), category.to_string()))
            .map(|&(c, k)| {
                self.groups[c].categories[k]
                    .members
                    .iter()
                    .map(|&i| &self.actions[i])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Context names in declaration order
    pub fn contexts(&self) -> Vec<&str> {
        self.groups.iter().map(|slot| slot.name.as_str()).collect()
    }

    /// All actions in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Every action currently bound to `shortcut`, in registration order.
    ///
    /// Empty shortcuts never match.
    pub fn find_by_shortcut(&self, shortcut: &Shortcut) -> Vec<ActionId> {
        if shortcut.is_empty() {
            return Vec::new();
        }

        self.actions
            .iter()
            .filter(|action| action.shortcut() == shortcut)
            .map(|action| action.id().clone())
            .collect()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Content revision; changes whenever an action is registered.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Restores every action to its own default shortcut.
    ///
    /// Returns one change per action whose value actually changed, in
    /// registration order. A second call in a row returns nothing.
    pub fn reset_all(&mut self) -> Vec<ShortcutChange> {
        self.actions
            .iter_mut()
            .filter(|action| action.is_customized())
            .map(|action| {
                let default = action.default_shortcut().clone();
                action.set_shortcut(default)
            })
            .collect()
    }

    /// Applies a list of assignments all-or-nothing.
    ///
    /// Every identity is checked before anything is mutated, so an unknown
    /// identity leaves the registry untouched. Assignments that do not
    /// change a value are skipped and produce no change record.
    pub(crate) fn apply(
        &mut self,
        assignments: &[(ActionId, Shortcut)],
    ) -> Result<Vec<ShortcutChange>, RegistryError> {
        let positions = assignments
            .iter()
            .map(|(id, _)| self.position(id).ok_or_else(|| RegistryError::NotFound(id.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut changes = Vec::new();
        for (&position, (_, shortcut)) in positions.iter().zip(assignments) {
            let action = &mut self.actions[position];
            if action.shortcut() != shortcut {
                changes.push(action.set_shortcut(shortcut.clone()));
            }
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(text: &str) -> Shortcut {
        text.parse().unwrap()
    }

    #[test]
    fn test_register_composes_identity() {
        let mut registry = ActionRegistry::new("app");
        let id = registry
            .register("Recent Files", "File Menu", "Open", shortcut("Ctrl+R"))
            .unwrap();

        assert_eq!(id.as_str(), "app.FileMenu.Open.RecentFiles");
        assert_eq!(registry.get(&id).unwrap().context(), "File Menu");
        assert_eq!(registry.revision(), 1);
    }

    #[test]
    fn test_duplicate_identity_leaves_registry_untouched() {
        let mut registry = ActionRegistry::new("app");
        registry.register("New", "File", "General", shortcut("Ctrl+N")).unwrap();

        let result = registry.register("New", "File", "General", shortcut("Ctrl+M"));
        assert!(matches!(result, Err(RegistryError::DuplicateIdentity(_))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.revision(), 1);
    }

    #[test]
    fn test_invalid_identity_segment() {
        let mut registry = ActionRegistry::new("app");
        let result = registry.register("  ", "File", "General", Shortcut::empty());
        assert!(matches!(result, Err(RegistryError::InvalidIdentity(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dotted_segments_rejected() {
        let mut registry = ActionRegistry::new("app");

        let dotted_context = registry.register("N", "a.b", "c", Shortcut::empty());
        assert!(matches!(dotted_context, Err(RegistryError::InvalidIdentity(_))));

        // Would otherwise compose the same "app.a.b.c.N" identity
        let id = registry.register("N", "a", "b", Shortcut::empty()).unwrap();
        let dotted_category = registry.register("N", "a", "b.c", Shortcut::empty());
        assert!(matches!(dotted_category, Err(RegistryError::InvalidIdentity(_))));

        assert_eq!(id.as_str(), "app.a.b.N");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut registry = ActionRegistry::new("app");
        let new = registry.register("New", "File", "General", shortcut("Ctrl+N")).unwrap();

        let result = registry.apply(&[
            (new.clone(), Shortcut::empty()),
            (ActionId::from("app.Missing.Missing.Missing"), Shortcut::empty()),
        ]);

        assert!(matches!(result, Err(RegistryError::NotFound(_))));
        assert_eq!(registry.get(&new).unwrap().shortcut(), &shortcut("Ctrl+N"));
    }
}
