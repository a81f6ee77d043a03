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

//! src/core/types.rs
//!
//! Core type definitions for shortcut assignment
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Modifier`: Keyboard modifier keys (Ctrl, Alt, Shift, Meta)
//! - `Shortcut`: A normalised key combination, possibly unassigned
//! - `ActionId`: The dotted `domain.context.category.name` identity
//! - `Action`: A registered, shortcut-bindable unit of work
//! - `ShortcutChange`: One before/after record of a committed mutation
//!
//! Shortcuts compare by their canonical form, so `Shift+Ctrl+k` and
//! `Ctrl+Shift+K` are the same value and hash identically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::parser::{self, ParseError};
use crate::core::validator::{self, ValidationError};

/// Keyboard modifier keys
///
/// The declaration order is the canonical text order: `Ctrl+Alt+Shift+Meta`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Modifier {
    /// Control key
    Ctrl,
    /// Alt/Option key
    Alt,
    /// Shift key
    Shift,
    /// Meta/Super/Command key
    Meta,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Ctrl => write!(f, "Ctrl"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Meta => write!(f, "Meta"),
        }
    }
}

/// A combination of modifier keys and one primary key
///
/// The empty shortcut (no key, no modifiers) is the "unassigned" state.
/// Fields are private so every value stays normalised:
/// - modifiers sorted in canonical order, without duplicates
/// - key name canonicalised (`k` → `K`, `escape` → `Esc`, `f5` → `F5`)
///
/// # Example
/// ```
/// use shortcut_editor::core::{Modifier, Shortcut};
///
/// let a = Shortcut::new(vec![Modifier::Shift, Modifier::Ctrl], "k")?;
/// let b: Shortcut = "Ctrl+Shift+K".parse()?;
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "Ctrl+Shift+K");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    modifiers: Vec<Modifier>,
    key: Option<String>,
}

impl Shortcut {
    /// The unassigned shortcut.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a normalised shortcut from modifiers and a key name.
    ///
    /// Also used to compose a shortcut from a virtual key plus the
    /// modifiers currently held on a keyboard visualisation.
    pub fn new(mut modifiers: Vec<Modifier>, key: &str) -> Result<Self, ValidationError> {
        let key = validator::canonical_key(key)?;

        modifiers.sort();
        modifiers.dedup();

        Ok(Self {
            modifiers,
            key: Some(key),
        })
    }

    /// Parses platform-neutral text such as `"Ctrl+Shift+K"`.
    ///
    /// Empty or whitespace-only text yields the unassigned shortcut.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parser::parse_shortcut(text)
    }

    /// Parses text, treating malformed input as unassigned.
    pub fn parse_or_empty(text: &str) -> Self {
        match parser::parse_shortcut(text) {
            Ok(shortcut) => shortcut,
            Err(e) => {
                tracing::warn!(text, error = %e, "treating malformed shortcut as unassigned");
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Canonical primary key name, `None` when unassigned.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(key) = &self.key else {
            return Ok(());
        };

        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", key)
    }
}

impl FromStr for Shortcut {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_shortcut(s)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parser::parse_shortcut(&value)
    }
}

impl From<Shortcut> for String {
    fn from(shortcut: Shortcut) -> Self {
        shortcut.to_string()
    }
}

/// Stable identity of a registered action
///
/// Format: `"<domain>.<context>.<category>.<name>"` with whitespace removed
/// from each segment. Assigned once at registration and never changed.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Wraps an identity string as received from a payload or settings file.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A registered, shortcut-bindable unit of application functionality
///
/// Owned exclusively by the `ActionRegistry`. The default shortcut is
/// captured at registration and never mutated; the current shortcut is
/// changed only by the `AssignmentEngine`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Action {
    id: ActionId,
    name: String,
    context: String,
    category: String,
    shortcut: Shortcut,
    default_shortcut: Shortcut,
}

impl Action {
    pub(crate) fn new(
        id: ActionId,
        name: &str,
        context: &str,
        category: &str,
        default_shortcut: Shortcut,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            context: context.to_string(),
            category: category.to_string(),
            shortcut: default_shortcut.clone(),
            default_shortcut,
        }
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Display name as given at registration
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Currently bound shortcut (may be empty)
    pub fn shortcut(&self) -> &Shortcut {
        &self.shortcut
    }

    pub fn default_shortcut(&self) -> &Shortcut {
        &self.default_shortcut
    }

    /// True when the current shortcut differs from the default.
    pub fn is_customized(&self) -> bool {
        self.shortcut != self.default_shortcut
    }

    /// Replaces the current shortcut and returns the before/after record.
    pub(crate) fn set_shortcut(&mut self, shortcut: Shortcut) -> ShortcutChange {
        let before = std::mem::replace(&mut self.shortcut, shortcut);
        ShortcutChange {
            id: self.id.clone(),
            before,
            after: self.shortcut.clone(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.shortcut)
    }
}

/// One committed shortcut mutation
///
/// Doubles as the change notification returned by every mutating call and
/// as the payload of undo-stack commands. Never mutated after creation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ShortcutChange {
    pub id: ActionId,
    pub before: Shortcut,
    pub after: Shortcut,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_display() {
        assert_eq!(format!("{}", Modifier::Ctrl), "Ctrl");
        assert_eq!(format!("{}", Modifier::Meta), "Meta");
    }

    #[test]
    fn test_shortcut_normalization() {
        // Test that order doesn't matter
        let combo1 = Shortcut::new(vec![Modifier::Ctrl, Modifier::Shift], "k").unwrap();
        let combo2 = Shortcut::new(vec![Modifier::Shift, Modifier::Ctrl, Modifier::Shift], "K").unwrap();

        assert_eq!(combo1, combo2); // Should be equal after normalization
        assert_eq!(combo1.modifiers(), &[Modifier::Ctrl, Modifier::Shift]);
    }

    #[test]
    fn test_empty_shortcut_displays_as_empty_string() {
        let empty = Shortcut::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.to_string(), "");
        assert_eq!(empty.key(), None);
    }

    #[test]
    fn test_action_starts_with_default() {
        let default = Shortcut::new(vec![Modifier::Ctrl], "N").unwrap();
        let action = Action::new(ActionId::from("app.File.General.New"), "New", "File", "General", default.clone());

        assert_eq!(action.shortcut(), &default);
        assert_eq!(action.default_shortcut(), &default);
        assert!(!action.is_customized());
    }

    #[test]
    fn test_set_shortcut_records_before_and_after() {
        let default = Shortcut::new(vec![Modifier::Ctrl], "N").unwrap();
        let mut action = Action::new(ActionId::from("app.File.General.New"), "New", "File", "General", default.clone());

        let change = action.set_shortcut(Shortcut::empty());
        assert_eq!(change.before, default);
        assert!(change.after.is_empty());
        assert!(action.is_customized());
        assert_eq!(action.default_shortcut(), &default, "Default must never change");
    }
}
