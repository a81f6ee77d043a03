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

//! Drag-and-drop payload codec
//!
//! Payloads are `text/plain`. What the text means depends on where it is
//! dropped:
//! - onto an action row: a single shortcut string (`"Ctrl+Shift+K"`)
//! - onto a virtual key: space-separated action identities
//!
//! Resolving a drop yields `(action, shortcut)` requests for the engine;
//! this module never mutates anything itself.

use thiserror::Error;

use crate::core::parser::{parse_shortcut, ParseError};
use crate::core::types::{ActionId, Modifier, Shortcut};
use crate::core::validator::ValidationError;

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("Dropped text is not a shortcut: {0}")]
    Shortcut(#[from] ParseError),

    #[error("Drop target is not a valid key: {0}")]
    Key(#[from] ValidationError),

    #[error("Dropped payload names no actions")]
    NoActions,
}

/// Where a payload was dropped
#[derive(Clone, Debug, PartialEq)]
pub enum DropTarget {
    /// An action row in the tree
    Action(ActionId),

    /// A key of the keyboard visualisation, with the modifiers held
    /// while dropping
    Key { key: String, modifiers: Vec<Modifier> },
}

/// Payload for dragging action rows
pub fn encode_actions(ids: &[ActionId]) -> String {
    ids.iter().map(ActionId::as_str).collect::<Vec<_>>().join(" ")
}

/// Identities are whitespace-free, so any run of whitespace separates them.
pub fn decode_actions(text: &str) -> Vec<ActionId> {
    text.split_whitespace().map(ActionId::from).collect()
}

/// Payload for dragging a key
pub fn encode_shortcut(shortcut: &Shortcut) -> String {
    shortcut.to_string()
}

pub fn decode_shortcut(text: &str) -> Result<Shortcut, ParseError> {
    parse_shortcut(text)
}

/// Turns a drop into assignment requests, in payload order.
///
/// # Example
/// ```
/// use shortcut_editor::core::payload::{resolve_drop, DropTarget};
/// use shortcut_editor::core::{ActionId, Modifier};
///
/// let target = DropTarget::Key { key: "k".to_string(), modifiers: vec![Modifier::Ctrl] };
/// let requests = resolve_drop(&target, "app.File.General.New")?;
/// assert_eq!(requests[0].1.to_string(), "Ctrl+K");
/// # Ok::<(), shortcut_editor::core::payload::PayloadError>(())
/// ```
pub fn resolve_drop(target: &DropTarget, text: &str) -> Result<Vec<(ActionId, Shortcut)>, PayloadError> {
    match target {
        DropTarget::Action(id) => Ok(vec![(id.clone(), decode_shortcut(text)?)]),
        DropTarget::Key { key, modifiers } => {
            let shortcut = Shortcut::new(modifiers.clone(), key)?;
            let ids = decode_actions(text);
            if ids.is_empty() {
                return Err(PayloadError::NoActions);
            }
            Ok(ids.into_iter().map(|id| (id, shortcut.clone())).collect())
        }
    }
}
