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

//! Persisted customization record
//!
//! Only actions whose current shortcut differs from their default are
//! stored, one entry per action:
//!
//! ```text
//! app.File.General.New;Ctrl+Shift+N;;app.Edit.Clipboard.Copy;;;
//! ```
//!
//! Identities never contain `;`. A shortcut may end in `;` (the semicolon
//! key), which shows up as a run of three or more semicolons: every
//! semicolon beyond the closing pair belongs to the shortcut.

use crate::config::ConfigError;
use crate::core::registry::ActionRegistry;
use crate::core::types::{ActionId, Shortcut};

const FIELD_SEPARATOR: char = ';';
const ENTRY_TERMINATOR: &str = ";;";

/// Emits the record for every customized action, in registration order.
pub fn serialize_customizations(registry: &ActionRegistry) -> String {
    let mut data = String::new();

    for action in registry.iter().filter(|action| action.is_customized()) {
        data.push_str(action.id().as_str());
        data.push(FIELD_SEPARATOR);
        data.push_str(&action.shortcut().to_string());
        data.push_str(ENTRY_TERMINATOR);
    }

    data
}

/// Parses a record into `(identity, shortcut)` pairs in file order.
///
/// Surrounding whitespace and double quotes are ignored. A final entry
/// missing its terminator is accepted. Malformed shortcut text is read as
/// unassigned (with a warning) rather than failing the whole record.
///
/// # Errors
/// `InvalidRecord` when an entry has no identity or no field separator.
pub fn parse_customizations(data: &str) -> Result<Vec<(ActionId, Shortcut)>, ConfigError> {
    let body = data.trim().trim_matches('"');
    let base = data.len() - data.trim_start().len() + usize::from(data.trim_start().starts_with('"'));

    let mut entries = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let rest = &body[pos..];

        let Some(sep) = rest.find(FIELD_SEPARATOR) else {
            return Err(ConfigError::InvalidRecord {
                offset: base + pos,
                message: format!("entry '{}' has no shortcut field", rest.trim()),
            });
        };

        let identity = rest[..sep].trim();
        if identity.is_empty() {
            return Err(ConfigError::InvalidRecord {
                offset: base + pos,
                message: "entry has an empty identity".to_string(),
            });
        }

        let fields = &rest[sep + 1..];
        let (shortcut_text, consumed) = split_shortcut_field(fields);

        entries.push((ActionId::from(identity), Shortcut::parse_or_empty(shortcut_text)));
        pos += sep + 1 + consumed;
    }

    Ok(entries)
}

/// Returns the shortcut text and how many bytes the field plus its
/// terminator occupy.
fn split_shortcut_field(fields: &str) -> (&str, usize) {
    let Some(start) = fields.find(FIELD_SEPARATOR) else {
        return (fields, fields.len());
    };

    let run = fields[start..]
        .chars()
        .take_while(|&c| c == FIELD_SEPARATOR)
        .count();

    // A lone trailing ';' is the semicolon key of an unterminated last entry
    if run < ENTRY_TERMINATOR.len() {
        let end = start + run;
        return (&fields[..end], end);
    }

    let text_end = start + run - ENTRY_TERMINATOR.len();
    (&fields[..text_end], start + run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_shortcut_field() {
        assert_eq!(split_shortcut_field("Ctrl+N;;rest"), ("Ctrl+N", 8));
        assert_eq!(split_shortcut_field(";;rest"), ("", 2));
        assert_eq!(split_shortcut_field("Ctrl+;;;rest"), ("Ctrl+;", 8));
        assert_eq!(split_shortcut_field("Ctrl+N"), ("Ctrl+N", 6));
    }

    #[test]
    fn test_quoted_record() {
        let entries = parse_customizations("\"app.File.General.New;Ctrl+M;;\"\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, ActionId::from("app.File.General.New"));
        assert_eq!(entries[0].1.to_string(), "Ctrl+M");
    }

    #[test]
    fn test_missing_separator_is_error() {
        let result = parse_customizations("app.File.General.New;Ctrl+M;;garbage");
        match result {
            Err(ConfigError::InvalidRecord { offset, .. }) => assert_eq!(offset, 29),
            other => panic!("Expected InvalidRecord, got {:?}", other),
        }
    }
}
