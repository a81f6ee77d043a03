// Copyright 2025 bakri (tidynest@proton.me)
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

//! Whitelist-based input validation
//!
//! This module validates the two kinds of free text that enter the engine:
//! - Key names inside shortcut text (`K`, `F5`, `Esc`, `PgUp`, ...)
//! - Identity segments (context, category and action names)
//!
//! Only explicitly known key names are accepted. Every accepted key is
//! returned in its canonical spelling so that two spellings of the same key
//! compare equal.

use thiserror::Error;

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Key name is not a single character and not a known named key
    #[error("Invalid key name '{0}'")]
    InvalidKey(String),

    /// Identity segment is empty or contains a reserved character
    #[error("Invalid identity segment '{0}'")]
    InvalidSegment(String),
}

/// Named keys: accepted spelling (lowercase) → canonical spelling
const NAMED_KEYS: &[(&str, &str)] = &[
    ("esc", "Esc"),
    ("escape", "Esc"),
    ("return", "Return"),
    ("enter", "Enter"),
    ("space", "Space"),
    ("tab", "Tab"),
    ("backtab", "Backtab"),
    ("backspace", "Backspace"),
    ("del", "Del"),
    ("delete", "Del"),
    ("ins", "Ins"),
    ("insert", "Ins"),
    ("home", "Home"),
    ("end", "End"),
    ("pgup", "PgUp"),
    ("pageup", "PgUp"),
    ("prior", "PgUp"),
    ("pgdown", "PgDown"),
    ("pagedown", "PgDown"),
    ("next", "PgDown"),
    ("left", "Left"),
    ("right", "Right"),
    ("up", "Up"),
    ("down", "Down"),
    ("print", "Print"),
    ("pause", "Pause"),
    ("capslock", "CapsLock"),
    ("numlock", "NumLock"),
    ("scrolllock", "ScrollLock"),
    ("menu", "Menu"),
];

/// Highest function key accepted (`F35`)
const MAX_FUNCTION_KEY: u8 = 35;

/// Characters that would corrupt the persisted `identity;shortcut;;` record
/// or make the dot-delimited identity ambiguous
const RESERVED_SEGMENT_CHARS: &[char] = &[';', '.'];

/// Returns the canonical spelling of a key name.
///
/// Accepts:
/// - Any single printable character (letters are upper-cased)
/// - Named keys from the whitelist, case-insensitive
/// - Function keys `F1` through `F35`
pub fn canonical_key(key: &str) -> Result<String, ValidationError> {
    let key = key.trim();
    let mut chars = key.chars();

    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_control() || c.is_whitespace() {
            return Err(ValidationError::InvalidKey(key.to_string()));
        }
        // `ß` upper-cases to "SS", which would no longer be a single key
        let mut upper = c.to_uppercase();
        return Ok(match (upper.next(), upper.next()) {
            (Some(u), None) => u.to_string(),
            _ => c.to_string(),
        });
    }

    let lower = key.to_lowercase();

    if let Some((_, canonical)) = NAMED_KEYS.iter().find(|(alias, _)| *alias == lower) {
        return Ok((*canonical).to_string());
    }

    if let Some(number) = lower.strip_prefix('f') {
        if let Ok(n) = number.parse::<u8>() {
            if (1..=MAX_FUNCTION_KEY).contains(&n) && !number.starts_with('0') {
                return Ok(format!("F{}", n));
            }
        }
    }

    Err(ValidationError::InvalidKey(key.to_string()))
}

/// Validates an identity segment and returns it with whitespace removed.
///
/// `"Recent Files"` → `"RecentFiles"`. Segments that are empty after
/// whitespace removal, or contain `;` or `.`, are rejected.
pub fn validate_segment(segment: &str) -> Result<String, ValidationError> {
    let concise: String = segment.chars().filter(|c| !c.is_whitespace()).collect();

    if concise.is_empty() || concise.contains(RESERVED_SEGMENT_CHARS) {
        return Err(ValidationError::InvalidSegment(segment.to_string()));
    }

    Ok(concise)
}
