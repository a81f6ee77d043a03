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

//! src/core/parser.rs
//!
//! Shortcut text and action manifest parsers
//!
//! This module parses two text formats:
//! - Shortcut text: `"Ctrl+Shift+K"`, `"Ctrl++"`, `"F5"`, `""` (unassigned)
//! - Action manifests: sectioned `Name = Shortcut` declarations
//!
//! # Manifest format
//! ```text
//! # comment
//! [File / General]
//! New = Ctrl+N
//! Open = Ctrl+O
//! Close =
//! ```
//!
//! # Architecture
//! The parsers use nom combinators for composable, type-safe parsing.
//! Key names are validated by validator.rs after the modifiers are split off.

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_until},
};
use nom::{
    character::complete::{char, space0},
    combinator::{all_consuming, map, rest, value},
};
use nom::{multi::separated_list1, sequence::delimited, IResult, Parser};
use thiserror::Error;

use crate::core::types::{Modifier, Shortcut};

/// Parse errors with line number context
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid shortcut '{text}': {reason}")]
    InvalidShortcutText { text: String, reason: String },

    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Action declared outside of a [Context / Category] section on line {line}")]
    MissingSection { line: usize },
}

/// One action declaration read from a manifest
#[derive(Clone, Debug, PartialEq)]
pub struct ActionDecl {
    pub context: String,
    pub category: String,
    pub name: String,
    pub shortcut: Shortcut,
    /// 1-based source line, for error reporting
    pub line: usize,
}

/// Parse shortcut text into a normalised `Shortcut`
///
/// Whitespace around `+` separators is tolerated. The plus key itself is
/// written as a trailing `++` (`"Ctrl++"`) or a bare `"+"`.
///
/// # Example
/// ```
/// use shortcut_editor::core::parser::parse_shortcut;
///
/// let shortcut = parse_shortcut("shift + ctrl + k")?;
/// assert_eq!(shortcut.to_string(), "Ctrl+Shift+K");
/// assert!(parse_shortcut("")?.is_empty());
/// # Ok::<(), shortcut_editor::core::parser::ParseError>(())
/// ```
pub fn parse_shortcut(text: &str) -> Result<Shortcut, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Shortcut::empty());
    }

    let invalid = |reason: String| ParseError::InvalidShortcutText {
        text: text.to_string(),
        reason,
    };

    let (modifier_part, key_part) = split_key(trimmed);

    let modifiers = if modifier_part.trim().is_empty() {
        Vec::new()
    } else {
        parse_modifiers(modifier_part)
            .map(|(_, modifiers)| modifiers)
            .map_err(|_| invalid(format!("unknown modifier in '{}'", modifier_part.trim())))?
    };

    Shortcut::new(modifiers, key_part).map_err(|e| invalid(e.to_string()))
}

/// Splits `"Ctrl+Shift+K"` into `("Ctrl+Shift", "K")`
fn split_key(text: &str) -> (&str, &str) {
    if text == "+" {
        return ("", "+");
    }

    if let Some(modifiers) = text.strip_suffix("++") {
        return (modifiers, "+");
    }

    match text.rfind('+') {
        Some(pos) => (&text[..pos], &text[pos + 1..]),
        None => ("", text),
    }
}

/// Parse a single modifier name
///
/// Accepted spellings (case-insensitive):
/// - Ctrl: `ctrl`, `control`
/// - Alt: `alt`, `option`, `opt`
/// - Shift: `shift`
/// - Meta: `meta`, `super`, `win`, `cmd`, `command`
///
/// Longer spellings are tried first to avoid partial matches.
pub fn parse_modifier(input: &str) -> IResult<&str, Modifier> {
    alt((
        value(Modifier::Ctrl, alt((tag_no_case("control"), tag_no_case("ctrl")))),
        value(
            Modifier::Alt,
            alt((tag_no_case("option"), tag_no_case("opt"), tag_no_case("alt"))),
        ),
        value(Modifier::Shift, tag_no_case("shift")),
        value(
            Modifier::Meta,
            alt((
                tag_no_case("command"),
                tag_no_case("cmd"),
                tag_no_case("super"),
                tag_no_case("meta"),
                tag_no_case("win"),
            )),
        ),
    ))
    .parse(input)
}

/// Parse a `+`-separated modifier list, consuming the whole input
///
/// - "Ctrl" → [Ctrl]
/// - "Ctrl+Shift" → [Ctrl, Shift]
/// - "ctrl + alt" → [Ctrl, Alt]
pub fn parse_modifiers(input: &str) -> IResult<&str, Vec<Modifier>> {
    all_consuming(separated_list1(
        delimited(space0, char('+'), space0),
        parse_modifier,
    ))
    .parse(input.trim())
}

/// Parse a complete action manifest
///
/// # Returns
/// Declarations in file order, or the first syntax error with its line.
pub fn parse_manifest(content: &str) -> Result<Vec<ActionDecl>, ParseError> {
    let mut section: Option<(String, String)> = None;
    let mut declarations = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        let line_trimmed = strip_comment(line).trim();
        if line_trimmed.is_empty() {
            continue;
        }

        if line_trimmed.starts_with('[') {
            let (context, category) = parse_section_header(line_trimmed)
                .map(|(_, header)| header)
                .map_err(|e| ParseError::InvalidSyntax {
                    line: line_num,
                    message: format!("{:?}", e),
                })?;

            if context.is_empty() || category.is_empty() {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: "section needs both a context and a category".to_string(),
                });
            }

            section = Some((context.to_string(), category.to_string()));
            continue;
        }

        let Some((context, category)) = &section else {
            return Err(ParseError::MissingSection { line: line_num });
        };

        let (name, shortcut_text) = parse_declaration(line_trimmed)
            .map(|(_, decl)| decl)
            .map_err(|e| ParseError::InvalidSyntax {
                line: line_num,
                message: format!("{:?}", e),
            })?;

        if name.is_empty() {
            return Err(ParseError::InvalidSyntax {
                line: line_num,
                message: "action name is empty".to_string(),
            });
        }

        let shortcut = parse_shortcut(shortcut_text).map_err(|e| ParseError::InvalidSyntax {
            line: line_num,
            message: e.to_string(),
        })?;

        declarations.push(ActionDecl {
            context: context.clone(),
            category: category.clone(),
            name: name.to_string(),
            shortcut,
            line: line_num,
        });
    }

    Ok(declarations)
}

/// Parse `[Context / Category]`
pub fn parse_section_header(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        all_consuming(delimited(char('['), take_until("]"), char(']'))),
        |inner: &str| match inner.split_once('/') {
            Some((context, category)) => (context.trim(), category.trim()),
            None => (inner.trim(), ""),
        },
    )
    .parse(input)
}

/// Parse `Name = Shortcut`; the shortcut part may be empty
pub fn parse_declaration(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        (take_until("="), char('='), rest),
        |(name, _, shortcut): (&str, char, &str)| (name.trim(), shortcut.trim()),
    )
    .parse(input)
}

/// Cuts a `#` comment that starts the line or follows whitespace,
/// so `Ctrl+#` stays a shortcut.
fn strip_comment(line: &str) -> &str {
    let mut previous_is_space = true;

    for (i, c) in line.char_indices() {
        if c == '#' && previous_is_space {
            return &line[..i];
        }
        previous_is_space = c.is_whitespace();
    }

    line
}
