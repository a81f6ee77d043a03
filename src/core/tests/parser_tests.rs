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

//! Parser module tests
//!
//! Tests for both text formats:
//! - Shortcut text (modifier aliases, plus key, unassigned)
//! - Section headers and declarations
//! - Full manifest parsing with line-numbered errors

use crate::core::{parser::*, types::Modifier};

#[test]
fn test_parse_modifiers() {
    let (_, mods) = parse_modifiers("Ctrl").unwrap();
    assert_eq!(mods, vec![Modifier::Ctrl]);

    let (_, mods) = parse_modifiers("cmd + OPTION").unwrap();
    assert_eq!(mods, vec![Modifier::Meta, Modifier::Alt]);
}

#[test]
fn test_parse_shortcut_plus_key() {
    let shortcut = parse_shortcut("Ctrl++").unwrap();
    assert_eq!(shortcut.key(), Some("+"));
    assert_eq!(shortcut.modifiers(), &[Modifier::Ctrl]);

    assert_eq!(parse_shortcut("+").unwrap().key(), Some("+"));
}

#[test]
fn test_parse_shortcut_empty_is_unassigned() {
    assert!(parse_shortcut("").unwrap().is_empty());
    assert!(parse_shortcut("   ").unwrap().is_empty());
}

#[test]
fn test_parse_shortcut_errors() {
    assert!(matches!(
        parse_shortcut("Ctrl+"),
        Err(ParseError::InvalidShortcutText { .. })
    ));
    assert!(matches!(
        parse_shortcut("Hyper+K"),
        Err(ParseError::InvalidShortcutText { .. })
    ));
    assert!(matches!(
        parse_shortcut("Ctrl+Banana"),
        Err(ParseError::InvalidShortcutText { .. })
    ));
}

#[test]
fn test_parse_section_header() {
    let (_, header) = parse_section_header("[File / General]").unwrap();
    assert_eq!(header, ("File", "General"));

    let (_, header) = parse_section_header("[Edit]").unwrap();
    assert_eq!(header, ("Edit", ""));

    assert!(parse_section_header("[File / General] trailing").is_err());
}

#[test]
fn test_parse_declaration() {
    let (_, decl) = parse_declaration("Save As = Ctrl+Shift+S").unwrap();
    assert_eq!(decl, ("Save As", "Ctrl+Shift+S"));

    let (_, decl) = parse_declaration("Close =").unwrap();
    assert_eq!(decl, ("Close", ""));

    assert!(parse_declaration("No separator here").is_err());
}

#[test]
fn test_parse_full_manifest() {
    let manifest = r#"
# Editor actions
[File / General]
New = Ctrl+N
Open = Ctrl+O     # trailing comment
Close =

[Edit / Clipboard]
Copy = Ctrl+C
Zoom In = Ctrl++
"#;

    let decls = parse_manifest(manifest).unwrap();
    assert_eq!(decls.len(), 5);

    assert_eq!(decls[0].context, "File");
    assert_eq!(decls[0].category, "General");
    assert_eq!(decls[0].shortcut.to_string(), "Ctrl+N");
    assert_eq!(decls[1].shortcut.to_string(), "Ctrl+O");
    assert!(decls[2].shortcut.is_empty());
    assert_eq!(decls[3].context, "Edit");
    assert_eq!(decls[4].name, "Zoom In");
    assert_eq!(decls[4].shortcut.to_string(), "Ctrl++");
}

#[test]
fn test_manifest_error_line_numbers() {
    let manifest = "[File / General]\nNew = Ctrl+N\nBroken = Ctrl+Nope\n";
    match parse_manifest(manifest) {
        Err(ParseError::InvalidSyntax { line, .. }) => assert_eq!(line, 3),
        other => panic!("Expected syntax error on line 3, got {:?}", other),
    }
}

#[test]
fn test_manifest_requires_section() {
    let result = parse_manifest("New = Ctrl+N\n");
    assert_eq!(result, Err(ParseError::MissingSection { line: 1 }));
}

#[test]
fn test_manifest_rejects_half_header() {
    let result = parse_manifest("[File]\nNew = Ctrl+N\n");
    assert!(matches!(result, Err(ParseError::InvalidSyntax { line: 1, .. })));
}
