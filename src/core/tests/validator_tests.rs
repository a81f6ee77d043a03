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

use crate::core::validator::{canonical_key, validate_segment, ValidationError};

#[test]
fn test_named_keys_case_insensitive() {
    assert_eq!(canonical_key("ESCAPE").unwrap(), "Esc");
    assert_eq!(canonical_key("esc").unwrap(), "Esc");
    assert_eq!(canonical_key("PageDown").unwrap(), "PgDown");
    assert_eq!(canonical_key("delete").unwrap(), "Del");
    assert_eq!(canonical_key("return").unwrap(), "Return");
}

#[test]
fn test_function_keys() {
    assert_eq!(canonical_key("f1").unwrap(), "F1");
    assert_eq!(canonical_key("F35").unwrap(), "F35");
    assert!(canonical_key("F0").is_err());
    assert!(canonical_key("F36").is_err());
    assert!(canonical_key("F05").is_err(), "Leading zeros are not canonical");
}

#[test]
fn test_rejects_unknown_keys() {
    assert!(matches!(canonical_key("Hyper"), Err(ValidationError::InvalidKey(_))));
    assert!(canonical_key("").is_err());
    assert!(canonical_key("\t").is_err());
    assert!(canonical_key("\u{7}").is_err(), "Control characters are not keys");
}

#[test]
fn test_segment_whitespace_removed() {
    assert_eq!(validate_segment("Recent Files").unwrap(), "RecentFiles");
    assert_eq!(validate_segment(" Edit\t").unwrap(), "Edit");
}

#[test]
fn test_segment_rejects_reserved() {
    assert!(matches!(validate_segment(""), Err(ValidationError::InvalidSegment(_))));
    assert!(validate_segment("   ").is_err());
    assert!(validate_segment("a;b").is_err());
}
