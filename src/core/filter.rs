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

//! Search filter for the action tree
//!
//! A filter combines:
//! - a text query matched against either the action name or its shortcut
//!   text, using one of six match modes (always case-insensitive)
//! - an optional set of enabled contexts
//! - a default/customized state filter
//!
//! The filter only answers yes/no for a single node. Recursion over the
//! tree (a group is visible when any descendant matches) lives in
//! `TreeProjection::matches`.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::core::types::Action;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid search pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Which text of an action the query is compared against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterTarget {
    #[default]
    Name,
    Shortcut,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Contains,
    Exactly,
    StartsWith,
    EndsWith,
    /// `*`, `?` and `[...]` globbing, not anchored
    Wildcard,
    RegularExpression,
}

/// Restricts actions by whether they still carry their default shortcut
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShortcutState {
    #[default]
    Any,
    Default,
    Customized,
}

/// A compiled search filter.
///
/// The default filter accepts everything.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    query: String,
    target: FilterTarget,
    mode: MatchMode,
    /// Compiled form of `query`, for Wildcard and RegularExpression
    pattern: Option<Regex>,
    /// `None` means every context is enabled
    contexts: Option<HashSet<String>>,
    state: ShortcutState,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain substring filter on the given target.
    pub fn text(query: &str, target: FilterTarget) -> Self {
        Self {
            query: query.to_lowercase(),
            target,
            ..Self::default()
        }
    }

    /// Builds a filter with an explicit match mode.
    ///
    /// # Errors
    /// `InvalidPattern` when a RegularExpression query does not compile.
    pub fn with_mode(query: &str, target: FilterTarget, mode: MatchMode) -> Result<Self, FilterError> {
        let pattern = match mode {
            MatchMode::Wildcard => Some(compile(&wildcard_to_regex(query), query)?),
            MatchMode::RegularExpression => Some(compile(query, query)?),
            _ => None,
        };

        Ok(Self {
            query: query.to_lowercase(),
            target,
            mode,
            pattern,
            ..Self::default()
        })
    }

    /// Only show actions of these contexts.
    pub fn restrict_contexts<I, S>(mut self, contexts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contexts = Some(contexts.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_state(mut self, state: ShortcutState) -> Self {
        self.state = state;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn target(&self) -> FilterTarget {
        self.target
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn state(&self) -> ShortcutState {
        self.state
    }

    pub fn is_empty_query(&self) -> bool {
        self.query.is_empty()
    }

    pub fn context_enabled(&self, context: &str) -> bool {
        self.contexts
            .as_ref()
            .map_or(true, |enabled| enabled.contains(context))
    }

    /// Direct match of a single action, ignoring its ancestors.
    pub fn accepts_action(&self, action: &Action) -> bool {
        if !self.context_enabled(action.context()) {
            return false;
        }

        let state_ok = match self.state {
            ShortcutState::Any => true,
            ShortcutState::Default => !action.is_customized(),
            ShortcutState::Customized => action.is_customized(),
        };
        if !state_ok {
            return false;
        }

        match self.target {
            FilterTarget::Name => self.matches_text(action.name()),
            FilterTarget::Shortcut => self.matches_text(&action.shortcut().to_string()),
        }
    }

    /// Direct match of a context or category label.
    ///
    /// Group labels only match a non-empty name query when no state filter
    /// is active; otherwise groups are shown only through their children.
    pub fn accepts_group(&self, label: &str) -> bool {
        !self.query.is_empty()
            && self.target == FilterTarget::Name
            && self.state == ShortcutState::Any
            && self.matches_text(label)
    }

    /// Compares text against the query. An empty query matches anything.
    pub fn matches_text(&self, text: &str) -> bool {
        if self.query.is_empty() {
            return true;
        }

        if let Some(pattern) = &self.pattern {
            return pattern.is_match(text);
        }

        let text = text.to_lowercase();
        match self.mode {
            MatchMode::Contains => text.contains(&self.query),
            MatchMode::Exactly => text == self.query,
            MatchMode::StartsWith => text.starts_with(&self.query),
            MatchMode::EndsWith => text.ends_with(&self.query),
            MatchMode::Wildcard | MatchMode::RegularExpression => false,
        }
    }
}

fn compile(regex: &str, query: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(regex)
        .case_insensitive(true)
        .build()
        .map_err(|source| FilterError::InvalidPattern {
            pattern: query.to_string(),
            source,
        })
}

/// `*` → `.*`, `?` → `.`, `[abc]`/`[!abc]` → character class,
/// everything else literal. An unclosed `[` is literal.
fn wildcard_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut literal = String::new();
    let mut chars = glob.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let token = match c {
            '*' => ".*".to_string(),
            '?' => ".".to_string(),
            '[' => match glob[i + 1..].find(']') {
                Some(len) if len > 0 => {
                    let class = &glob[i + 1..i + 1 + len];
                    while chars.peek().is_some_and(|&(j, _)| j <= i + 1 + len) {
                        chars.next();
                    }
                    match class.strip_prefix('!') {
                        Some(negated) => format!("[^{}]", escape_class(negated)),
                        None => format!("[{}]", escape_class(class)),
                    }
                }
                _ => {
                    literal.push(c);
                    continue;
                }
            },
            _ => {
                literal.push(c);
                continue;
            }
        };

        out.push_str(&regex::escape(&literal));
        literal.clear();
        out.push_str(&token);
    }
    out.push_str(&regex::escape(&literal));

    out
}

/// Escapes everything inside a class except ranges
fn escape_class(class: &str) -> String {
    class
        .chars()
        .map(|c| match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => format!("\\{}", c),
            _ => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_escapes_literals() {
        assert_eq!(wildcard_to_regex("Ctrl+*"), r"Ctrl\+.*");
        assert_eq!(wildcard_to_regex("a?c"), "a.c");
        assert_eq!(wildcard_to_regex("F[1-3]"), "F[1-3]");
        assert_eq!(wildcard_to_regex("F[!1]"), "F[^1]");
        assert_eq!(wildcard_to_regex("a[b"), r"a\[b");
    }

    #[test]
    fn test_match_modes_are_case_insensitive() {
        let contains = Filter::text("OPEN", FilterTarget::Name);
        assert!(contains.matches_text("Open Recent"));

        let exact = Filter::with_mode("open", FilterTarget::Name, MatchMode::Exactly).unwrap();
        assert!(exact.matches_text("Open"));
        assert!(!exact.matches_text("Open Recent"));

        let ends = Filter::with_mode("recent", FilterTarget::Name, MatchMode::EndsWith).unwrap();
        assert!(ends.matches_text("Open Recent"));

        let wildcard = Filter::with_mode("o*n", FilterTarget::Name, MatchMode::Wildcard).unwrap();
        assert!(wildcard.matches_text("Reopen"));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let result = Filter::with_mode("(unclosed", FilterTarget::Name, MatchMode::RegularExpression);
        assert!(matches!(result, Err(FilterError::InvalidPattern { .. })));
    }

    #[test]
    fn test_group_label_ignored_under_state_filter() {
        let filter = Filter::text("file", FilterTarget::Name).with_state(ShortcutState::Customized);
        assert!(!filter.accepts_group("File"));
        assert!(Filter::text("file", FilterTarget::Name).accepts_group("File"));
        assert!(!Filter::new().accepts_group("File"));
    }
}
