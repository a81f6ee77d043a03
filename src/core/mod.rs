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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the fundamental data structures and algorithms
//! for shortcut assignment, including:
//! - Shortcut and action value types
//! - The action registry with identity and grouping indexes
//! - Conflict lookup and bulk conflict auditing
//! - The assignment engine and its undo/redo history
//! - The read-only tree projection and its search filter
//!
//! Nothing here performs I/O or needs an event loop, so the whole
//! engine can be unit tested headlessly.

pub mod conflict;
pub mod engine;
pub mod filter;
pub mod parser;
pub mod payload;
pub mod registry;
pub mod tree;
pub mod types;
pub mod undo;
pub mod validator;

pub use conflict::{find_conflict, Conflict, ConflictDetector};
pub use engine::{AssignOutcome, AssignmentEngine, EngineState, PendingAssignment};
pub use filter::{Filter, FilterError, FilterTarget, MatchMode, ShortcutState};
pub use parser::ParseError;
pub use registry::{ActionRegistry, RegistryError};
pub use tree::{NodeId, NodeKind, TreeNode, TreeProjection};
pub use types::*;
pub use undo::{Command, UndoStack};
pub use validator::ValidationError;

#[cfg(test)]
mod tests;
