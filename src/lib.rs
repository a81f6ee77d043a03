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

//! Shortcut Editor
//!
//! A headless keyboard shortcut assignment engine: register named actions
//! grouped by context and category, bind them to shortcuts, resolve
//! conflicts with explicit confirmation, and undo/redo every change.
//!
//! # Features
//!
//! - **Conflict Resolution:** Assignments to a taken shortcut need confirmation
//! - **Undo/Redo:** Reassignments undo as a single step
//! - **Tree Projection:** Context → category → action view with recursive search
//! - **Drag and Drop:** `text/plain` payload codec for keyboard visualisations
//! - **Automatic Backups:** Timestamped backups before every settings save
//! - **Atomic Operations:** Safe file writes with rollback on failure
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, registry, engine, undo, tree, filter)
//! - **`config`:** Settings persistence (record codec, atomic writes, backups)
//! - **`ui`:** Toolkit-independent controller for a View to drive
//!
//! # Examples
//!
//! ## Resolving a conflict
//!
//! ```
//! use shortcut_editor::core::{ActionRegistry, AssignmentEngine, AssignOutcome};
//!
//! let mut registry = ActionRegistry::new("app");
//! let new = registry.register("New", "File", "General", "Ctrl+N".parse()?)?;
//! let open = registry.register("Open", "File", "General", "Ctrl+O".parse()?)?;
//! let mut engine = AssignmentEngine::new(registry);
//!
//! if let AssignOutcome::ConflictDetected(holder) = engine.request_assign(&open, "Ctrl+N".parse()?)? {
//!     assert_eq!(holder, new);
//!     engine.confirm_reassign(&open, "Ctrl+N".parse()?)?;
//! }
//! assert!(engine.registry().get(&new)?.shortcut().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Searching the tree
//!
//! ```
//! use shortcut_editor::core::{ActionRegistry, Filter, FilterTarget, TreeProjection};
//!
//! let mut registry = ActionRegistry::new("app");
//! registry.register("New", "File", "General", "Ctrl+N".parse()?)?;
//! registry.register("Copy", "Edit", "Clipboard", "Ctrl+C".parse()?)?;
//!
//! let tree = TreeProjection::build(&registry);
//! let filter = Filter::text("Ctrl+N", FilterTarget::Shortcut);
//!
//! // context, category and the matching action
//! assert_eq!(tree.visible(&filter, &registry).len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod core;
pub mod ui;

// Re-export commonly used types for convenience
pub use crate::core::{Action, ActionId, ActionRegistry, AssignOutcome, AssignmentEngine, Modifier, Shortcut};
