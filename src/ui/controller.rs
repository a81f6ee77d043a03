//! MVC Controller - Mediates between Model (engine, settings) and a View
//!
//! # Responsibilities
//!
//! - Build the action registry from a manifest
//! - Load and save customizations through SettingsStore
//! - Route assign/confirm/cancel/undo/redo/reset requests to the engine
//! - Keep the tree projection current and apply the search filter
//! - Resolve drag-and-drop payloads into assignment requests
//! - Provide data to the View in UI-friendly rows
//!
//! # Architecture
//!
//! The Controller owns the Model but knows nothing about widgets. Methods
//! take `&self` and use interior mutability so a View can share one
//! controller between its callbacks.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{load_manifest, ConfigError, SettingsStore};
use crate::core::payload::{encode_actions, encode_shortcut, resolve_drop, DropTarget, PayloadError};
use crate::core::{
    ActionId, ActionRegistry, AssignOutcome, AssignmentEngine, Conflict, ConflictDetector, Filter, Modifier, NodeId,
    NodeKind, RegistryError, Shortcut, ShortcutChange, TreeProjection,
};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("No settings file configured")]
    NoSettings,
}

/// One visible row of the filtered tree
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRow {
    pub node: NodeId,
    /// Stable key for expand/collapse persistence
    pub key: String,
    pub label: String,
    /// 0 = context, 1 = category, 2 = action
    pub depth: usize,
    /// Current shortcut text, for action rows
    pub shortcut: Option<String>,
    pub customized: bool,
}

/// MVC Controller coordinating Model and View
pub struct Controller {
    /// Settings persistence; `None` for an in-memory session
    store: Option<SettingsStore>,
    engine: RefCell<AssignmentEngine>,
    projection: RefCell<TreeProjection>,
    filter: RefCell<Filter>,
}

impl Controller {
    /// Creates a controller over an already populated registry.
    pub fn new(registry: ActionRegistry, store: Option<SettingsStore>) -> Self {
        let projection = TreeProjection::build(&registry);

        Self {
            store,
            engine: RefCell::new(AssignmentEngine::new(registry)),
            projection: RefCell::new(projection),
            filter: RefCell::new(Filter::new()),
        }
    }

    /// Builds the registry from a manifest file and opens the settings file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shortcut_editor::ui::Controller;
    /// use std::path::{Path, PathBuf};
    ///
    /// let controller = Controller::from_files(
    ///     "app",
    ///     Path::new("actions.manifest"),
    ///     Some(PathBuf::from("shortcuts.conf")),
    /// )?;
    /// controller.load_settings()?;
    /// # Ok::<(), shortcut_editor::ui::controller::ControllerError>(())
    /// ```
    pub fn from_files(domain: &str, manifest: &Path, settings: Option<PathBuf>) -> Result<Self, ControllerError> {
        let mut registry = ActionRegistry::new(domain);
        for decl in load_manifest(manifest)? {
            registry.register(&decl.name, &decl.context, &decl.category, decl.shortcut)?;
        }

        let store = settings.map(SettingsStore::new).transpose()?;
        Ok(Self::new(registry, store))
    }

    /// Applies persisted customizations as the starting state.
    ///
    /// The import is not undoable. Returns the applied changes.
    pub fn load_settings(&self) -> Result<Vec<ShortcutChange>, ControllerError> {
        let store = self.store.as_ref().ok_or(ControllerError::NoSettings)?;
        let entries = store.load()?;

        let mut engine = self.engine.borrow_mut();
        let changes = engine.apply_customizations(&entries);
        engine.clear_history();

        Ok(changes)
    }

    pub fn save_settings(&self) -> Result<(), ControllerError> {
        let store = self.store.as_ref().ok_or(ControllerError::NoSettings)?;
        store.save(self.engine.borrow().registry())?;
        Ok(())
    }

    /// Read access to the registry for the duration of `f`.
    pub fn with_registry<R>(&self, f: impl FnOnce(&ActionRegistry) -> R) -> R {
        f(self.engine.borrow().registry())
    }

    /// Registers an action added after startup and refreshes the tree.
    pub fn register(
        &self,
        name: &str,
        context: &str,
        category: &str,
        default_shortcut: Shortcut,
    ) -> Result<ActionId, ControllerError> {
        let id = self
            .engine
            .borrow_mut()
            .register(name, context, category, default_shortcut)?;
        self.refresh_projection();
        Ok(id)
    }

    fn refresh_projection(&self) {
        let engine = self.engine.borrow();
        self.projection.borrow_mut().refresh(engine.registry());
    }

    // ------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------

    pub fn request_assign(&self, id: &ActionId, shortcut: Shortcut) -> Result<AssignOutcome, ControllerError> {
        Ok(self.engine.borrow_mut().request_assign(id, shortcut)?)
    }

    pub fn confirm_reassign(&self, id: &ActionId, shortcut: Shortcut) -> Result<AssignOutcome, ControllerError> {
        Ok(self.engine.borrow_mut().confirm_reassign(id, shortcut)?)
    }

    pub fn cancel(&self) -> bool {
        self.engine.borrow_mut().cancel().is_some()
    }

    pub fn undo(&self) -> Result<Option<Vec<ShortcutChange>>, ControllerError> {
        Ok(self.engine.borrow_mut().undo()?)
    }

    pub fn redo(&self) -> Result<Option<Vec<ShortcutChange>>, ControllerError> {
        Ok(self.engine.borrow_mut().redo()?)
    }

    pub fn can_undo(&self) -> bool {
        self.engine.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.engine.borrow().can_redo()
    }

    /// Edit menu labels for the next undo and redo steps
    pub fn history_labels(&self) -> (Option<String>, Option<String>) {
        let engine = self.engine.borrow();
        (engine.history().undo_label(), engine.history().redo_label())
    }

    pub fn reset_all(&self) -> Vec<ShortcutChange> {
        self.engine.borrow_mut().reset_all()
    }

    pub fn reset(&self, ids: &[ActionId]) -> Result<Vec<ShortcutChange>, ControllerError> {
        Ok(self.engine.borrow_mut().reset(ids)?)
    }

    // ------------------------------------------------------------------
    // Drag and drop
    // ------------------------------------------------------------------

    /// Payload text for dragging the given action rows
    pub fn drag_payload(&self, ids: &[ActionId]) -> String {
        encode_actions(ids)
    }

    /// Payload for dragging a virtual key with the given modifiers held
    pub fn key_drag_payload(&self, key: &str, modifiers: Vec<Modifier>) -> Result<String, ControllerError> {
        let shortcut = Shortcut::new(modifiers, key).map_err(PayloadError::from)?;
        Ok(encode_shortcut(&shortcut))
    }

    /// Handles a drop, assigning in payload order.
    ///
    /// Stops at the first conflict and returns it; the View then asks the
    /// user and calls `confirm_reassign` or `cancel`. Otherwise returns
    /// every applied change.
    pub fn drop_payload(&self, target: &DropTarget, text: &str) -> Result<AssignOutcome, ControllerError> {
        let requests = resolve_drop(target, text)?;
        let mut applied = Vec::new();

        let mut engine = self.engine.borrow_mut();
        for (id, shortcut) in requests {
            match engine.request_assign(&id, shortcut)? {
                AssignOutcome::Applied(changes) => applied.extend(changes),
                AssignOutcome::Unchanged => {}
                conflict @ AssignOutcome::ConflictDetected(_) => return Ok(conflict),
            }
        }

        Ok(if applied.is_empty() {
            AssignOutcome::Unchanged
        } else {
            AssignOutcome::Applied(applied)
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn set_filter(&self, filter: Filter) {
        *self.filter.borrow_mut() = filter;
    }

    /// Rows of the filtered tree in display order.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        self.refresh_projection();

        let engine = self.engine.borrow();
        let registry = engine.registry();
        let projection = self.projection.borrow();
        let filter = self.filter.borrow();

        projection
            .visible(&filter, registry)
            .into_iter()
            .filter_map(|id| {
                let node = projection.node(id)?;
                let (depth, action) = match node.kind() {
                    NodeKind::Context => (0, None),
                    NodeKind::Category => (1, None),
                    NodeKind::Action(action_id) => (2, registry.get(action_id).ok()),
                };

                Some(TreeRow {
                    node: id,
                    key: node.key().to_string(),
                    label: node.label().to_string(),
                    depth,
                    shortcut: action.map(|a| a.shortcut().to_string()),
                    customized: action.is_some_and(|a| a.is_customized()),
                })
            })
            .collect()
    }

    /// Shortcuts bound inside one context, for keyboard highlighting.
    pub fn context_shortcuts(&self, context: &str) -> Vec<(Shortcut, ActionId)> {
        self.with_registry(|registry| {
            registry
                .iter()
                .filter(|action| action.context() == context && !action.shortcut().is_empty())
                .map(|action| (action.shortcut().clone(), action.id().clone()))
                .collect()
        })
    }

    /// Shortcuts currently held by more than one action
    pub fn get_conflicts(&self) -> Vec<Conflict> {
        self.with_registry(|registry| ConflictDetector::from_registry(registry).find_conflicts())
    }

    pub fn action_count(&self) -> usize {
        self.with_registry(ActionRegistry::len)
    }

    pub fn conflict_count(&self) -> usize {
        self.get_conflicts().len()
    }
}
