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

//! Assignment engine tests
//!
//! Covers the assign/confirm/cancel state machine, composite undo steps,
//! undo/redo symmetry, resets and bulk customization import.

use crate::core::{
    find_conflict, ActionId, ActionRegistry, AssignOutcome, AssignmentEngine, Command, EngineState, RegistryError,
    Shortcut, UndoStack,
};

fn shortcut(text: &str) -> Shortcut {
    text.parse().unwrap()
}

/// Registry with A(Ctrl+N) and B(Ctrl+O) in context File
fn file_engine() -> (AssignmentEngine, ActionId, ActionId) {
    let mut registry = ActionRegistry::new("app");
    let a = registry.register("A", "File", "General", shortcut("Ctrl+N")).unwrap();
    let b = registry.register("B", "File", "General", shortcut("Ctrl+O")).unwrap();
    (AssignmentEngine::new(registry), a, b)
}

fn current(engine: &AssignmentEngine, id: &ActionId) -> String {
    engine.registry().get(id).unwrap().shortcut().to_string()
}

fn snapshot(engine: &AssignmentEngine) -> Vec<String> {
    engine.registry().iter().map(|action| action.shortcut().to_string()).collect()
}

#[test]
fn test_actions_start_at_default() {
    let (engine, _, _) = file_engine();
    for action in engine.registry().iter() {
        assert_eq!(action.shortcut(), action.default_shortcut());
    }
}

#[test]
fn test_reassign_scenario_single_undo_step() {
    let (mut engine, a, b) = file_engine();

    let outcome = engine.request_assign(&b, shortcut("Ctrl+N")).unwrap();
    assert_eq!(outcome, AssignOutcome::ConflictDetected(a.clone()));
    assert!(matches!(engine.state(), EngineState::AwaitingConfirmation(_)));
    assert_eq!(current(&engine, &b), "Ctrl+O", "Nothing changes before confirmation");

    let outcome = engine.confirm_reassign(&b, shortcut("Ctrl+N")).unwrap();
    match outcome {
        AssignOutcome::Applied(changes) => assert_eq!(changes.len(), 2),
        other => panic!("Expected Applied, got {:?}", other),
    }
    assert_eq!(current(&engine, &a), "");
    assert_eq!(current(&engine, &b), "Ctrl+N");
    assert_eq!(engine.state(), &EngineState::Idle);
    assert_eq!(engine.history().len(), 1, "Reassignment is one undo step");

    let restored = engine.undo().unwrap().unwrap();
    assert_eq!(restored.len(), 2);
    assert_eq!(current(&engine, &a), "Ctrl+N");
    assert_eq!(current(&engine, &b), "Ctrl+O");
    assert!(!engine.can_undo());

    engine.redo().unwrap();
    assert_eq!(current(&engine, &a), "");
    assert_eq!(current(&engine, &b), "Ctrl+N");
}

#[test]
fn test_no_conflict_after_successful_assignment() {
    let (mut engine, a, b) = file_engine();

    engine.request_assign(&a, shortcut("Ctrl+K")).unwrap();
    assert_eq!(find_conflict(engine.registry(), &shortcut("Ctrl+K"), &a), None);

    engine.request_assign(&b, shortcut("Ctrl+K")).unwrap();
    engine.confirm_reassign(&b, shortcut("Ctrl+K")).unwrap();
    assert_eq!(find_conflict(engine.registry(), &shortcut("Ctrl+K"), &b), None);
}

#[test]
fn test_empty_assign_always_succeeds() {
    let mut registry = ActionRegistry::new("app");
    let ids: Vec<ActionId> = (0..5)
        .map(|i| registry.register(&format!("Action{}", i), "File", "General", Shortcut::empty()).unwrap())
        .collect();
    let target = registry.register("Target", "File", "General", shortcut("Ctrl+T")).unwrap();
    let mut engine = AssignmentEngine::new(registry);

    let outcome = engine.request_assign(&target, Shortcut::empty()).unwrap();
    assert!(matches!(outcome, AssignOutcome::Applied(_)));
    assert!(engine.registry().get(&target).unwrap().shortcut().is_empty());

    // Already empty: nothing to do, still no conflict
    assert_eq!(engine.request_assign(&ids[0], Shortcut::empty()).unwrap(), AssignOutcome::Unchanged);
}

#[test]
fn test_same_shortcut_is_unchanged() {
    let (mut engine, a, _) = file_engine();
    assert_eq!(engine.request_assign(&a, shortcut("Ctrl+N")).unwrap(), AssignOutcome::Unchanged);
    assert!(!engine.can_undo());
}

#[test]
fn test_undo_redo_symmetry() {
    let mut registry = ActionRegistry::new("app");
    let ids: Vec<ActionId> = ["New", "Open", "Save", "Close"]
        .iter()
        .map(|name| registry.register(name, "File", "General", Shortcut::empty()).unwrap())
        .collect();
    let mut engine = AssignmentEngine::new(registry);

    engine.request_assign(&ids[0], shortcut("Ctrl+N")).unwrap();
    engine.request_assign(&ids[1], shortcut("Ctrl+O")).unwrap();
    engine.request_assign(&ids[2], shortcut("Ctrl+N")).unwrap();
    engine.confirm_reassign(&ids[2], shortcut("Ctrl+N")).unwrap();
    engine.request_assign(&ids[3], shortcut("Alt+F4")).unwrap();

    let before = snapshot(&engine);
    assert_eq!(before, vec!["", "Ctrl+O", "Ctrl+N", "Alt+F4"]);
    let steps = engine.history().len();
    assert_eq!(steps, 4);

    for _ in 0..steps {
        assert!(engine.undo().unwrap().is_some());
    }
    assert!(snapshot(&engine).iter().all(String::is_empty));
    assert_eq!(engine.undo().unwrap(), None);

    for _ in 0..steps {
        assert!(engine.redo().unwrap().is_some());
    }
    assert_eq!(snapshot(&engine), before);
    assert_eq!(engine.redo().unwrap(), None);
}

#[test]
fn test_new_assignment_truncates_redo() {
    let (mut engine, a, _) = file_engine();

    engine.request_assign(&a, shortcut("Ctrl+1")).unwrap();
    engine.undo().unwrap();
    assert!(engine.can_redo());

    engine.request_assign(&a, shortcut("Ctrl+2")).unwrap();
    assert!(!engine.can_redo());
}

#[test]
fn test_reset_all_idempotent() {
    let (mut engine, a, b) = file_engine();
    engine.request_assign(&a, shortcut("Ctrl+1")).unwrap();
    engine.request_assign(&b, Shortcut::empty()).unwrap();

    let changes = engine.reset_all();
    assert_eq!(changes.len(), 2);
    for action in engine.registry().iter() {
        assert_eq!(action.shortcut(), action.default_shortcut());
    }

    assert!(engine.reset_all().is_empty(), "Second reset must report nothing");
    assert_eq!(engine.history().len(), 3);
}

#[test]
fn test_reset_clears_holder_of_default() {
    let (mut engine, a, b) = file_engine();

    engine.request_assign(&a, Shortcut::empty()).unwrap();
    engine.request_assign(&b, shortcut("Ctrl+N")).unwrap();

    let changes = engine.reset(std::slice::from_ref(&a)).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(current(&engine, &a), "Ctrl+N");
    assert_eq!(current(&engine, &b), "");

    engine.undo().unwrap();
    assert_eq!(current(&engine, &a), "");
    assert_eq!(current(&engine, &b), "Ctrl+N");
}

#[test]
fn test_reset_unknown_action_mutates_nothing() {
    let (mut engine, a, _) = file_engine();
    engine.request_assign(&a, shortcut("Ctrl+1")).unwrap();

    let result = engine.reset(&[a.clone(), ActionId::from("app.No.Such.Action")]);
    assert!(matches!(result, Err(RegistryError::NotFound(_))));
    assert_eq!(current(&engine, &a), "Ctrl+1");
}

#[test]
fn test_apply_customizations_later_entry_wins() {
    let (mut engine, a, b) = file_engine();

    let entries = vec![
        (a.clone(), shortcut("Ctrl+K")),
        (ActionId::from("app.Gone.Gone.Gone"), shortcut("Ctrl+G")),
        (b.clone(), shortcut("Ctrl+K")),
    ];
    let changes = engine.apply_customizations(&entries);

    assert_eq!(current(&engine, &a), "");
    assert_eq!(current(&engine, &b), "Ctrl+K");
    assert_eq!(changes.len(), 3);
    assert_eq!(engine.history().len(), 1, "Import is one undo step");
    assert!(matches!(engine.history().undo_label(), Some(label) if label.contains("3")));

    engine.undo().unwrap();
    assert_eq!(current(&engine, &a), "Ctrl+N");
    assert_eq!(current(&engine, &b), "Ctrl+O");
}

#[test]
fn test_register_after_start() {
    let (mut engine, _, _) = file_engine();
    let late = engine.register("Late", "Plugins", "Misc", shortcut("Ctrl+L")).unwrap();
    assert_eq!(current(&engine, &late), "Ctrl+L");
    assert_eq!(engine.registry().revision(), 3);
}

#[test]
fn test_history_limit() {
    let mut engine = AssignmentEngine::with_history(ActionRegistry::new("app"), UndoStack::with_limit(2));
    let id = engine.register("X", "File", "General", Shortcut::empty()).unwrap();
    for key in ["1", "2", "3"] {
        engine.request_assign(&id, shortcut(&format!("Ctrl+{}", key))).unwrap();
    }

    assert_eq!(engine.history().len(), 2);
    engine.undo().unwrap();
    engine.undo().unwrap();
    assert_eq!(current(&engine, &id), "Ctrl+1");
    assert!(!engine.can_undo());
}

#[test]
fn test_command_labels() {
    let (mut engine, a, b) = file_engine();

    engine.request_assign(&a, Shortcut::empty()).unwrap();
    assert_eq!(
        engine.history().undo_label().as_deref(),
        Some("Clear shortcut of app.File.General.A")
    );

    engine.request_assign(&b, shortcut("Ctrl+N")).unwrap();
    assert_eq!(
        engine.history().undo_label().as_deref(),
        Some("Assign Ctrl+N to app.File.General.B")
    );

    engine.reset_all();
    assert_eq!(engine.history().undo_label().as_deref(), Some("Change 2 shortcuts"));
    assert_eq!(Command::Batch(Vec::new()).label(), "Change 0 shortcuts");
}
