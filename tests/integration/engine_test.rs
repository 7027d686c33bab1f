//! Engine flows against a scripted store
//!
//! Covers the optimistic path of every mutation: what the board shows before
//! the store answers, after it confirms, and after it fails.

use serde_json::{Value, json};
use taskboard::core::models::{BoardState, NewTask, Priority, TaskId, TaskPatch, TaskStatus};
use taskboard::core::ports::{ListFilter, TaskStore};
use taskboard::core::services::{BoardEngine, DeleteOutcome, DragOutcome, DropLocation, MoveOutcome, ViewFilter};
use taskboard::error::{BoardError, StoreError, ValidationError};

use crate::common::fixtures::{TaskBuilder, ids_in, sample_tasks};
use crate::common::mocks::{Call, Op, ScriptedStore};

async fn loaded_engine() -> BoardEngine<ScriptedStore> {
    let engine = BoardEngine::new(ScriptedStore::with_tasks(sample_tasks()));
    engine.load(&ListFilter::all()).await.unwrap();
    engine
}

fn down() -> StoreError {
    StoreError::Transport("connection refused".to_string())
}

// =============================================================================
// LOAD
// =============================================================================

#[tokio::test]
async fn test_load_replaces_board() {
    let engine = loaded_engine().await;
    assert_eq!(engine.snapshot().len(), 4);
    assert_eq!(engine.list_titles(), ["Backlog", "Doing", "Done"]);
}

#[tokio::test]
async fn test_failed_load_keeps_board() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    engine.store().fail_next(Op::List, down());
    let err = engine.load(&ListFilter::all()).await.unwrap_err();

    assert!(matches!(err, BoardError::Transport(_)));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(
        engine.last_error().as_deref(),
        Some("Failed to load tasks. Check that the backend is running.")
    );
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn test_create_settles_store_task() {
    let engine = loaded_engine().await;

    let task = engine.create(NewTask::new("Call vendor").in_list("Doing")).await.unwrap();

    assert_eq!(task.id, TaskId::remote("5"));
    assert_eq!(engine.task(&task.id), Some(task));
    assert!(engine.snapshot().tasks().iter().all(|t| !t.id.is_provisional()));
    assert_eq!(engine.snapshot().len(), 5);
}

#[tokio::test]
async fn test_create_without_list_uses_fallback() {
    let engine = loaded_engine().await;
    engine.create(NewTask::new("Inbox item")).await.unwrap();

    match &engine.store().calls_of(Op::Create)[0] {
        Call::Create(draft) => assert_eq!(draft.list_title.as_deref(), Some("Backlog")),
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn test_create_into_new_list_adds_list() {
    let engine = loaded_engine().await;
    engine.create(NewTask::new("Idea").in_list("Someday")).await.unwrap();
    assert!(engine.list_titles().contains(&"Someday".to_string()));
}

#[tokio::test]
async fn test_create_failure_discards_provisional() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    engine.store().fail_next(Op::Create, down());
    let err = engine.create(NewTask::new("Lost")).await.unwrap_err();

    assert!(matches!(err, BoardError::Transport(_)));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.last_error().as_deref(), Some("Failed to create task."));
}

#[tokio::test]
async fn test_blank_title_never_reaches_store() {
    let engine = loaded_engine().await;

    let err = engine.create(NewTask::new("   ")).await.unwrap_err();

    assert_eq!(err, BoardError::Validation(ValidationError::EmptyTitle));
    assert!(engine.store().calls_of(Op::Create).is_empty());
}

// =============================================================================
// UPDATE
// =============================================================================

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let engine = loaded_engine().await;
    let id = TaskId::remote("1");

    let task = engine.update(&id, &TaskPatch::new().clear_priority()).await.unwrap();

    assert_eq!(task.priority, None);
    assert_eq!(engine.task(&id), Some(task));
    let sent = engine.store().updates();
    assert_eq!(sent.len(), 1);
    assert_eq!(Value::Object(sent[0].body.clone()), json!({"priority": null}));
}

#[tokio::test]
async fn test_update_failure_restores_board_exactly() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    engine.store().fail_next(Op::Update, StoreError::Rejected("nope".to_string()));
    let err = engine
        .update(&TaskId::remote("3"), &TaskPatch::new().title("Changed").list_title("Done"))
        .await
        .unwrap_err();

    assert_eq!(err, BoardError::Rejected("nope".to_string()));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.last_error().as_deref(), Some("Failed to update task. Change reverted."));
}

#[tokio::test]
async fn test_update_fields_rejects_bad_status_without_store_call() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    let fields = json!({"status": "Blocked"}).as_object().cloned().unwrap();
    let err = engine.update_fields(&TaskId::remote("1"), &fields).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(engine.snapshot(), before);
    assert!(engine.store().updates().is_empty());
}

#[tokio::test]
async fn test_update_unknown_task_is_not_found() {
    let engine = loaded_engine().await;
    let err = engine
        .update(&TaskId::remote("77"), &TaskPatch::new().title("x"))
        .await
        .unwrap_err();
    assert_eq!(err, BoardError::NotFound(TaskId::remote("77")));
    assert!(engine.store().updates().is_empty());
}

#[tokio::test]
async fn test_update_removed_remotely_restores_board() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();
    engine.store().backend().delete(&TaskId::remote("2")).await.unwrap();

    let err = engine
        .update(&TaskId::remote("2"), &TaskPatch::new().priority(Priority::High))
        .await
        .unwrap_err();

    assert_eq!(err, BoardError::NotFound(TaskId::remote("2")));
    assert_eq!(engine.snapshot(), before);
}

#[tokio::test]
async fn test_toggle_status_round_trip() {
    let engine = loaded_engine().await;
    let id = TaskId::remote("4");

    assert_eq!(engine.toggle_status(&id).await.unwrap().status, TaskStatus::ToDo);
    assert_eq!(engine.toggle_status(&id).await.unwrap().status, TaskStatus::Done);

    let bodies: Vec<Value> = engine.store().updates().into_iter().map(|r| Value::Object(r.body)).collect();
    assert_eq!(bodies, [json!({"status": "To Do"}), json!({"status": "Done"})]);
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn test_delete_removes_task() {
    let engine = loaded_engine().await;
    let id = TaskId::remote("2");

    let outcome = engine.delete(&id).await.unwrap();

    assert!(matches!(outcome, DeleteOutcome::Deleted(ref t) if t.id == id));
    assert!(engine.task(&id).is_none());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let engine = loaded_engine().await;
    let id = TaskId::remote("2");
    engine.store().backend().delete(&id).await.unwrap();

    assert_eq!(engine.delete(&id).await.unwrap(), DeleteOutcome::AlreadyGone);
    assert!(engine.task(&id).is_none());
}

#[tokio::test]
async fn test_deleting_twice_leaves_board_as_after_first() {
    let engine = loaded_engine().await;
    let id = TaskId::remote("2");

    assert!(matches!(engine.delete(&id).await.unwrap(), DeleteOutcome::Deleted(_)));
    let after_first = engine.snapshot();

    assert_eq!(engine.delete(&id).await.unwrap(), DeleteOutcome::AlreadyGone);
    assert_eq!(engine.snapshot(), after_first);
    assert_eq!(engine.store().calls_of(Op::Delete).len(), 2);
}

#[tokio::test]
async fn test_delete_unknown_task_still_asks_store() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    assert_eq!(engine.delete(&TaskId::remote("77")).await.unwrap(), DeleteOutcome::AlreadyGone);
    assert_eq!(engine.store().calls_of(Op::Delete), [Call::Delete(TaskId::remote("77"))]);
    assert_eq!(engine.snapshot(), before);
}

#[tokio::test]
async fn test_delete_failure_restores_position() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    engine.store().fail_next(Op::Delete, down());
    engine.delete(&TaskId::remote("1")).await.unwrap_err();

    assert_eq!(engine.snapshot(), before);
    assert_eq!(ids_in(&engine.snapshot(), "Backlog"), ["2", "1"]);
}

// =============================================================================
// MOVE
// =============================================================================

fn drag(id: &str, from: (&str, usize), to: (&str, usize)) -> DragOutcome {
    DragOutcome {
        task_id: TaskId::remote(id),
        source: DropLocation::new(from.0, from.1),
        destination: Some(DropLocation::new(to.0, to.1)),
    }
}

#[tokio::test]
async fn test_reorder_within_list_is_local() {
    let engine = loaded_engine().await;

    let outcome = engine.move_task(&drag("1", ("Backlog", 1), ("Backlog", 0))).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Reordered);
    assert_eq!(ids_in(&engine.snapshot(), "Backlog"), ["1", "2"]);
    assert!(engine.store().updates().is_empty());
}

#[tokio::test]
async fn test_reorder_last_to_first_in_three_task_list() {
    // newest first, so the board reads t0, t1, t2
    let tasks = vec![
        TaskBuilder::new("t0").created(30).build(),
        TaskBuilder::new("t1").created(20).build(),
        TaskBuilder::new("t2").created(10).build(),
        TaskBuilder::new("d0").list("Doing").created(5).build(),
    ];
    let engine = BoardEngine::new(ScriptedStore::with_tasks(tasks));
    engine.load(&ListFilter::all()).await.unwrap();
    assert_eq!(ids_in(&engine.snapshot(), "Backlog"), ["t0", "t1", "t2"]);

    let outcome = engine.move_task(&drag("t2", ("Backlog", 2), ("Backlog", 0))).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Reordered);
    let board = engine.snapshot();
    assert_eq!(ids_in(&board, "Backlog"), ["t2", "t0", "t1"]);
    assert_eq!(ids_in(&board, "Doing"), ["d0"]);
    // only the initial load reached the store
    assert_eq!(engine.store().calls(), [Call::List(ListFilter::all())]);
}

#[tokio::test]
async fn test_cross_list_move_sends_only_list_title() {
    let engine = loaded_engine().await;

    let outcome = engine.move_task(&drag("3", ("Doing", 0), ("Done", 0))).await.unwrap();

    let MoveOutcome::Moved(task) = outcome else {
        panic!("expected a move");
    };
    assert_eq!(task.list_title, "Done");
    assert_eq!(task.status, TaskStatus::ToDo);
    assert_eq!(ids_in(&engine.snapshot(), "Done"), ["3", "4"]);

    let sent = engine.store().updates();
    assert_eq!(sent.len(), 1);
    assert_eq!(Value::Object(sent[0].body.clone()), json!({"list_title": "Done"}));
}

#[tokio::test]
async fn test_failed_move_returns_task_to_origin() {
    let engine = loaded_engine().await;
    let before = engine.snapshot();

    engine.store().fail_next(Op::Update, down());
    engine.move_task(&drag("2", ("Backlog", 0), ("Doing", 0))).await.unwrap_err();

    assert_eq!(engine.snapshot(), before);
}

#[tokio::test]
async fn test_drop_outside_changes_nothing() {
    let engine = loaded_engine().await;
    let outcome = engine
        .move_task(&DragOutcome {
            task_id: TaskId::remote("1"),
            source: DropLocation::new("Backlog", 0),
            destination: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert_eq!(engine.store().calls().len(), 1);
}

// =============================================================================
// LISTS AND VIEW
// =============================================================================

#[tokio::test]
async fn test_add_list() {
    let engine = loaded_engine().await;

    assert_eq!(engine.add_list("  Later "), Ok(true));
    assert_eq!(engine.add_list("Later"), Ok(false));
    assert_eq!(engine.add_list(" "), Err(BoardError::Validation(ValidationError::EmptyListTitle)));

    let view = engine.view(&ViewFilter::default());
    assert!(view.column("Later").unwrap().tasks.is_empty());
}

#[tokio::test]
async fn test_emptied_list_stays_visible() {
    let engine = loaded_engine().await;
    engine.delete(&TaskId::remote("3")).await.unwrap();
    assert!(engine.list_titles().contains(&"Doing".to_string()));
}

#[tokio::test]
async fn test_clear_error() {
    let engine = BoardEngine::with_state(ScriptedStore::new(), BoardState::default());
    engine.add_list("").unwrap_err();
    assert!(engine.last_error().is_some());
    engine.clear_error();
    assert!(engine.last_error().is_none());
}
