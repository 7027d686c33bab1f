//! Property-based tests for the board
//!
//! Random mutation sequences are driven through `BoardState` directly and
//! through the engine over a `MemoryStore`. After every step: ids are
//! unique, every task's list is a known list, list titles are sorted and
//! distinct, and the engine's board matches what the store holds.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use taskboard::adapters::MemoryStore;
use taskboard::core::models::{BoardState, NewTask, Task, TaskId, TaskPatch, TaskStatus};
use taskboard::core::services::BoardEngine;

const LISTS: [&str; 3] = ["Backlog", "Doing", "Done"];

fn assert_invariants(board: &BoardState) -> Result<(), TestCaseError> {
    let ids: BTreeSet<&TaskId> = board.tasks().iter().map(|t| &t.id).collect();
    prop_assert_eq!(ids.len(), board.len(), "duplicate ids on {:?}", board.tasks());

    let titles = board.list_titles();
    prop_assert!(titles.windows(2).all(|w| w[0] < w[1]), "unsorted lists {:?}", titles);
    for task in board.tasks() {
        prop_assert!(board.has_list(&task.list_title), "unknown list {}", task.list_title);
        prop_assert!(matches!(task.status, TaskStatus::ToDo | TaskStatus::Done));
    }
    Ok(())
}

// =============================================================================
// BOARD STATE
// =============================================================================

#[derive(Debug, Clone)]
enum BoardStep {
    Upsert { id: u8, list: usize },
    Remove { id: u8 },
    Register { list: usize },
}

fn board_step() -> impl Strategy<Value = BoardStep> {
    prop_oneof![
        (0u8..8, 0..LISTS.len()).prop_map(|(id, list)| BoardStep::Upsert { id, list }),
        (0u8..8).prop_map(|id| BoardStep::Remove { id }),
        (0..LISTS.len()).prop_map(|list| BoardStep::Register { list }),
    ]
}

proptest! {
    /// Upserts, removes and list registrations keep the board consistent
    #[test]
    fn board_state_keeps_invariants(steps in prop::collection::vec(board_step(), 1..40)) {
        let mut board = BoardState::new("Backlog");
        let mut expected: BTreeMap<TaskId, &str> = BTreeMap::new();

        for step in steps {
            match step {
                BoardStep::Upsert { id, list } => {
                    let id = TaskId::remote(id.to_string());
                    board.upsert(Task::new(id.clone(), "task", LISTS[list]));
                    expected.insert(id, LISTS[list]);
                },
                BoardStep::Remove { id } => {
                    let id = TaskId::remote(id.to_string());
                    prop_assert_eq!(board.remove(&id).is_some(), expected.remove(&id).is_some());
                },
                BoardStep::Register { list } => {
                    board.register_list(LISTS[list]);
                },
            }

            assert_invariants(&board)?;
            let on_board: BTreeMap<TaskId, &str> =
                board.tasks().iter().map(|t| (t.id.clone(), t.list_title.as_str())).collect();
            prop_assert_eq!(&on_board, &expected);
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

#[derive(Debug, Clone)]
enum EngineStep {
    Create { title: String, list: Option<usize> },
    Update { target: usize, title: Option<String>, list: Option<usize>, toggle: bool },
    Delete { target: usize },
}

fn engine_step() -> impl Strategy<Value = EngineStep> {
    prop_oneof![
        ("[a-z ]{0,8}", prop::option::of(0..LISTS.len()))
            .prop_map(|(title, list)| EngineStep::Create { title, list }),
        (any::<usize>(), prop::option::of("[a-z]{1,8}"), prop::option::of(0..LISTS.len()), any::<bool>())
            .prop_map(|(target, title, list, toggle)| EngineStep::Update { target, title, list, toggle }),
        any::<usize>().prop_map(|target| EngineStep::Delete { target }),
    ]
}

async fn apply(engine: &BoardEngine<MemoryStore>, step: &EngineStep) {
    let ids: Vec<TaskId> = engine.snapshot().tasks().iter().map(|t| t.id.clone()).collect();

    match step {
        EngineStep::Create { title, list } => {
            let mut draft = NewTask::new(title.clone());
            if let Some(list) = list {
                draft = draft.in_list(LISTS[*list]);
            }
            // blank titles are rejected without touching the board
            let _ = engine.create(draft).await;
        },
        EngineStep::Update { target, title, list, toggle } => {
            if ids.is_empty() {
                return;
            }
            let id = &ids[target % ids.len()];
            let mut patch = TaskPatch::new();
            if let Some(title) = title {
                patch = patch.title(title.clone());
            }
            if let Some(list) = list {
                patch = patch.list_title(LISTS[*list]);
            }
            if *toggle {
                let status = engine.task(id).map_or(TaskStatus::ToDo, |t| t.status.toggled());
                patch = patch.status(status);
            }
            // an empty patch is rejected before any store call
            let _ = engine.update(id, &patch).await;
        },
        EngineStep::Delete { target } => {
            if ids.is_empty() {
                return;
            }
            let id = &ids[target % ids.len()];
            engine.delete(id).await.unwrap();
        },
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread().build().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Sequential engine mutations keep the board consistent with the store
    #[test]
    fn engine_keeps_invariants(steps in prop::collection::vec(engine_step(), 1..25)) {
        runtime().block_on(async {
            let engine = BoardEngine::new(MemoryStore::new());

            for step in &steps {
                apply(&engine, step).await;

                let board = engine.snapshot();
                assert_invariants(&board)?;
                prop_assert!(board.tasks().iter().all(|t| !t.id.is_provisional()));

                let mut stored = engine.store().tasks();
                stored.sort_by(|a, b| a.id.cmp(&b.id));
                let mut shown = board.tasks().to_vec();
                shown.sort_by(|a, b| a.id.cmp(&b.id));
                prop_assert_eq!(shown, stored);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
