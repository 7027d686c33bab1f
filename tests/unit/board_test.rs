//! Tests for the board state

use taskboard::core::models::{BoardState, Task, TaskId};

use crate::common::fixtures::{TaskBuilder, ids_in, sample_board, sample_tasks};

#[test]
fn test_lists_are_sorted_union_of_task_lists() {
    let board = sample_board();
    assert_eq!(board.list_titles(), ["Backlog", "Doing", "Done"]);
}

#[test]
fn test_empty_board_shows_fallback_list() {
    let board = BoardState::new("Inbox");
    assert_eq!(board.list_titles(), ["Inbox"]);
    assert!(board.is_empty());
}

#[test]
fn test_fallback_disappears_once_other_lists_exist() {
    let board = BoardState::from_tasks(vec![TaskBuilder::new("1").list("Doing").build()], "Backlog");
    assert_eq!(board.list_titles(), ["Doing"]);
}

#[test]
fn test_registered_list_survives_losing_its_last_task() {
    let mut board = sample_board();
    board.remove(&TaskId::remote("3"));

    assert!(board.has_list("Doing"));
    assert_eq!(board.empty_lists().collect::<Vec<_>>(), ["Doing"]);
}

#[test]
fn test_register_list_reports_novelty() {
    let mut board = sample_board();
    assert!(board.register_list("Later"));
    assert!(!board.register_list("Later"));
    assert!(!board.register_list("Backlog"));
    assert_eq!(board.list_titles(), ["Backlog", "Doing", "Done", "Later"]);
}

#[test]
fn test_replace_ignores_missing_task() {
    let mut board = sample_board();
    let ghost = TaskBuilder::new("99").build();

    assert!(!board.replace(ghost));
    assert_eq!(board.len(), 4);
}

#[test]
fn test_replace_keeps_position() {
    let mut board = sample_board();
    let renamed = TaskBuilder::new("1").title("Renamed").build();

    assert!(board.replace(renamed));
    assert_eq!(board.tasks()[0].title, "Renamed");
}

#[test]
fn test_from_tasks_keeps_one_entry_per_id() {
    let mut tasks = sample_tasks();
    tasks.push(TaskBuilder::new("1").title("Newer").build());

    let board = BoardState::from_tasks(tasks, "Backlog");
    assert_eq!(board.len(), 4);
    assert_eq!(board.get(&TaskId::remote("1")).unwrap().title, "Newer");
}

#[test]
fn test_reorder_list_leaves_other_lists_in_place() {
    let mut board = BoardState::from_tasks(
        vec![
            TaskBuilder::new("a").build(),
            TaskBuilder::new("x").list("Done").build(),
            TaskBuilder::new("b").build(),
            TaskBuilder::new("c").build(),
        ],
        "Backlog",
    );

    let order = [TaskId::remote("c"), TaskId::remote("a"), TaskId::remote("b")];
    assert!(board.reorder_list("Backlog", &order));

    let all: Vec<String> = board.tasks().iter().map(|t| t.id.to_string()).collect();
    assert_eq!(all, ["c", "x", "a", "b"]);
}

#[test]
fn test_reorder_list_rejects_mismatched_order() {
    let mut board = sample_board();
    let before = board.clone();

    assert!(!board.reorder_list("Backlog", &[TaskId::remote("1")]));
    assert!(!board.reorder_list("Backlog", &[TaskId::remote("1"), TaskId::remote("1")]));
    assert_eq!(board, before);
}

#[test]
fn test_place_in_list_at_index() {
    let mut board = sample_board();
    let mut moved: Task = board.get(&TaskId::remote("3")).unwrap().clone();
    moved.list_title = "Backlog".to_string();
    board.upsert(moved);

    board.place_in_list(&TaskId::remote("3"), 0);
    assert_eq!(ids_in(&board, "Backlog"), ["3", "1", "2"]);

    board.place_in_list(&TaskId::remote("3"), 1);
    assert_eq!(ids_in(&board, "Backlog"), ["1", "3", "2"]);
}
