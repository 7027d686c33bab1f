//! Filter/search projector - derives the visible board from the board state
//!
//! Read-only. The view is recomputed from scratch on every change; boards are
//! small enough that no index is kept.

use serde::Serialize;

use crate::core::models::{BoardState, Priority, Task, TaskStatus};

/// What the user is currently filtering on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Title substring, matched case-insensitively; empty matches everything
    pub search: String,
    /// Only tasks with this status
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority
    pub priority: Option<Priority>,
}

impl ViewFilter {
    /// Whether a task is visible under this filter
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        (self.search.is_empty() || task.title.to_lowercase().contains(&self.search.to_lowercase()))
            && self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == Some(p))
    }

    /// Advance the status filter to its next value
    pub fn cycle_status(&mut self) {
        self.status = next_status_filter(self.status);
    }

    /// Advance the priority filter to its next value
    pub fn cycle_priority(&mut self) {
        self.priority = next_priority_filter(self.priority);
    }

    /// Reset search and both filters
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Next status filter: none, To Do, Done, then back to none
#[must_use]
pub const fn next_status_filter(current: Option<TaskStatus>) -> Option<TaskStatus> {
    match current {
        None => Some(TaskStatus::ToDo),
        Some(TaskStatus::ToDo) => Some(TaskStatus::Done),
        Some(TaskStatus::Done) => None,
    }
}

/// Next priority filter: none, high, low, normal, then back to none
#[must_use]
pub const fn next_priority_filter(current: Option<Priority>) -> Option<Priority> {
    match current {
        None => Some(Priority::High),
        Some(Priority::High) => Some(Priority::Low),
        Some(Priority::Low) => Some(Priority::Normal),
        Some(Priority::Normal) => None,
    }
}

/// Tasks visible under `filter`, in board order
#[must_use]
pub fn visible<'a>(board: &'a BoardState, filter: &ViewFilter) -> Vec<&'a Task> {
    board.tasks().iter().filter(|t| filter.matches(t)).collect()
}

/// One column of the rendered board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// List title
    pub title: String,
    /// Visible tasks of this list, in board order
    pub tasks: Vec<Task>,
}

/// The rendered board: every known list with its visible tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Known list titles, sorted
    pub list_titles: Vec<String>,
    /// One column per known list, in the same order
    pub columns: Vec<Column>,
}

impl BoardView {
    /// Number of visible tasks across all columns
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Column for a list title
    #[must_use]
    pub fn column(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.title == title)
    }
}

/// Group the visible tasks by list title
///
/// Every known list gets a column, even when the filter hides all of its
/// tasks.
#[must_use]
pub fn project(board: &BoardState, filter: &ViewFilter) -> BoardView {
    let shown = visible(board, filter);
    let columns = board
        .list_titles()
        .iter()
        .map(|title| Column {
            title: title.clone(),
            tasks: shown.iter().filter(|t| t.list_title == *title).map(|&t| t.clone()).collect(),
        })
        .collect();

    BoardView {
        list_titles: board.list_titles().to_vec(),
        columns,
    }
}
