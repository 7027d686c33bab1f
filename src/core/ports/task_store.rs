//! Task store port
//!
//! Defines the interface the engine uses to reach the remote store.

use async_trait::async_trait;

use super::super::models::{NewTask, Priority, Task, TaskId, TaskStatus, UpdateRequest};
use crate::error::StoreError;

/// Server-side filters for [`TaskStore::list`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Only tasks with this status
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority
    pub priority: Option<Priority>,
}

impl ListFilter {
    /// Filter matching every task
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether a task passes this filter
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.search
            .as_deref()
            .is_none_or(|s| task.title.to_lowercase().contains(&s.to_lowercase()))
            && self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == Some(p))
    }
}

/// Remote store for tasks
///
/// The board runs on a single thread, so implementations are not required
/// to be `Send`. Every method is a suspension point for the engine; nothing
/// else is.
#[async_trait(?Send)]
pub trait TaskStore {
    /// Fetch every task matching the filter
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Task>, StoreError>;

    /// Create a task
    ///
    /// The store assigns the id, the creation timestamp and the initial
    /// status, and falls back to its default list when none is given.
    async fn create(&self, task: &NewTask) -> Result<Task, StoreError>;

    /// Apply a partial update and return the full updated task
    async fn update(&self, request: &UpdateRequest) -> Result<Task, StoreError>;

    /// Delete a task and return it
    ///
    /// Returns [`StoreError::NotFound`] when the task does not exist.
    async fn delete(&self, id: &TaskId) -> Result<Task, StoreError>;
}
