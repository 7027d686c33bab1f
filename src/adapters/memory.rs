//! In-memory task store
//!
//! Behaves like the board's REST backend: sequential integer ids, creation
//! timestamps, `To Do` status on create, the fallback list when none is
//! given, and the same validation and not-found answers.

use std::cell::RefCell;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::models::{DEFAULT_LIST, NewTask, Task, TaskId, TaskStatus, UpdateRequest};
use crate::core::ports::{ListFilter, TaskStore};
use crate::core::services::parse_fields;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    last_id: u64,
}

/// Task store held in memory
#[derive(Debug)]
pub struct MemoryStore {
    inner: RefCell<Inner>,
    fallback_list: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store using the default fallback list
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback_list(DEFAULT_LIST)
    }

    /// Empty store with a custom fallback list
    #[must_use]
    pub fn with_fallback_list(fallback_list: impl Into<String>) -> Self {
        Self {
            inner: RefCell::new(Inner::default()),
            fallback_list: fallback_list.into(),
        }
    }

    /// Store seeded with existing tasks
    ///
    /// New ids continue after the largest numeric id among them.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let last_id = tasks
            .iter()
            .filter_map(|t| match &t.id {
                TaskId::Remote(id) => id.parse::<u64>().ok(),
                TaskId::Provisional(_) => None,
            })
            .max()
            .unwrap_or(0);

        let store = Self::new();
        *store.inner.borrow_mut() = Inner { tasks, last_id };
        store
    }

    /// Every stored task, in insertion order
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.borrow().tasks.clone()
    }

    /// Look up a stored task
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.inner.borrow().tasks.iter().find(|t| t.id == *id).cloned()
    }
}

#[async_trait(?Send)]
impl TaskStore for MemoryStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.borrow();
        // newest first within a list, lists in title order
        let mut tasks: Vec<Task> = inner.tasks.iter().rev().filter(|t| filter.matches(t)).cloned().collect();
        tasks.sort_by(|a, b| {
            a.list_title
                .cmp(&b.list_title)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(tasks)
    }

    async fn create(&self, task: &NewTask) -> Result<Task, StoreError> {
        if task.title.trim().is_empty() {
            return Err(StoreError::Rejected("task title is required".to_string()));
        }

        let mut inner = self.inner.borrow_mut();
        inner.last_id += 1;

        let created = Task {
            id: TaskId::Remote(inner.last_id.to_string()),
            title: task.title.clone(),
            description: task.description.clone(),
            list_title: task.target_list(&self.fallback_list).to_string(),
            status: TaskStatus::ToDo,
            priority: task.priority,
            delivery_date: task.delivery_date,
            created_at: Some(Utc::now()),
        };
        inner.tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<Task, StoreError> {
        let patch = parse_fields(&request.body).map_err(|e| StoreError::Rejected(e.to_string()))?;

        let mut inner = self.inner.borrow_mut();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == request.id)
            .ok_or_else(|| StoreError::NotFound(request.id.clone()))?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<Task, StoreError> {
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(inner.tasks.remove(index))
    }
}
