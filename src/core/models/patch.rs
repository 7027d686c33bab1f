//! Sparse task changes
//!
//! A [`TaskPatch`] names only the fields that should change. Every field is a
//! [`Change`]: left alone, cleared, or set to a new value.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::task::{Priority, Task, TaskId, TaskStatus};

/// Change to a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change<T> {
    /// Field absent from the patch
    Keep,
    /// Field explicitly set to null
    Clear,
    /// Field set to a new value
    Set(T),
}

impl<T> Default for Change<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> Change<T> {
    /// Whether the field is left untouched
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Apply to an optional field
    pub fn apply_opt(&self, target: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            Self::Keep => {},
            Self::Clear => *target = None,
            Self::Set(value) => *target = Some(value.clone()),
        }
    }
}

/// A sparse set of changes to one task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title
    pub title: Change<String>,
    /// New description
    pub description: Change<String>,
    /// New owning list
    pub list_title: Change<String>,
    /// New status
    pub status: Change<TaskStatus>,
    /// New priority
    pub priority: Change<Priority>,
    /// New due date
    pub delivery_date: Change<NaiveDate>,
}

impl TaskPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Change::Set(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Change::Set(description.into());
        self
    }

    /// Remove the description
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Change::Clear;
        self
    }

    /// Move to another list
    #[must_use]
    pub fn list_title(mut self, list_title: impl Into<String>) -> Self {
        self.list_title = Change::Set(list_title.into());
        self
    }

    /// Set the status
    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Change::Set(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Change::Set(priority);
        self
    }

    /// Remove the priority
    #[must_use]
    pub fn clear_priority(mut self) -> Self {
        self.priority = Change::Clear;
        self
    }

    /// Set the due date
    #[must_use]
    pub fn delivery_date(mut self, date: NaiveDate) -> Self {
        self.delivery_date = Change::Set(date);
        self
    }

    /// Remove the due date
    #[must_use]
    pub fn clear_delivery_date(mut self) -> Self {
        self.delivery_date = Change::Clear;
        self
    }

    /// Whether no field is touched
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_keep()
            && self.description.is_keep()
            && self.list_title.is_keep()
            && self.status.is_keep()
            && self.priority.is_keep()
            && self.delivery_date.is_keep()
    }

    /// Apply the patch to a local copy of a task
    ///
    /// Required fields ignore `Clear`; the patch builder rejects those before
    /// a patch ever reaches the board.
    pub fn apply_to(&self, task: &mut Task) {
        if let Change::Set(title) = &self.title {
            task.title.clone_from(title);
        }
        if let Change::Set(list_title) = &self.list_title {
            task.list_title.clone_from(list_title);
        }
        if let Change::Set(status) = self.status {
            task.status = status;
        }
        self.description.apply_opt(&mut task.description);
        self.priority.apply_opt(&mut task.priority);
        self.delivery_date.apply_opt(&mut task.delivery_date);
    }
}

/// Minimal update request for the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Task to update
    pub id: TaskId,
    /// Changed fields only, keyed by wire name; `null` clears
    pub body: Map<String, Value>,
}

impl UpdateRequest {
    /// Names of the fields carried by this request
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.body.keys().map(String::as_str)
    }
}
