//! Optimistic mutation engine
//!
//! Every mutation is applied to the board first and confirmed with the store
//! afterwards:
//!
//! - **create** shows a provisional entry, swapped for the store's task on
//!   success and dropped on failure
//! - **update** snapshots the board, patches the task locally, then either
//!   takes the store's task as canonical or restores the snapshot
//! - **delete** snapshots the board, removes the task, then either keeps it
//!   removed (success or not-found) or restores the snapshot
//!
//! The engine is single-threaded. Entry points take `&self`, so several
//! mutations may be in flight at once on one thread; store calls are the only
//! suspension points and no borrow of the board is held across them.
//! Responses are applied by id, and for one task the last response received
//! wins.
//!
//! A restored snapshot may still hold provisional entries of creates that
//! finished while it was out. Those are swapped for the confirmed task, or
//! dropped when the create failed.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::patch_builder::{build_update, parse_fields};
use super::projector::{BoardView, ViewFilter, project};
use super::resolver::{DragOutcome, MoveResolution, resolve};
use crate::core::models::{BoardState, NewTask, Task, TaskId, TaskPatch};
use crate::core::ports::{ListFilter, TaskStore};
use crate::error::{BoardError, StoreError, ValidationError};

const LOAD_FAILED: &str = "Failed to load tasks. Check that the backend is running.";
const CREATE_FAILED: &str = "Failed to create task.";
const UPDATE_FAILED: &str = "Failed to update task. Change reverted.";
const DELETE_FAILED: &str = "Failed to delete task. Change reverted.";

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The store removed the task
    Deleted(Task),
    /// The store no longer had the task; the board matches anyway
    AlreadyGone,
}

/// Result of a drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The drop changed nothing
    Unchanged,
    /// Tasks of one list were reordered locally
    Reordered,
    /// The task moved to another list; holds the confirmed task
    Moved(Task),
}

/// Board state kept in sync with a [`TaskStore`]
#[derive(Debug)]
pub struct BoardEngine<S> {
    store: S,
    state: RefCell<BoardState>,
    next_provisional: Cell<u64>,
    last_error: RefCell<Option<String>>,
    /// Provisional ids whose create is still awaiting the store
    creating: RefCell<BTreeSet<TaskId>>,
    /// Provisional ids confirmed while a snapshot was out, and their store ids
    settled: RefCell<BTreeMap<TaskId, TaskId>>,
    /// Rollback snapshots currently held by updates and deletes
    snapshots_out: Cell<usize>,
}

impl<S: TaskStore> BoardEngine<S> {
    /// Engine over an empty board using the default fallback list
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_state(store, BoardState::default())
    }

    /// Engine over an empty board with a custom fallback list
    #[must_use]
    pub fn with_fallback_list(store: S, fallback_list: impl Into<String>) -> Self {
        Self::with_state(store, BoardState::new(fallback_list))
    }

    /// Engine over an existing board
    #[must_use]
    pub const fn with_state(store: S, state: BoardState) -> Self {
        Self {
            store,
            state: RefCell::new(state),
            next_provisional: Cell::new(1),
            last_error: RefCell::new(None),
            creating: RefCell::new(BTreeSet::new()),
            settled: RefCell::new(BTreeMap::new()),
            snapshots_out: Cell::new(0),
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Copy of the current board
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Current copy of one task
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<Task> {
        self.state.borrow().get(id).cloned()
    }

    /// Known list titles, sorted
    #[must_use]
    pub fn list_titles(&self) -> Vec<String> {
        self.state.borrow().list_titles().to_vec()
    }

    /// Visible board under a filter
    #[must_use]
    pub fn view(&self, filter: &ViewFilter) -> BoardView {
        project(&self.state.borrow(), filter)
    }

    /// Message describing the most recent failure
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Dismiss the failure message
    pub fn clear_error(&self) {
        *self.last_error.borrow_mut() = None;
    }

    /// Replace the board with what the store holds
    ///
    /// On failure the current board is kept. Returns the number of tasks
    /// loaded.
    pub async fn load(&self, filter: &ListFilter) -> Result<usize, BoardError> {
        match self.store.list(filter).await {
            Ok(tasks) => {
                let count = tasks.len();
                self.state.borrow_mut().replace_all(tasks);
                info!("Loaded {count} task(s)");
                Ok(count)
            },
            Err(err) => {
                warn!("Loading tasks failed: {err}");
                Err(self.fail(LOAD_FAILED, err))
            },
        }
    }

    /// Create a task
    ///
    /// A provisional entry is shown until the store answers. On success it is
    /// replaced in place by the store's task; on failure it is removed.
    pub async fn create(&self, draft: NewTask) -> Result<Task, BoardError> {
        let provisional = self.next_provisional_id();
        let draft = {
            let mut state = self.state.borrow_mut();
            let draft = prepare_draft(draft, state.fallback_list()).map_err(|e| self.reject(e))?;

            let mut entry = Task::new(provisional.clone(), draft.title.clone(), draft.target_list(""));
            entry.description.clone_from(&draft.description);
            entry.priority = draft.priority;
            entry.delivery_date = draft.delivery_date;
            state.upsert(entry);
            draft
        };
        self.creating.borrow_mut().insert(provisional.clone());
        debug!("Showing {provisional} for '{}' while the store confirms", draft.title);

        let result = self.store.create(&draft).await;
        self.creating.borrow_mut().remove(&provisional);

        match result {
            Ok(task) => {
                if self.snapshots_out.get() > 0 {
                    self.settled.borrow_mut().insert(provisional.clone(), task.id.clone());
                }
                let mut state = self.state.borrow_mut();
                state.register_list(task.list_title.clone());
                state.settle(&provisional, task.clone());
                info!("Created task {} in '{}'", task.id, task.list_title);
                Ok(task)
            },
            Err(err) => {
                self.state.borrow_mut().remove(&provisional);
                warn!("Create of '{}' failed, discarding {provisional}: {err}", draft.title);
                Err(self.fail(CREATE_FAILED, err))
            },
        }
    }

    /// Apply a typed patch to a task
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, BoardError> {
        self.update_with(id, patch, |_| {}).await
    }

    /// Apply a raw field map to a task
    ///
    /// Keys absent from `fields` are left unchanged; `null` clears a field.
    pub async fn update_fields(&self, id: &TaskId, fields: &Map<String, Value>) -> Result<Task, BoardError> {
        let patch = parse_fields(fields).map_err(|e| self.reject(e))?;
        self.update(id, &patch).await
    }

    /// Flip a task between To Do and Done
    pub async fn toggle_status(&self, id: &TaskId) -> Result<Task, BoardError> {
        let status = self.state.borrow().get(id).map(|t| t.status);
        let Some(status) = status else {
            return Err(self.missing(id));
        };
        self.update(id, &TaskPatch::new().status(status.toggled())).await
    }

    /// Delete a task
    ///
    /// Deleting a task the store no longer has counts as success.
    pub async fn delete(&self, id: &TaskId) -> Result<DeleteOutcome, BoardError> {
        if id.is_provisional() {
            return Err(self.missing(id));
        }

        let snapshot = {
            let mut state = self.state.borrow_mut();
            let snapshot = state.clone();
            state.remove(id);
            snapshot
        };
        self.snapshots_out.set(self.snapshots_out.get() + 1);
        debug!("Removed task {id} locally, awaiting store");

        let result = self.store.delete(id).await;
        if matches!(result, Err(ref err) if !matches!(err, StoreError::NotFound(_))) {
            self.restore(snapshot);
        }
        self.release_snapshot();

        match result {
            Ok(task) => {
                info!("Deleted task {id}");
                Ok(DeleteOutcome::Deleted(task))
            },
            Err(StoreError::NotFound(_)) => {
                info!("Task {id} was already gone from the store");
                Ok(DeleteOutcome::AlreadyGone)
            },
            Err(err) => {
                warn!("Delete of task {id} failed, board restored: {err}");
                Err(self.fail(DELETE_FAILED, err))
            },
        }
    }

    /// Carry out a finished drag
    ///
    /// Reordering inside a list stays local. Moving to another list updates
    /// only the task's list title in the store; its status is left alone.
    pub async fn move_task(&self, drag: &DragOutcome) -> Result<MoveOutcome, BoardError> {
        let resolution = resolve(&self.state.borrow(), drag);
        match resolution {
            MoveResolution::NoOp => Ok(MoveOutcome::Unchanged),
            MoveResolution::Reorder { list_title, order } => {
                self.state.borrow_mut().reorder_list(&list_title, &order);
                debug!("Reordered '{list_title}' locally");
                Ok(MoveOutcome::Reordered)
            },
            MoveResolution::Reassign {
                task_id,
                list_title,
                index,
            } => {
                let patch = TaskPatch::new().list_title(list_title);
                let task = self
                    .update_with(&task_id, &patch, |state| state.place_in_list(&task_id, index))
                    .await?;
                Ok(MoveOutcome::Moved(task))
            },
        }
    }

    /// Add an empty list
    ///
    /// Returns `Ok(false)` when a list with that title already exists.
    pub fn add_list(&self, title: &str) -> Result<bool, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(self.reject(ValidationError::EmptyListTitle));
        }
        let added = self.state.borrow_mut().register_list(title);
        if added {
            info!("Added list '{title}'");
        }
        Ok(added)
    }

    async fn update_with(
        &self,
        id: &TaskId,
        patch: &TaskPatch,
        arrange: impl FnOnce(&mut BoardState),
    ) -> Result<Task, BoardError> {
        let request = build_update(id, patch).map_err(|e| self.reject(e))?;
        if id.is_provisional() {
            return Err(self.missing(id));
        }

        let snapshot = {
            let mut state = self.state.borrow_mut();
            let Some(mut optimistic) = state.get(id).cloned() else {
                drop(state);
                return Err(self.missing(id));
            };
            let snapshot = state.clone();
            patch.apply_to(&mut optimistic);
            state.upsert(optimistic);
            arrange(&mut state);
            snapshot
        };
        self.snapshots_out.set(self.snapshots_out.get() + 1);
        debug!("Patched task {id} locally ({} field(s)), awaiting store", request.body.len());

        let result = self.store.update(&request).await;
        if result.is_err() {
            self.restore(snapshot);
        }
        self.release_snapshot();

        match result {
            Ok(task) => {
                let mut state = self.state.borrow_mut();
                if state.replace(task.clone()) {
                    state.register_list(task.list_title.clone());
                    info!("Updated task {id}");
                } else {
                    debug!("Task {id} left the board before its update was confirmed");
                }
                Ok(task)
            },
            Err(err) => {
                warn!("Update of task {id} failed, board restored: {err}");
                Err(self.fail(UPDATE_FAILED, err))
            },
        }
    }

    /// Put a rollback snapshot back in place
    ///
    /// Provisional entries of creates that have since finished are replaced
    /// by the board's current copy of the confirmed task, or dropped.
    fn restore(&self, snapshot: BoardState) {
        let mut state = self.state.borrow_mut();
        let current = std::mem::replace(&mut *state, snapshot);
        let creating = self.creating.borrow();
        let settled = self.settled.borrow();

        let finished: Vec<TaskId> = state
            .tasks()
            .iter()
            .map(|t| &t.id)
            .filter(|id| id.is_provisional() && !creating.contains(*id))
            .cloned()
            .collect();

        for provisional in finished {
            let confirmed = settled.get(&provisional).and_then(|id| current.get(id));
            match confirmed {
                Some(task) => state.settle(&provisional, task.clone()),
                None => {
                    state.remove(&provisional);
                },
            }
        }
    }

    fn release_snapshot(&self) {
        let out = self.snapshots_out.get().saturating_sub(1);
        self.snapshots_out.set(out);
        if out == 0 {
            self.settled.borrow_mut().clear();
        }
    }

    fn next_provisional_id(&self) -> TaskId {
        let n = self.next_provisional.get();
        self.next_provisional.set(n + 1);
        TaskId::Provisional(n)
    }

    fn reject(&self, err: ValidationError) -> BoardError {
        *self.last_error.borrow_mut() = Some(err.to_string());
        err.into()
    }

    fn missing(&self, id: &TaskId) -> BoardError {
        let err = BoardError::NotFound(id.clone());
        *self.last_error.borrow_mut() = Some(err.to_string());
        err
    }

    fn fail(&self, message: &str, err: StoreError) -> BoardError {
        *self.last_error.borrow_mut() = Some(message.to_string());
        err.into()
    }
}

fn prepare_draft(mut draft: NewTask, fallback: &str) -> Result<NewTask, ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let list = draft.target_list(fallback).to_string();
    draft.list_title = Some(list);
    Ok(draft)
}
