//! Board state
//!
//! The in-memory snapshot of every task plus the lists the board knows about.
//! Lists are not entities: a list exists because a task points at it or
//! because it was registered (added empty, confirmed by the store, or present
//! when the board was loaded).

use std::collections::BTreeSet;

use super::task::{DEFAULT_LIST, Task, TaskId};

/// Tasks and known list titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    tasks: Vec<Task>,
    registered: BTreeSet<String>,
    list_titles: Vec<String>,
    fallback_list: String,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(DEFAULT_LIST)
    }
}

impl BoardState {
    /// Empty board showing only the fallback list
    #[must_use]
    pub fn new(fallback_list: impl Into<String>) -> Self {
        let mut board = Self {
            tasks: Vec::new(),
            registered: BTreeSet::new(),
            list_titles: Vec::new(),
            fallback_list: fallback_list.into(),
        };
        board.refresh_lists();
        board
    }

    /// Board loaded from the store
    ///
    /// Later duplicates of an id replace earlier ones.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>, fallback_list: impl Into<String>) -> Self {
        let mut board = Self::new(fallback_list);
        board.replace_all(tasks);
        board
    }

    /// Replace every task, registering the lists they use
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks.clear();
        for task in tasks {
            self.registered.insert(task.list_title.clone());
            self.put(task);
        }
        self.refresh_lists();
    }

    /// All tasks in board order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the board holds no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    /// Whether a task is on the board
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.position(id).is_some()
    }

    /// Tasks of one list, in board order
    pub fn tasks_in<'a>(&'a self, list_title: &'a str) -> impl Iterator<Item = &'a Task> {
        self.tasks.iter().filter(move |t| t.list_title == list_title)
    }

    /// Known list titles, sorted
    #[must_use]
    pub fn list_titles(&self) -> &[String] {
        &self.list_titles
    }

    /// Whether a list title is known
    #[must_use]
    pub fn has_list(&self, title: &str) -> bool {
        self.list_titles.binary_search_by(|t| t.as_str().cmp(title)).is_ok()
    }

    /// Registered lists that currently hold no task
    pub fn empty_lists(&self) -> impl Iterator<Item = &str> {
        self.registered
            .iter()
            .filter(|l| !self.tasks.iter().any(|t| &t.list_title == *l))
            .map(String::as_str)
    }

    /// List used when a task names none
    #[must_use]
    pub fn fallback_list(&self) -> &str {
        &self.fallback_list
    }

    /// Insert or replace a task by id
    ///
    /// A replaced task keeps its position.
    pub fn upsert(&mut self, task: Task) {
        self.put(task);
        self.refresh_lists();
    }

    /// Replace a task only if it is still on the board
    ///
    /// Returns false when the task is gone, in which case nothing changes.
    pub fn replace(&mut self, task: Task) -> bool {
        let Some(index) = self.position(&task.id) else {
            return false;
        };
        self.tasks[index] = task;
        self.refresh_lists();
        true
    }

    /// Swap a provisional entry for the confirmed task
    ///
    /// If the confirmed id is already present (a reload raced the create),
    /// that entry is updated and the provisional one dropped.
    pub fn settle(&mut self, provisional: &TaskId, task: Task) {
        match (self.position(provisional), self.position(&task.id)) {
            (Some(slot), None) => self.tasks[slot] = task,
            (slot, Some(existing)) => {
                self.tasks[existing] = task;
                if let Some(slot) = slot {
                    self.tasks.remove(slot);
                }
            },
            (None, None) => self.tasks.push(task),
        }
        self.refresh_lists();
    }

    /// Remove a task by id
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id)?;
        let task = self.tasks.remove(index);
        self.refresh_lists();
        Some(task)
    }

    /// Remember a list title even while it holds no task
    ///
    /// Returns false if the list was already known.
    pub fn register_list(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        let known = self.has_list(&title);
        self.registered.insert(title);
        self.refresh_lists();
        !known
    }

    /// Rewrite the order of one list
    ///
    /// `order` must hold exactly the ids currently in `list_title`. Tasks of
    /// that list are written back into the same slots they occupied, so every
    /// other list keeps its exact positions. Returns false when `order` does
    /// not match the list.
    pub fn reorder_list(&mut self, list_title: &str, order: &[TaskId]) -> bool {
        let slots: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.list_title == list_title)
            .map(|(i, _)| i)
            .collect();

        if slots.len() != order.len() {
            return false;
        }

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            match slots.iter().find(|&&slot| self.tasks[slot].id == *id) {
                Some(&slot) if !reordered.contains(&slot) => reordered.push(slot),
                _ => return false,
            }
        }

        let moved: Vec<Task> = reordered.iter().map(|&slot| self.tasks[slot].clone()).collect();
        for (slot, task) in slots.into_iter().zip(moved) {
            self.tasks[slot] = task;
        }
        true
    }

    /// Move a task so it sits at `index` among the tasks of its own list
    ///
    /// Indexes past the end place the task last.
    pub fn place_in_list(&mut self, id: &TaskId, index: usize) {
        let Some(from) = self.position(id) else {
            return;
        };
        let task = self.tasks.remove(from);
        let slot = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.list_title == task.list_title)
            .map(|(i, _)| i)
            .nth(index)
            .unwrap_or_else(|| {
                // after the last task of the list, or at the end
                self.tasks
                    .iter()
                    .rposition(|t| t.list_title == task.list_title)
                    .map_or(self.tasks.len(), |last| last + 1)
            });
        self.tasks.insert(slot, task);
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == *id)
    }

    fn put(&mut self, task: Task) {
        match self.position(&task.id) {
            Some(index) => self.tasks[index] = task,
            None => self.tasks.push(task),
        }
    }

    fn refresh_lists(&mut self) {
        let titles: BTreeSet<&str> = self
            .tasks
            .iter()
            .map(|t| t.list_title.as_str())
            .chain(self.registered.iter().map(String::as_str))
            .collect();

        self.list_titles = if titles.is_empty() {
            vec![self.fallback_list.clone()]
        } else {
            titles.into_iter().map(String::from).collect()
        };
    }
}
