//! Move resolver - turns a finished drag into a board operation
//!
//! A drop inside the same list is a local reorder that never reaches the
//! store. A drop into another list is a list reassignment, carried out by the
//! engine's update path.

use crate::core::models::{BoardState, TaskId};

/// A list position reported by the drag layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    /// List the position belongs to
    pub list_title: String,
    /// Index among that list's tasks
    pub index: usize,
}

impl DropLocation {
    /// Position `index` of `list_title`
    #[must_use]
    pub fn new(list_title: impl Into<String>, index: usize) -> Self {
        Self {
            list_title: list_title.into(),
            index,
        }
    }
}

/// Outcome of a drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOutcome {
    /// Task that was dragged
    pub task_id: TaskId,
    /// Where the drag started
    pub source: DropLocation,
    /// Where it was dropped; `None` when dropped outside any list
    pub destination: Option<DropLocation>,
}

/// What a drag resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResolution {
    /// Nothing to do
    NoOp,
    /// New order for one list, local only
    Reorder {
        /// List being reordered
        list_title: String,
        /// Every id of that list in its new order
        order: Vec<TaskId>,
    },
    /// Task moves to another list
    Reassign {
        /// Task being moved
        task_id: TaskId,
        /// Destination list
        list_title: String,
        /// Index among the destination list's tasks
        index: usize,
    },
}

/// Resolve a drag against the current board
///
/// The board is authoritative for where the dragged task currently is: the
/// reported source only has to name the same task. Unknown tasks and drops
/// outside any list resolve to [`MoveResolution::NoOp`].
#[must_use]
pub fn resolve(board: &BoardState, drag: &DragOutcome) -> MoveResolution {
    let Some(destination) = &drag.destination else {
        return MoveResolution::NoOp;
    };
    let Some(task) = board.get(&drag.task_id) else {
        return MoveResolution::NoOp;
    };

    if destination.list_title != task.list_title {
        return MoveResolution::Reassign {
            task_id: drag.task_id.clone(),
            list_title: destination.list_title.clone(),
            index: destination.index,
        };
    }

    let mut order: Vec<TaskId> = board.tasks_in(&task.list_title).map(|t| t.id.clone()).collect();
    let Some(from) = order.iter().position(|id| *id == drag.task_id) else {
        return MoveResolution::NoOp;
    };
    let to = destination.index.min(order.len() - 1);
    if from == to {
        return MoveResolution::NoOp;
    }

    let moved = order.remove(from);
    order.insert(to, moved);
    MoveResolution::Reorder {
        list_title: task.list_title.clone(),
        order,
    }
}
