//! Task commands - create, edit, toggle, move and delete

use chrono::NaiveDate;
use log::debug;

use taskboard::core::models::{NewTask, Priority, TaskId, TaskPatch};
use taskboard::core::ports::{ListFilter, TaskStore};
use taskboard::core::services::{BoardEngine, DeleteOutcome, DragOutcome, DropLocation, MoveOutcome};
use taskboard::error::BoardError;
use taskboard::output::{OperationResult, OutputMode, TaskResult};

/// Field flags of the `edit` command
#[derive(Debug, Default)]
pub struct EditArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub clear_description: bool,
    pub priority: Option<Priority>,
    pub clear_priority: bool,
    pub due: Option<NaiveDate>,
    pub clear_due: bool,
    pub list: Option<String>,
}

impl EditArgs {
    /// Patch touching only the flags that were given
    pub fn into_patch(self) -> TaskPatch {
        let mut patch = TaskPatch::new();
        if let Some(title) = self.title {
            patch = patch.title(title);
        }
        if let Some(description) = self.description {
            patch = patch.description(description);
        } else if self.clear_description {
            patch = patch.clear_description();
        }
        if let Some(priority) = self.priority {
            patch = patch.priority(priority);
        } else if self.clear_priority {
            patch = patch.clear_priority();
        }
        if let Some(due) = self.due {
            patch = patch.delivery_date(due);
        } else if self.clear_due {
            patch = patch.clear_delivery_date();
        }
        if let Some(list) = self.list {
            patch = patch.list_title(list);
        }
        patch
    }
}

/// Draft for the `add` command
pub fn draft(
    title: String,
    list: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    due: Option<NaiveDate>,
) -> NewTask {
    NewTask {
        title,
        description,
        list_title: list,
        delivery_date: due,
        priority,
    }
}

/// Create a task
pub async fn add<S: TaskStore>(engine: &BoardEngine<S>, draft: NewTask, mode: OutputMode) -> Result<(), BoardError> {
    let task = engine.create(draft).await?;
    TaskResult {
        action: "created".to_string(),
        task,
    }
    .render(mode);
    Ok(())
}

/// Change fields of a task
pub async fn edit<S: TaskStore>(
    engine: &BoardEngine<S>,
    id: &str,
    patch: &TaskPatch,
    mode: OutputMode,
) -> Result<(), BoardError> {
    engine.load(&ListFilter::all()).await?;
    let task = engine.update(&TaskId::remote(id), patch).await?;
    TaskResult {
        action: "updated".to_string(),
        task,
    }
    .render(mode);
    Ok(())
}

/// Flip a task between To Do and Done
pub async fn toggle<S: TaskStore>(engine: &BoardEngine<S>, id: &str, mode: OutputMode) -> Result<(), BoardError> {
    engine.load(&ListFilter::all()).await?;
    let task = engine.toggle_status(&TaskId::remote(id)).await?;
    TaskResult {
        action: "updated".to_string(),
        task,
    }
    .render(mode);
    Ok(())
}

/// Move a task to another list, as a drag onto that list would
pub async fn move_to<S: TaskStore>(
    engine: &BoardEngine<S>,
    id: &str,
    list: &str,
    position: Option<usize>,
    mode: OutputMode,
) -> Result<(), BoardError> {
    engine.load(&ListFilter::all()).await?;
    let id = TaskId::remote(id);

    let source = {
        let board = engine.snapshot();
        let Some(task) = board.get(&id) else {
            return Err(BoardError::NotFound(id));
        };
        let index = board.tasks_in(&task.list_title).position(|t| t.id == id).unwrap_or(0);
        DropLocation::new(task.list_title.clone(), index)
    };
    debug!("Dragging {id} from '{}' #{}", source.list_title, source.index);

    let drag = DragOutcome {
        task_id: id,
        source,
        destination: Some(DropLocation::new(list, position.unwrap_or(usize::MAX))),
    };

    match engine.move_task(&drag).await? {
        MoveOutcome::Moved(task) => TaskResult {
            action: "moved".to_string(),
            task,
        }
        .render(mode),
        MoveOutcome::Reordered => OperationResult {
            success: true,
            message: format!("Reordered '{list}' locally; order within a list is not saved"),
        }
        .render(mode),
        MoveOutcome::Unchanged => OperationResult {
            success: true,
            message: "Nothing to move".to_string(),
        }
        .render(mode),
    }
    Ok(())
}

/// Delete a task
pub async fn remove<S: TaskStore>(engine: &BoardEngine<S>, id: &str, mode: OutputMode) -> Result<(), BoardError> {
    engine.load(&ListFilter::all()).await?;
    match engine.delete(&TaskId::remote(id)).await? {
        DeleteOutcome::Deleted(task) => TaskResult {
            action: "deleted".to_string(),
            task,
        }
        .render(mode),
        DeleteOutcome::AlreadyGone => OperationResult {
            success: true,
            message: format!("Task {id} was already deleted"),
        }
        .render(mode),
    }
    Ok(())
}
