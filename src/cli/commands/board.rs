//! Board commands - show the board and its lists

use taskboard::core::models::{Priority, TaskStatus};
use taskboard::core::ports::{ListFilter, TaskStore};
use taskboard::core::services::{BoardEngine, ViewFilter};
use taskboard::error::BoardError;
use taskboard::output::{BoardReport, ListsResult, OutputMode};

/// Show the board grouped by list
///
/// Filtering happens on the loaded board so every list keeps its column.
pub async fn show<S: TaskStore>(
    engine: &BoardEngine<S>,
    search: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    mode: OutputMode,
) -> Result<(), BoardError> {
    let total = engine.load(&ListFilter::all()).await?;

    let filter = ViewFilter {
        search: search.unwrap_or_default(),
        status,
        priority,
    };
    let report = BoardReport {
        board: engine.view(&filter),
        total,
    };
    report.render(mode);
    Ok(())
}

/// List the board's lists
pub async fn lists<S: TaskStore>(engine: &BoardEngine<S>, mode: OutputMode) -> Result<(), BoardError> {
    engine.load(&ListFilter::all()).await?;
    ListsResult {
        lists: engine.list_titles(),
    }
    .render(mode);
    Ok(())
}
