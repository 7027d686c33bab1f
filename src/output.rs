//! Output formatting for human and JSON modes
//!
//! Every command result renders either as coloured text for a terminal or as
//! pretty JSON for scripts.

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{Priority, Task};
use crate::core::services::BoardView;
use crate::error::BoardError;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// The board grouped by list
#[derive(Debug, Serialize)]
pub struct BoardReport {
    /// Columns with their visible tasks
    #[serde(flatten)]
    pub board: BoardView,
    /// Tasks loaded before filtering
    pub total: usize,
}

/// A task after a mutation
#[derive(Debug, Serialize)]
pub struct TaskResult {
    /// What happened (`created`, `updated`, `moved`, `deleted`)
    pub action: String,
    /// The task as the store confirmed it
    pub task: Task,
}

/// Known list titles
#[derive(Debug, Serialize)]
pub struct ListsResult {
    /// Titles, sorted
    pub lists: Vec<String>,
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

/// A failed command
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Error code string
    pub code: &'static str,
    /// Matching status code
    pub status: u16,
    /// Human-readable message
    pub message: String,
}

impl ErrorReport {
    /// Report for a board error with the message shown to the user
    #[must_use]
    pub fn new(err: &BoardError, message: impl Into<String>) -> Self {
        let code = err.code();
        Self {
            code: code.as_str(),
            status: code.status_code(),
            message: message.into(),
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// One-line rendering of a task
#[must_use]
pub fn task_line(task: &Task) -> String {
    let marker = if task.is_done() { "[x]".green() } else { "[ ]".normal() };
    let title = if task.is_done() {
        task.title.dimmed().to_string()
    } else {
        task.title.bold().to_string()
    };

    let mut line = format!("{marker} {title} {}", format!("#{}", task.id).dimmed());
    if let Some(priority) = task.priority {
        let label = match priority {
            Priority::High => priority.as_str().red(),
            Priority::Normal => priority.as_str().yellow(),
            Priority::Low => priority.as_str().blue(),
        };
        line.push_str(&format!(" ({label})"));
    }
    if let Some(date) = task.delivery_date {
        line.push_str(&format!(" {}", format!("due {date}").cyan()));
    }
    line
}

impl BoardReport {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        for column in &self.board.columns {
            println!("{} {}", column.title.bold().underline(), format!("({})", column.tasks.len()).dimmed());
            if column.tasks.is_empty() {
                println!("  {}", "no tasks".dimmed());
            }
            for task in &column.tasks {
                println!("  {}", task_line(task));
                if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                    println!("      {}", description.dimmed());
                }
            }
            println!();
        }

        let shown = self.board.visible_count();
        if shown < self.total {
            println!("Showing {shown} of {} task(s)", self.total);
        } else {
            println!("{} task(s)", self.total);
        }
    }
}

impl TaskResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                let verb = capitalize(&self.action);
                println!("{} task in '{}':", verb.green(), self.task.list_title);
                println!("  {}", task_line(&self.task));
            },
            OutputMode::Json => print_json(self),
        }
    }
}

impl ListsResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => {
                for list in &self.lists {
                    println!("{list}");
                }
            },
            OutputMode::Json => print_json(self),
        }
    }
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human if self.success => println!("{}", self.message),
            OutputMode::Human => eprintln!("{}", self.message.yellow()),
            OutputMode::Json => print_json(self),
        }
    }
}

impl ErrorReport {
    /// Render the error based on output mode
    ///
    /// Human output goes to stderr.
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => eprintln!("{} {}", "error:".red().bold(), self.message),
            OutputMode::Json => print_json(self),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
