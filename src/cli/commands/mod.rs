//! Command implementations

mod board;
mod task;

pub use board::{lists, show};
pub use task::{add, edit, move_to, remove, toggle};

use taskboard::core::ports::TaskStore;
use taskboard::core::services::BoardEngine;
use taskboard::error::BoardError;
use taskboard::output::OutputMode;

use super::app::Command;

/// Load the board, then run one command against it
pub async fn execute<S: TaskStore>(
    command: Command,
    engine: &BoardEngine<S>,
    mode: OutputMode,
) -> Result<(), BoardError> {
    match command {
        Command::Show {
            search,
            status,
            priority,
        } => show(engine, search, status, priority, mode).await,
        Command::Lists => lists(engine, mode).await,
        Command::Add {
            title,
            list,
            description,
            priority,
            due,
        } => {
            let draft = task::draft(title, list, description, priority, due);
            add(engine, draft, mode).await
        },
        Command::Edit {
            id,
            title,
            description,
            clear_description,
            priority,
            clear_priority,
            due,
            clear_due,
            list,
        } => {
            let patch = task::EditArgs {
                title,
                description,
                clear_description,
                priority,
                clear_priority,
                due,
                clear_due,
                list,
            }
            .into_patch();
            edit(engine, &id, &patch, mode).await
        },
        Command::Toggle { id } => toggle(engine, &id, mode).await,
        Command::Move { id, list, position } => move_to(engine, &id, &list, position, mode).await,
        Command::Rm { id } => remove(engine, &id, mode).await,
        Command::Version => Ok(()),
    }
}
