//! Domain models for taskboard
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Task`] - a card on the board
//! - [`BoardState`] - every task plus the known list titles
//! - [`TaskPatch`] - a sparse set of changes to one task

mod board;
mod patch;
mod task;

pub use board::BoardState;
pub use patch::{Change, TaskPatch, UpdateRequest};
pub use task::{DEFAULT_LIST, NewTask, Priority, Task, TaskId, TaskStatus, parse_date};
