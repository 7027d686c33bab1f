//! taskboard - Kanban board state kept in sync with a remote task store
//!
//! The board is updated optimistically: mutations show up immediately and are
//! confirmed or rolled back once the store answers. Filtering, searching and
//! drag-and-drop resolution are derived from the local board.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata,
    clippy::future_not_send
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;
pub mod output;

pub use crate::core::models::{BoardState, Change, NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};
pub use crate::core::ports::{ListFilter, TaskStore};
pub use crate::core::services::{BoardEngine, DragOutcome, DropLocation, ViewFilter};
pub use config::BoardConfig;
pub use error::{BoardError, ErrorCode, StoreError, ValidationError};
