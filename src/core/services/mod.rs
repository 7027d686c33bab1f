//! Board services
//!
//! - [`patch_builder`] - Sparse field changes to minimal update requests
//! - [`engine`] - Optimistic mutations with reconcile and rollback
//! - [`resolver`] - Drag outcomes to reorders or list moves
//! - [`projector`] - Search and filters to the visible board

pub mod engine;
pub mod patch_builder;
pub mod projector;
pub mod resolver;

pub use engine::{BoardEngine, DeleteOutcome, MoveOutcome};
pub use patch_builder::{build_update, build_update_from_fields, parse_fields};
pub use projector::{
    BoardView, Column, ViewFilter, next_priority_filter, next_status_filter, project, visible,
};
pub use resolver::{DragOutcome, DropLocation, MoveResolution, resolve};
