//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundary between the board logic and the
//! remote store. Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The engine depends only on these traits, never on a concrete store:
//!
//! - **Testability**: Scripted stores for unit tests
//! - **Flexibility**: HTTP or in-memory backends without touching the engine

mod task_store;

pub use task_store::{ListFilter, TaskStore};
