//! Core domain logic for taskboard
//!
//! Everything here is independent of any transport. The remote store is
//! reached only through the [`ports::TaskStore`] trait.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Task, BoardState, TaskPatch)
//! - `services/` - Patch building, the optimistic engine, drag resolution, filtering
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
pub mod services;
