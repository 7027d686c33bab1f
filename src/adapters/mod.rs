//! Adapter implementations for port traits
//!
//! Concrete task stores:
//!
//! - `memory` - In-process store with the backend's semantics
//! - `http` - The board's REST backend (feature `http`)

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "http")]
pub use http::HttpStore;
pub use memory::MemoryStore;
