//! Category subsystem.
//!
//! # Data Flow
//! ```text
//! CATEGORIES (primary table: id → label, icon)
//!     → registry.rs builds label → id and id → label indexes once
//!     → CategoryRegistry::global() shared by all callers
//!     → lookups return metadata or LookupError
//! ```

pub mod registry;

pub use registry::{Category, CategoryInfo, CategoryRegistry, CATEGORIES};
