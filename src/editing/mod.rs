//! Figure editing
//!
//! This module provides:
//! - `ListAddress` and `Selection` for position-based addressing
//! - `SelectionHolder`, the seam to the editor's selection
//! - `FieldEditCommands`, the structural edit operations
//! - `ToolState`, the derived tool enablement

mod commands;
mod selection;
mod tools;

pub use commands::{EntryTemplate, FieldEditCommands};
pub use selection::{EditorSelection, FieldInput, ListAddress, Selection, SelectionHolder};
pub use tools::ToolState;
