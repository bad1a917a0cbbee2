//! tedit - terminal text editor
//!
//! A small editor whose buffer stores tabs expanded into placeholder cells,
//! so a column is always a cell index.
//!
//! ## Architecture
//!
//! - `tedit-core`: error type and configuration
//! - `tedit-editor`: growable array, lines, cursor, viewport, edits and the
//!   shared editor state
//! - `tedit-ui`: crossterm frontend running the edit and render loops

#![warn(clippy::all)]

pub mod cli;

pub use tedit_core as core;
pub use tedit_editor as editor;
pub use tedit_ui as ui;

pub use tedit_core::{APP_NAME, VERSION};

/// Prelude module for convenient imports
pub mod prelude {
    pub use tedit_core::{AppConfig, Result, TeditError};
    pub use tedit_editor::{
        Command, Cursor, Direction, EditorState, FileBuffer, LineTable, ScreenSize, SharedState,
    };
}
