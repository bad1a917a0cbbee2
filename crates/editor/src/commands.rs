//! Editor Commands
//!
//! Everything the input side can ask the editor to do. Buffer commands act on
//! the active buffer; file and session commands are carried out by
//! [`EditorState`](crate::state::EditorState).

use std::path::PathBuf;

use crate::buffer::FileBuffer;
use crate::cursor::Direction;

/// Editor command type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Movement commands
    MoveCursor(Direction),
    MoveToLineStart,
    MoveToLineEnd,
    PageUp,
    PageDown,

    // Edit commands
    InsertByte(u8),
    InsertTab,
    InsertNewline,
    DeleteBackward,
    DeleteForward,

    // File commands
    Save,
    SaveAs(PathBuf),
    WriteCopy(PathBuf),
    Open(PathBuf),

    // Session commands
    NewBuffer,
    NextBuffer,
    CloseBuffer,
    Quit,
}

impl Command {
    /// Apply a movement or edit command to a buffer.
    ///
    /// Returns `false` for commands that need the whole editor state.
    pub fn apply(&self, buffer: &mut FileBuffer) -> bool {
        match self {
            Command::MoveCursor(direction) => buffer.move_cursor(*direction),
            Command::MoveToLineStart => buffer.move_home(),
            Command::MoveToLineEnd => buffer.move_end(),
            Command::PageUp => buffer.page_up(),
            Command::PageDown => buffer.page_down(),
            Command::InsertByte(byte) => buffer.insert_byte(*byte),
            Command::InsertTab => buffer.insert_tab(),
            Command::InsertNewline => buffer.split_line(),
            Command::DeleteBackward => buffer.backspace(),
            Command::DeleteForward => buffer.delete_forward(),
            _ => return false,
        }
        true
    }
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
