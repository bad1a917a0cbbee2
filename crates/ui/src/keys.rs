//! Key decoding
//!
//! Maps terminal events onto editor commands.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tedit_editor::{Command, Direction};

/// What a terminal event asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Commands to run in order
    Commands(Vec<Command>),
    /// New terminal size as (rows, columns)
    Resize(u16, u16),
    /// Nothing to do
    Ignore,
}

/// Decode a terminal event
pub fn decode(event: &Event) -> Input {
    match event {
        Event::Key(key) => decode_key(key),
        Event::Resize(cols, rows) => Input::Resize(*rows, *cols),
        _ => Input::Ignore,
    }
}

fn decode_key(key: &KeyEvent) -> Input {
    if key.kind == KeyEventKind::Release {
        return Input::Ignore;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let command = match key.code {
            KeyCode::Char('s') => Command::Save,
            KeyCode::Char('q') | KeyCode::Char('c') => Command::Quit,
            KeyCode::Char('n') => Command::NextBuffer,
            KeyCode::Char('w') => Command::CloseBuffer,
            _ => return Input::Ignore,
        };
        return Input::Commands(vec![command]);
    }

    let command = match key.code {
        KeyCode::Left => Command::MoveCursor(Direction::Left),
        KeyCode::Right => Command::MoveCursor(Direction::Right),
        KeyCode::Up => Command::MoveCursor(Direction::Up),
        KeyCode::Down => Command::MoveCursor(Direction::Down),
        KeyCode::Home => Command::MoveToLineStart,
        KeyCode::End => Command::MoveToLineEnd,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::Backspace => Command::DeleteBackward,
        KeyCode::Delete => Command::DeleteForward,
        KeyCode::Enter => Command::InsertNewline,
        KeyCode::Tab => Command::InsertTab,
        KeyCode::Char(c) => {
            // Multi-byte characters go in byte by byte.
            let mut buf = [0u8; 4];
            let bytes = c.encode_utf8(&mut buf).as_bytes();
            return Input::Commands(bytes.iter().map(|&b| Command::InsertByte(b)).collect());
        }
        _ => return Input::Ignore,
    };
    Input::Commands(vec![command])
}
