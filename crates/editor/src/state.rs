//! Editor State
//!
//! Every open buffer plus session data (active buffer, status message, quit
//! request). The edit loop and the render loop share one [`EditorState`]
//! through [`SharedState`], which serializes all access with a single mutex.

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tedit_core::{AppConfig, Result, TeditError, ViewConfig};
use tracing::{error, info, warn};

use crate::buffer::FileBuffer;
use crate::commands::{Command, CommandResult};
use crate::render::Frame;
use crate::view::ScreenSize;

/// Session-wide editor state
#[derive(Debug)]
pub struct EditorState {
    buffers: Vec<FileBuffer>,
    active: usize,
    status: Option<String>,
    quit_requested: bool,
    /// Set by a quit refused because of unsaved changes
    quit_armed: bool,
    tab_size: usize,
    view: ViewConfig,
    screen: ScreenSize,
}

impl EditorState {
    /// Create a state holding one empty buffer
    pub fn new(tab_size: usize, view: ViewConfig, screen: ScreenSize) -> Self {
        Self {
            buffers: vec![FileBuffer::new(tab_size, view, screen)],
            active: 0,
            status: None,
            quit_requested: false,
            quit_armed: false,
            tab_size,
            view,
            screen,
        }
    }

    /// Create a state from configuration
    pub fn from_config(config: &AppConfig, screen: ScreenSize) -> Self {
        Self::new(config.editor.tab_size, config.view, screen)
    }

    /// Open files in order, the first one ending up active.
    ///
    /// The initial empty buffer is replaced when at least one file opens.
    pub fn open_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut opened = Vec::with_capacity(paths.len());
        for path in paths {
            opened.push(FileBuffer::open(path, self.tab_size, self.view, self.screen)?);
        }
        self.buffers = opened;
        self.active = 0;
        Ok(())
    }

    /// Open a file in a new buffer and make it active
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let buffer = FileBuffer::open(path, self.tab_size, self.view, self.screen)?;
        self.push_active(buffer);
        Ok(())
    }

    /// Add an empty buffer and make it active
    pub fn new_buffer(&mut self) {
        let buffer = FileBuffer::new(self.tab_size, self.view, self.screen);
        self.push_active(buffer);
    }

    fn push_active(&mut self, buffer: FileBuffer) {
        self.buffers.push(buffer);
        self.active = self.buffers.len() - 1;
    }

    pub fn active(&self) -> &FileBuffer {
        &self.buffers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut FileBuffer {
        &mut self.buffers[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Close the active buffer, keeping at least one open
    pub fn close_active(&mut self) {
        self.buffers.remove(self.active);
        if self.buffers.is_empty() {
            self.buffers
                .push(FileBuffer::new(self.tab_size, self.view, self.screen));
        }
        if self.active >= self.buffers.len() {
            self.active = self.buffers.len() - 1;
        }
    }

    /// Write the active buffer to its file
    pub fn write_active(&mut self) -> Result<usize> {
        self.active_mut().write()
    }

    /// Write a copy of the active buffer to `path` and switch to the copy
    pub fn write_other(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let (copy, written) = self.active().write_to_other(path.as_ref())?;
        self.push_active(copy);
        Ok(written)
    }

    /// Adopt a new terminal size in every buffer
    pub fn resize(&mut self, screen: ScreenSize) {
        self.screen = screen;
        for buffer in &mut self.buffers {
            buffer.resize(screen);
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Ask to quit. With unsaved changes the first request only warns.
    pub fn request_quit(&mut self) -> CommandResult {
        let unsaved = self.buffers.iter().filter(|b| b.is_dirty()).count();
        if unsaved > 0 && !self.quit_armed {
            self.quit_armed = true;
            return CommandResult::error(format!(
                "{} buffer(s) with unsaved changes, quit again to discard",
                unsaved
            ));
        }
        self.quit_requested = true;
        CommandResult::ok()
    }

    /// Execute a command, recording its message in the status line
    pub fn execute(&mut self, command: Command) -> CommandResult {
        if command != Command::Quit {
            self.quit_armed = false;
        }

        let result = if command.apply(self.active_mut()) {
            CommandResult::ok()
        } else {
            self.execute_session(command)
        };

        if let Some(message) = &result.message {
            self.set_status(message.clone());
        }
        result
    }

    fn execute_session(&mut self, command: Command) -> CommandResult {
        match command {
            Command::Save => match self.write_active() {
                Ok(written) => self.wrote(written),
                Err(e) => Self::failed(e),
            },
            Command::SaveAs(path) => match self.active_mut().link_write(path) {
                Ok(written) => self.wrote(written),
                Err(e) => Self::failed(e),
            },
            Command::WriteCopy(path) => match self.write_other(path) {
                Ok(written) => self.wrote(written),
                Err(e) => Self::failed(e),
            },
            Command::Open(path) => match self.open(&path) {
                Ok(()) => CommandResult::with_message(format!("Opened {}", path.display())),
                Err(e) => Self::failed(e),
            },
            Command::NewBuffer => {
                self.new_buffer();
                CommandResult::ok()
            }
            Command::NextBuffer => {
                self.active = (self.active + 1) % self.buffers.len();
                CommandResult::ok()
            }
            Command::CloseBuffer => {
                self.close_active();
                CommandResult::ok()
            }
            Command::Quit => self.request_quit(),
            other => CommandResult::error(format!("Unhandled command: {:?}", other)),
        }
    }

    fn wrote(&self, written: usize) -> CommandResult {
        let name = self.active().display_name();
        info!("Wrote {} bytes to {}", written, name);
        CommandResult::with_message(format!("\"{}\" {}B written", name, written))
    }

    fn failed(err: TeditError) -> CommandResult {
        if err.is_recoverable() {
            warn!("Command failed, may be retried: {}", err);
            CommandResult::error(err.user_message())
        } else {
            error!("Command failed: {}", err);
            CommandResult::error(format!("Error: {}", err.user_message()))
        }
    }

    /// Text of the status line: name, unsaved marker, position and message
    pub fn status_line(&self) -> String {
        let buffer = self.active();
        let cursor = buffer.cursor();
        let mut line = format!(
            "{}{} {}:{}",
            buffer.display_name(),
            if buffer.is_dirty() { " [+]" } else { "" },
            cursor.row() + 1,
            cursor.col() + 1,
        );
        if let Some(status) = &self.status {
            line.push_str("  ");
            line.push_str(status);
        }
        line
    }

    /// Capture what the active buffer looks like on screen
    pub fn frame(&self) -> Frame {
        Frame::capture(self.active())
    }
}

/// Editor state shared between the edit loop and the render loop
#[derive(Debug, Clone)]
pub struct SharedState {
    inner: Arc<Mutex<EditorState>>,
}

impl SharedState {
    pub fn new(state: EditorState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Take the lock; it is released when the guard drops
    pub fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.inner.lock()
    }

    /// Run `f` with the lock held
    pub fn with<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Direction;
    use std::thread;

    fn state() -> EditorState {
        EditorState::new(4, ViewConfig::default(), ScreenSize::new(10, 40))
    }

    #[test]
    fn test_quit_needs_confirmation_when_dirty() {
        let mut state = state();
        assert!(state.execute(Command::InsertByte(b'x')).success);

        let result = state.execute(Command::Quit);
        assert!(!result.success);
        assert!(!state.quit_requested());
        assert!(state.status().unwrap().contains("unsaved"));

        state.execute(Command::Quit);
        assert!(state.quit_requested());
    }

    #[test]
    fn test_other_command_disarms_quit() {
        let mut state = state();
        state.execute(Command::InsertByte(b'x'));
        state.execute(Command::Quit);
        state.execute(Command::MoveCursor(Direction::Left));
        state.execute(Command::Quit);
        assert!(!state.quit_requested());
    }

    #[test]
    fn test_clean_quit_is_immediate() {
        let mut state = state();
        state.execute(Command::Quit);
        assert!(state.quit_requested());
    }

    #[test]
    fn test_save_unlinked_reports_error() {
        let mut state = state();
        let result = state.execute(Command::Save);
        assert!(!result.success);
        assert_eq!(state.status(), Some("No file name, use write-as"));
    }

    #[test]
    fn test_failed_save_as_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state();
        state.execute(Command::InsertByte(b'x'));

        let target = dir.path().join("missing").join("x.txt");
        let result = state.execute(Command::SaveAs(target));
        assert!(!result.success);
        assert!(state.status().unwrap().starts_with("Error: No such file"));
        assert!(!state.active().is_linked());
        assert!(state.active().is_dirty());
    }

    #[test]
    fn test_write_copy_switches_to_copy() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.txt");
        let copy = dir.path().join("b.txt");
        std::fs::write(&original, "text").unwrap();

        let mut state = state();
        state.open_files(&[&original]).unwrap();
        assert_eq!(state.buffer_count(), 1);
        state.execute(Command::InsertByte(b'>'));

        let result = state.execute(Command::WriteCopy(copy.clone()));
        assert!(result.success);
        assert_eq!(state.buffer_count(), 2);
        assert_eq!(state.active_index(), 1);
        assert_eq!(state.active().display_name(), "b.txt");
        assert!(!state.active().is_dirty());
        assert_eq!(std::fs::read_to_string(&copy).unwrap(), ">text");
        assert_eq!(std::fs::read_to_string(&original).unwrap(), "text");
    }

    #[test]
    fn test_close_keeps_one_buffer() {
        let mut state = state();
        state.new_buffer();
        assert_eq!(state.buffer_count(), 2);
        state.execute(Command::CloseBuffer);
        state.execute(Command::CloseBuffer);
        assert_eq!(state.buffer_count(), 1);
        assert_eq!(state.active_index(), 0);

        state.execute(Command::NewBuffer);
        state.execute(Command::NextBuffer);
        assert_eq!(state.active_index(), 0);
    }

    #[test]
    fn test_status_line() {
        let mut state = state();
        state.execute(Command::InsertByte(b'a'));
        assert_eq!(state.status_line(), "[No Name] [+] 1:2");
    }

    #[test]
    fn test_edit_and_render_threads_share_state() {
        let shared = SharedState::new(state());

        let editor = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..500u32 {
                    let byte = if i % 50 == 49 { b'\n' } else { b'a' + (i % 26) as u8 };
                    let mut guard = shared.lock();
                    guard.execute(Command::InsertByte(byte));
                    drop(guard);
                    thread::yield_now();
                }
            })
        };
        let painter = {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut frames = 0;
                for _ in 0..200 {
                    let frame = shared.with(|s| s.frame());
                    assert!(frame.rows.len() <= 9);
                    frames += 1;
                    thread::yield_now();
                }
                frames
            })
        };

        editor.join().unwrap();
        assert_eq!(painter.join().unwrap(), 200);

        shared.with(|s| {
            assert_eq!(s.active().line_count(), 11);
            assert_eq!(s.active().text().len(), 500);
            assert!(s.active().view().contains(s.active().cursor()));
        });
    }
}
