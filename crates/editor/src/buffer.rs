//! File Buffer
//!
//! A line table tied to an optional file path, together with the cursor and
//! viewport used to edit it. All edits go through this type so each one
//! marks the buffer unsaved and resyncs the viewport.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use tedit_core::{Result, TeditError, ViewConfig};
use tracing::{debug, info};

use crate::cursor::{Cursor, Direction};
use crate::edit;
use crate::lines::LineTable;
use crate::lock::FileLock;
use crate::view::{ScreenSize, Viewport};

/// Name shown for a buffer with no file
pub const UNNAMED: &str = "[No Name]";

/// An editable file
#[derive(Debug, Clone)]
pub struct FileBuffer {
    /// Rows of the file
    lines: LineTable,
    /// File the buffer writes to (if linked)
    path: Option<PathBuf>,
    /// Whether the buffer changed since the last write
    dirty: bool,
    cursor: Cursor,
    view: Viewport,
    /// Distance between tab stops
    tab_width: usize,
}

impl FileBuffer {
    /// Create an empty unlinked buffer holding one empty line
    pub fn new(tab_width: usize, view: ViewConfig, screen: ScreenSize) -> Self {
        Self::with_lines(LineTable::new(), tab_width, view, screen)
    }

    /// Create an unlinked buffer from file bytes
    pub fn from_bytes(bytes: &[u8], tab_width: usize, view: ViewConfig, screen: ScreenSize) -> Self {
        Self::with_lines(LineTable::from_bytes(bytes, tab_width), tab_width, view, screen)
    }

    /// Create an unlinked buffer from text
    pub fn from_text(text: &str, tab_width: usize) -> Self {
        Self::from_bytes(
            text.as_bytes(),
            tab_width,
            ViewConfig::default(),
            ScreenSize::default(),
        )
    }

    fn with_lines(lines: LineTable, tab_width: usize, view: ViewConfig, screen: ScreenSize) -> Self {
        Self {
            lines,
            path: None,
            dirty: false,
            cursor: Cursor::new(),
            view: Viewport::new(view, screen),
            tab_width,
        }
    }

    /// Load a file into a buffer linked to it.
    ///
    /// A missing file yields an empty buffer linked to the path, so the
    /// first write creates it. Any other failure yields no buffer.
    pub fn open(
        path: impl AsRef<Path>,
        tab_width: usize,
        view: ViewConfig,
        screen: ScreenSize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = match File::open(path).map_err(|e| TeditError::from_io(e, path)) {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                info!("{} does not exist yet, starting empty", path.display());
                let mut buffer = Self::new(tab_width, view, screen);
                buffer.link(path);
                return Ok(buffer);
            }
            Err(e) => return Err(e),
        };

        let lines = {
            let _lock = FileLock::exclusive(&file, path)?;
            LineTable::read_from(&file, tab_width).map_err(|e| TeditError::from_io(e, path))?
        };
        info!("Opened {} ({} rows)", path.display(), lines.len());

        let mut buffer = Self::with_lines(lines, tab_width, view, screen);
        buffer.link(path);
        Ok(buffer)
    }

    /// Associate the buffer with a file path
    pub fn link(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn is_linked(&self) -> bool {
        self.path.is_some()
    }

    /// Get the file path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name for display
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNNAMED.to_string())
    }

    /// Write the buffer to its linked file.
    ///
    /// Returns the number of bytes written. The file is locked for the whole
    /// write; if another process holds the lock nothing is written.
    pub fn write(&mut self) -> Result<usize> {
        let path = self.path.clone().ok_or(TeditError::NotLinked)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| TeditError::from_io(e, &path))?;

        let written = {
            let _lock = FileLock::exclusive(&file, &path)?;
            let written = self
                .lines
                .write_to(&file)
                .map_err(|e| TeditError::from_io(e, &path))?;
            file.sync_all().map_err(|e| TeditError::from_io(e, &path))?;
            written
        };

        self.dirty = false;
        debug!("Wrote {} bytes to {}", written, path.display());
        Ok(written)
    }

    /// Write to `path` and link to it.
    ///
    /// The previous link is kept if the write fails.
    pub fn link_write(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        let previous = self.path.replace(path.into());
        let written = self.write();
        if written.is_err() {
            self.path = previous;
        }
        written
    }

    /// Deep copy of the buffer, unlinked and with no unsaved changes
    pub fn fork(&self) -> Self {
        Self {
            lines: self.lines.fork(),
            path: None,
            dirty: false,
            cursor: self.cursor,
            view: self.view,
            tab_width: self.tab_width,
        }
    }

    /// Write a copy of the buffer to another file.
    ///
    /// This buffer keeps its own link and unsaved state; the returned copy
    /// is linked to `path`.
    pub fn write_to_other(&self, path: impl Into<PathBuf>) -> Result<(Self, usize)> {
        let mut other = self.fork();
        let written = other.link_write(path)?;
        Ok((other, written))
    }

    /// Check if the buffer has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn lines(&self) -> &LineTable {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Full contents as they would be written, lossily decoded
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.lines.to_bytes()).into_owned()
    }

    /// Adopt a new terminal size
    pub fn resize(&mut self, screen: ScreenSize) {
        self.view.resize(screen);
        self.sync_view();
    }

    /// Scroll the viewport so the cursor is visible
    pub fn sync_view(&mut self) {
        self.view.sync(&self.cursor);
    }

    fn edited(&mut self) {
        self.dirty = true;
        self.sync_view();
    }

    /// Insert a typed byte; `\n` splits the line and `\t` inserts a tab
    pub fn insert_byte(&mut self, byte: u8) {
        edit::insert_char(&mut self.lines, &mut self.cursor, byte, self.tab_width);
        self.edited();
    }

    pub fn insert_tab(&mut self) {
        edit::insert_tab(&mut self.lines, &mut self.cursor, self.tab_width);
        self.edited();
    }

    /// Delete under the cursor, joining the next line at a line end
    pub fn delete_forward(&mut self) {
        edit::delete(&mut self.lines, &mut self.cursor, self.tab_width);
        self.edited();
    }

    /// Delete before the cursor, joining onto the previous line at a line start
    pub fn backspace(&mut self) {
        edit::backspace(&mut self.lines, &mut self.cursor, self.tab_width);
        self.edited();
    }

    pub fn split_line(&mut self) {
        edit::split(&mut self.lines, &mut self.cursor, self.tab_width);
        self.edited();
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        self.cursor.move_direction(direction, &self.lines);
        self.sync_view();
    }

    pub fn move_home(&mut self) {
        self.cursor.move_home();
        self.sync_view();
    }

    pub fn move_end(&mut self) {
        if let Some(line) = self.lines.get(self.cursor.row()) {
            self.cursor.move_end(line);
        }
        self.sync_view();
    }

    pub fn page_up(&mut self) {
        self.cursor.page_up(&self.lines, &mut self.view);
        self.sync_view();
    }

    pub fn page_down(&mut self) {
        self.cursor.page_down(&self.lines, &mut self.view);
        self.sync_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn open(path: &Path) -> FileBuffer {
        FileBuffer::open(path, 4, ViewConfig::default(), ScreenSize::new(6, 12)).unwrap()
    }

    #[test]
    fn test_tab_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tab.txt");
        std::fs::write(&path, b"a\tb").unwrap();

        let mut buffer = open(&path);
        assert_eq!(buffer.lines()[0].len(), 5);

        buffer.move_end();
        assert_eq!(buffer.cursor().col(), 5);

        assert_eq!(buffer.write().unwrap(), 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"a\tb");
        assert_eq!(buffer.lines()[0].len(), 5);
    }

    #[test]
    fn test_open_missing_file_links_empty_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");

        let mut buffer = open(&path);
        assert_eq!(buffer.line_count(), 1);
        assert!(buffer.is_linked());
        assert!(!path.exists());
        assert_eq!(buffer.display_name(), "new.txt");

        buffer.insert_byte(b'x');
        assert!(buffer.is_dirty());
        buffer.write().unwrap();
        assert!(!buffer.is_dirty());
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[test]
    fn test_open_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileBuffer::open(dir.path(), 4, ViewConfig::default(), ScreenSize::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_unlinked_fails() {
        let mut buffer = FileBuffer::from_text("abc", 8);
        assert!(matches!(buffer.write(), Err(TeditError::NotLinked)));
        assert_eq!(buffer.display_name(), UNNAMED);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_while_locked_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("held.txt");
        std::fs::write(&path, b"original\n").unwrap();

        let mut buffer = open(&path);
        buffer.insert_byte(b'x');

        let holder = File::open(&path).unwrap();
        let _held = FileLock::exclusive(&holder, &path).unwrap();

        assert!(matches!(buffer.write(), Err(TeditError::Locked(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"original\n");
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_failed_link_write_keeps_previous_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kept.txt");
        std::fs::write(&path, b"a").unwrap();

        let mut buffer = open(&path);
        buffer.insert_byte(b'b');

        let unreachable = dir.path().join("no-such-dir").join("moved.txt");
        let err = buffer.link_write(unreachable).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(buffer.path(), Some(path.as_path()));
        assert!(buffer.is_dirty());

        let mut unlinked = FileBuffer::from_text("c", 8);
        assert!(unlinked.link_write(dir.path().join("no-such-dir").join("c.txt")).is_err());
        assert!(!unlinked.is_linked());
    }

    #[test]
    fn test_write_shrinks_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shrink.txt");
        std::fs::write(&path, b"first line\nsecond line\n").unwrap();

        let mut buffer = open(&path);
        buffer.move_cursor(Direction::Down);
        buffer.move_end();
        for _ in 0..11 {
            buffer.backspace();
        }
        buffer.write().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"first line\n\n");
    }

    #[test]
    fn test_write_to_other_leaves_original() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orig.txt");
        let other_path = dir.path().join("copy.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut buffer = open(&path);
        buffer.move_end();
        buffer.insert_byte(b'!');

        let (copy, written) = buffer.write_to_other(&other_path).unwrap();
        assert_eq!(written, 6);
        assert_eq!(std::fs::read(&other_path).unwrap(), b"hello!");
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        assert!(buffer.is_dirty());
        assert!(!copy.is_dirty());
        assert_eq!(buffer.path(), Some(path.as_path()));
        assert_eq!(copy.path(), Some(other_path.as_path()));
        assert_eq!(copy.cursor(), buffer.cursor());
    }

    #[test]
    fn test_fork_is_independent() {
        let mut buffer = FileBuffer::from_text("one\ntwo", 8);
        buffer.link("/tmp/never-written.txt");
        let mut copy = buffer.fork();
        assert!(!copy.is_linked());

        copy.insert_byte(b'z');
        assert_eq!(buffer.text(), "one\ntwo");
        assert_eq!(copy.text(), "zone\ntwo");
    }

    #[test]
    fn test_page_down_scenario() {
        let text: String = (0..30).map(|i| format!("{}\n", i)).collect();
        let mut buffer = FileBuffer::from_bytes(
            text.as_bytes(),
            8,
            ViewConfig::default(),
            ScreenSize::new(11, 40),
        );
        assert_eq!(buffer.line_count(), 31);

        buffer.page_down();
        assert_eq!(buffer.cursor().row(), 10);
        assert_eq!(buffer.view().top_row(), 10);
        assert!(!buffer.view().page_move());

        buffer.page_down();
        buffer.page_down();
        assert_eq!(buffer.cursor().row(), 30);
        assert!(buffer.view().contains(buffer.cursor()));
    }

    #[test]
    fn test_random_session_keeps_cursor_visible() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut buffer = FileBuffer::from_bytes(
            b"\tfirst\nsecond\t\tline\n\nlast\tone",
            4,
            ViewConfig::default(),
            ScreenSize::new(5, 7),
        );

        for _ in 0..3000 {
            match rng.random_range(0..14) {
                0..=3 => buffer.insert_byte(b"xy\t\n"[rng.random_range(0..4)]),
                4 => buffer.insert_tab(),
                5 => buffer.delete_forward(),
                6 => buffer.backspace(),
                7 => buffer.move_cursor(Direction::Left),
                8 => buffer.move_cursor(Direction::Right),
                9 => buffer.move_cursor(Direction::Up),
                10 => buffer.move_cursor(Direction::Down),
                11 => buffer.page_up(),
                12 => buffer.page_down(),
                _ => {
                    if rng.random_bool(0.5) {
                        buffer.move_home();
                    } else {
                        buffer.move_end();
                    }
                }
            }
            assert!(buffer.view().contains(buffer.cursor()), "cursor left the view");
            assert!(!buffer.view().page_move());
        }
    }
}
