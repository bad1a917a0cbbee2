//! Viewport
//!
//! The part of a buffer mapped onto the terminal, and the scroll rules that
//! keep the cursor inside it after every edit or move.

use tedit_core::ViewConfig;

use crate::cursor::Cursor;

/// Terminal dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub rows: u16,
    pub cols: u16,
}

impl ScreenSize {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

/// First index of a span of `len` cells after applying a start offset.
/// A negative offset counts back from the far end.
fn span_start(len: i64, offset: i32) -> i64 {
    let offset = i64::from(offset);
    if offset >= 0 {
        offset
    } else {
        len + offset
    }
}

/// Last index (inclusive) of a span of `len` cells after applying an end offset
fn span_end(len: i64, offset: i32) -> i64 {
    let offset = i64::from(offset);
    if offset >= 0 {
        len - 1 - offset
    } else {
        -1 - offset
    }
}

/// Length of the span left between the two offsets, at least 1
fn span_len(len: u16, start_offset: i32, end_offset: i32) -> usize {
    let len = i64::from(len);
    let n = span_end(len, end_offset) - span_start(len, start_offset) + 1;
    usize::try_from(n.max(1)).unwrap_or(1)
}

/// Visible rectangle of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First buffer row shown
    top_row: usize,
    /// First buffer column shown
    first_col: usize,
    offsets: ViewConfig,
    screen: ScreenSize,
    /// Set by page moves so the next sync scrolls a whole page
    page_move: bool,
}

impl Viewport {
    pub fn new(offsets: ViewConfig, screen: ScreenSize) -> Self {
        Self {
            top_row: 0,
            first_col: 0,
            offsets,
            screen,
            page_move: false,
        }
    }

    /// Scroll back to the origin and drop any pending page move
    pub fn reset(&mut self) {
        self.top_row = 0;
        self.first_col = 0;
        self.page_move = false;
    }

    /// Adopt a new terminal size
    pub fn resize(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    pub fn top_row(&self) -> usize {
        self.top_row
    }

    pub fn first_col(&self) -> usize {
        self.first_col
    }

    /// Number of buffer rows shown
    pub fn height(&self) -> usize {
        span_len(
            self.screen.rows,
            self.offsets.top_offset,
            self.offsets.bottom_offset,
        )
    }

    /// Number of buffer columns shown
    pub fn width(&self) -> usize {
        span_len(
            self.screen.cols,
            self.offsets.left_offset,
            self.offsets.right_offset,
        )
    }

    /// Last buffer row shown
    pub fn bottom_row(&self) -> usize {
        self.top_row + self.height() - 1
    }

    /// Last buffer column shown
    pub fn last_col(&self) -> usize {
        self.first_col + self.width() - 1
    }

    /// Terminal row the view starts on
    pub fn display_top_row(&self) -> u16 {
        let start = span_start(i64::from(self.screen.rows), self.offsets.top_offset);
        u16::try_from(start.max(0)).unwrap_or(0)
    }

    /// Terminal column the view starts on
    pub fn display_first_col(&self) -> u16 {
        let start = span_start(i64::from(self.screen.cols), self.offsets.left_offset);
        u16::try_from(start.max(0)).unwrap_or(0)
    }

    pub fn set_page_move(&mut self) {
        self.page_move = true;
    }

    pub fn page_move(&self) -> bool {
        self.page_move
    }

    /// Whether the cursor lies inside the visible rectangle
    pub fn contains(&self, cursor: &Cursor) -> bool {
        (self.top_row..=self.bottom_row()).contains(&cursor.row())
            && (self.first_col..=self.last_col()).contains(&cursor.col())
    }

    /// Scroll so the cursor is visible.
    ///
    /// Rows scroll by one, or by a whole page after a page move. Columns
    /// shift by exactly the distance the cursor is out. The page move flag
    /// is always cleared. If a single step was not enough, the view snaps to
    /// the nearest position containing the cursor.
    pub fn sync(&mut self, cursor: &Cursor) {
        let row = cursor.row();
        let height = self.height();

        if row < self.top_row {
            let step = if self.page_move { height } else { 1 };
            self.top_row = self.top_row.saturating_sub(step);
        } else if row > self.bottom_row() {
            let step = if self.page_move { height } else { 1 };
            self.top_row += step;
        }
        self.page_move = false;

        let col = cursor.col();
        if col < self.first_col {
            self.first_col -= self.first_col - col;
        } else if col > self.last_col() {
            self.first_col += col - self.last_col();
        }

        if row < self.top_row {
            self.top_row = row;
        } else if row > self.bottom_row() {
            self.top_row = row + 1 - height;
        }
    }

    /// Terminal row of the cursor; the cursor must be visible
    pub fn cursor_display_row(&self, cursor: &Cursor) -> u16 {
        let offset = cursor.row().saturating_sub(self.top_row);
        self.display_top_row()
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
    }

    /// Terminal column of the cursor; the cursor must be visible
    pub fn cursor_display_col(&self, cursor: &Cursor) -> u16 {
        let offset = cursor.col().saturating_sub(self.first_col);
        self.display_first_col()
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
    }
}
