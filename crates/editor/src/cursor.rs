//! Cursor Management
//!
//! Handles cursor position and movement over tab-expanded lines.
//!
//! A cursor column never rests on a tab continuation cell: horizontal moves
//! jump over whole runs, and row changes push the column forward off any
//! continuation it would land on.

use crate::line::Line;
use crate::lines::LineTable;
use crate::tab::Cell;
use crate::view::Viewport;

/// Position in a buffer (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    row: usize,
    col: usize,
    /// Last manually chosen column, kept across vertical moves
    sticky_col: usize,
}

impl Cursor {
    /// Create a new cursor at position (0, 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cursor at a specific position
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            sticky_col: col,
        }
    }

    /// Get the current position
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn sticky_col(&self) -> usize {
        self.sticky_col
    }

    /// Move to the start of the buffer
    pub fn reset(&mut self) {
        self.row = 0;
        self.set_col(0);
    }

    /// Set the column, remembering it as the sticky column
    pub fn set_col(&mut self, col: usize) {
        self.col = col;
        self.sticky_col = col;
    }

    /// Move to `row`, placing the column as close to the sticky column as
    /// the line allows.
    ///
    /// The column is clamped to the line's length and pushed forward off any
    /// tab continuation. The sticky column is kept.
    pub fn set_row(&mut self, row: usize, table: &LineTable) {
        self.row = row;
        self.col = self.sticky_col;
        if let Some(line) = table.get(row) {
            self.col = self.col.min(line.len());
            while line.get(self.col) == Some(Cell::TabCont) {
                self.col += 1;
            }
        }
    }

    /// Set row and column directly; the caller guarantees validity
    pub(crate) fn place(&mut self, row: usize, col: usize) {
        self.row = row;
        self.set_col(col);
    }

    /// Move one column left, or to the start of the preceding tab run
    pub fn move_left(&mut self, line: &Line) {
        if self.col == 0 {
            return;
        }
        if line.get(self.col - 1) == Some(Cell::TabCont) {
            let start = line.run_start(self.col - 1).unwrap_or(self.col - 1);
            self.set_col(start);
        } else {
            self.set_col(self.col - 1);
        }
    }

    /// Move one column right, or past the whole tab run under the cursor.
    ///
    /// From the last content column the cursor still steps once more, onto
    /// the append point at the end of the line.
    pub fn move_right(&mut self, line: &Line) {
        let len = line.len();
        if self.col + 1 == len {
            self.set_col(self.col + 1);
        } else if self.col + 1 < len {
            let step = match line.get(self.col) {
                Some(Cell::TabStart) => line.tab_len(self.col),
                _ => 1,
            };
            self.set_col(self.col + step);
        }
    }

    /// Move up one row, if there is one
    pub fn move_up(&mut self, table: &LineTable) {
        if self.row > 0 {
            self.set_row(self.row - 1, table);
        }
    }

    /// Move down one row, if there is one
    pub fn move_down(&mut self, table: &LineTable) {
        if self.row < table.last_row() {
            self.set_row(self.row + 1, table);
        }
    }

    /// Move to the start of the line
    pub fn move_home(&mut self) {
        self.set_col(0);
    }

    /// Move to the end of the line
    pub fn move_end(&mut self, line: &Line) {
        self.set_col(line.len());
    }

    /// Move up a viewport height, flagging a page move if the row changed
    pub fn page_up(&mut self, table: &LineTable, view: &mut Viewport) {
        let target = self.row.saturating_sub(view.height());
        if target != self.row {
            self.set_row(target, table);
            view.set_page_move();
        }
    }

    /// Move down a viewport height, flagging a page move if the row changed
    pub fn page_down(&mut self, table: &LineTable, view: &mut Viewport) {
        let target = (self.row + view.height()).min(table.last_row());
        if target != self.row {
            self.set_row(target, table);
            view.set_page_move();
        }
    }

    /// Move one step in a direction
    pub fn move_direction(&mut self, direction: Direction, table: &LineTable) {
        match direction {
            Direction::Up => self.move_up(table),
            Direction::Down => self.move_down(table),
            Direction::Left => {
                if let Some(line) = table.get(self.row) {
                    self.move_left(line);
                }
            }
            Direction::Right => {
                if let Some(line) = table.get(self.row) {
                    self.move_right(line);
                }
            }
        }
    }
}
