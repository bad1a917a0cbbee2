//! Text Line
//!
//! One line of a file held as tab-expanded cells. Every line except the last
//! one of a table ends with a `\n` cell.

use std::fmt;

use crate::array::DynArray;
use crate::tab::{self, Cell};

/// A tab-expanded line
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Line {
    cells: DynArray<Cell>,
}

impl Line {
    /// Create an empty line without a newline
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a line from file bytes, expanding tabs
    pub fn from_bytes(bytes: &[u8], tab_size: usize) -> Self {
        let mut line = Self::from_raw(bytes);
        line.expand_tabs(tab_size);
        line
    }

    /// Build a line from file bytes, leaving tabs unexpanded
    pub fn from_raw(bytes: &[u8]) -> Self {
        Self {
            cells: bytes.iter().copied().map(Cell::Byte).collect(),
        }
    }

    /// Length excluding a trailing newline
    pub fn len(&self) -> usize {
        if self.has_newline() {
            self.cells.len() - 1
        } else {
            self.cells.len()
        }
    }

    /// Length including a trailing newline
    pub fn raw_len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the line has no content (it may still hold a newline)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the line ends in a newline
    pub fn has_newline(&self) -> bool {
        self.cells.last() == Some(&Cell::Byte(b'\n'))
    }

    /// Cell at `col`, if in bounds
    pub fn get(&self, col: usize) -> Option<Cell> {
        self.cells.get(col).copied()
    }

    /// All cells, newline included
    pub fn cells(&self) -> &DynArray<Cell> {
        &self.cells
    }

    /// Append a raw byte
    pub fn push_byte(&mut self, byte: u8) {
        self.cells.append(Cell::Byte(byte));
    }

    /// Width of the tab run starting at `col`; 0 if none starts there
    pub fn tab_len(&self, col: usize) -> usize {
        tab::tab_len(&self.cells, col)
    }

    /// Column of the run start owning the cell at `col`
    pub fn run_start(&self, col: usize) -> Option<usize> {
        tab::run_start(&self.cells, col)
    }

    /// Expand raw tab bytes into runs
    pub fn expand_tabs(&mut self, tab_size: usize) {
        tab::expand_tabs(&mut self.cells, tab_size);
    }

    /// File bytes of this line, tabs contracted, newline included
    pub fn to_bytes(&self) -> Vec<u8> {
        tab::contracted_bytes(self.cells.iter().copied()).collect()
    }

    /// Insert a non-tab byte at `col`.
    ///
    /// On a run start the byte takes the run's first column and the run
    /// shrinks by one, or, if it was a single column, a fresh run fills the
    /// next tab bar. Elsewhere the byte is inserted and the next run realigned.
    pub fn insert_byte(&mut self, col: usize, byte: u8, tab_size: usize) {
        if col < self.len() && self.cells[col] == Cell::TabStart {
            self.cells.set(col, Cell::Byte(byte));
            if col + 1 < self.len() && self.cells[col + 1] == Cell::TabCont {
                self.cells.set(col + 1, Cell::TabStart);
            } else {
                tab::insert_tab_run(&mut self.cells, col + 1, tab_size);
            }
        } else {
            self.cells.insert(col, Cell::Byte(byte));
            tab::align_next_tab(&mut self.cells, col + 1, tab_size);
        }
    }

    /// Insert a tab at `col`.
    ///
    /// Returns how many columns the cursor advances. When `col` is already a
    /// run start the new run goes after the existing one, and the cursor
    /// lands on the new run's start.
    pub fn insert_tab(&mut self, col: usize, tab_size: usize) -> usize {
        if self.get(col) == Some(Cell::TabStart) {
            let offset = self.tab_len(col);
            tab::insert_tab_run(&mut self.cells, col + offset, tab_size);
            offset
        } else {
            let width = tab::insert_tab_run(&mut self.cells, col, tab_size);
            tab::align_next_tab(&mut self.cells, col + width, tab_size);
            width
        }
    }

    /// Delete the cell at `col`, a whole run if one starts there.
    ///
    /// `col` must be below [`len`](Self::len).
    pub fn delete(&mut self, col: usize, tab_size: usize) {
        if self.cells[col] == Cell::TabStart {
            tab::delete_tab_run(&mut self.cells, col);
        } else {
            self.cells.delete(col);
        }
        tab::align_next_tab(&mut self.cells, col, tab_size);
    }

    /// Delete what precedes `col`, a whole run if `col` follows one.
    ///
    /// Returns the column the cursor lands on. `col` must be at least 1.
    pub fn backspace(&mut self, col: usize, tab_size: usize) -> usize {
        let target = match self.cells[col - 1] {
            Cell::TabStart => {
                self.cells.delete(col - 1);
                col - 1
            }
            Cell::TabCont => {
                let start = self.run_start(col - 1).unwrap_or(col - 1);
                tab::delete_tab_run(&mut self.cells, start);
                start
            }
            Cell::Byte(_) => {
                self.cells.delete(col - 1);
                col - 1
            }
        };
        tab::align_next_tab(&mut self.cells, target, tab_size);
        target
    }

    /// Split at `col`, returning the tail.
    ///
    /// The left part keeps the cells before `col` and gains a newline. The
    /// tail's first run is realigned to its new position.
    pub fn split(&mut self, col: usize, tab_size: usize) -> Line {
        let mut tail = Line {
            cells: self.cells.split(col),
        };
        self.push_byte(b'\n');
        tab::align_next_tab(&mut tail.cells, 0, tab_size);
        tail
    }

    /// Append `other` after removing this line's newline, then realign the
    /// run straddling the seam
    pub fn join(&mut self, other: Line, tab_size: usize) {
        let seam = self.len();
        if self.has_newline() {
            self.cells.pop();
        }
        self.cells.concat(other.cells);
        tab::align_next_tab(&mut self.cells, seam, tab_size);
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?})", String::from_utf8_lossy(&self.to_bytes()))
    }
}
