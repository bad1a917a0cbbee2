//! Tab Codec
//!
//! While a line is in memory a tab byte is never stored as-is. It is expanded
//! into a run of placeholder cells reaching the next tab stop: one
//! [`Cell::TabStart`] followed by zero or more [`Cell::TabCont`]. Column and
//! cell index are therefore always the same number.
//!
//! The functions here maintain that representation as cells come and go.
//! Inserting or removing cells in front of a run can leave it misaligned;
//! [`align_next_tab`] fixes the first run found after an edit point, which is
//! enough because an aligned run always ends on a tab stop and so restores
//! the alignment of everything after it.

use crate::array::DynArray;

/// One column of an in-memory line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// A file byte stored verbatim
    Byte(u8),
    /// First column of an expanded tab
    TabStart,
    /// Remaining columns of an expanded tab
    TabCont,
}

impl Cell {
    /// Whether this cell belongs to a tab run
    pub fn is_tab(self) -> bool {
        matches!(self, Cell::TabStart | Cell::TabCont)
    }

    /// Whether this cell is a tab run start
    pub fn is_tab_start(self) -> bool {
        self == Cell::TabStart
    }

    /// Whether a cursor may never rest on this cell
    pub fn is_tab_cont(self) -> bool {
        self == Cell::TabCont
    }
}

impl From<u8> for Cell {
    fn from(byte: u8) -> Self {
        Cell::Byte(byte)
    }
}

/// Columns from `index` up to the next tab stop
pub fn dist_to_next_tabstop(index: usize, tab_size: usize) -> usize {
    tab_size - index % tab_size
}

/// Width of the run starting at `index`; 0 if no run starts there
pub fn tab_len(cells: &DynArray<Cell>, index: usize) -> usize {
    if cells.get(index) != Some(&Cell::TabStart) {
        return 0;
    }
    1 + cells
        .iter()
        .skip(index + 1)
        .take_while(|c| c.is_tab_cont())
        .count()
}

/// Insert a run at `index` sized to reach the next tab stop.
///
/// Returns the width of the inserted run.
pub fn insert_tab_run(cells: &mut DynArray<Cell>, index: usize, tab_size: usize) -> usize {
    let width = dist_to_next_tabstop(index, tab_size);
    cells.insert(index, Cell::TabStart);
    for i in 1..width {
        cells.insert(index + i, Cell::TabCont);
    }
    width
}

/// Delete the run starting at `index`. Does nothing if no run starts there.
pub fn delete_tab_run(cells: &mut DynArray<Cell>, index: usize) {
    let width = tab_len(cells, index);
    if width > 0 {
        cells.delete_range(index..index + width);
    }
}

/// Expand every raw tab byte into a run
pub fn expand_tabs(cells: &mut DynArray<Cell>, tab_size: usize) {
    let mut i = 0;
    while i < cells.len() {
        if cells[i] == Cell::Byte(b'\t') {
            cells.delete(i);
            i += insert_tab_run(cells, i, tab_size);
        } else {
            i += 1;
        }
    }
}

/// File bytes a sequence of cells stands for
pub fn contracted_bytes<I>(cells: I) -> impl Iterator<Item = u8>
where
    I: IntoIterator<Item = Cell>,
{
    cells.into_iter().filter_map(|cell| match cell {
        Cell::Byte(b) => Some(b),
        Cell::TabStart => Some(b'\t'),
        Cell::TabCont => None,
    })
}

/// Grow or shrink the run at `index` so it ends on the next tab stop
pub fn align_tab(cells: &mut DynArray<Cell>, index: usize, tab_size: usize) {
    let target = dist_to_next_tabstop(index, tab_size);
    let mut current = tab_len(cells, index);
    if current == 0 {
        return;
    }

    while current < target {
        cells.insert(index + 1, Cell::TabCont);
        current += 1;
    }
    if current > target {
        cells.delete_range(index + 1..index + 1 + (current - target));
    }
}

/// Realign the first run found at or after `start`.
///
/// Returns the index of the run that was aligned, if any.
pub fn align_next_tab(cells: &mut DynArray<Cell>, start: usize, tab_size: usize) -> Option<usize> {
    if cells.is_empty() {
        return None;
    }
    let found = cells.find(start, cells.len() - 1, |c| c.is_tab_start());
    if let Some(index) = found {
        align_tab(cells, index, tab_size);
    }
    found
}

/// Index of the run start owning the cell at `index`
pub fn run_start(cells: &DynArray<Cell>, index: usize) -> Option<usize> {
    cells.rfind(0, index, |c| c.is_tab_start())
}
