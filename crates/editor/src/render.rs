//! Render Surface
//!
//! Turns the visible part of a buffer into plain text rows placed on the
//! terminal grid. Painting itself belongs to the frontend.

use crate::buffer::FileBuffer;
use crate::line::Line;
use crate::tab::Cell;

/// Glyph painted for bytes with no printable form
pub const PLACEHOLDER_GLYPH: char = '@';

/// Glyph painted for a cell
pub fn glyph(cell: Cell) -> char {
    match cell {
        Cell::Byte(b @ 0x20..=0x7e) => char::from(b),
        c if c.is_tab() => ' ',
        _ => PLACEHOLDER_GLYPH,
    }
}

/// Glyphs of the line's columns `first_col..first_col + width`, newline excluded
pub fn visible_text(line: &Line, first_col: usize, width: usize) -> String {
    let end = line.len().min(first_col.saturating_add(width));
    (first_col..end)
        .filter_map(|col| line.get(col))
        .map(glyph)
        .collect()
}

/// One painted row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    /// Terminal row
    pub screen_row: u16,
    /// Terminal column the text starts at
    pub screen_col: u16,
    pub text: String,
}

/// Snapshot of what a buffer looks like on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<FrameRow>,
    /// Terminal (row, column) of the cursor
    pub cursor: (u16, u16),
}

impl Frame {
    /// Capture the visible rows and cursor of a buffer
    pub fn capture(buffer: &FileBuffer) -> Self {
        let view = buffer.view();
        let lines = buffer.lines();
        let top = view.top_row();
        let bottom = view.bottom_row().min(lines.last_row());
        let display_top = view.display_top_row();
        let display_col = view.display_first_col();

        let rows = (top..=bottom)
            .zip(display_top..)
            .filter_map(|(row, screen_row)| {
                lines.get(row).map(|line| FrameRow {
                    screen_row,
                    screen_col: display_col,
                    text: visible_text(line, view.first_col(), view.width()),
                })
            })
            .collect();

        Self {
            rows,
            cursor: (
                view.cursor_display_row(buffer.cursor()),
                view.cursor_display_col(buffer.cursor()),
            ),
        }
    }
}
