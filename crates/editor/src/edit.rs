//! Edit Operations
//!
//! Each function applies one user-visible edit to a line table and moves the
//! cursor accordingly. An edit touches one line, or merges two lines into one,
//! or splits one line in two. No edit leaves the cursor on a tab continuation
//! or outside the table.

use tracing::trace;

use crate::cursor::Cursor;
use crate::lines::LineTable;

/// Insert a typed byte: a tab, a line break, or anything else
pub fn insert_char(table: &mut LineTable, cursor: &mut Cursor, byte: u8, tab_size: usize) {
    match byte {
        b'\t' => insert_tab(table, cursor, tab_size),
        b'\n' => split(table, cursor, tab_size),
        _ => insert_byte(table, cursor, byte, tab_size),
    }
}

/// Insert a non-tab byte at the cursor and step past it
pub fn insert_byte(table: &mut LineTable, cursor: &mut Cursor, byte: u8, tab_size: usize) {
    table[cursor.row()].insert_byte(cursor.col(), byte, tab_size);
    cursor.set_col(cursor.col() + 1);
}

/// Insert a tab at the cursor
pub fn insert_tab(table: &mut LineTable, cursor: &mut Cursor, tab_size: usize) {
    let advance = table[cursor.row()].insert_tab(cursor.col(), tab_size);
    cursor.set_col(cursor.col() + advance);
}

/// Delete under the cursor.
///
/// At the end of a line the next line is merged onto it. Returns whether a
/// row was removed.
pub fn delete(table: &mut LineTable, cursor: &mut Cursor, tab_size: usize) -> bool {
    let row = cursor.row();
    let col = cursor.col();

    if col < table[row].len() {
        table[row].delete(col, tab_size);
        false
    } else if row < table.last_row() {
        let next = table.delete(row + 1);
        table[row].join(next, tab_size);
        trace!("Merged row {} into row {}", row + 1, row);
        true
    } else {
        false
    }
}

/// Delete before the cursor.
///
/// At the start of a line it is merged onto the end of the previous line and
/// the cursor follows to the seam. Returns whether a row was removed.
pub fn backspace(table: &mut LineTable, cursor: &mut Cursor, tab_size: usize) -> bool {
    let row = cursor.row();
    let col = cursor.col();

    if col > 0 {
        let target = table[row].backspace(col, tab_size);
        cursor.set_col(target);
        false
    } else if row > 0 {
        let current = table.delete(row);
        let seam = table[row - 1].len();
        table[row - 1].join(current, tab_size);
        cursor.place(row - 1, seam);
        trace!("Merged row {} into row {}", row, row - 1);
        true
    } else {
        false
    }
}

/// Break the line at the cursor, moving the tail to a new row below
pub fn split(table: &mut LineTable, cursor: &mut Cursor, tab_size: usize) {
    let row = cursor.row();
    let tail = table[row].split(cursor.col(), tab_size);
    table.insert(row + 1, tail);
    cursor.place(row + 1, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::{self, Cell};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_valid(table: &LineTable, cursor: &Cursor, tab_size: usize) {
        assert!(cursor.row() < table.len(), "row {} out of range", cursor.row());
        let line = &table[cursor.row()];
        assert!(cursor.col() <= line.len(), "col {} past {:?}", cursor.col(), line);
        assert_ne!(line.get(cursor.col()), Some(Cell::TabCont), "cursor on continuation in {:?}", line);

        for (row, line) in table.iter().enumerate() {
            if row < table.last_row() {
                assert!(line.has_newline(), "row {} lacks a newline", row);
            }
            let mut col = 0;
            while col < line.raw_len() {
                match line.get(col) {
                    Some(Cell::TabStart) => {
                        let width = line.tab_len(col);
                        assert_eq!(width, tab::dist_to_next_tabstop(col, tab_size));
                        col += width;
                    }
                    Some(Cell::TabCont) => panic!("orphan continuation in row {}", row),
                    _ => col += 1,
                }
            }
        }
    }

    #[test]
    fn test_backspace_at_line_start_merges() {
        let mut table = LineTable::from_bytes(b"zero\none\ntwo\n", 8);
        let mut cursor = Cursor::at(2, 0);

        assert!(backspace(&mut table, &mut cursor, 8));
        assert_eq!(table.len(), 3);
        assert_eq!(table[1].to_bytes(), b"onetwo\n");
        assert_eq!(cursor.row(), 1);
        assert_eq!(cursor.col(), 3);
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut table = LineTable::from_bytes(b"abc", 8);
        let mut cursor = Cursor::new();
        assert!(!backspace(&mut table, &mut cursor, 8));
        assert_eq!(table.to_bytes(), b"abc");
    }

    #[test]
    fn test_enter_splits() {
        let mut table = LineTable::from_bytes(b"hello world\nnext", 8);
        let mut cursor = Cursor::at(0, 5);

        insert_char(&mut table, &mut cursor, b'\n', 8);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].to_bytes(), b"hello\n");
        assert_eq!(table[1].to_bytes(), b" world\n");
        assert_eq!(table[2].to_bytes(), b"next");
        assert_eq!((cursor.row(), cursor.col()), (1, 0));
    }

    #[test]
    fn test_delete_at_line_end_merges() {
        let mut table = LineTable::from_bytes(b"ab\n\tc", 4);
        let mut cursor = Cursor::at(0, 2);

        assert!(delete(&mut table, &mut cursor, 4));
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].to_bytes(), b"ab\tc");
        assert_eq!(table[0].tab_len(2), 2);
        assert_eq!(cursor.col(), 2);

        // End of the last line.
        cursor.set_col(table[0].len());
        assert!(!delete(&mut table, &mut cursor, 4));
    }

    #[test]
    fn test_typing_keeps_cursor_off_continuations() {
        let mut table = LineTable::from_bytes(b"\t\tx", 4);
        let mut cursor = Cursor::new();

        insert_char(&mut table, &mut cursor, b'a', 4);
        assert_eq!(cursor.col(), 1);
        assert_valid(&table, &cursor, 4);

        insert_char(&mut table, &mut cursor, b'\t', 4);
        assert_eq!(cursor.col(), 4);
        assert_valid(&table, &cursor, 4);
        assert_eq!(table.to_bytes(), b"a\t\t\tx");
    }

    #[test]
    fn test_random_edits_preserve_invariants() {
        let mut rng = StdRng::seed_from_u64(0x7ed17);
        let alphabet = b"ab \t\t\n";

        for tab_size in [1, 3, 4, 8] {
            let mut table = LineTable::from_bytes(b"\tone\ntwo\t\tthree\n\n\tfour", tab_size);
            let mut cursor = Cursor::new();

            for _ in 0..2000 {
                let line_len = table[cursor.row()].len();
                match rng.random_range(0..10) {
                    0..=2 => {
                        let byte = alphabet[rng.random_range(0..alphabet.len())];
                        insert_char(&mut table, &mut cursor, byte, tab_size);
                    }
                    3 => {
                        delete(&mut table, &mut cursor, tab_size);
                    }
                    4 => {
                        backspace(&mut table, &mut cursor, tab_size);
                    }
                    5 => cursor.move_left(&table[cursor.row()]),
                    6 => cursor.move_right(&table[cursor.row()]),
                    7 => cursor.move_up(&table),
                    8 => cursor.move_down(&table),
                    _ => {
                        if rng.random_bool(0.5) {
                            cursor.move_home();
                        } else {
                            cursor.set_col(line_len);
                        }
                    }
                }
                assert_valid(&table, &cursor, tab_size);
            }
        }
    }
}
