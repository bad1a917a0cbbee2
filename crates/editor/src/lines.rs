//! Line Table
//!
//! Ordered rows of a buffer. Loading splits a byte stream on `\n` and expands
//! tabs once the whole stream is in; storing writes the contracted bytes back.

use std::fs::File;
use std::io::{self, Cursor, ErrorKind, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::array::DynArray;
use crate::line::Line;

/// Bytes requested from the source per read
pub const READ_CHUNK_SIZE: usize = 4096;

/// A store destination that can be emptied before it is rewritten
pub trait StoreTarget: Write + Seek {
    /// Drop every byte the target currently holds
    fn truncate(&mut self) -> io::Result<()>;
}

impl StoreTarget for File {
    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)
    }
}

impl StoreTarget for &File {
    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)
    }
}

impl StoreTarget for Cursor<Vec<u8>> {
    fn truncate(&mut self) -> io::Result<()> {
        self.get_mut().clear();
        Ok(())
    }
}

impl<T: StoreTarget + ?Sized> StoreTarget for &mut T {
    fn truncate(&mut self) -> io::Result<()> {
        (**self).truncate()
    }
}

/// Rows of a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    lines: DynArray<Line>,
}

impl LineTable {
    /// A table holding a single empty line
    pub fn new() -> Self {
        let mut lines = DynArray::new();
        lines.append(Line::new());
        Self { lines }
    }

    /// Load a table from a byte stream.
    ///
    /// Every segment up to and including a `\n` is a row, and whatever
    /// follows the last `\n` (possibly nothing) is the final row. Tabs are
    /// expanded after the whole stream has been read.
    pub fn read_from<R: Read>(mut src: R, tab_size: usize) -> io::Result<Self> {
        let mut lines = DynArray::new();
        let mut current = Line::new();
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut total = 0usize;

        loop {
            let n = match src.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            total += n;
            for &byte in &buf[..n] {
                current.push_byte(byte);
                if byte == b'\n' {
                    lines.append(std::mem::take(&mut current));
                }
            }
        }
        lines.append(current);

        let mut table = Self { lines };
        table.expand_tabs(tab_size);
        debug!("Loaded {} bytes into {} rows", total, table.len());
        Ok(table)
    }

    /// Load a table from an in-memory byte slice
    pub fn from_bytes(bytes: &[u8], tab_size: usize) -> Self {
        let mut table = Self {
            lines: DynArray::new(),
        };
        for segment in bytes.split_inclusive(|&b| b == b'\n') {
            table.lines.append(Line::from_raw(segment));
        }
        if bytes.is_empty() || bytes.ends_with(b"\n") {
            table.lines.append(Line::new());
        }
        table.expand_tabs(tab_size);
        table
    }

    /// Write the contracted bytes of every row to `target`.
    ///
    /// The target is emptied and rewound first. Returns the number of bytes
    /// written. The table itself is left untouched.
    pub fn write_to<T: StoreTarget>(&self, mut target: T) -> io::Result<usize> {
        let bytes = self.to_bytes();
        target.truncate()?;
        target.seek(SeekFrom::Start(0))?;
        target.write_all(&bytes)?;
        target.flush()?;
        debug!("Stored {} rows, {} bytes", self.len(), bytes.len());
        Ok(bytes.len())
    }

    /// File bytes of the whole table, tabs contracted
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.lines.iter().map(Line::raw_len).sum());
        for line in &self.lines {
            bytes.extend(line.to_bytes());
        }
        bytes
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the table has no rows at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the final row
    pub fn last_row(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Row `row`, if in range
    pub fn get(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Mutable row `row`, if in range
    pub fn get_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row)
    }

    /// Insert a row before `row`
    pub fn insert(&mut self, row: usize, line: Line) {
        self.lines.insert(row, line);
    }

    /// Remove and return row `row`
    pub fn delete(&mut self, row: usize) -> Line {
        self.lines.delete(row)
    }

    /// Append a row at the end
    pub fn append(&mut self, line: Line) {
        self.lines.append(line);
    }

    /// Iterate over the rows
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Deep copy of every row
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Expand tabs in every row
    pub fn expand_tabs(&mut self, tab_size: usize) {
        for line in self.lines.iter_mut() {
            line.expand_tabs(tab_size);
        }
    }
}

impl Default for LineTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for LineTable {
    type Output = Line;

    fn index(&self, row: usize) -> &Line {
        &self.lines[row]
    }
}

impl std::ops::IndexMut<usize> for LineTable {
    fn index_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::Cell;

    /// Reader yielding at most `step` bytes per call
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "nope"))
        }
    }

    #[test]
    fn test_load_segments() {
        let table = LineTable::read_from(&b"one\ntwo\nthree"[..], 8).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].to_bytes(), b"one\n");
        assert_eq!(table[2].to_bytes(), b"three");
        assert!(!table[2].has_newline());
    }

    #[test]
    fn test_load_trailing_newline_gives_empty_last_row() {
        let table = LineTable::read_from(&b"one\n"[..], 8).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table[1].is_empty());
        assert_eq!(table.to_bytes(), b"one\n");

        let empty = LineTable::read_from(&b""[..], 8).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.to_bytes(), b"");
    }

    #[test]
    fn test_load_across_chunk_boundaries() {
        let mut data = Vec::new();
        for i in 0..2000 {
            data.extend_from_slice(format!("row\t{}\n", i).as_bytes());
        }
        let chunked = LineTable::read_from(Trickle { data: &data, step: 7 }, 4).unwrap();
        let whole = LineTable::from_bytes(&data, 4);
        assert_eq!(chunked, whole);
        assert_eq!(chunked.len(), 2001);
        assert_eq!(chunked[0].get(3), Some(Cell::TabStart));
        assert_eq!(chunked.to_bytes(), data);
    }

    #[test]
    fn test_load_failure() {
        let err = LineTable::read_from(Failing, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_store_contracts_and_truncates() {
        let table = LineTable::from_bytes(b"a\tb\nc", 4);
        assert_eq!(table[0].get(4), Some(Cell::Byte(b'b')));

        let mut target = Cursor::new(b"previous much longer contents".to_vec());
        let written = table.write_to(&mut target).unwrap();
        assert_eq!(written, 5);
        assert_eq!(target.into_inner(), b"a\tb\nc");

        // Still expanded after the store.
        assert_eq!(table[0].get(4), Some(Cell::Byte(b'b')));
    }

    #[test]
    fn test_store_to_file() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"stale stale stale stale").unwrap();

        let table = LineTable::from_bytes(b"x\ty\n", 8);
        let written = table.write_to(&mut file).unwrap();
        assert_eq!(written, 4);

        file.seek(SeekFrom::Start(0)).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"x\ty\n");
    }

    #[test]
    fn test_row_operations() {
        let mut table = LineTable::new();
        assert_eq!(table.len(), 1);
        table.append(Line::from_bytes(b"b", 8));
        table.insert(1, Line::from_bytes(b"a\n", 8));
        assert_eq!(table.len(), 3);
        assert_eq!(table[1].to_bytes(), b"a\n");

        let removed = table.delete(0);
        assert!(removed.is_empty());
        assert_eq!(table.last_row(), 1);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_fork_is_deep() {
        let table = LineTable::from_bytes(b"abc\ndef", 8);
        let mut copy = table.fork();
        copy[0].insert_byte(0, b'z', 8);
        assert_eq!(table[0].to_bytes(), b"abc\n");
        assert_eq!(copy[0].to_bytes(), b"zabc\n");
    }
}
