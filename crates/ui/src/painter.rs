//! Painter
//!
//! Draws the active buffer and the status line with crossterm commands.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Colors, Print, ResetColor, SetColors};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use tedit_editor::EditorState;

use crate::theme::Theme;

/// Fit `text` to exactly `width` columns
fn fit(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat(' ').take(width - len));
    fitted
}

/// Paints editor frames onto a terminal
pub struct Painter<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    /// Repaint the whole screen from the editor state
    pub fn paint(&mut self, state: &EditorState) -> io::Result<()> {
        let frame = state.frame();
        let screen = state.active().view().screen();
        let text_colors = Colors::new(self.theme.text.into(), self.theme.background.into());

        let status_row = screen.rows.saturating_sub(1);

        queue!(self.out, Hide, SetColors(text_colors))?;

        // Overwrite in place and clear only the rest of each row
        let mut rows = frame.rows.iter().peekable();
        for screen_row in 0..status_row {
            queue!(self.out, MoveTo(0, screen_row))?;
            if let Some(row) = rows.next_if(|row| row.screen_row == screen_row) {
                queue!(
                    self.out,
                    MoveTo(row.screen_col, row.screen_row),
                    Print(&row.text)
                )?;
            }
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
        }

        self.paint_status(state, status_row, usize::from(screen.cols))?;

        let (cursor_row, cursor_col) = frame.cursor;
        queue!(self.out, MoveTo(cursor_col, cursor_row), Show)?;
        self.out.flush()
    }

    fn paint_status(&mut self, state: &EditorState, row: u16, width: usize) -> io::Result<()> {
        let fg = if state.active().is_dirty() {
            self.theme.modified
        } else {
            self.theme.status_text
        };
        queue!(
            self.out,
            MoveTo(0, row),
            SetColors(Colors::new(fg.into(), self.theme.status_background.into())),
            Print(fit(&state.status_line(), width)),
            ResetColor
        )
    }

    /// Get the underlying writer back
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tedit_core::ViewConfig;
    use tedit_editor::{Command, ScreenSize};

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 3), "abc");
        assert_eq!(fit("", 0), "");
    }

    #[test]
    fn test_paint_writes_text_and_status() {
        let mut state = EditorState::new(4, ViewConfig::default(), ScreenSize::new(5, 30));
        for &b in b"hi\tthere" {
            state.execute(Command::InsertByte(b));
        }

        let mut painter = Painter::new(Vec::new(), Theme::default());
        painter.paint(&state).unwrap();
        let output = String::from_utf8_lossy(&painter.into_inner()).into_owned();

        assert!(output.contains("hi  there"));
        assert!(output.contains("[No Name] [+] 1:10"));
    }

    #[test]
    fn test_paint_clears_rows_not_screen() {
        let mut state = EditorState::new(4, ViewConfig::default(), ScreenSize::new(5, 30));
        state.execute(Command::InsertByte(b'a'));
        state.execute(Command::InsertNewline);
        state.execute(Command::InsertByte(b'b'));

        let mut painter = Painter::new(Vec::new(), Theme::default());
        painter.paint(&state).unwrap();
        let output = String::from_utf8_lossy(&painter.into_inner()).into_owned();

        assert!(!output.contains("\x1b[2J"));
        // One clear per text row, including rows past the last line
        assert_eq!(output.matches("\x1b[K").count(), 4);
        assert!(output.find("a").unwrap() < output.find("b").unwrap());
    }
}
