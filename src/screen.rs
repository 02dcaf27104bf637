// SPDX-License-Identifier: MIT
//
// Screen — paints an EditorSession as escape sequences.
//
// The layout is fixed:
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← 1 row
//   ├──────────────────────────────┤
//   │ command / message line       │  ← 1 row
//   └──────────────────────────────┘
//
// Text rows show the render form of each document row, shifted by the
// column offset and cut at the screen width. Rows past the end of the
// document show `~`. An untouched unnamed session shows the welcome banner
// a third of the way down.
//
// The screen owns only the scroll offsets. Everything else is read from the
// session on each paint.

use std::io;

use zex_editor::mode::Mode;
use zex_editor::EditorSession;
use zex_term::ansi;
use zex_term::terminal::Size;

/// Shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest file name shown in the status bar.
const NAME_WIDTH: usize = 20;

// ─── Screen ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    /// Text rows, excluding the status bar and message line.
    rows: usize,
    cols: usize,
    row_offset: usize,
    col_offset: usize,
}

impl Screen {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let mut screen = Self {
            rows: 0,
            cols: 0,
            row_offset: 0,
            col_offset: 0,
        };
        screen.resize(size);
        screen
    }

    /// Adopt a new terminal size. Offsets are fixed up on the next scroll.
    pub fn resize(&mut self, size: Size) {
        self.rows = usize::from(size.rows).saturating_sub(2);
        self.cols = usize::from(size.cols);
    }

    /// Rows available for text.
    #[inline]
    #[must_use]
    pub const fn text_rows(&self) -> usize {
        self.rows
    }

    /// `(row_offset, col_offset)`.
    #[inline]
    #[must_use]
    pub const fn offsets(&self) -> (usize, usize) {
        (self.row_offset, self.col_offset)
    }

    /// Move the offsets so the cell at row `cy`, render column `rx` is on
    /// screen.
    pub const fn scroll(&mut self, cy: usize, rx: usize) {
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if self.cols > 0 && rx >= self.col_offset + self.cols {
            self.col_offset = rx + 1 - self.cols;
        }
        if cy < self.row_offset {
            self.row_offset = cy;
        }
        if self.rows > 0 && cy >= self.row_offset + self.rows {
            self.row_offset = cy + 1 - self.rows;
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────────

    /// Append a full frame for `session` to `out`. The cursor is expected at
    /// home.
    ///
    /// # Errors
    ///
    /// Only fails if writing to `out` fails.
    pub fn paint(&self, session: &EditorSession, out: &mut Vec<u8>) -> io::Result<()> {
        self.draw_rows(session, out)?;
        self.draw_status_bar(session, out)?;
        self.draw_message_line(session, out)
    }

    fn draw_rows(&self, session: &EditorSession, out: &mut Vec<u8>) -> io::Result<()> {
        let doc = session.document();
        let pristine = session.is_pristine();
        let welcome_row = self.rows / 3;

        for idx in 0..self.rows {
            let filerow = idx + self.row_offset;
            match doc.line(filerow).filter(|_| !pristine) {
                Some(line) => {
                    let render = line.render();
                    let start = self.col_offset.min(render.len());
                    let end = (start + self.cols).min(render.len());
                    out.extend(render[start..end].iter().map(|&b| printable(b)));
                }
                None if pristine && idx == welcome_row => {
                    self.draw_welcome(out, &format!("ZEX editor v{VERSION}"));
                }
                None if pristine && idx == welcome_row + 2 => {
                    self.draw_welcome(out, "ZEX is open source and freely distributable");
                }
                None => out.push(b'~'),
            }
            ansi::clear_to_eol(out)?;
            out.extend_from_slice(b"\r\n");
        }
        Ok(())
    }

    fn draw_welcome(&self, out: &mut Vec<u8>, text: &str) {
        let text = &text.as_bytes()[..text.len().min(self.cols)];
        let mut padding = (self.cols - text.len()) / 2;
        if padding > 0 {
            out.push(b'~');
            padding -= 1;
        }
        out.resize(out.len() + padding, b' ');
        out.extend_from_slice(text);
    }

    fn draw_status_bar(&self, session: &EditorSession, out: &mut Vec<u8>) -> io::Result<()> {
        let doc = session.document();
        let cursor = session.cursor();

        let name: String = session
            .filename()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string())
            .chars()
            .take(NAME_WIDTH)
            .collect();
        let status = format!(
            " {} - {} - {} lines {}",
            session.mode().display_name(),
            name,
            doc.line_count(),
            if doc.is_dirty() { "(modified)" } else { "" }
        );
        let rstatus = format!("{}:{}", cursor.cy + 1, cursor.cx + 1);

        ansi::inverse(out)?;
        let mut len = status.len().min(self.cols);
        out.extend_from_slice(&status.as_bytes()[..len]);
        while len < self.cols {
            if self.cols - len == rstatus.len() {
                out.extend_from_slice(rstatus.as_bytes());
                break;
            }
            out.push(b' ');
            len += 1;
        }
        ansi::reset(out)?;
        out.extend_from_slice(b"\r\n");
        Ok(())
    }

    fn draw_message_line(&self, session: &EditorSession, out: &mut Vec<u8>) -> io::Result<()> {
        ansi::clear_to_eol(out)?;

        let mut used = 0;
        if session.mode() == Mode::Command {
            let input = session.command_input();
            let take = input.len().min(self.cols.saturating_sub(1));
            if self.cols > 0 {
                out.push(b':');
                out.extend(input[..take].iter().map(|&b| printable(b)));
                used = take + 1;
            }
        } else if let Some(msg) = session.status_message() {
            let msg = &msg.as_bytes()[..msg.len().min(self.cols)];
            out.extend_from_slice(msg);
            used = msg.len();
        }

        // Keys typed toward a pending command, right-aligned.
        if let Some(keys) = session.mode().pending_keys() {
            if used + keys.len() < self.cols {
                out.resize(out.len() + (self.cols - used - keys.len()), b' ');
                out.extend_from_slice(keys.as_bytes());
            }
        }
        Ok(())
    }

    /// Screen position of the terminal cursor.
    #[must_use]
    pub fn cursor(&self, session: &EditorSession) -> (u16, u16) {
        if session.mode() == Mode::Command {
            let x = (session.command_input().len() + 1).min(self.cols.saturating_sub(1));
            return (to_u16(x), to_u16(self.rows + 1));
        }
        let cy = session.cursor().cy;
        (
            to_u16(session.rx().saturating_sub(self.col_offset)),
            to_u16(cy.saturating_sub(self.row_offset)),
        )
    }
}

/// Control bytes would move the terminal cursor; show them as `?`.
const fn printable(b: u8) -> u8 {
    if b < 0x20 || b == 0x7F { b'?' } else { b }
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
