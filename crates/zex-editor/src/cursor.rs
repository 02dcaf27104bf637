//! Cursor — a `(cx, cy)` position with clamped movement primitives.
//!
//! `cx` is a logical byte column, `cy` a row index. The render column `rx`
//! is never stored; it is derived from `cx` through the row's tab layout
//! whenever the painter or a motion needs it.
//!
//! # Mode-agnostic design
//!
//! Movement methods take a `past_end: bool` parameter rather than a mode:
//!
//! - **Normal**: `past_end = false`, the cursor sits ON a byte
//! - **Insert / Replace**: `past_end = true`, the cursor may sit after the
//!   last byte
//!
//! The caller decides the limit. The cursor just moves within it.

use crate::document::Document;

/// A position in a [`Document`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Logical byte column.
    pub cx: usize,
    /// Row index.
    pub cy: usize,
}

impl Cursor {
    /// The origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { cx: 0, cy: 0 }
    }

    /// A cursor at `(cx, cy)`. Not clamped.
    #[must_use]
    pub const fn at(cx: usize, cy: usize) -> Self {
        Self { cx, cy }
    }

    /// Render column of the cursor in its row.
    #[must_use]
    pub fn rx(&self, doc: &Document) -> usize {
        doc.convert_col_to_render_col(self.cy, self.cx)
    }

    // -- Limits -------------------------------------------------------------

    /// Largest legal column on `row`.
    #[must_use]
    pub fn max_col(doc: &Document, row: usize, past_end: bool) -> usize {
        let len = doc.row_len(row);
        if past_end { len } else { len.saturating_sub(1) }
    }

    /// Pull the cursor back inside the document.
    pub fn clamp(&mut self, doc: &Document, past_end: bool) {
        self.cy = self.cy.min(doc.line_count().saturating_sub(1));
        self.cx = self.cx.min(Self::max_col(doc, self.cy, past_end));
    }

    // -- Horizontal ---------------------------------------------------------

    /// One column left. Stops at column 0.
    pub const fn move_left(&mut self) {
        self.cx = self.cx.saturating_sub(1);
    }

    /// One column right. Stops at the mode's last legal column.
    pub fn move_right(&mut self, doc: &Document, past_end: bool) {
        if self.cx < Self::max_col(doc, self.cy, past_end) {
            self.cx += 1;
        }
    }

    /// `0` / Home.
    pub const fn line_start(&mut self) {
        self.cx = 0;
    }

    /// `$` / End.
    pub fn line_end(&mut self, doc: &Document, past_end: bool) {
        self.cx = Self::max_col(doc, self.cy, past_end);
    }

    /// `^` — first non-blank byte of the row.
    pub fn first_non_blank(&mut self, doc: &Document, past_end: bool) {
        let col = doc.line(self.cy).map_or(0, crate::line::Line::first_non_blank);
        self.cx = col.min(Self::max_col(doc, self.cy, past_end));
    }

    // -- Vertical -----------------------------------------------------------

    /// One row up, clamping the column to the new row.
    pub fn move_up(&mut self, doc: &Document, past_end: bool) {
        self.cy = self.cy.saturating_sub(1);
        self.clamp(doc, past_end);
    }

    /// One row down, clamping the column to the new row.
    pub fn move_down(&mut self, doc: &Document, past_end: bool) {
        if self.cy + 1 < doc.line_count() {
            self.cy += 1;
        }
        self.clamp(doc, past_end);
    }

    /// Up by `rows` rows.
    pub fn page_up(&mut self, doc: &Document, rows: usize, past_end: bool) {
        self.cy = self.cy.saturating_sub(rows.max(1));
        self.clamp(doc, past_end);
    }

    /// Down by `rows` rows, stopping on the last row.
    pub fn page_down(&mut self, doc: &Document, rows: usize, past_end: bool) {
        self.cy = self.cy.saturating_add(rows.max(1));
        self.clamp(doc, past_end);
    }

    /// Jump to 0-indexed `row` (clamped), landing on its first non-blank.
    pub fn goto_line(&mut self, doc: &Document, row: usize, past_end: bool) {
        self.cy = row.min(doc.line_count().saturating_sub(1));
        self.first_non_blank(doc, past_end);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes()))
    }

    // -- Horizontal movement ------------------------------------------------

    #[test]
    fn left_stops_at_zero() {
        let mut c = Cursor::at(1, 0);
        c.move_left();
        c.move_left();
        assert_eq!(c, Cursor::at(0, 0));
    }

    #[test]
    fn right_respects_past_end() {
        let d = doc(&["ab"]);
        let mut c = Cursor::at(1, 0);
        c.move_right(&d, false);
        assert_eq!(c.cx, 1);
        c.move_right(&d, true);
        assert_eq!(c.cx, 2);
        c.move_right(&d, true);
        assert_eq!(c.cx, 2);
    }

    #[test]
    fn line_end_depends_on_mode() {
        let d = doc(&["hello"]);
        let mut c = Cursor::new();
        c.line_end(&d, false);
        assert_eq!(c.cx, 4);
        c.line_end(&d, true);
        assert_eq!(c.cx, 5);
        c.line_start();
        assert_eq!(c.cx, 0);
    }

    #[test]
    fn first_non_blank_on_indented_row() {
        let d = doc(&["\t  x"]);
        let mut c = Cursor::new();
        c.first_non_blank(&d, false);
        assert_eq!(c.cx, 3);
    }

    // -- Vertical movement --------------------------------------------------

    #[test]
    fn vertical_moves_clamp_column() {
        let d = doc(&["a long line", "ab", ""]);
        let mut c = Cursor::at(8, 0);
        c.move_down(&d, false);
        assert_eq!(c, Cursor::at(1, 1));
        c.move_down(&d, false);
        assert_eq!(c, Cursor::at(0, 2));
        c.move_down(&d, false);
        assert_eq!(c, Cursor::at(0, 2));
        c.move_up(&d, true);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn up_from_first_row_stays() {
        let d = doc(&["abc"]);
        let mut c = Cursor::at(2, 0);
        c.move_up(&d, false);
        assert_eq!(c, Cursor::at(2, 0));
    }

    #[test]
    fn paging_clamps_to_document() {
        let lines: Vec<String> = (0..50).map(|i| format!("line {i}")).collect();
        let d = Document::from_lines(lines.iter().map(String::as_bytes));
        let mut c = Cursor::new();
        c.page_down(&d, 20, false);
        assert_eq!(c.cy, 20);
        c.page_down(&d, 40, false);
        assert_eq!(c.cy, 49);
        c.page_up(&d, 100, false);
        assert_eq!(c.cy, 0);
    }

    #[test]
    fn goto_line_lands_on_first_non_blank() {
        let d = doc(&["a", "  b", "c"]);
        let mut c = Cursor::new();
        c.goto_line(&d, 1, false);
        assert_eq!(c, Cursor::at(2, 1));
        c.goto_line(&d, 99, false);
        assert_eq!(c, Cursor::at(0, 2));
    }

    // -- Render column ------------------------------------------------------

    #[test]
    fn rx_follows_tabs() {
        let d = doc(&["\tab"]);
        assert_eq!(Cursor::at(1, 0).rx(&d), 4);
        assert_eq!(Cursor::at(2, 0).rx(&d), 5);
    }

    #[test]
    fn clamp_pulls_cursor_inside() {
        let d = doc(&["abc", "de"]);
        let mut c = Cursor::at(9, 9);
        c.clamp(&d, false);
        assert_eq!(c, Cursor::at(1, 1));
    }
}
