//! Document — the ordered rows of a file plus a modification counter.
//!
//! Row operations validate or clamp every index and return whether anything
//! happened. An invalid index is a silent no-op; nothing here panics on user
//! input.
//!
//! `dirty` counts modifications since the last load or save. It only ever
//! goes up, except for [`mark_saved`](Document::mark_saved).

use crate::line::Line;

/// The text being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
    dirty: u64,
}

impl Document {
    /// A document with one empty row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            dirty: 0,
        }
    }

    /// A document with no rows at all.
    ///
    /// Only loaders start here; an editing session always holds at least
    /// one row.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            dirty: 0,
        }
    }

    /// Build a clean document from `lines`. An empty iterator yields one
    /// empty row.
    pub fn from_lines<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut doc = Self::empty();
        for text in lines {
            doc.insert_row(doc.line_count(), text.as_ref());
        }
        if doc.lines.is_empty() {
            doc.lines.push(Line::new());
        }
        doc.dirty = 0;
        doc
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Logical length of `row`, or 0 for a missing row.
    #[must_use]
    pub fn row_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, Line::len)
    }

    /// Modifications since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> u64 {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Reset the modification counter after a successful save.
    pub const fn mark_saved(&mut self) {
        self.dirty = 0;
    }

    /// Every row's logical content followed by `\n`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let total: usize = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = Vec::with_capacity(total);
        for line in &self.lines {
            let (head, tail) = line.buffer().as_slices();
            out.extend_from_slice(head);
            out.extend_from_slice(tail);
            out.push(b'\n');
        }
        out
    }

    // -- Rows ---------------------------------------------------------------

    /// Insert a new row at `at` seeded with `text`. `at` may equal the line
    /// count (append).
    pub fn insert_row(&mut self, at: usize, text: &[u8]) -> bool {
        if at > self.lines.len() {
            return false;
        }
        self.lines.insert(at, Line::from_bytes(text));
        self.dirty += 1;
        true
    }

    /// Remove row `at` and return it.
    pub fn delete_row(&mut self, at: usize) -> Option<Line> {
        if at >= self.lines.len() {
            return None;
        }
        self.dirty += 1;
        Some(self.lines.remove(at))
    }

    // -- Bytes within a row -------------------------------------------------

    /// Insert `byte` into `row` at `at`, clamped to the row length.
    pub fn row_insert_char(&mut self, row: usize, at: usize, byte: u8) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        line.insert_byte(at, byte);
        self.dirty += 1;
        true
    }

    /// Insert `bytes` into `row` at `at`, clamped to the row length.
    pub fn row_insert_str(&mut self, row: usize, at: usize, bytes: &[u8]) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        line.insert_bytes(at, bytes);
        self.dirty += 1;
        true
    }

    /// Append `bytes` to the end of `row`.
    pub fn row_append_str(&mut self, row: usize, bytes: &[u8]) -> bool {
        let Some(line) = self.lines.get_mut(row) else {
            return false;
        };
        line.append(bytes);
        self.dirty += 1;
        true
    }

    /// Delete the byte at `at` in `row`.
    pub fn row_delete_char(&mut self, row: usize, at: usize) -> Option<u8> {
        let removed = self.lines.get_mut(row)?.delete_byte(at)?;
        self.dirty += 1;
        Some(removed)
    }

    /// Overwrite the byte at `at` in `row`, returning the old byte.
    pub fn row_replace_char(&mut self, row: usize, at: usize, byte: u8) -> Option<u8> {
        let old = self.lines.get_mut(row)?.replace_byte(at, byte)?;
        self.dirty += 1;
        Some(old)
    }

    /// Cut `row` at `at` and return the bytes that were after it.
    pub fn row_split_off(&mut self, row: usize, at: usize) -> Option<Vec<u8>> {
        let tail = self.lines.get_mut(row)?.split_off(at);
        self.dirty += 1;
        Some(tail)
    }

    /// Remove `[start, end)` from `row` and return it.
    pub fn row_drain(&mut self, row: usize, start: usize, end: usize) -> Option<Vec<u8>> {
        let removed = self.lines.get_mut(row)?.drain(start, end);
        if !removed.is_empty() {
            self.dirty += 1;
        }
        Some(removed)
    }

    // -- Columns ------------------------------------------------------------

    /// Render column of logical column `cx` in `row`.
    #[must_use]
    pub fn convert_col_to_render_col(&self, row: usize, cx: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.col_to_render_col(cx))
    }

    /// Logical column of render column `rx` in `row`.
    #[must_use]
    pub fn convert_render_col_to_col(&self, row: usize, rx: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.render_col_to_col(rx))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
