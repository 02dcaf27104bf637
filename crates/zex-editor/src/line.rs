//! Line — one row of text and its tab-expanded render form.
//!
//! The logical content lives in a [`GapBuffer`]. The render form is what the
//! painter draws and what motions scan: the same bytes with every tab
//! expanded to spaces up to the next multiple of [`TAB_STOP`].
//!
//! Every mutating method recomputes the render form before returning, so a
//! `Line` never exposes a stale render.

use crate::gap_buffer::GapBuffer;

/// Columns between tab stops.
pub const TAB_STOP: usize = 4;

/// One row of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    buffer: GapBuffer,
    render: Vec<u8>,
}

impl Line {
    /// An empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: GapBuffer::new(),
            render: Vec::new(),
        }
    }

    /// A line seeded with `text`. Trailing `\n` / `\r` are dropped.
    #[must_use]
    pub fn from_bytes(text: &[u8]) -> Self {
        let mut line = Self {
            buffer: GapBuffer::from_bytes(text),
            render: Vec::new(),
        };
        line.render_update();
        line
    }

    // -- Accessors ----------------------------------------------------------

    /// Logical length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The logical content, gap removed.
    #[must_use]
    pub fn content(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// The byte at logical column `col`.
    #[must_use]
    pub fn byte_at(&self, col: usize) -> Option<u8> {
        self.buffer.byte_at(col)
    }

    /// The underlying gap buffer.
    #[must_use]
    pub const fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    /// Tab-expanded bytes for display and motion scanning.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    // -- Render -------------------------------------------------------------

    /// Rebuild the render form from the logical content.
    pub fn render_update(&mut self) {
        let (head, tail) = self.buffer.as_slices();
        let mut render = Vec::with_capacity(head.len() + tail.len());
        for &b in head.iter().chain(tail) {
            if b == b'\t' {
                render.push(b' ');
                while render.len() % TAB_STOP != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(b);
            }
        }
        self.render = render;
    }

    /// Render column of logical column `col`.
    ///
    /// Columns past the end map to the render length.
    #[must_use]
    pub fn col_to_render_col(&self, col: usize) -> usize {
        let mut rx = 0;
        for b in (0..col.min(self.len())).filter_map(|i| self.buffer.byte_at(i)) {
            if b == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Logical column whose render span covers render column `rx`.
    ///
    /// A render column inside a tab's expansion maps to the tab. Columns past
    /// the end map to the logical length.
    #[must_use]
    pub fn render_col_to_col(&self, rx: usize) -> usize {
        let mut cur = 0;
        for col in 0..self.len() {
            if self.buffer.byte_at(col) == Some(b'\t') {
                cur += (TAB_STOP - 1) - (cur % TAB_STOP);
            }
            cur += 1;
            if cur > rx {
                return col;
            }
        }
        self.len()
    }

    /// Logical column of the first non-blank byte, or the length if the
    /// line is all blanks.
    #[must_use]
    pub fn first_non_blank(&self) -> usize {
        (0..self.len())
            .find(|&i| !matches!(self.buffer.byte_at(i), Some(b' ' | b'\t')))
            .unwrap_or_else(|| self.len())
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `byte` at `col`, clamped to `[0, len]`.
    pub fn insert_byte(&mut self, col: usize, byte: u8) {
        self.buffer.move_to(col);
        self.buffer.insert(byte);
        self.render_update();
    }

    /// Insert `bytes` at `col`, clamped to `[0, len]`.
    pub fn insert_bytes(&mut self, col: usize, bytes: &[u8]) {
        self.buffer.move_to(col);
        self.buffer.insert_string(bytes);
        self.render_update();
    }

    /// Append `bytes` at the end.
    pub fn append(&mut self, bytes: &[u8]) {
        self.insert_bytes(self.len(), bytes);
    }

    /// Delete the byte at `col`. Returns `None` when `col >= len`.
    pub fn delete_byte(&mut self, col: usize) -> Option<u8> {
        if col >= self.len() {
            return None;
        }
        self.buffer.move_to(col);
        let removed = self.buffer.delete();
        self.render_update();
        removed
    }

    /// Overwrite the byte at `col` through the buffer, returning the old one.
    pub fn replace_byte(&mut self, col: usize, byte: u8) -> Option<u8> {
        if col >= self.len() {
            return None;
        }
        self.buffer.move_to(col);
        let old = self.buffer.delete();
        self.buffer.insert(byte);
        self.render_update();
        old
    }

    /// Remove and return everything from `col` to the end.
    pub fn split_off(&mut self, col: usize) -> Vec<u8> {
        self.buffer.move_to(col);
        let tail = self.buffer.truncate_tail();
        self.render_update();
        tail
    }

    /// Remove `[start, end)` and return it. The range is clamped.
    pub fn drain(&mut self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.len());
        let start = start.min(end);
        self.buffer.move_to(start);
        let mut removed = Vec::with_capacity(end - start);
        for _ in start..end {
            if let Some(b) = self.buffer.delete() {
                removed.push(b);
            }
        }
        self.render_update();
        removed
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
