//! Register — storage for yanked and deleted text.
//!
//! Every yank (`y`) and delete (`d`, `c`, `x`, `dd`) copies text into the
//! unnamed register. Put (`p`, `P`) reads it back.
//!
//! The [`Yank`] variant records how the text was captured, because put
//! behaves differently for each:
//!
//! - **Charwise**: `p` inserts after the cursor, `P` before it.
//! - **Linewise**: `p` opens the rows below the cursor row, `P` above.

/// What a register holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Yank {
    /// Bytes from within one row.
    Chars(Vec<u8>),
    /// Whole rows, without line endings.
    Lines(Vec<Vec<u8>>),
}

/// The unnamed register.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    content: Option<Yank>,
}

impl Register {
    /// An empty register.
    #[must_use]
    pub const fn new() -> Self {
        Self { content: None }
    }

    /// Store a charwise run, replacing previous content. An empty run is
    /// ignored so a no-op delete does not clobber the register.
    pub fn yank_chars(&mut self, bytes: Vec<u8>) {
        if !bytes.is_empty() {
            self.content = Some(Yank::Chars(bytes));
        }
    }

    /// Store whole rows, replacing previous content.
    pub fn yank_lines(&mut self, rows: Vec<Vec<u8>>) {
        if !rows.is_empty() {
            self.content = Some(Yank::Lines(rows));
        }
    }

    /// The stored text, if anything has been yanked.
    #[must_use]
    pub const fn content(&self) -> Option<&Yank> {
        self.content.as_ref()
    }

    /// True if there is nothing to put.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
