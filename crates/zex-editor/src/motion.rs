//! Motions — where a command key moves the cursor.
//!
//! | Motion | Key | Description |
//! |--------|-----|-------------|
//! | [`word_forward`] | `w` / `W` | Start of the next word / WORD |
//! | [`word_forward_in_row`] | `dw` `yw` | Same, but never leaves the row |
//! | [`word_end`] | `e` / `E` | End of the current or next word / WORD |
//! | [`find_char`] | `f` `t` `F` `T` | Find a byte on the current row |
//!
//! Word motions scan the row's render form, so a tab counts as the blanks it
//! is drawn as. The landing render column is mapped back to a logical column
//! before it is returned.
//!
//! # Words vs WORDs
//!
//! A **word** is a run of alphanumeric bytes or a run of punctuation bytes.
//! A **WORD** is a run of non-blank bytes. `foo.bar` is three words and one
//! WORD. Classification is plain ASCII: `_`, control bytes and anything with
//! the high bit set count as punctuation, so every motion makes progress.

use crate::cursor::Cursor;
use crate::document::Document;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Byte class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// ASCII letters and digits.
    Alnum,
    /// Every other non-blank byte.
    Punct,
    /// Space and tab.
    Blank,
}

/// Classify a byte for word motions.
#[must_use]
pub const fn classify(b: u8) -> CharClass {
    if b == b' ' || b == b'\t' {
        CharClass::Blank
    } else if b.is_ascii_alphanumeric() {
        CharClass::Alnum
    } else {
        CharClass::Punct
    }
}

/// Classify for WORD motions: only blank vs non-blank matters.
const fn classify_big(b: u8) -> CharClass {
    match classify(b) {
        CharClass::Blank => CharClass::Blank,
        _ => CharClass::Alnum,
    }
}

const fn class_fn(extended: bool) -> fn(u8) -> CharClass {
    if extended { classify_big } else { classify }
}

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// Which of `f`, `t`, `F`, `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindKind {
    /// `f` — forward onto the match.
    Forward,
    /// `t` — forward, one short of the match.
    TillForward,
    /// `F` — backward onto the match.
    Backward,
    /// `T` — backward, one short of the match.
    TillBackward,
}

impl FindKind {
    /// The key that starts this find.
    #[must_use]
    pub const fn key(self) -> u8 {
        match self {
            Self::Forward => b'f',
            Self::TillForward => b't',
            Self::Backward => b'F',
            Self::TillBackward => b'T',
        }
    }

    /// `f` and `t` land on or before the target, so an operator includes the
    /// landing byte.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Forward | Self::TillForward)
    }
}

/// A cursor motion, independent of how many times it repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    /// `0` / Home.
    LineStart,
    /// `$` / End.
    LineEnd,
    /// `^`.
    FirstNonBlank,
    /// `gg`.
    FirstLine,
    /// `G`.
    LastLine,
    /// `:N`, `NG`, `Ngg` — 1-indexed.
    GotoLine(usize),
    PageUp,
    PageDown,
    /// `w` / `W`.
    WordForward { extended: bool },
    /// `e` / `E`.
    WordEnd { extended: bool },
    /// `f` `t` `F` `T`.
    FindChar { target: u8, kind: FindKind },
}

impl Motion {
    /// True if an operator over this motion includes the landing byte.
    #[must_use]
    pub const fn is_inclusive(self) -> bool {
        match self {
            Self::WordEnd { .. } | Self::LineEnd => true,
            Self::FindChar { kind, .. } => kind.is_forward(),
            _ => false,
        }
    }

    /// True if the motion moves between rows rather than within one.
    #[must_use]
    pub const fn is_linewise(self) -> bool {
        matches!(
            self,
            Self::Up
                | Self::Down
                | Self::FirstLine
                | Self::LastLine
                | Self::GotoLine(_)
                | Self::PageUp
                | Self::PageDown
        )
    }
}

/// Where `motion` takes `cur`. Motions that cannot move return `cur`.
///
/// `page_rows` is the number of text rows on screen, used by PageUp and
/// PageDown.
#[must_use]
pub fn apply(
    doc: &Document,
    cur: Cursor,
    motion: Motion,
    past_end: bool,
    page_rows: usize,
) -> Cursor {
    let mut next = cur;
    match motion {
        Motion::Left => next.move_left(),
        Motion::Right => next.move_right(doc, past_end),
        Motion::Up => next.move_up(doc, past_end),
        Motion::Down => next.move_down(doc, past_end),
        Motion::LineStart => next.line_start(),
        Motion::LineEnd => next.line_end(doc, past_end),
        Motion::FirstNonBlank => next.first_non_blank(doc, past_end),
        Motion::FirstLine => next.goto_line(doc, 0, past_end),
        Motion::LastLine => next.goto_line(doc, usize::MAX, past_end),
        Motion::GotoLine(n) => next.goto_line(doc, n.saturating_sub(1), past_end),
        Motion::PageUp => next.page_up(doc, page_rows, past_end),
        Motion::PageDown => next.page_down(doc, page_rows, past_end),
        Motion::WordForward { extended } => next = word_forward(doc, cur, extended),
        Motion::WordEnd { extended } => next = word_end(doc, cur, extended),
        Motion::FindChar { target, kind } => {
            next = find_char(doc, cur, target, kind).unwrap_or(cur);
        }
    }
    next
}

// ---------------------------------------------------------------------------
// Word motions
// ---------------------------------------------------------------------------

/// `w` / `W` — start of the next word on this row, or the first non-blank of
/// the next row when this row runs out. On the last row the cursor stops on
/// the last byte instead.
#[must_use]
pub fn word_forward(doc: &Document, cur: Cursor, extended: bool) -> Cursor {
    let Some(line) = doc.line(cur.cy) else {
        return cur;
    };
    let r = next_word_start(line.render(), cur.rx(doc), class_fn(extended));
    if r < line.render_len() {
        return Cursor::at(line.render_col_to_col(r), cur.cy);
    }

    if cur.cy + 1 >= doc.line_count() {
        return Cursor::at(line.len().saturating_sub(1), cur.cy);
    }

    let row = cur.cy + 1;
    let mut next = Cursor::at(0, row);
    next.first_non_blank(doc, false);
    next
}

/// Where `w` / `W` stops without leaving the cursor's row: the start of
/// the next word, or the row length when no word follows. Operators use
/// this so `dw` on the last word takes the rest of the row.
#[must_use]
pub fn word_forward_in_row(doc: &Document, cur: Cursor, extended: bool) -> usize {
    let Some(line) = doc.line(cur.cy) else {
        return cur.cx;
    };
    let r = next_word_start(line.render(), cur.rx(doc), class_fn(extended));
    if r < line.render_len() { line.render_col_to_col(r) } else { line.len() }
}

/// Skip the run under `r`, then any blanks.
fn next_word_start(render: &[u8], mut r: usize, class: fn(u8) -> CharClass) -> usize {
    let len = render.len();
    if r < len {
        let start = class(render[r]);
        if start != CharClass::Blank {
            while r < len && class(render[r]) == start {
                r += 1;
            }
        }
        while r < len && class(render[r]) == CharClass::Blank {
            r += 1;
        }
    }
    r
}

/// `e` / `E` — last byte of the current word if the cursor is inside one,
/// otherwise of the next word. Blank and empty rows are skipped. If no word
/// follows, the cursor stays put.
#[must_use]
pub fn word_end(doc: &Document, cur: Cursor, extended: bool) -> Cursor {
    let class = class_fn(extended);
    let mut row = cur.cy;
    let mut r = cur.rx(doc) + 1;

    while let Some(line) = doc.line(row) {
        let render = line.render();
        while r < render.len() && class(render[r]) == CharClass::Blank {
            r += 1;
        }
        if r < render.len() {
            let word = class(render[r]);
            while r + 1 < render.len() && class(render[r + 1]) == word {
                r += 1;
            }
            return Cursor::at(line.render_col_to_col(r), row);
        }
        row += 1;
        r = 0;
    }

    cur
}

// ---------------------------------------------------------------------------
// Character find
// ---------------------------------------------------------------------------

/// Find `target` on the cursor's row. `None` when there is no match, in
/// which case the caller leaves the cursor alone.
///
/// The render form is scanned, except for a tab target: tabs only exist in
/// the logical bytes, so `f<Tab>` scans those instead.
#[must_use]
pub fn find_char(doc: &Document, cur: Cursor, target: u8, kind: FindKind) -> Option<Cursor> {
    let line = doc.line(cur.cy)?;
    if target == b'\t' {
        let col = scan(&line.content(), cur.cx, target, kind)?;
        return Some(Cursor::at(col, cur.cy));
    }
    let landing = scan(line.render(), cur.rx(doc), target, kind)?;
    Some(Cursor::at(line.render_col_to_col(landing), cur.cy))
}

/// Landing index of a find for `target` in `hay`, starting from `from`.
fn scan(hay: &[u8], from: usize, target: u8, kind: FindKind) -> Option<usize> {
    match kind {
        FindKind::Forward | FindKind::TillForward => {
            let hit = (from + 1..hay.len()).find(|&i| hay[i] == target)?;
            Some(if kind == FindKind::Forward { hit } else { hit - 1 })
        }
        FindKind::Backward | FindKind::TillBackward => {
            let hit = (0..from.min(hay.len())).rev().find(|&i| hay[i] == target)?;
            Some(if kind == FindKind::Backward { hit } else { hit + 1 })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
