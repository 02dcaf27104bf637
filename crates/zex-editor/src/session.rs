//! Editor session — one open document and everything needed to edit it.
//!
//! [`EditorSession`] owns the document, cursor, mode, command line, register
//! and status message. [`handle_key`](EditorSession::handle_key) runs one key
//! through the transition table and applies the resulting action. The
//! painter only reads from the session through the accessors at the bottom
//! of the impl.
//!
//! The session keeps two promises to the painter:
//!
//! - the document always has at least one row;
//! - the cursor is clamped to the current mode's limits after every key.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};
use zex_term::input::KeyEvent;

use crate::command::{Command, CommandLine};
use crate::config::EditorConfig;
use crate::cursor::Cursor;
use crate::document::Document;
use crate::edit;
use crate::error::FileResult;
use crate::file;
use crate::line::Line;
use crate::machine::{transition, Action, InsertEntry, Target};
use crate::mode::{Mode, Operator};
use crate::motion::{self, Motion};
use crate::register::{Register, Yank};

/// Largest number of rows a single `p` may open.
const MAX_PUT_ROWS: usize = 1 << 20;

/// Largest number of bytes a single `p` may insert.
const MAX_PUT_BYTES: usize = 64 << 20;

/// Whether the event loop should keep going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A message on the bottom line, shown until it expires.
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    at: Instant,
}

// ---------------------------------------------------------------------------
// EditorSession
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct EditorSession {
    doc: Document,
    cursor: Cursor,
    mode: Mode,
    command_line: CommandLine,
    register: Register,
    status: Option<StatusMessage>,
    filename: Option<PathBuf>,
    config: EditorConfig,
    quit_times: u32,
}

impl EditorSession {
    /// An empty, unnamed session.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), None, config)
    }

    /// A session over an existing document.
    #[must_use]
    pub fn with_document(doc: Document, filename: Option<PathBuf>, config: EditorConfig) -> Self {
        let mut doc = doc;
        if doc.line_count() == 0 {
            doc.insert_row(0, b"");
            doc.mark_saved();
        }
        Self {
            doc,
            cursor: Cursor::new(),
            mode: Mode::Normal,
            command_line: CommandLine::new(),
            register: Register::new(),
            status: None,
            filename,
            quit_times: config.quit_times,
            config,
        }
    }

    /// Load `path` and open a session on it. A missing file gives an empty
    /// document that will be saved under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: &Path, config: EditorConfig) -> FileResult<Self> {
        let doc = file::load(path)?;
        Ok(Self::with_document(doc, Some(path.to_path_buf()), config))
    }

    // -- Key handling -------------------------------------------------------

    /// Run one key through the current mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let (next, action) = transition(&self.mode, key);
        if next != self.mode {
            debug!(from = ?self.mode, to = ?next, "mode");
        }
        self.mode = next;

        if action != Action::Quit {
            self.quit_times = self.config.quit_times;
        }

        let flow = self.apply(action);
        self.cursor.clamp(&self.doc, self.mode.cursor_past_end());
        flow
    }

    fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::None | Action::Cancel => {}
            Action::Motion { motion, count } => self.move_cursor(motion, count),

            Action::EnterInsert(entry) => self.enter_insert(entry),
            Action::ExitInsert => {
                self.cursor.move_left();
                self.clear_status_message();
            }
            Action::InsertChar(b) => edit::insert_char(&mut self.doc, &mut self.cursor, b),
            Action::InsertNewline => edit::insert_newline(&mut self.doc, &mut self.cursor),
            Action::DeleteBackward => edit::delete_char_backward(&mut self.doc, &mut self.cursor),
            Action::DeleteForward => edit::delete_char_forward(&mut self.doc, &mut self.cursor),

            Action::ReplaceChar { byte, count } => self.replace_chars(byte, count),
            Action::BeginReplace => self.set_status_message("-- REPLACE --"),
            Action::ReplaceOverwrite(b) => {
                if edit::replace_char(&mut self.doc, &self.cursor, b) {
                    self.cursor.cx += 1;
                }
            }
            Action::EndReplace => {
                self.cursor.move_left();
                self.clear_status_message();
            }

            Action::DeleteChar { count } => self.delete_chars(count),
            Action::Put { before, count } => self.put(before, count),
            Action::Operator { op, count, target } => match target {
                Target::Line => {
                    let first = self.cursor.cy;
                    self.operate_rows(op, first, first.saturating_add(count.max(1)));
                }
                Target::Motion(m) => self.operate_motion(op, count, m),
            },

            Action::CommandStart | Action::CommandCancel => self.command_line.clear(),
            Action::CommandInsert(b) => self.command_line.insert_char(b),
            Action::CommandBackspace => {
                if !self.command_line.backspace() {
                    self.mode = Mode::Normal;
                }
            }
            Action::CommandExecute => {
                let command = self.command_line.parse();
                self.command_line.clear();
                return self.execute(command);
            }

            Action::Save => {
                if self.filename.is_some() {
                    self.save();
                } else {
                    self.prompt_save_as();
                }
            }
            Action::Quit => return self.confirm_quit(),
        }
        Flow::Continue
    }

    // -- Motions ------------------------------------------------------------

    /// Apply `motion` up to `count` times, stopping early once it no longer
    /// moves.
    fn move_cursor(&mut self, motion: Motion, count: usize) {
        let past_end = self.mode.cursor_past_end();
        for _ in 0..count.max(1) {
            let page_rows = self.config.page_rows;
            let next = motion::apply(&self.doc, self.cursor, motion, past_end, page_rows);
            if next == self.cursor {
                break;
            }
            self.cursor = next;
        }
    }

    /// Where an operator's motion lands. `None` when a find misses.
    fn motion_target(&self, motion: Motion, count: usize) -> Option<Cursor> {
        let mut end = self.cursor;
        for _ in 0..count.max(1) {
            let next = match motion {
                Motion::FindChar { target, kind } => {
                    motion::find_char(&self.doc, end, target, kind)?
                }
                m => motion::apply(&self.doc, end, m, true, self.config.page_rows),
            };
            if next == end {
                break;
            }
            end = next;
        }
        Some(end)
    }

    /// The byte range `[start, stop)` an operator covers on the cursor's
    /// row.
    fn motion_range(&self, motion: Motion, count: usize) -> Option<(usize, usize)> {
        let cur = self.cursor;
        let len = self.doc.row_len(cur.cy);

        if let Motion::WordForward { extended } = motion {
            let mut col = cur.cx;
            for _ in 0..count.max(1) {
                col = motion::word_forward_in_row(&self.doc, Cursor::at(col, cur.cy), extended);
                if col >= len {
                    break;
                }
            }
            return Some((cur.cx.min(len), col.min(len)));
        }

        let end = self.motion_target(motion, count)?;
        let (start, stop) = if end.cy > cur.cy {
            (cur.cx, len)
        } else if end.cy < cur.cy {
            (0, cur.cx)
        } else if end.cx >= cur.cx {
            let stop = if motion.is_inclusive() { end.cx + 1 } else { end.cx };
            (cur.cx, stop)
        } else {
            (end.cx, cur.cx)
        };
        Some((start.min(len), stop.min(len)))
    }

    // -- Insert entry -------------------------------------------------------

    fn enter_insert(&mut self, entry: InsertEntry) {
        let cy = self.cursor.cy;
        match entry {
            InsertEntry::Before => {}
            InsertEntry::After => {
                if self.doc.row_len(cy) > 0 {
                    self.cursor.cx += 1;
                }
            }
            InsertEntry::LineStart => self.cursor.first_non_blank(&self.doc, true),
            InsertEntry::LineEnd => self.cursor.line_end(&self.doc, true),
            InsertEntry::Below => {
                self.doc.insert_row(cy + 1, b"");
                self.cursor = Cursor::at(0, cy + 1);
            }
            InsertEntry::Above => {
                self.doc.insert_row(cy, b"");
                self.cursor = Cursor::at(0, cy);
            }
        }
        self.set_status_message("-- INSERT --");
    }

    // -- Normal-mode edits --------------------------------------------------

    /// `x` — delete up to `count` bytes starting under the cursor.
    fn delete_chars(&mut self, count: usize) {
        let Cursor { cx, cy } = self.cursor;
        let stop = cx.saturating_add(count.max(1)).min(self.doc.row_len(cy));
        if let Some(bytes) = self.doc.row_drain(cy, cx, stop) {
            self.register.yank_chars(bytes);
        }
    }

    /// `r` — overwrite `count` bytes. Does nothing if the row is too short.
    fn replace_chars(&mut self, byte: u8, count: usize) {
        let Cursor { cx, cy } = self.cursor;
        let stop = cx.saturating_add(count.max(1));
        if stop > self.doc.row_len(cy) {
            return;
        }
        for col in cx..stop {
            edit::replace_char(&mut self.doc, &Cursor::at(col, cy), byte);
        }
        self.cursor.cx = stop - 1;
    }

    /// `p` / `P`.
    fn put(&mut self, before: bool, count: usize) {
        let Some(yank) = self.register.content().cloned() else {
            return;
        };
        let count = count.max(1);
        let Cursor { cx, cy } = self.cursor;

        let (rows, bytes) = match &yank {
            Yank::Chars(bytes) => (0, bytes.len()),
            Yank::Lines(rows) => (rows.len(), rows.iter().map(|r| r.len() + 1).sum()),
        };
        let too_big = rows.checked_mul(count).is_none_or(|n| n > MAX_PUT_ROWS)
            || bytes.checked_mul(count).is_none_or(|n| n > MAX_PUT_BYTES);
        if too_big {
            warn!(count, rows, bytes, "put refused");
            self.set_status_message(format!("Put too large: {count} copies"));
            return;
        }

        match yank {
            Yank::Chars(bytes) => {
                let text = bytes.repeat(count);
                let len = self.doc.row_len(cy);
                let at = if before || len == 0 { cx.min(len) } else { (cx + 1).min(len) };
                self.doc.row_insert_str(cy, at, &text);
                self.cursor.cx = at + text.len() - 1;
            }
            Yank::Lines(rows) => {
                let at = if before { cy } else { cy + 1 };
                let mut row = at;
                for _ in 0..count {
                    for text in &rows {
                        self.doc.insert_row(row, text);
                        row += 1;
                    }
                }
                self.cursor = Cursor::at(0, at);
                self.cursor.first_non_blank(&self.doc, false);
            }
        }
    }

    // -- Operators ----------------------------------------------------------

    /// Apply `op` to rows `[first, last)`; `last` is clamped to the document.
    fn operate_rows(&mut self, op: Operator, first: usize, last: usize) {
        let last = last.min(self.doc.line_count());
        if first >= last {
            return;
        }
        let rows: Vec<Vec<u8>> = (first..last)
            .filter_map(|row| self.doc.line(row))
            .map(Line::content)
            .collect();
        self.register.yank_lines(rows);

        match op {
            Operator::Goto | Operator::Yank => {}
            Operator::Delete => {
                for _ in first..last {
                    self.doc.delete_row(first);
                }
                if self.doc.line_count() == 0 {
                    self.doc.insert_row(0, b"");
                }
                self.cursor.cy = first.min(self.doc.line_count().saturating_sub(1));
                self.cursor.first_non_blank(&self.doc, false);
            }
            Operator::Change => {
                for _ in first + 1..last {
                    self.doc.delete_row(first + 1);
                }
                let len = self.doc.row_len(first);
                self.doc.row_drain(first, 0, len);
                self.cursor = Cursor::at(0, first);
                self.start_insert();
            }
        }
    }

    fn operate_motion(&mut self, op: Operator, count: usize, motion: Motion) {
        if motion.is_linewise() {
            if let Some(end) = self.motion_target(motion, count) {
                let (first, last) = if end.cy >= self.cursor.cy {
                    (self.cursor.cy, end.cy)
                } else {
                    (end.cy, self.cursor.cy)
                };
                self.operate_rows(op, first, last + 1);
            }
            return;
        }

        let Some((start, stop)) = self.motion_range(motion, count) else {
            debug!(?motion, "operator target not found");
            return;
        };
        let cy = self.cursor.cy;

        match op {
            Operator::Goto => {}
            Operator::Yank => {
                let bytes = self
                    .doc
                    .line(cy)
                    .and_then(|l| l.content().get(start..stop).map(<[u8]>::to_vec));
                if let Some(bytes) = bytes {
                    self.register.yank_chars(bytes);
                }
                self.cursor.cx = start;
            }
            Operator::Delete | Operator::Change => {
                if start < stop {
                    if let Some(bytes) = self.doc.row_drain(cy, start, stop) {
                        self.register.yank_chars(bytes);
                    }
                }
                self.cursor.cx = start;
                if op == Operator::Change {
                    self.start_insert();
                }
            }
        }
    }

    /// Switch to Insert from inside an action (`c`).
    fn start_insert(&mut self) {
        debug!(from = ?self.mode, "mode -> Insert");
        self.mode = Mode::Insert;
        self.set_status_message("-- INSERT --");
    }

    // -- Commands -----------------------------------------------------------

    fn execute(&mut self, command: Command) -> Flow {
        debug!(?command, "execute");
        match command {
            Command::Empty => {}
            Command::Write => {
                self.save();
            }
            Command::WriteAs(path) => {
                if self.write_to(&path) {
                    self.filename = Some(path);
                }
            }
            Command::Quit => {
                if !self.doc.is_dirty() {
                    return Flow::Quit;
                }
                self.set_status_message("No write since last change (add ! to override)");
            }
            Command::ForceQuit => return Flow::Quit,
            Command::WriteQuit => {
                if self.save() {
                    return Flow::Quit;
                }
            }
            Command::ExitSave => {
                if !self.doc.is_dirty() || self.save() {
                    return Flow::Quit;
                }
            }
            Command::GotoLine(n) => self.move_cursor(Motion::GotoLine(n), 1),
            Command::Unknown(input) => {
                self.set_status_message(format!("Not an editor command: {input}"));
            }
        }
        Flow::Continue
    }

    /// Save to the current file name. Returns `true` on success.
    fn save(&mut self) -> bool {
        match self.filename.clone() {
            Some(path) => self.write_to(&path),
            None => {
                self.set_status_message("No file name. Use :w <file>");
                false
            }
        }
    }

    /// Ctrl-S without a file name: open the command line at `:w `.
    fn prompt_save_as(&mut self) {
        self.mode = Mode::Command;
        self.command_line.clear();
        for &b in b"w " {
            self.command_line.insert_char(b);
        }
    }

    fn write_to(&mut self, path: &Path) -> bool {
        match file::save(path, &self.doc) {
            Ok(len) => {
                self.doc.mark_saved();
                self.set_status_message(format!("{len} bytes written to disk"));
                true
            }
            Err(err) => {
                warn!(path = %err.path().display(), %err, "save failed");
                self.set_status_message(format!("File cannot be saved. I/O error: {err}"));
                false
            }
        }
    }

    /// Ctrl-Q. A modified document needs `quit_times` extra presses.
    fn confirm_quit(&mut self) -> Flow {
        if self.doc.is_dirty() && self.quit_times > 0 {
            self.set_status_message(format!(
                "Warning: File has unsaved changes. Press CTRL_Q {} more time to quit.",
                self.quit_times
            ));
            self.quit_times -= 1;
            return Flow::Continue;
        }
        Flow::Quit
    }

    // -- Status -------------------------------------------------------------

    /// Show `msg` on the message line.
    pub fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: msg.into(),
            at: Instant::now(),
        });
    }

    pub fn clear_status_message(&mut self) {
        self.status = None;
    }

    /// The status message, unless it is empty or has expired.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| !s.text.is_empty() && s.at.elapsed() < self.config.status_timeout)
            .map(|s| s.text.as_str())
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Render column of the cursor.
    #[must_use]
    pub fn rx(&self) -> usize {
        self.cursor.rx(&self.doc)
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// What has been typed after `:`.
    #[must_use]
    pub fn command_input(&self) -> &[u8] {
        self.command_line.input()
    }

    #[must_use]
    pub const fn register(&self) -> &Register {
        &self.register
    }

    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Set how far PageUp and PageDown move. Called when the screen resizes.
    pub fn set_page_rows(&mut self, rows: usize) {
        self.config.page_rows = rows.max(1);
    }

    /// True for a fresh unnamed session nobody has typed into yet.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.filename.is_none()
            && !self.doc.is_dirty()
            && self.doc.line_count() == 1
            && self.doc.row_len(0) == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
