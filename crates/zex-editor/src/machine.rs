//! The key transition table.
//!
//! [`transition`] maps the current [`Mode`] and one key to the next mode and
//! an [`Action`]. It never touches the document: the session applies the
//! action. Keeping the table pure means every binding can be tested by
//! feeding keys and comparing values.
//!
//! Counts ride along in the actions. `3w` becomes
//! `Action::Motion { motion: WordForward, count: 3 }`; the session repeats.

use zex_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::mode::{CharPrompt, Mode, Operator};
use crate::motion::{FindKind, Motion};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Where `i` `a` `A` `I` `o` `O` put the cursor before typing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertEntry {
    /// `i` — before the cursor.
    Before,
    /// `a` — after the cursor.
    After,
    /// `I` — before the first non-blank.
    LineStart,
    /// `A` — after the last byte.
    LineEnd,
    /// `o` — on a new row below.
    Below,
    /// `O` — on a new row above.
    Above,
}

/// What an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// `dd` `cc` `yy` — whole rows starting at the cursor.
    Line,
    /// From the cursor to where the motion lands, on the cursor's row.
    Motion(Motion),
}

/// The effect of one key, applied by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Nothing to do.
    None,
    /// A pending command was abandoned.
    Cancel,
    /// Move the cursor `count` times.
    Motion { motion: Motion, count: usize },
    /// Start typing.
    EnterInsert(InsertEntry),
    /// Leave Insert mode.
    ExitInsert,
    InsertChar(u8),
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    /// `r` — overwrite `count` bytes starting at the cursor with `byte`.
    ReplaceChar { byte: u8, count: usize },
    /// `R`.
    BeginReplace,
    /// A printable key in Replace mode.
    ReplaceOverwrite(u8),
    /// Escape out of Replace mode.
    EndReplace,
    /// `x` — delete `count` bytes under and after the cursor.
    DeleteChar { count: usize },
    /// `p` / `P`.
    Put { before: bool, count: usize },
    /// `d` `c` `y` with their target.
    Operator {
        op: Operator,
        count: usize,
        target: Target,
    },
    CommandStart,
    CommandInsert(u8),
    CommandBackspace,
    CommandExecute,
    CommandCancel,
    Save,
    Quit,
}

impl Action {
    /// Repeat this Normal-mode action `count` times where that makes sense.
    const fn with_count(self, count: usize) -> Self {
        match self {
            Self::Motion { motion: Motion::LastLine, .. } => Self::Motion {
                motion: Motion::GotoLine(count),
                count: 1,
            },
            Self::Motion { motion, .. } => Self::Motion { motion, count },
            Self::DeleteChar { .. } => Self::DeleteChar { count },
            Self::Put { before, .. } => Self::Put { before, count },
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// The next mode and the action for `key` in `mode`.
#[must_use]
pub fn transition(mode: &Mode, key: KeyEvent) -> (Mode, Action) {
    match *mode {
        Mode::Normal => normal(key),
        Mode::Insert => insert(key),
        Mode::Command => command(key),
        Mode::Replace => replace(key),
        Mode::OperatorPending { op, count } => operator_pending(op, count, key),
        Mode::CountPending { count } => count_pending(count, key),
        Mode::CharPending { prompt, count, op } => char_pending(prompt, count, op, key),
    }
}

const fn stay(action: Action) -> (Mode, Action) {
    (Mode::Normal, action)
}

const fn motion(m: Motion) -> Action {
    Action::Motion { motion: m, count: 1 }
}

const fn is_ctrl(key: KeyEvent, letter: u8) -> bool {
    matches!(key.code, KeyCode::Char(b) if b == letter) && key.modifiers.contains(Modifiers::CTRL)
}

/// Motions reachable through named keys in every editing mode.
const fn named_motion(code: KeyCode) -> Option<Motion> {
    Some(match code {
        KeyCode::Left => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Up => Motion::Up,
        KeyCode::Down => Motion::Down,
        KeyCode::Home => Motion::LineStart,
        KeyCode::End => Motion::LineEnd,
        KeyCode::PageUp => Motion::PageUp,
        KeyCode::PageDown => Motion::PageDown,
        _ => return None,
    })
}

/// Motions an operator accepts after `d` `c` `y`.
const fn operator_motion(b: u8) -> Option<Motion> {
    Some(match b {
        b'w' => Motion::WordForward { extended: false },
        b'W' => Motion::WordForward { extended: true },
        b'e' => Motion::WordEnd { extended: false },
        b'E' => Motion::WordEnd { extended: true },
        b'0' => Motion::LineStart,
        b'$' => Motion::LineEnd,
        b'^' => Motion::FirstNonBlank,
        b'h' => Motion::Left,
        b'l' => Motion::Right,
        _ => return None,
    })
}

const fn find_kind(b: u8) -> Option<FindKind> {
    match b {
        b'f' => Some(FindKind::Forward),
        b't' => Some(FindKind::TillForward),
        b'F' => Some(FindKind::Backward),
        b'T' => Some(FindKind::TillBackward),
        _ => None,
    }
}

fn normal(key: KeyEvent) -> (Mode, Action) {
    if is_ctrl(key, b's') {
        return stay(Action::Save);
    }
    if is_ctrl(key, b'q') {
        return stay(Action::Quit);
    }
    if let Some(m) = named_motion(key.code) {
        return stay(motion(m));
    }
    if key.code == KeyCode::Delete {
        return stay(Action::DeleteChar { count: 1 });
    }

    let Some(b) = key.printable() else {
        return stay(Action::None);
    };

    if let Some(op) = Operator::from_key(b) {
        return (Mode::OperatorPending { op, count: None }, Action::None);
    }
    if let Some(kind) = find_kind(b) {
        let prompt = CharPrompt::Find(kind);
        return (Mode::CharPending { prompt, count: 1, op: None }, Action::None);
    }

    match b {
        b':' => (Mode::Command, Action::CommandStart),
        b'i' => (Mode::Insert, Action::EnterInsert(InsertEntry::Before)),
        b'a' => (Mode::Insert, Action::EnterInsert(InsertEntry::After)),
        b'I' => (Mode::Insert, Action::EnterInsert(InsertEntry::LineStart)),
        b'A' => (Mode::Insert, Action::EnterInsert(InsertEntry::LineEnd)),
        b'o' => (Mode::Insert, Action::EnterInsert(InsertEntry::Below)),
        b'O' => (Mode::Insert, Action::EnterInsert(InsertEntry::Above)),
        b'R' => (Mode::Replace, Action::BeginReplace),
        b'r' => (
            Mode::CharPending { prompt: CharPrompt::Replace, count: 1, op: None },
            Action::None,
        ),
        b'1'..=b'9' => (Mode::CountPending { count: usize::from(b - b'0') }, Action::None),
        b'h' => stay(motion(Motion::Left)),
        b'j' => stay(motion(Motion::Down)),
        b'k' => stay(motion(Motion::Up)),
        b'l' => stay(motion(Motion::Right)),
        b'0' => stay(motion(Motion::LineStart)),
        b'$' => stay(motion(Motion::LineEnd)),
        b'^' => stay(motion(Motion::FirstNonBlank)),
        b'G' => stay(motion(Motion::LastLine)),
        b'w' | b'W' | b'e' | b'E' => {
            operator_motion(b).map_or(stay(Action::None), |m| stay(motion(m)))
        }
        b'x' => stay(Action::DeleteChar { count: 1 }),
        b'p' => stay(Action::Put { before: false, count: 1 }),
        b'P' => stay(Action::Put { before: true, count: 1 }),
        _ => stay(Action::None),
    }
}

fn insert(key: KeyEvent) -> (Mode, Action) {
    let action = if is_ctrl(key, b's') {
        Action::Save
    } else if is_ctrl(key, b'q') {
        Action::Quit
    } else if let Some(m) = named_motion(key.code) {
        motion(m)
    } else {
        match key.code {
            KeyCode::Escape => return (Mode::Normal, Action::ExitInsert),
            KeyCode::Enter => Action::InsertNewline,
            KeyCode::Backspace => Action::DeleteBackward,
            KeyCode::Delete => Action::DeleteForward,
            KeyCode::Tab => Action::InsertChar(b'\t'),
            _ => key.printable().map_or(Action::None, Action::InsertChar),
        }
    };
    (Mode::Insert, action)
}

fn command(key: KeyEvent) -> (Mode, Action) {
    match key.code {
        KeyCode::Escape => (Mode::Normal, Action::CommandCancel),
        KeyCode::Enter => (Mode::Normal, Action::CommandExecute),
        KeyCode::Backspace => (Mode::Command, Action::CommandBackspace),
        _ => (
            Mode::Command,
            key.printable().map_or(Action::None, Action::CommandInsert),
        ),
    }
}

fn replace(key: KeyEvent) -> (Mode, Action) {
    let action = match key.code {
        KeyCode::Escape => return (Mode::Normal, Action::EndReplace),
        KeyCode::Tab => Action::ReplaceOverwrite(b'\t'),
        KeyCode::Backspace => motion(Motion::Left),
        code => match named_motion(code) {
            Some(m) => motion(m),
            None => key.printable().map_or(Action::None, Action::ReplaceOverwrite),
        },
    };
    (Mode::Replace, action)
}

fn operator_pending(op: Operator, count: Option<usize>, key: KeyEvent) -> (Mode, Action) {
    let Some(b) = key.printable() else {
        return stay(Action::Cancel);
    };

    if b.is_ascii_digit() && (b != b'0' || count.is_some()) {
        let digit = usize::from(b - b'0');
        let count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(digit));
        return (Mode::OperatorPending { op, count }, Action::None);
    }

    if b == op.key() {
        return stay(match op {
            Operator::Goto => motion(count.map_or(Motion::FirstLine, Motion::GotoLine)),
            _ => Action::Operator { op, count: count.unwrap_or(1), target: Target::Line },
        });
    }

    if op == Operator::Goto {
        return stay(Action::Cancel);
    }

    if let Some(kind) = find_kind(b) {
        let prompt = CharPrompt::Find(kind);
        let count = count.unwrap_or(1);
        return (Mode::CharPending { prompt, count, op: Some(op) }, Action::None);
    }

    match operator_motion(b) {
        Some(m) => {
            // `cw` changes to the end of the word, like `ce`.
            let m = match (op, m) {
                (Operator::Change, Motion::WordForward { extended }) => {
                    Motion::WordEnd { extended }
                }
                _ => m,
            };
            stay(Action::Operator { op, count: count.unwrap_or(1), target: Target::Motion(m) })
        }
        None => stay(Action::Cancel),
    }
}

fn count_pending(count: usize, key: KeyEvent) -> (Mode, Action) {
    if key.code == KeyCode::Escape {
        return stay(Action::Cancel);
    }

    if let Some(b) = key.printable().filter(u8::is_ascii_digit) {
        let count = count.saturating_mul(10).saturating_add(usize::from(b - b'0'));
        return (Mode::CountPending { count }, Action::None);
    }

    match normal(key) {
        (Mode::OperatorPending { op, .. }, action) => {
            (Mode::OperatorPending { op, count: Some(count) }, action)
        }
        (Mode::CharPending { prompt, op, .. }, action) => {
            (Mode::CharPending { prompt, count, op }, action)
        }
        (next, action) => (next, action.with_count(count)),
    }
}

fn char_pending(
    prompt: CharPrompt,
    count: usize,
    op: Option<Operator>,
    key: KeyEvent,
) -> (Mode, Action) {
    let byte = match key.code {
        KeyCode::Tab => Some(b'\t'),
        _ => key.printable(),
    };
    let Some(byte) = byte else {
        return stay(Action::Cancel);
    };

    stay(match (prompt, op) {
        (CharPrompt::Replace, _) => Action::ReplaceChar { byte, count },
        (CharPrompt::Find(kind), None) => Action::Motion {
            motion: Motion::FindChar { target: byte, kind },
            count,
        },
        (CharPrompt::Find(kind), Some(op)) => Action::Operator {
            op,
            count,
            target: Target::Motion(Motion::FindChar { target: byte, kind }),
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
