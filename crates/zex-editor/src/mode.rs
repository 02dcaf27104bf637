//! Modal editing states.
//!
//! The editor is always in exactly one [`Mode`]. Each mode changes how keys
//! are interpreted and how far the cursor may go:
//!
//! | Mode            | Cursor shape | Cursor limit        | Purpose               |
//! |-----------------|--------------|---------------------|-----------------------|
//! | Normal          | Block        | `0..len-1`          | Motions, commands     |
//! | Insert          | Bar          | `0..len`            | Typing text           |
//! | Command         | Bar          | (in command line)   | `:` commands          |
//! | Replace         | Underline    | `0..len`            | `R` overwrite         |
//! | OperatorPending | Block        | `0..len-1`          | After `d` `c` `y` `g` |
//! | CountPending    | Block        | `0..len-1`          | After a count digit   |
//! | CharPending     | Underline    | `0..len-1`          | After `f` `t` `F` `T` `r` |
//!
//! The last three replace what would otherwise be "read one more key"
//! loops: the pending state is data, and the next key resolves it.

use std::fmt;

use zex_term::ansi::CursorShape;

use crate::motion::FindKind;

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// A Normal-mode command that waits for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `g` — only `gg` is defined.
    Goto,
    /// `d`.
    Delete,
    /// `c`.
    Change,
    /// `y`.
    Yank,
}

impl Operator {
    /// The key that starts this operator.
    #[must_use]
    pub const fn key(self) -> u8 {
        match self {
            Self::Goto => b'g',
            Self::Delete => b'd',
            Self::Change => b'c',
            Self::Yank => b'y',
        }
    }

    /// Map a Normal-mode key to its operator.
    #[must_use]
    pub const fn from_key(b: u8) -> Option<Self> {
        match b {
            b'g' => Some(Self::Goto),
            b'd' => Some(Self::Delete),
            b'c' => Some(Self::Change),
            b'y' => Some(Self::Yank),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// CharPrompt
// ---------------------------------------------------------------------------

/// What the next byte will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharPrompt {
    /// Target of `f` `t` `F` `T`.
    Find(FindKind),
    /// Replacement for `r`.
    Replace,
}

impl CharPrompt {
    #[must_use]
    pub const fn key(self) -> u8 {
        match self {
            Self::Find(kind) => kind.key(),
            Self::Replace => b'r',
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// Pure data: what state we are in and what has been typed toward a pending
/// command. The transition table in [`machine`](crate::machine) decides what
/// a key does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands.
    #[default]
    Normal,
    /// Keys are text.
    Insert,
    /// Keys edit the `:` command line.
    Command,
    /// `R` — printable keys overwrite successive bytes until Escape.
    Replace,
    /// An operator key was typed; waiting for its target.
    ///
    /// `count` is `None` until a digit is typed, so `gg` and `5gg` can be
    /// told apart.
    OperatorPending { op: Operator, count: Option<usize> },
    /// One or more count digits were typed.
    CountPending { count: usize },
    /// Waiting for the byte argument of `f` `t` `F` `T` `r`.
    ///
    /// `op` is set when the find is the target of an operator (`dfx`).
    CharPending {
        prompt: CharPrompt,
        count: usize,
        op: Option<Operator>,
    },
}

impl Mode {
    /// Human-readable name for the status bar.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal
            | Self::OperatorPending { .. }
            | Self::CountPending { .. }
            | Self::CharPending { .. } => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Replace => "REPLACE",
        }
    }

    /// Keys typed so far toward a pending command, e.g. `3d` or `df`.
    #[must_use]
    pub fn pending_keys(self) -> Option<String> {
        let mut out = String::new();
        match self {
            Self::OperatorPending { op, count } => {
                if let Some(n) = count {
                    out.push_str(&n.to_string());
                }
                out.push(char::from(op.key()));
            }
            Self::CountPending { count } => out.push_str(&count.to_string()),
            Self::CharPending { prompt, count, op } => {
                if count > 1 {
                    out.push_str(&count.to_string());
                }
                if let Some(op) = op {
                    out.push(char::from(op.key()));
                }
                out.push(char::from(prompt.key()));
            }
            Self::Normal | Self::Insert | Self::Command | Self::Replace => return None,
        }
        Some(out)
    }

    /// The terminal cursor shape for this mode.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal | Self::OperatorPending { .. } | Self::CountPending { .. } => {
                CursorShape::SteadyBlock
            }
            Self::Insert | Self::Command => CursorShape::SteadyBar,
            Self::Replace | Self::CharPending { .. } => CursorShape::SteadyUnderline,
        }
    }

    /// True if the cursor can sit one past the last byte.
    ///
    /// In Replace mode, overwriting the last byte steps off the row.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }

    /// True for Normal and its pending sub-states.
    #[inline]
    #[must_use]
    pub const fn is_normal(self) -> bool {
        matches!(
            self,
            Self::Normal
                | Self::OperatorPending { .. }
                | Self::CountPending { .. }
                | Self::CharPending { .. }
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Mode display names -------------------------------------------------

    #[test]
    fn mode_display_names() {
        assert_eq!(Mode::Normal.display_name(), "NORMAL");
        assert_eq!(Mode::Insert.display_name(), "INSERT");
        assert_eq!(Mode::Command.display_name(), "COMMAND");
        assert_eq!(Mode::Replace.display_name(), "REPLACE");
        assert_eq!(Mode::CountPending { count: 3 }.display_name(), "NORMAL");
        assert_eq!(format!("{}", Mode::Insert), "INSERT");
    }

    // -- Pending keys -------------------------------------------------------

    #[test]
    fn pending_keys_show_typed_prefix() {
        assert_eq!(Mode::Normal.pending_keys(), None);
        assert_eq!(Mode::CountPending { count: 12 }.pending_keys().as_deref(), Some("12"));
        assert_eq!(
            Mode::OperatorPending { op: Operator::Delete, count: None }.pending_keys().as_deref(),
            Some("d")
        );
        assert_eq!(
            Mode::OperatorPending { op: Operator::Yank, count: Some(3) }.pending_keys().as_deref(),
            Some("3y")
        );
        let find = Mode::CharPending {
            prompt: CharPrompt::Find(FindKind::TillForward),
            count: 2,
            op: Some(Operator::Change),
        };
        assert_eq!(find.pending_keys().as_deref(), Some("2ct"));
    }

    // -- Cursor shape -------------------------------------------------------

    #[test]
    fn cursor_shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::SteadyBlock);
        assert_eq!(Mode::Insert.cursor_shape(), CursorShape::SteadyBar);
        assert_eq!(Mode::Command.cursor_shape(), CursorShape::SteadyBar);
        assert_eq!(Mode::Replace.cursor_shape(), CursorShape::SteadyUnderline);
        let pending = Mode::CharPending { prompt: CharPrompt::Replace, count: 1, op: None };
        assert_eq!(pending.cursor_shape(), CursorShape::SteadyUnderline);
    }

    // -- Predicates ---------------------------------------------------------

    #[test]
    fn insert_and_replace_allow_past_end() {
        assert!(Mode::Insert.cursor_past_end());
        assert!(Mode::Replace.cursor_past_end());
        assert!(!Mode::Normal.cursor_past_end());
        assert!(!Mode::Command.cursor_past_end());
    }

    #[test]
    fn pending_states_are_normal() {
        assert!(Mode::CountPending { count: 1 }.is_normal());
        assert!(Mode::OperatorPending { op: Operator::Goto, count: None }.is_normal());
        assert!(!Mode::Insert.is_normal());
        assert!(!Mode::Replace.is_normal());
    }

    #[test]
    fn operator_keys_round_trip() {
        for op in [Operator::Goto, Operator::Delete, Operator::Change, Operator::Yank] {
            assert_eq!(Operator::from_key(op.key()), Some(op));
        }
        assert_eq!(Operator::from_key(b'x'), None);
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }
}
