//! Command-line mode — the `:` prompt at the bottom of the screen.
//!
//! `:` in Normal mode opens the prompt. Printable keys append, Backspace
//! removes the last byte, Enter parses the input into a [`Command`], Escape
//! abandons it.
//!
//! # Supported commands
//!
//! | Command      | Action                                  |
//! |--------------|-----------------------------------------|
//! | `:w`         | Save to the current file                |
//! | `:w <path>`  | Save to `<path>` and adopt it as the file name |
//! | `:q`         | Quit (refuses if the document is modified) |
//! | `:q!`        | Quit, discarding changes                |
//! | `:wq`        | Save and quit                           |
//! | `:x`         | Save if modified, then quit             |
//! | `:<N>`       | Go to line `N`                          |

use std::path::PathBuf;

/// A parsed `:` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:w`.
    Write,
    /// `:w <path>`.
    WriteAs(PathBuf),
    /// `:q`.
    Quit,
    /// `:q!`.
    ForceQuit,
    /// `:wq`.
    WriteQuit,
    /// `:x`.
    ExitSave,
    /// `:<N>`, 1-indexed.
    GotoLine(usize),
    /// Nothing was typed.
    Empty,
    /// Anything else. Holds the trimmed input for the error message.
    Unknown(String),
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer.
///
/// The leading `:` is not stored; the painter draws it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    input: Vec<u8>,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self { input: Vec::new() }
    }

    /// The typed bytes, without the leading `:`.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Append a byte.
    pub fn insert_char(&mut self, b: u8) {
        self.input.push(b);
    }

    /// Remove the last byte. Returns `false` if the line was already empty.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Parse the current input.
    #[must_use]
    pub fn parse(&self) -> Command {
        parse_command(&String::from_utf8_lossy(&self.input))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse()
            .map_or_else(|_| Command::Unknown(trimmed.to_string()), Command::GotoLine);
    }

    let (cmd, arg) = trimmed
        .find(char::is_whitespace)
        .map_or((trimmed, ""), |pos| (&trimmed[..pos], trimmed[pos..].trim_start()));

    match (cmd, arg) {
        ("w" | "write", "") => Command::Write,
        ("w" | "write", path) => Command::WriteAs(PathBuf::from(path)),
        ("q" | "quit", "") => Command::Quit,
        ("q!" | "quit!", "") => Command::ForceQuit,
        ("wq", "") => Command::WriteQuit,
        ("x" | "exit", "") => Command::ExitSave,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
