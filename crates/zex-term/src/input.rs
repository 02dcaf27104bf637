// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. The editor works on bytes, so a
// key is either a single byte (printable ASCII or a control character) or
// one of the handful of named keys a VT100-style terminal reports with an
// escape sequence:
//
// - CSI letter:  `ESC [ A..D` arrows, `ESC [ H` / `ESC [ F` Home / End
// - CSI tilde:   `ESC [ 1~ 3~ 4~ 5~ 6~ 7~ 8~`
// - SS3:         `ESC O H` / `ESC O F`
//
// Anything else after `ESC [` is swallowed whole. `ESC` followed by any
// other byte is an Escape key and the following byte is parsed on its own,
// so typing `<Esc>j` quickly never turns into a chord.
//
// # Design
//
// Escape sequences can be split across `read()` calls, so the parser keeps
// a small byte buffer. Feed bytes with [`Parser::advance`]; after a quiet
// period call [`Parser::flush`] to resolve a pending lone ESC.

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A printable byte with no modifiers.
    #[must_use]
    pub const fn char(b: u8) -> Self {
        Self::plain(KeyCode::Char(b))
    }

    /// Ctrl + letter.
    #[must_use]
    pub const fn ctrl(b: u8) -> Self {
        Self {
            code: KeyCode::Char(b),
            modifiers: Modifiers::CTRL,
        }
    }

    /// The printable byte this key inserts, if any.
    ///
    /// Ctrl chords and named keys return `None`.
    #[must_use]
    pub const fn printable(&self) -> Option<u8> {
        match self.code {
            KeyCode::Char(b) if self.modifiers.is_empty() && b >= 0x20 && b < 0x7F => Some(b),
            _ => None,
        }
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A single byte. Printable ASCII, or the letter of a Ctrl chord.
    Char(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Stateful byte-to-key decoder.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes from stdin and return every key that can be decoded.
    ///
    /// Bytes that form an incomplete sequence stay buffered and combine with
    /// the next [`advance`](Parser::advance) call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => {
                    tracing::trace!(bytes = ?&self.buf[pos..pos + n], "skipped unrecognized input");
                    pos += n;
                }
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        keys
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve pending bytes after the escape timeout.
    ///
    /// A lone ESC becomes an Escape key. A dangling `ESC [` or `ESC O`
    /// prefix becomes Escape followed by the literal byte.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut keys = Vec::new();
        for &byte in &self.buf {
            if let Parsed::Key(key, _) = parse_single(byte) {
                keys.push(key);
            }
        }
        self.buf.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one key from the front of a buffer.
enum Parsed {
    /// Decoded a key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete, need more bytes.
    Incomplete,
    /// Unrecognized bytes, skip `usize`.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf.first() {
        None => Parsed::Skip(0),
        Some(0x1B) => parse_escape(buf),
        Some(&b) => parse_single(b),
    }
}

/// Decode one byte outside an escape sequence.
const fn parse_single(byte: u8) -> Parsed {
    let key = match byte {
        0x1B => KeyEvent::plain(KeyCode::Escape),
        0x08 | 0x7F => KeyEvent::plain(KeyCode::Backspace),
        0x09 => KeyEvent::plain(KeyCode::Tab),
        0x0A | 0x0D => KeyEvent::plain(KeyCode::Enter),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => KeyEvent::ctrl(b + b'a' - 1),
        b @ 0x20..=0x7E => KeyEvent::char(b),
        // NUL, the 0x1C..0x1F group, and anything with the high bit set.
        _ => return Parsed::Skip(1),
    };
    Parsed::Key(key, 1)
}

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    match buf.get(1) {
        None => Parsed::Incomplete,
        Some(b'[') => parse_csi(buf),
        Some(b'O') => parse_ss3(buf),
        Some(_) => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

/// `ESC [` followed by either a final letter or digits and `~`.
fn parse_csi(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.get(2) else {
        return Parsed::Incomplete;
    };

    if first.is_ascii_digit() {
        // Parameter bytes run until a byte in the final range 0x40..=0x7E.
        let mut end = 2;
        while let Some(&b) = buf.get(end) {
            if (0x40..=0x7E).contains(&b) {
                let code = if b == b'~' && end == 3 {
                    tilde_key(first)
                } else {
                    None
                };
                return code.map_or(Parsed::Skip(end + 1), |code| {
                    Parsed::Key(KeyEvent::plain(code), end + 1)
                });
            }
            if !(0x20..=0x3F).contains(&b) {
                // Not a CSI byte at all. Drop the prefix and re-parse.
                return Parsed::Skip(end);
            }
            end += 1;
        }
        return Parsed::Incomplete;
    }

    let code = match first {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };
    Parsed::Key(KeyEvent::plain(code), 3)
}

const fn tilde_key(digit: u8) -> Option<KeyCode> {
    match digit {
        b'1' | b'7' => Some(KeyCode::Home),
        b'3' => Some(KeyCode::Delete),
        b'4' | b'8' => Some(KeyCode::End),
        b'5' => Some(KeyCode::PageUp),
        b'6' => Some(KeyCode::PageDown),
        _ => None,
    }
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    match buf.get(2) {
        None => Parsed::Incomplete,
        Some(b'H') => Parsed::Key(KeyEvent::plain(KeyCode::Home), 3),
        Some(b'F') => Parsed::Key(KeyEvent::plain(KeyCode::End), 3),
        Some(_) => Parsed::Skip(3),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(data: &[u8]) -> Vec<KeyEvent> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> KeyEvent {
        let keys = parse(data);
        assert_eq!(keys.len(), 1, "expected 1 key, got {keys:?}");
        keys[0]
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    // ── Single bytes ────────────────────────────────────────────────────

    #[test]
    fn ascii_printable() {
        assert_eq!(parse_one(b"a"), KeyEvent::char(b'a'));
        assert_eq!(parse_one(b"~"), KeyEvent::char(b'~'));
        assert_eq!(parse_one(b" "), KeyEvent::char(b' '));
        assert_eq!(
            parse(b"dw"),
            vec![KeyEvent::char(b'd'), KeyEvent::char(b'w')]
        );
    }

    #[test]
    fn control_letters_carry_ctrl() {
        assert_eq!(parse_one(&[0x11]), KeyEvent::ctrl(b'q'));
        assert_eq!(parse_one(&[0x13]), KeyEvent::ctrl(b's'));
        assert_eq!(parse_one(&[0x01]), KeyEvent::ctrl(b'a'));
    }

    #[test]
    fn enter_tab_backspace() {
        assert_eq!(parse_one(b"\r"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), key(KeyCode::Enter));
        assert_eq!(parse_one(b"\t"), key(KeyCode::Tab));
        assert_eq!(parse_one(&[0x7F]), key(KeyCode::Backspace));
        assert_eq!(parse_one(&[0x08]), key(KeyCode::Backspace));
    }

    #[test]
    fn non_ascii_bytes_are_skipped() {
        assert_eq!(parse("é".as_bytes()), vec![]);
        assert_eq!(parse(&[0x00, b'x']), vec![KeyEvent::char(b'x')]);
    }

    // ── Escape sequences ────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), key(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), key(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), key(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), key(KeyCode::Left));
    }

    #[test]
    fn home_and_end_variants() {
        for seq in [&b"\x1b[H"[..], b"\x1b[1~", b"\x1b[7~", b"\x1bOH"] {
            assert_eq!(parse_one(seq), key(KeyCode::Home), "{seq:?}");
        }
        for seq in [&b"\x1b[F"[..], b"\x1b[4~", b"\x1b[8~", b"\x1bOF"] {
            assert_eq!(parse_one(seq), key(KeyCode::End), "{seq:?}");
        }
    }

    #[test]
    fn delete_and_paging() {
        assert_eq!(parse_one(b"\x1b[3~"), key(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[5~"), key(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), key(KeyCode::PageDown));
    }

    #[test]
    fn unknown_csi_is_swallowed() {
        assert_eq!(parse(b"\x1b[2~x"), vec![KeyEvent::char(b'x')]);
        assert_eq!(parse(b"\x1b[15~"), vec![]);
        assert_eq!(parse(b"\x1b[1;5A"), vec![]);
        assert_eq!(parse(b"\x1b[Z"), vec![]);
    }

    #[test]
    fn escape_then_letter_is_two_keys() {
        assert_eq!(
            parse(b"\x1bj"),
            vec![key(KeyCode::Escape), KeyEvent::char(b'j')]
        );
    }

    // ── Split reads and flush ───────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut p = Parser::new();
        assert_eq!(p.advance(b"\x1b"), vec![]);
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![key(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn sequence_split_across_reads() {
        let mut p = Parser::new();
        assert_eq!(p.advance(b"\x1b["), vec![]);
        assert_eq!(p.advance(b"5"), vec![]);
        assert_eq!(p.advance(b"~"), vec![key(KeyCode::PageUp)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn flush_dangling_prefix_yields_escape_and_literal() {
        let mut p = Parser::new();
        assert_eq!(p.advance(b"\x1b["), vec![]);
        assert_eq!(
            p.flush(),
            vec![key(KeyCode::Escape), KeyEvent::char(b'[')]
        );
    }

    // ── printable() ─────────────────────────────────────────────────────

    #[test]
    fn printable_only_for_plain_chars() {
        assert_eq!(KeyEvent::char(b'x').printable(), Some(b'x'));
        assert_eq!(KeyEvent::ctrl(b'x').printable(), None);
        assert_eq!(key(KeyCode::Enter).printable(), None);
    }
}
