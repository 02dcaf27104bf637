//! Edit operations — document changes that also move the cursor.
//!
//! These are the Insert-mode primitives plus single-byte replace. Each one
//! takes the document and the cursor together because the two must change
//! in step: typing a byte advances `cx`, splitting a row moves to the next
//! row, joining rows lands at the old end of the previous row.
//!
//! Out-of-range cursors are tolerated: the operation either clamps or does
//! nothing.

use crate::cursor::Cursor;
use crate::document::Document;

/// Insert `byte` at the cursor and step past it.
///
/// If the cursor sits below the last row, an empty row is created first.
pub fn insert_char(doc: &mut Document, cur: &mut Cursor, byte: u8) {
    if cur.cy >= doc.line_count() {
        doc.insert_row(doc.line_count(), b"");
        cur.cy = doc.line_count() - 1;
        cur.cx = 0;
    }
    cur.cx = cur.cx.min(doc.row_len(cur.cy));
    doc.row_insert_char(cur.cy, cur.cx, byte);
    cur.cx += 1;
}

/// Split the row at the cursor. The cursor moves to the start of the new
/// row.
///
/// At column 0 this opens an empty row above instead, leaving the current
/// row's content untouched.
pub fn insert_newline(doc: &mut Document, cur: &mut Cursor) {
    if cur.cy >= doc.line_count() {
        doc.insert_row(doc.line_count(), b"");
        cur.cy = doc.line_count() - 1;
    } else if cur.cx == 0 {
        doc.insert_row(cur.cy, b"");
    } else {
        let tail = doc.row_split_off(cur.cy, cur.cx).unwrap_or_default();
        doc.insert_row(cur.cy + 1, &tail);
    }
    cur.cy += 1;
    cur.cx = 0;
}

/// Backspace.
///
/// Inside a row the byte before the cursor goes. At column 0 the row is
/// joined onto the end of the previous one. At the origin nothing happens.
pub fn delete_char_backward(doc: &mut Document, cur: &mut Cursor) {
    if cur.cy >= doc.line_count() {
        return;
    }
    cur.cx = cur.cx.min(doc.row_len(cur.cy));
    if cur.cx == 0 && cur.cy == 0 {
        return;
    }

    if cur.cx > 0 {
        cur.cx -= 1;
        doc.row_delete_char(cur.cy, cur.cx);
        return;
    }

    let prev = cur.cy - 1;
    let prev_len = doc.row_len(prev);
    if let Some(line) = doc.delete_row(cur.cy) {
        doc.row_append_str(prev, &line.content());
    }
    cur.cy = prev;
    cur.cx = prev_len;
}

/// Delete key.
///
/// Removes the byte under the cursor. At the end of a row the next row is
/// joined onto this one.
pub fn delete_char_forward(doc: &mut Document, cur: &mut Cursor) {
    if cur.cy >= doc.line_count() {
        return;
    }
    if cur.cx < doc.row_len(cur.cy) {
        doc.row_delete_char(cur.cy, cur.cx);
    } else if cur.cy + 1 < doc.line_count() {
        cur.cx = doc.row_len(cur.cy);
        if let Some(line) = doc.delete_row(cur.cy + 1) {
            doc.row_append_str(cur.cy, &line.content());
        }
    }
}

/// Overwrite the byte under the cursor. The cursor does not move.
///
/// Returns `false` (and changes nothing) when the cursor is not on a byte.
pub fn replace_char(doc: &mut Document, cur: &Cursor, byte: u8) -> bool {
    doc.row_replace_char(cur.cy, cur.cx, byte).is_some()
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

    fn rows(doc: &Document) -> Vec<String> {
        doc.lines()
            .map(|l| String::from_utf8(l.content()).unwrap())
            .collect()
    }

    // -- insert_char --------------------------------------------------------

    #[test]
    fn typing_into_empty_document() {
        let mut d = Document::new();
        let mut c = Cursor::new();
        for &b in b"hi" {
            insert_char(&mut d, &mut c, b);
        }
        assert_eq!(rows(&d), vec!["hi"]);
        assert_eq!(c, Cursor::at(2, 0));
        assert_eq!(d.dirty(), 2);
    }

    #[test]
    fn insert_below_last_row_creates_it() {
        let mut d = doc(&["a"]);
        let mut c = Cursor::at(0, 1);
        insert_char(&mut d, &mut c, b'b');
        assert_eq!(rows(&d), vec!["a", "b"]);
        assert_eq!(c, Cursor::at(1, 1));
    }

    // -- insert_newline -----------------------------------------------------

    #[test]
    fn newline_splits_row() {
        let mut d = doc(&["hello world"]);
        let mut c = Cursor::at(5, 0);
        insert_newline(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["hello", " world"]);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn newline_at_column_zero_opens_row_above() {
        let mut d = doc(&["abc"]);
        let mut c = Cursor::new();
        insert_newline(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["", "abc"]);
        assert_eq!(c, Cursor::at(0, 1));
    }

    #[test]
    fn newline_at_end_opens_empty_row_below() {
        let mut d = doc(&["abc"]);
        let mut c = Cursor::at(3, 0);
        insert_newline(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["abc", ""]);
    }

    // -- delete_char_backward -----------------------------------------------

    #[test]
    fn backspace_at_origin_is_noop() {
        let mut d = doc(&["abc"]);
        let mut c = Cursor::new();
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["abc"]);
        assert_eq!(d.dirty(), 0);
    }

    #[test]
    fn backspace_inside_row() {
        let mut d = doc(&["abc"]);
        let mut c = Cursor::at(2, 0);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["ac"]);
        assert_eq!(c, Cursor::at(1, 0));
    }

    #[test]
    fn backspace_past_row_end_clamps_first() {
        let mut d = doc(&["", "ab"]);
        let mut c = Cursor::at(5, 0);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["", "ab"]);
        assert_eq!(c, Cursor::new());

        let mut c = Cursor::at(9, 1);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["", "a"]);
        assert_eq!(c, Cursor::at(1, 1));
    }

    #[test]
    fn backspace_at_column_zero_joins_rows() {
        let mut d = doc(&["foo", "bar"]);
        let mut c = Cursor::at(0, 1);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["foobar"]);
        assert_eq!(c, Cursor::at(3, 0));
    }

    #[test]
    fn join_keeps_tabs_as_tabs() {
        let mut d = doc(&["a", "\tb"]);
        let mut c = Cursor::at(0, 1);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(d.line(0).unwrap().content(), b"a\tb");
        assert_eq!(d.line(0).unwrap().render(), b"a   b");
    }

    #[test]
    fn newline_then_backspace_restores() {
        let mut d = doc(&["split here"]);
        let mut c = Cursor::at(5, 0);
        insert_newline(&mut d, &mut c);
        delete_char_backward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["split here"]);
        assert_eq!(c, Cursor::at(5, 0));
    }

    // -- delete_char_forward ------------------------------------------------

    #[test]
    fn delete_forward_removes_under_cursor() {
        let mut d = doc(&["abc"]);
        let mut c = Cursor::at(1, 0);
        delete_char_forward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["ac"]);
        assert_eq!(c, Cursor::at(1, 0));
    }

    #[test]
    fn delete_forward_at_end_joins_next() {
        let mut d = doc(&["ab", "cd"]);
        let mut c = Cursor::at(2, 0);
        delete_char_forward(&mut d, &mut c);
        assert_eq!(rows(&d), vec!["abcd"]);
        let mut end = Cursor::at(4, 0);
        delete_char_forward(&mut d, &mut end);
        assert_eq!(rows(&d), vec!["abcd"]);
    }

    // -- replace_char -------------------------------------------------------

    #[test]
    fn replace_goes_through_buffer() {
        let mut d = doc(&["cat"]);
        assert!(replace_char(&mut d, &Cursor::at(0, 0), b'b'));
        assert_eq!(d.line(0).unwrap().content(), b"bat");
        assert_eq!(d.line(0).unwrap().render(), b"bat");
        assert_eq!(d.dirty(), 1);
    }

    #[test]
    fn replace_past_end_is_noop() {
        let mut d = doc(&["cat", ""]);
        assert!(!replace_char(&mut d, &Cursor::at(3, 0), b'x'));
        assert!(!replace_char(&mut d, &Cursor::at(0, 1), b'x'));
        assert_eq!(d.dirty(), 0);
    }
}
