//! Gap buffer — the byte store behind every line.
//!
//! Storage is one `Vec<u8>` split into three regions:
//!
//! ```text
//!   [0, front)            live bytes before the gap
//!   [front, front + gap)  unused gap
//!   [front + gap, size)   live bytes after the gap
//! ```
//!
//! Edits happen at the gap, so typing at one spot is O(1). Moving the gap is
//! a single `copy_within` proportional to the distance moved. When the gap
//! runs out the storage doubles and the tail is relocated to the new end in
//! one block move.
//!
//! Every position taken by this API is a logical byte offset (gap excluded)
//! and is clamped to the live range. No operation panics on an out-of-range
//! position; it does nothing or clamps.

/// Capacity of a freshly created buffer, all of it gap.
pub const INITIAL_CAPACITY: usize = 128;

/// A byte gap buffer.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    storage: Vec<u8>,
    /// Live bytes before the gap. Also the gap's logical position.
    front: usize,
    /// Unused bytes starting at `front`.
    gap: usize,
}

impl GapBuffer {
    /// An empty buffer with [`INITIAL_CAPACITY`] bytes of gap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: vec![0; INITIAL_CAPACITY],
            front: 0,
            gap: INITIAL_CAPACITY,
        }
    }

    /// A buffer seeded with `bytes`, gap at the end.
    ///
    /// Trailing `\n` / `\r` are stripped the same way
    /// [`insert_string`](Self::insert_string) strips them.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.insert_string(bytes);
        buf
    }

    // -- Accessors ----------------------------------------------------------

    /// Logical length: live bytes, gap excluded.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len() - self.gap
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical position of the gap.
    #[inline]
    #[must_use]
    pub const fn front(&self) -> usize {
        self.front
    }

    /// Size of the gap.
    #[inline]
    #[must_use]
    pub const fn gap_len(&self) -> usize {
        self.gap
    }

    /// Total storage size, live bytes plus gap.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The byte at logical position `pos`.
    #[must_use]
    pub fn byte_at(&self, pos: usize) -> Option<u8> {
        if pos >= self.len() {
            return None;
        }
        let physical = if pos < self.front { pos } else { pos + self.gap };
        Some(self.storage[physical])
    }

    /// Live content as `(before_gap, after_gap)`.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (
            &self.storage[..self.front],
            &self.storage[self.front + self.gap..],
        )
    }

    /// Bytes after the gap.
    #[must_use]
    pub fn tail(&self) -> &[u8] {
        &self.storage[self.front + self.gap..]
    }

    /// Live content copied into one contiguous vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let (head, tail) = self.as_slices();
        let mut out = Vec::with_capacity(head.len() + tail.len());
        out.extend_from_slice(head);
        out.extend_from_slice(tail);
        out
    }

    // -- Gap movement -------------------------------------------------------

    /// Move the gap by `delta` logical positions (negative is left).
    ///
    /// The target is clamped to `[0, len]`.
    pub fn move_gap(&mut self, delta: isize) {
        let target = self.front.saturating_add_signed(delta).min(self.len());
        self.move_to(target);
    }

    /// `move_gap(-1)`.
    pub fn backward(&mut self) {
        self.move_gap(-1);
    }

    /// `move_gap(1)`.
    pub fn forward(&mut self) {
        self.move_gap(1);
    }

    /// Move the gap to logical position `pos`, clamped to `[0, len]`.
    pub fn move_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());

        if pos < self.front {
            let shift = self.front - pos;
            self.storage.copy_within(pos..self.front, pos + self.gap);
            self.front -= shift;
        } else if pos > self.front {
            let start = self.front + self.gap;
            let shift = pos - self.front;
            self.storage.copy_within(start..start + shift, self.front);
            self.front += shift;
        }
        self.check();
    }

    // -- Editing ------------------------------------------------------------

    /// Insert one byte at the gap. The gap moves past it.
    pub fn insert(&mut self, byte: u8) {
        self.reserve_gap(1);
        self.storage[self.front] = byte;
        self.front += 1;
        self.gap -= 1;
        self.check();
    }

    /// Insert a run of bytes at the gap, minus any trailing `\n` / `\r`.
    ///
    /// The gap ends up immediately after the inserted text.
    pub fn insert_string(&mut self, bytes: &[u8]) {
        let bytes = strip_line_ending(bytes);
        if bytes.is_empty() {
            return;
        }
        self.reserve_gap(bytes.len());
        self.storage[self.front..self.front + bytes.len()].copy_from_slice(bytes);
        self.front += bytes.len();
        self.gap -= bytes.len();
        self.check();
    }

    /// Delete the byte right after the gap.
    pub fn delete(&mut self) -> Option<u8> {
        let at = self.front + self.gap;
        let byte = *self.storage.get(at)?;
        self.gap += 1;
        self.check();
        Some(byte)
    }

    /// Delete the byte right before the gap.
    pub fn backspace(&mut self) -> Option<u8> {
        if self.front == 0 {
            return None;
        }
        self.front -= 1;
        self.gap += 1;
        self.check();
        Some(self.storage[self.front])
    }

    /// Remove every byte after the gap and return them.
    pub fn truncate_tail(&mut self) -> Vec<u8> {
        let tail = self.tail().to_vec();
        self.gap += tail.len();
        self.check();
        tail
    }

    /// Grow until the gap can hold `needed` bytes.
    ///
    /// Each step doubles the storage and moves the tail to the new end.
    fn reserve_gap(&mut self, needed: usize) {
        if self.gap >= needed {
            return;
        }

        let old_size = self.storage.len();
        let mut new_size = old_size.max(1);
        while new_size - old_size + self.gap < needed {
            new_size *= 2;
        }

        let tail_start = self.front + self.gap;
        let tail_len = old_size - tail_start;
        self.storage.resize(new_size, 0);
        self.storage
            .copy_within(tail_start..old_size, new_size - tail_len);
        self.gap += new_size - old_size;
        self.check();
    }

    #[inline]
    fn check(&self) {
        debug_assert!(
            self.front + self.gap <= self.storage.len(),
            "gap buffer invariant: front {} + gap {} > size {}",
            self.front,
            self.gap,
            self.storage.len()
        );
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GapBuffer {
    /// Equal when the live content is equal, wherever the gap sits.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (0..self.len()).all(|i| self.byte_at(i) == other.byte_at(i))
    }
}

impl Eq for GapBuffer {}

fn strip_line_ending(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = bytes {
        bytes = rest;
    }
    bytes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_invariant(buf: &GapBuffer) {
        assert!(buf.front() + buf.gap_len() <= buf.capacity());
        assert_eq!(buf.len(), buf.capacity() - buf.gap_len());
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_is_all_gap() {
        let buf = GapBuffer::new();
        assert_eq!(buf.front(), 0);
        assert_eq!(buf.gap_len(), INITIAL_CAPACITY);
        assert_eq!(buf.capacity(), INITIAL_CAPACITY);
        assert!(buf.is_empty());
    }

    #[test]
    fn from_bytes_strips_line_ending() {
        let buf = GapBuffer::from_bytes(b"hello\r\n");
        assert_eq!(buf.to_vec(), b"hello");
        assert_eq!(buf.front(), 5);
    }

    // -- Insert -------------------------------------------------------------

    #[test]
    fn insert_advances_front() {
        let mut buf = GapBuffer::new();
        buf.insert(b'a');
        buf.insert(b'b');
        assert_eq!(buf.to_vec(), b"ab");
        assert_eq!(buf.front(), 2);
        assert_eq!(buf.gap_len(), INITIAL_CAPACITY - 2);
    }

    #[test]
    fn insert_string_round_trips() {
        let mut buf = GapBuffer::new();
        buf.insert_string(b"fn main() {}");
        assert_eq!(buf.to_vec(), b"fn main() {}");
        assert_invariant(&buf);
    }

    #[test]
    fn insert_string_in_middle_keeps_gap_after_text() {
        let mut buf = GapBuffer::from_bytes(b"held");
        buf.move_to(3);
        buf.insert_string(b"lo wor");
        assert_eq!(buf.to_vec(), b"hello world");
        assert_eq!(buf.front(), 9);
    }

    #[test]
    fn insert_string_only_newline_is_noop() {
        let mut buf = GapBuffer::new();
        buf.insert_string(b"\n");
        assert!(buf.is_empty());
    }

    #[test]
    fn growth_doubles_and_preserves_tail() {
        let mut buf = GapBuffer::from_bytes(b"xy");
        buf.move_to(1);
        for _ in 0..INITIAL_CAPACITY {
            buf.insert(b'-');
        }
        assert_eq!(buf.capacity(), INITIAL_CAPACITY * 2);
        assert_eq!(buf.len(), INITIAL_CAPACITY + 2);
        assert_eq!(buf.byte_at(0), Some(b'x'));
        assert_eq!(buf.byte_at(buf.len() - 1), Some(b'y'));
        assert_invariant(&buf);
    }

    #[test]
    fn large_insert_string_grows_repeatedly() {
        let text = vec![b'z'; INITIAL_CAPACITY * 5];
        let mut buf = GapBuffer::new();
        buf.insert_string(&text);
        assert_eq!(buf.to_vec(), text);
        assert_eq!(buf.capacity(), INITIAL_CAPACITY * 8);
        assert_invariant(&buf);
    }

    // -- Gap movement -------------------------------------------------------

    #[test]
    fn move_gap_is_clamped() {
        let mut buf = GapBuffer::from_bytes(b"abc");
        buf.move_gap(-10);
        assert_eq!(buf.front(), 0);
        buf.move_gap(10);
        assert_eq!(buf.front(), 3);
        assert_eq!(buf.to_vec(), b"abc");
    }

    #[test]
    fn backward_and_forward_step_one() {
        let mut buf = GapBuffer::from_bytes(b"abc");
        buf.backward();
        buf.backward();
        assert_eq!(buf.front(), 1);
        assert_eq!(buf.tail(), b"bc");
        buf.forward();
        assert_eq!(buf.front(), 2);
        assert_eq!(buf.to_vec(), b"abc");
    }

    #[test]
    fn byte_at_skips_gap() {
        let mut buf = GapBuffer::from_bytes(b"abcd");
        buf.move_to(2);
        assert_eq!(buf.byte_at(1), Some(b'b'));
        assert_eq!(buf.byte_at(2), Some(b'c'));
        assert_eq!(buf.byte_at(4), None);
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn delete_removes_after_gap() {
        let mut buf = GapBuffer::from_bytes(b"abc");
        buf.move_to(1);
        assert_eq!(buf.delete(), Some(b'b'));
        assert_eq!(buf.to_vec(), b"ac");
        buf.move_to(2);
        assert_eq!(buf.delete(), None);
    }

    #[test]
    fn backspace_removes_before_gap() {
        let mut buf = GapBuffer::from_bytes(b"abc");
        assert_eq!(buf.backspace(), Some(b'c'));
        buf.move_to(0);
        assert_eq!(buf.backspace(), None);
        assert_eq!(buf.to_vec(), b"ab");
    }

    #[test]
    fn empty_buffer_operations_are_noops() {
        let mut buf = GapBuffer::new();
        buf.backward();
        buf.forward();
        assert_eq!(buf.delete(), None);
        assert_eq!(buf.backspace(), None);
        assert_eq!(buf.truncate_tail(), Vec::<u8>::new());
        assert_invariant(&buf);
    }

    #[test]
    fn truncate_tail_returns_removed_bytes() {
        let mut buf = GapBuffer::from_bytes(b"hello world");
        buf.move_to(5);
        assert_eq!(buf.truncate_tail(), b" world");
        assert_eq!(buf.to_vec(), b"hello");
        assert_invariant(&buf);
    }

    // -- Invariant under a mixed sequence -----------------------------------

    #[test]
    fn invariant_holds_through_mixed_edits() {
        let mut buf = GapBuffer::new();
        for i in 0..400_usize {
            match i % 5 {
                0 | 1 => buf.insert(b'a' + u8::try_from(i % 26).unwrap()),
                2 => buf.move_gap(-3),
                3 => {
                    buf.delete();
                }
                _ => {
                    buf.backspace();
                    buf.move_gap(7);
                }
            }
            assert_invariant(&buf);
        }
    }

    #[test]
    fn equality_ignores_gap_position() {
        let a = GapBuffer::from_bytes(b"same");
        let mut b = GapBuffer::from_bytes(b"same");
        b.move_to(1);
        assert_eq!(a, b);
    }
}
