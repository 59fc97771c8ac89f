//! Byte-cursor navigation through gmsl source with line/col tracking.
//!
//! gmsl source (keywords, operators, identifiers, string contents) is
//! ASCII-oriented, so the cursor walks a byte slice rather than `Vec<char>`,
//! avoiding a per-source allocation. `pos` doubles as the byte offset and the
//! character index.

use crate::error::Span;

pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.bytes.get(self.pos + offset).map(|&b| b as char)
    }

    /// Advance past the current byte and return it as a `char`.
    ///
    /// '\n' increments the line and resets the column; anything else just
    /// advances the column.
    pub fn advance(&mut self) -> Option<char> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b as char)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn current_pos(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    pub fn make_span(&self, start_line: usize, start_col: usize) -> Span {
        Span::new(start_line, start_col)
    }

    /// Up to `max` characters from the current position onward, used to give
    /// lex errors a short context snippet without consuming the cursor.
    pub fn snippet(&self, max: usize) -> String {
        self.bytes[self.pos..]
            .iter()
            .take(max)
            .map(|&b| b as char)
            .collect()
    }
}
