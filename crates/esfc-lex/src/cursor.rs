//! Byte cursor over source text.
//!
//! The lexer is ASCII-centric: every character that matters to the grammar
//! is a single byte, so the cursor works on bytes and only decodes UTF-8
//! when an error message needs the offending character. Multi-byte
//! sequences inside strings, comments, and regex bodies flow through
//! untouched.

/// A cursor over source bytes with line/column tracking.
///
/// # Examples
///
/// ```
/// use esfc_lex::Cursor;
///
/// let mut cursor = Cursor::new("var x;");
/// assert_eq!(cursor.current(), b'v');
/// cursor.advance();
/// assert_eq!(cursor.current(), b'a');
/// ```
pub struct Cursor<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

/// Saved cursor state, restored when the parser requests regex relexing.
#[derive(Clone, Copy, Debug)]
pub struct CursorSnapshot {
    pos: usize,
    line: u32,
    column: u32,
}

impl CursorSnapshot {
    /// Byte position the snapshot was taken at.
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    /// Line at the snapshot position (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column at the snapshot position (1-based).
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// The current byte, or `0` at the end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.peek(0)
    }

    /// The byte `n` positions ahead, or `0` past the end.
    #[inline]
    pub fn peek(&self, n: usize) -> u8 {
        *self.source.as_bytes().get(self.pos + n).unwrap_or(&0)
    }

    /// True if the current byte equals `b`.
    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.current() == b
    }

    /// Decodes the character at the current position, for error messages.
    /// Must only be called on a character boundary.
    pub fn current_char(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    /// Advances one byte, updating line/column. No-op at the end.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos >= self.source.len() {
            return;
        }
        let b = self.source.as_bytes()[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Advances `n` bytes.
    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consumes the current byte if it equals `expected`.
    pub fn match_byte(&mut self, expected: u8) -> bool {
        if self.current() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True once every byte has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    /// Current line (1-based; advances on `\n`).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (1-based, in bytes).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// The source slice from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        &self.source[start as usize..self.pos]
    }

    /// Skips blanks: space, tab, and form feed. Line terminators are
    /// significant to the parser and are not skipped here.
    pub fn skip_blanks(&mut self) {
        while matches!(self.current(), b' ' | b'\t' | 0x0C) {
            self.advance();
        }
    }

    /// Saves the cursor state.
    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Restores a previously saved state.
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.pos = snapshot.pos;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_and_advance() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.current(), b'a');
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_peek() {
        let cursor = Cursor::new("xyz");
        assert_eq!(cursor.peek(0), b'x');
        assert_eq!(cursor.peek(2), b'z');
        assert_eq!(cursor.peek(3), 0);
        assert_eq!(cursor.peek(100), 0);
    }

    #[test]
    fn test_match_byte() {
        let mut cursor = Cursor::new("=>");
        assert!(cursor.match_byte(b'='));
        assert!(!cursor.match_byte(b'='));
        assert!(cursor.match_byte(b'>'));
    }

    #[test]
    fn test_line_column_tracking() {
        let mut cursor = Cursor::new("a\nbc");
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.advance();
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
    }

    #[test]
    fn test_skip_blanks_keeps_newline() {
        let mut cursor = Cursor::new("  \t\n x");
        cursor.skip_blanks();
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn test_slice_from() {
        let mut cursor = Cursor::new("return 1;");
        let start = cursor.pos();
        cursor.advance_n(6);
        assert_eq!(cursor.slice_from(start), "return");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cursor = Cursor::new("a / b");
        cursor.advance_n(2);
        let saved = cursor.snapshot();
        cursor.advance_n(3);
        assert!(cursor.is_at_end());
        cursor.restore(saved);
        assert_eq!(cursor.current(), b'/');
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_empty_source() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), 0);
        cursor.advance();
        assert!(cursor.is_at_end());
    }
}
