//! The lexer.
//!
//! `next()` skips blanks and comments, then dispatches on the first byte
//! of the token. Line terminators produce `NewLine` tokens instead of
//! being skipped; a block comment that spans a terminator produces exactly
//! one `NewLine`, positioned at the first terminator inside it.

use thiserror::Error;

use esfc_util::{Span, Symbol};

use crate::cursor::{Cursor, CursorSnapshot};
use crate::token::{is_future_reserved, keyword_from_ident, Token, TokenKind};

/// A fatal lexical error. Carries the span of the offending region.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("missing digits after exponent")]
    UnterminatedExponent { span: Span },

    #[error("missing digits in hexadecimal literal")]
    EmptyHexLiteral { span: Span },

    #[error("unterminated regular expression literal")]
    UnterminatedRegExp { span: Span },

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },
}

impl LexError {
    /// The source location of the error.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span }
            | LexError::UnterminatedExponent { span }
            | LexError::EmptyHexLiteral { span }
            | LexError::UnterminatedRegExp { span }
            | LexError::UnexpectedChar { span, .. } => *span,
        }
    }
}

/// The ECMAScript lexer.
///
/// # Examples
///
/// ```
/// use esfc_lex::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("var x = 1;", true);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Var);
/// assert_eq!(lexer.next().unwrap().kind, TokenKind::Ident);
/// ```
pub struct Lexer<'a> {
    cursor: Cursor<'a>,

    /// Whether the ES3 future-reserved words lex as reserved.
    care_future_reserved: bool,

    /// Cursor state at the start of the most recent token; the rewind
    /// point for `relex_regexp`.
    token_snapshot: CursorSnapshot,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`. `care_future_reserved` controls
    /// whether the ES3 future-reserved word list is honored.
    pub fn new(source: &'a str, care_future_reserved: bool) -> Self {
        let cursor = Cursor::new(source);
        let token_snapshot = cursor.snapshot();
        Self {
            cursor,
            care_future_reserved,
            token_snapshot,
        }
    }

    /// Returns the next token. After the end of input, returns `Eof`
    /// tokens indefinitely.
    pub fn next(&mut self) -> Result<Token, LexError> {
        loop {
            self.cursor.skip_blanks();
            if self.cursor.at(b'/') {
                match self.cursor.peek(1) {
                    b'/' => {
                        self.skip_line_comment();
                        continue;
                    }
                    b'*' => {
                        if let Some(newline) = self.skip_block_comment()? {
                            return Ok(newline);
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            break;
        }

        self.token_snapshot = self.cursor.snapshot();
        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof));
        }

        match self.cursor.current() {
            b'\n' | b'\r' => {
                self.cursor.advance();
                Ok(self.make(TokenKind::NewLine))
            }
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b':' => self.single(TokenKind::Colon),
            b'?' => self.single(TokenKind::Question),
            b'~' => self.single(TokenKind::Tilde),
            b'.' => {
                if self.cursor.peek(1).is_ascii_digit() {
                    self.lex_number()
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            b'0'..=b'9' => self.lex_number(),
            b'"' | b'\'' => self.lex_string(),
            b'|' => self.lex_pipe(),
            b'&' => self.lex_ampersand(),
            b'<' => self.lex_less(),
            b'>' => self.lex_greater(),
            b'!' => self.lex_bang(),
            b'=' => self.lex_equals(),
            b'+' => self.lex_plus(),
            b'-' => self.lex_minus(),
            b'*' => self.lex_star(),
            b'/' => self.lex_slash(),
            b'%' => self.lex_percent(),
            b'^' => self.lex_caret(),
            b if is_ident_start(b) => Ok(self.lex_identifier()),
            _ => {
                let ch = self.cursor.current_char();
                self.cursor.advance_n(ch.len_utf8());
                Err(LexError::UnexpectedChar {
                    ch,
                    span: self.token_span(),
                })
            }
        }
    }

    /// Re-reads the most recent token as a regular-expression literal.
    ///
    /// Called by the parser when a `/` or `/=` token shows up where a
    /// primary expression is expected. The cursor rewinds to the slash and
    /// consumes `/body/flags`, honoring character classes and backslash
    /// escapes. The literal body is not validated.
    pub fn relex_regexp(&mut self, start: u32) -> Result<Token, LexError> {
        debug_assert_eq!(
            self.token_snapshot.pos(),
            start,
            "regex relexing must rewind to the slash just handed out"
        );
        self.cursor.restore(self.token_snapshot);
        debug_assert!(self.cursor.at(b'/'));
        self.cursor.advance();

        let mut in_class = false;
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_at_end() => {
                    return Err(LexError::UnterminatedRegExp {
                        span: self.token_span(),
                    })
                }
                b'\n' | b'\r' => {
                    return Err(LexError::UnterminatedRegExp {
                        span: self.token_span(),
                    })
                }
                b'\\' => {
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Err(LexError::UnterminatedRegExp {
                            span: self.token_span(),
                        });
                    }
                    self.cursor.advance();
                }
                b'[' => {
                    in_class = true;
                    self.cursor.advance();
                }
                b']' => {
                    in_class = false;
                    self.cursor.advance();
                }
                b'/' if !in_class => {
                    self.cursor.advance();
                    break;
                }
                _ => self.cursor.advance(),
            }
        }

        // Flags
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }

        Ok(self.make_valued(TokenKind::RegExp))
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Consumes `//` up to (not including) the line terminator.
    fn skip_line_comment(&mut self) {
        self.cursor.advance_n(2);
        while !self.cursor.is_at_end() && !matches!(self.cursor.current(), b'\n' | b'\r') {
            self.cursor.advance();
        }
    }

    /// Consumes `/* ... */`. If the comment contains a line terminator,
    /// returns one `NewLine` token positioned at the first terminator.
    fn skip_block_comment(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.cursor.snapshot();
        self.cursor.advance_n(2);

        let mut newline: Option<Token> = None;
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedComment {
                    span: Span::new(start.pos(), self.cursor.pos(), start.line(), start.column()),
                });
            }
            if self.cursor.at(b'*') && self.cursor.peek(1) == b'/' {
                self.cursor.advance_n(2);
                return Ok(newline);
            }
            if newline.is_none() && matches!(self.cursor.current(), b'\n' | b'\r') {
                newline = Some(Token {
                    kind: TokenKind::NewLine,
                    span: Span::new(
                        self.cursor.pos(),
                        self.cursor.pos() + 1,
                        self.cursor.line(),
                        self.cursor.column(),
                    ),
                    value: None,
                });
            }
            self.cursor.advance();
        }
    }

    // =========================================================================
    // Literals and identifiers
    // =========================================================================

    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_snapshot.pos());
        if let Some(keyword) = keyword_from_ident(text) {
            self.make(keyword)
        } else if self.care_future_reserved && is_future_reserved(text) {
            self.make_valued(TokenKind::FutureReserved)
        } else {
            self.make_valued(TokenKind::Ident)
        }
    }

    fn lex_number(&mut self) -> Result<Token, LexError> {
        // Hexadecimal
        if self.cursor.at(b'0') && matches!(self.cursor.peek(1), b'x' | b'X') {
            self.cursor.advance_n(2);
            let mut digits = 0;
            while self.cursor.current().is_ascii_hexdigit() {
                self.cursor.advance();
                digits += 1;
            }
            if digits == 0 {
                return Err(LexError::EmptyHexLiteral {
                    span: self.token_span(),
                });
            }
            return Ok(self.make_valued(TokenKind::Number));
        }

        // Integer part (absent when the literal starts with '.')
        while self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }

        // Fraction
        if self.cursor.at(b'.') {
            self.cursor.advance();
            while self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        // Exponent
        if matches!(self.cursor.current(), b'e' | b'E') {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            let mut digits = 0;
            while self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
                digits += 1;
            }
            if digits == 0 {
                return Err(LexError::UnterminatedExponent {
                    span: self.token_span(),
                });
            }
        }

        Ok(self.make_valued(TokenKind::Number))
    }

    fn lex_string(&mut self) -> Result<Token, LexError> {
        let quote = self.cursor.current();
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString {
                    span: self.token_span(),
                });
            }
            let b = self.cursor.current();
            if b == quote {
                self.cursor.advance();
                break;
            }
            if b == b'\\' {
                // Backslash escapes the next character unconditionally.
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(LexError::UnterminatedString {
                        span: self.token_span(),
                    });
                }
            }
            self.cursor.advance();
        }
        Ok(self.make_valued(TokenKind::String))
    }

    // =========================================================================
    // Operators, maximal munch
    // =========================================================================

    fn lex_pipe(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'|') {
            TokenKind::OrOr
        } else if self.cursor.match_byte(b'=') {
            TokenKind::OrAssign
        } else {
            TokenKind::Or
        };
        Ok(self.make(kind))
    }

    fn lex_ampersand(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'&') {
            TokenKind::AndAnd
        } else if self.cursor.match_byte(b'=') {
            TokenKind::AndAssign
        } else {
            TokenKind::And
        };
        Ok(self.make(kind))
    }

    fn lex_less(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'<') {
            if self.cursor.match_byte(b'=') {
                TokenKind::ShlAssign
            } else {
                TokenKind::Shl
            }
        } else if self.cursor.match_byte(b'=') {
            TokenKind::LtEq
        } else {
            TokenKind::Lt
        };
        Ok(self.make(kind))
    }

    fn lex_greater(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'>') {
            if self.cursor.match_byte(b'>') {
                if self.cursor.match_byte(b'=') {
                    TokenKind::UShrAssign
                } else {
                    TokenKind::UShr
                }
            } else if self.cursor.match_byte(b'=') {
                TokenKind::ShrAssign
            } else {
                TokenKind::Shr
            }
        } else if self.cursor.match_byte(b'=') {
            TokenKind::GtEq
        } else {
            TokenKind::Gt
        };
        Ok(self.make(kind))
    }

    fn lex_bang(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            if self.cursor.match_byte(b'=') {
                TokenKind::NotEqEq
            } else {
                TokenKind::NotEq
            }
        } else {
            TokenKind::Not
        };
        Ok(self.make(kind))
    }

    fn lex_equals(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            if self.cursor.match_byte(b'=') {
                TokenKind::EqEqEq
            } else {
                TokenKind::EqEq
            }
        } else {
            TokenKind::Assign
        };
        Ok(self.make(kind))
    }

    fn lex_plus(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'+') {
            TokenKind::PlusPlus
        } else if self.cursor.match_byte(b'=') {
            TokenKind::PlusAssign
        } else {
            TokenKind::Plus
        };
        Ok(self.make(kind))
    }

    fn lex_minus(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'-') {
            TokenKind::MinusMinus
        } else if self.cursor.match_byte(b'=') {
            TokenKind::MinusAssign
        } else {
            TokenKind::Minus
        };
        Ok(self.make(kind))
    }

    fn lex_star(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            TokenKind::StarAssign
        } else {
            TokenKind::Star
        };
        Ok(self.make(kind))
    }

    fn lex_slash(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            TokenKind::SlashAssign
        } else {
            TokenKind::Slash
        };
        Ok(self.make(kind))
    }

    fn lex_percent(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            TokenKind::PercentAssign
        } else {
            TokenKind::Percent
        };
        Ok(self.make(kind))
    }

    fn lex_caret(&mut self) -> Result<Token, LexError> {
        self.cursor.advance();
        let kind = if self.cursor.match_byte(b'=') {
            TokenKind::CaretAssign
        } else {
            TokenKind::Caret
        };
        Ok(self.make(kind))
    }

    // =========================================================================
    // Token construction
    // =========================================================================

    fn single(&mut self, kind: TokenKind) -> Result<Token, LexError> {
        self.cursor.advance();
        Ok(self.make(kind))
    }

    fn token_span(&self) -> Span {
        Span::new(
            self.token_snapshot.pos(),
            self.cursor.pos(),
            self.token_snapshot.line(),
            self.token_snapshot.column(),
        )
    }

    fn make(&mut self, kind: TokenKind) -> Token {
        Token {
            kind,
            span: self.token_span(),
            value: None,
        }
    }

    fn make_valued(&mut self, kind: TokenKind) -> Token {
        let text = self.cursor.slice_from(self.token_snapshot.pos());
        Token {
            kind,
            span: self.token_span(),
            value: Some(Symbol::intern(text)),
        }
    }
}

/// ASCII identifier start: letter, `_`, or `$`.
#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

/// ASCII identifier continuation: start characters plus digits.
#[inline]
fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Lexes the whole input, panicking on lexical errors.
    fn lex_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source, true);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next().expect("lex error");
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|t| t.kind).collect()
    }

    fn lex_error(source: &str) -> LexError {
        let mut lexer = Lexer::new(source, true);
        loop {
            match lexer.next() {
                Ok(t) if t.kind == TokenKind::Eof => panic!("expected a lex error"),
                Ok(_) => {}
                Err(e) => return e,
            }
        }
    }

    // ==================== KEYWORDS AND IDENTIFIERS ====================

    #[test]
    fn test_keywords_and_idents() {
        let kinds = lex_kinds("if while function foo in instanceof");
        assert_eq!(
            kinds,
            vec![
                TokenKind::If,
                TokenKind::While,
                TokenKind::Function,
                TokenKind::Ident,
                TokenKind::In,
                TokenKind::Instanceof,
            ]
        );
    }

    #[test]
    fn test_ident_value() {
        let tokens = lex_all("$foo_1 _bar");
        assert_eq!(tokens[0].value.unwrap().as_str(), "$foo_1");
        assert_eq!(tokens[1].value.unwrap().as_str(), "_bar");
    }

    #[test]
    fn test_future_reserved_on() {
        let tokens = lex_all("class x");
        assert_eq!(tokens[0].kind, TokenKind::FutureReserved);
        assert_eq!(tokens[0].value.unwrap().as_str(), "class");
        assert_eq!(tokens[1].kind, TokenKind::Ident);
    }

    #[test]
    fn test_future_reserved_off() {
        let mut lexer = Lexer::new("class", false);
        let token = lexer.next().unwrap();
        assert_eq!(token.kind, TokenKind::Ident);
        assert_eq!(token.value.unwrap().as_str(), "class");
    }

    #[test]
    fn test_literal_keywords() {
        assert_eq!(
            lex_kinds("null true false this"),
            vec![
                TokenKind::Null,
                TokenKind::True,
                TokenKind::False,
                TokenKind::This
            ]
        );
    }

    // ==================== NEWLINES AND COMMENTS ====================

    #[test]
    fn test_newline_tokens() {
        let kinds = lex_kinds("a\nb\r\nc");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::NewLine,
                TokenKind::Ident,
                TokenKind::NewLine,
                TokenKind::NewLine,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_line_comment() {
        let kinds = lex_kinds("a // comment ; if\nb");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::NewLine,
                TokenKind::Ident
            ]
        );
    }

    #[test]
    fn test_line_comment_at_eof() {
        let kinds = lex_kinds("a // trailing");
        assert_eq!(kinds, vec![TokenKind::Ident]);
    }

    #[test]
    fn test_block_comment_single_line() {
        let kinds = lex_kinds("a /* x */ b");
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Ident]);
    }

    #[test]
    fn test_block_comment_spanning_lines_emits_one_newline() {
        let source = "a /* x\ny\nz */ b";
        let tokens = lex_all(source);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Ident, TokenKind::NewLine, TokenKind::Ident]
        );
        // The newline is positioned at the first terminator inside the comment.
        assert_eq!(tokens[1].pos(), source.find('\n').unwrap() as u32);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(matches!(
            lex_error("a /* never closed"),
            LexError::UnterminatedComment { .. }
        ));
    }

    // ==================== NUMBERS ====================

    #[test]
    fn test_number_forms() {
        let tokens = lex_all("0 42 3.14 .5 1. 1e10 1E+3 2.5e-3 0xFF 0X0a");
        let values: Vec<_> = tokens
            .iter()
            .map(|t| {
                assert_eq!(t.kind, TokenKind::Number);
                t.value.unwrap().as_str()
            })
            .collect();
        assert_eq!(
            values,
            vec!["0", "42", "3.14", ".5", "1.", "1e10", "1E+3", "2.5e-3", "0xFF", "0X0a"]
        );
    }

    #[test]
    fn test_number_then_dot_access() {
        // A bare '.' not followed by a digit is DOT.
        let kinds = lex_kinds("a.b");
        assert_eq!(
            kinds,
            vec![TokenKind::Ident, TokenKind::Dot, TokenKind::Ident]
        );
    }

    #[test]
    fn test_empty_hex_error() {
        assert!(matches!(lex_error("0x"), LexError::EmptyHexLiteral { .. }));
        assert!(matches!(lex_error("0Xg"), LexError::EmptyHexLiteral { .. }));
    }

    #[test]
    fn test_unterminated_exponent_error() {
        assert!(matches!(
            lex_error("1e"),
            LexError::UnterminatedExponent { .. }
        ));
        assert!(matches!(
            lex_error("2.5e+"),
            LexError::UnterminatedExponent { .. }
        ));
    }

    // ==================== STRINGS ====================

    #[test]
    fn test_string_raw_value_keeps_quotes() {
        let tokens = lex_all(r#"'abc' "d\"e" '\\'"#);
        assert_eq!(tokens[0].value.unwrap().as_str(), "'abc'");
        assert_eq!(tokens[1].value.unwrap().as_str(), r#""d\"e""#);
        assert_eq!(tokens[2].value.unwrap().as_str(), r"'\\'");
    }

    #[test]
    fn test_string_escape_is_uninterpreted() {
        // \n is preserved as two characters.
        let tokens = lex_all(r#""a\nb""#);
        assert_eq!(tokens[0].value.unwrap().as_str(), r#""a\nb""#);
    }

    #[test]
    fn test_unterminated_string() {
        assert!(matches!(
            lex_error("'oops"),
            LexError::UnterminatedString { .. }
        ));
        assert!(matches!(
            lex_error(r#""trailing\"#),
            LexError::UnterminatedString { .. }
        ));
    }

    // ==================== OPERATORS ====================

    #[test]
    fn test_maximal_munch_shift_family() {
        assert_eq!(
            lex_kinds("< << <= <<= > >> >>> >= >>= >>>="),
            vec![
                TokenKind::Lt,
                TokenKind::Shl,
                TokenKind::LtEq,
                TokenKind::ShlAssign,
                TokenKind::Gt,
                TokenKind::Shr,
                TokenKind::UShr,
                TokenKind::GtEq,
                TokenKind::ShrAssign,
                TokenKind::UShrAssign,
            ]
        );
    }

    #[test]
    fn test_maximal_munch_equality_family() {
        assert_eq!(
            lex_kinds("= == === ! != !=="),
            vec![
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::EqEqEq,
                TokenKind::Not,
                TokenKind::NotEq,
                TokenKind::NotEqEq,
            ]
        );
    }

    #[test]
    fn test_arithmetic_and_logic_operators() {
        assert_eq!(
            lex_kinds("+ ++ += - -- -= * *= / /= % %= ^ ^= | || |= & && &="),
            vec![
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::PlusAssign,
                TokenKind::Minus,
                TokenKind::MinusMinus,
                TokenKind::MinusAssign,
                TokenKind::Star,
                TokenKind::StarAssign,
                TokenKind::Slash,
                TokenKind::SlashAssign,
                TokenKind::Percent,
                TokenKind::PercentAssign,
                TokenKind::Caret,
                TokenKind::CaretAssign,
                TokenKind::Or,
                TokenKind::OrOr,
                TokenKind::OrAssign,
                TokenKind::And,
                TokenKind::AndAnd,
                TokenKind::AndAssign,
            ]
        );
    }

    #[test]
    fn test_punctuators() {
        assert_eq!(
            lex_kinds("{ } ( ) [ ] ; , : ? ~"),
            vec![
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Question,
                TokenKind::Tilde,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            lex_error("a # b"),
            LexError::UnexpectedChar { ch: '#', .. }
        ));
    }

    // ==================== REGULAR EXPRESSIONS ====================

    #[test]
    fn test_relex_regexp_basic() {
        let mut lexer = Lexer::new("/abc/gi", true);
        let slash = lexer.next().unwrap();
        assert_eq!(slash.kind, TokenKind::Slash);
        let regexp = lexer.relex_regexp(slash.pos()).unwrap();
        assert_eq!(regexp.kind, TokenKind::RegExp);
        assert_eq!(regexp.value.unwrap().as_str(), "/abc/gi");
    }

    #[test]
    fn test_relex_regexp_from_slash_assign() {
        let mut lexer = Lexer::new("/=x/", true);
        let slash = lexer.next().unwrap();
        assert_eq!(slash.kind, TokenKind::SlashAssign);
        let regexp = lexer.relex_regexp(slash.pos()).unwrap();
        assert_eq!(regexp.value.unwrap().as_str(), "/=x/");
    }

    #[test]
    fn test_relex_regexp_character_class() {
        // A '/' inside a character class does not terminate the literal.
        let mut lexer = Lexer::new("/a[/]b/", true);
        let slash = lexer.next().unwrap();
        let regexp = lexer.relex_regexp(slash.pos()).unwrap();
        assert_eq!(regexp.value.unwrap().as_str(), "/a[/]b/");
    }

    #[test]
    fn test_relex_regexp_escape() {
        let mut lexer = Lexer::new(r"/a\/b/", true);
        let slash = lexer.next().unwrap();
        let regexp = lexer.relex_regexp(slash.pos()).unwrap();
        assert_eq!(regexp.value.unwrap().as_str(), r"/a\/b/");
    }

    #[test]
    fn test_relex_regexp_unterminated() {
        let mut lexer = Lexer::new("/never", true);
        let slash = lexer.next().unwrap();
        assert!(matches!(
            lexer.relex_regexp(slash.pos()),
            Err(LexError::UnterminatedRegExp { .. })
        ));
    }

    // ==================== EOF AND COVERAGE ====================

    #[test]
    fn test_eof_forever() {
        let mut lexer = Lexer::new("x", true);
        lexer.next().unwrap();
        for _ in 0..3 {
            assert_eq!(lexer.next().unwrap().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(lex_all("").is_empty());
        assert!(lex_all("  \t ").is_empty());
    }

    #[test]
    fn test_spans_cover_token_text() {
        let source = "var x = 1.5; // done\nreturn 'a';";
        let tokens = lex_all(source);
        let mut last_end = 0;
        for token in &tokens {
            assert!(token.span.start >= last_end, "tokens must not overlap");
            last_end = token.span.end;
            if let Some(value) = token.value {
                assert_eq!(token.span.slice(source), value.as_str());
            }
        }
    }

    proptest! {
        #[test]
        fn prop_lexer_terminates_without_panic(input in ".{0,200}") {
            let mut lexer = Lexer::new(&input, true);
            for _ in 0..=input.len() {
                match lexer.next() {
                    Ok(t) if t.kind == TokenKind::Eof => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }

        #[test]
        fn prop_valued_tokens_slice_the_input(input in "[a-z0-9 .;+\\-*]{0,80}") {
            let mut lexer = Lexer::new(&input, true);
            loop {
                match lexer.next() {
                    Ok(t) if t.kind == TokenKind::Eof => break,
                    Ok(t) => {
                        if let Some(value) = t.value {
                            prop_assert_eq!(t.span.slice(&input), value.as_str());
                        }
                    }
                    Err(_) => break,
                }
            }
        }
    }
}
