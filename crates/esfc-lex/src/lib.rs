//! esfc-lex - Lexical Analyzer
//!
//! This crate turns ECMAScript source text into a stream of tokens. The
//! lexer is hand-written and stateful: a [`Cursor`] tracks the byte
//! position, and [`Lexer::next`] produces one token per call.
//!
//! Two properties distinguish it from a textbook tokenizer:
//!
//! - Line terminators are not skipped as whitespace. Each one produces a
//!   [`TokenKind::NewLine`] token, which the parser uses to drive automatic
//!   semicolon insertion and the restricted productions.
//! - `/` is ambiguous between division and a regular-expression literal.
//!   The lexer never guesses: the parser calls [`Lexer::relex_regexp`] at
//!   the grammar positions where a regex is valid, and the lexer rewinds to
//!   the slash and re-reads it as a regex literal.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{LexError, Lexer};
pub use token::{is_future_reserved, keyword_from_ident, Token, TokenKind, FUTURE_RESERVED_WORDS};
