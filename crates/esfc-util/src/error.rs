//! Core error types for the util crate.
//!
//! These cover the fallible edges of the foundation types: resolving a
//! raw symbol index back to an interned string, and extracting the text a
//! span addresses. The front-end pipeline itself never hits them on the
//! happy path; they exist for the checked APIs.

use thiserror::Error;

/// Error type for symbol table lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SymbolError {
    /// The index does not name an interned string.
    #[error("symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for span extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpanError {
    /// Start is past end.
    #[error("invalid span: start {start} > end {end}")]
    InvalidRange { start: u32, end: u32 },

    /// The span reaches past the source buffer.
    #[error("span out of bounds: source has {source_len} bytes, span is {start}..{end}")]
    OutOfBounds {
        source_len: usize,
        start: u32,
        end: u32,
    },

    /// The span cuts a UTF-8 sequence.
    #[error("span does not fall on character boundaries: {start}..{end}")]
    NotOnCharBoundary { start: u32, end: u32 },
}

/// Result type alias for symbol operations.
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Result type alias for span operations.
pub type SpanResult<T> = std::result::Result<T, SpanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_error_display() {
        let e = SymbolError::NotFound { index: 7 };
        assert_eq!(e.to_string(), "symbol not found: index 7");
    }

    #[test]
    fn test_span_error_display() {
        let e = SpanError::InvalidRange { start: 9, end: 3 };
        assert_eq!(e.to_string(), "invalid span: start 9 > end 3");

        let e = SpanError::OutOfBounds {
            source_len: 5,
            start: 2,
            end: 9,
        };
        assert_eq!(
            e.to_string(),
            "span out of bounds: source has 5 bytes, span is 2..9"
        );
    }
}
