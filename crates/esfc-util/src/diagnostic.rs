//! Diagnostic rendering.
//!
//! Every front-end error here is fatal, so there is no collecting handler;
//! a [`Diagnostic`] is built from the error at the driver boundary and
//! rendered to stderr in one shot.

use std::fmt;

use crate::Span;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that aborts the pipeline.
    Error,
    /// A warning; nothing in the front end emits these today.
    Warning,
    /// Additional context attached to another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A message with severity and source location.
///
/// # Examples
///
/// ```
/// use esfc_util::{Diagnostic, Span};
///
/// let diag = Diagnostic::error("unterminated string literal", Span::new(4, 9, 2, 1));
/// assert_eq!(diag.render(), "error: unterminated string literal (2:1)");
/// ```
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Main message.
    pub message: String,
    /// Source location.
    pub span: Span,
    /// Source text the span covers, attached by [`Diagnostic::with_source`].
    pub snippet: Option<String>,
}

/// Longest snippet rendered before truncation.
const SNIPPET_LIMIT: usize = 40;

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            snippet: None,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Attaches the source text the span covers, when the span addresses
    /// `source`. Only the first line is kept, truncated past the snippet
    /// limit.
    pub fn with_source(mut self, source: &str) -> Self {
        if let Ok(text) = self.span.try_slice(source) {
            let line = text.lines().next().unwrap_or("");
            if !line.is_empty() {
                let mut snippet: String = line.chars().take(SNIPPET_LIMIT).collect();
                if line.chars().count() > SNIPPET_LIMIT {
                    snippet.push_str("...");
                }
                self.snippet = Some(snippet);
            }
        }
        self
    }

    /// Renders the diagnostic as a single line.
    ///
    /// The location suffix is omitted for dummy spans.
    pub fn render(&self) -> String {
        let mut out = if self.span.line == 0 {
            format!("{}: {}", self.level, self.message)
        } else {
            format!("{}: {} ({})", self.level, self.message, self.span)
        };
        if let Some(snippet) = &self.snippet {
            out.push_str(&format!(" near `{snippet}`"));
        }
        out
    }
}
