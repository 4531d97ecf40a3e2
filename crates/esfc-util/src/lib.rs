//! esfc-util - Core Utilities and Foundation Types
//!
//! This crate provides the foundation types shared by every phase of the
//! ESFC front end:
//!
//! - `span` - Source locations (byte offsets plus line/column)
//! - `symbol` - Interned strings for identifiers, operator names, and raw
//!   token values
//! - `index_vec` - Typed indices and vectors indexed by them
//! - `diagnostic` - Error rendering used by the driver
//! - `error` - Typed errors for the fallible edges of the above
//!
//! All of these are plain data with no I/O; the pipeline built on top of
//! them is single-threaded and synchronous.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Level};
pub use error::{SpanError, SpanResult, SymbolError, SymbolResult};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
pub use symbol::Symbol;

// Re-export commonly used hashers
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
