//! esfc-gen - Pretty Printer
//!
//! Renders an AST back to source text. Compound expressions are fully
//! parenthesized, so the output is round-trip safe: parsing it again
//! yields a structurally equal tree, and printing is idempotent after one
//! round trip.
//!
//! The printer takes an annotation sink. The plain sink emits nothing;
//! the resolving sink interleaves `<k>` tags after every resolved
//! variable reference, numbering vars in order of first appearance and
//! skipping operator vars. This replaces the printer subclass of a
//! class-hierarchy design.

mod printer;

pub use printer::{print, print_resolved, Annotate, Plain, Printer, ResolvedTags};
