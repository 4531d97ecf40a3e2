//! esfc-sem - Scope and Variable Resolution
//!
//! Maps every identifier occurrence in a parsed program to a unique
//! variable descriptor. The analysis is a two-pass walk:
//!
//! 1. **Collect** - record declarations per scope, preload `this`/
//!    `arguments` and the operator set, and flag scopes that call `eval`.
//! 2. **Bind** - resolve each reference against the scope stack,
//!    synthesizing implicit globals and `with`/eval interceptors lazily.
//!
//! Resolution never fails; undeclared names become implicit globals at
//! program scope. The result is a [`Resolution`]: a var arena plus a
//! dense map from node id to var id.

mod resolve;
mod var;

#[cfg(test)]
mod edge_cases;

pub use resolve::{resolve, Resolution};
pub use var::{Intercept, InterceptReason, Var, VarId, OPERATOR_NAMES};
