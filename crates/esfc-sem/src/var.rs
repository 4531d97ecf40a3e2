//! Variable descriptors.
//!
//! Every identifier occurrence in a resolved program points at one
//! [`Var`]. Vars live in an arena owned by the resolution; the arena
//! index [`VarId`] is the monotonically assigned unique id and the hash
//! identity. Many AST nodes share one var, so nothing here is reference
//! counted - the arena owns, everyone else holds ids.

use esfc_par::NodeId;
use esfc_util::{define_idx, Symbol};

define_idx!(
    /// Arena index of a variable descriptor; doubles as its unique id.
    VarId
);

/// Why an interceptor exists: the scope node that captures the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterceptReason {
    /// A `with` statement body.
    WithScope(NodeId),
    /// A scope that contains a direct `eval` call.
    EvalScope(NodeId),
}

/// Interceptor payload: the variable the name would have resolved to
/// without the intercepting scope, and the scope responsible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intercept {
    pub intercepted: VarId,
    pub reason: InterceptReason,
}

/// A variable descriptor.
#[derive(Clone, Debug)]
pub struct Var {
    /// The name this descriptor stands for (an operator symbol for
    /// operator vars).
    pub name: Symbol,
    /// Declared or synthesized at program scope.
    pub is_global: bool,
    /// Synthesized because no declaration was found.
    pub is_implicit: bool,
    /// A parameter, including the preloaded `this`/`arguments`.
    pub is_param: bool,
    /// One of the preloaded operator descriptors.
    pub is_operator: bool,
    /// Present iff this var is an interceptor.
    pub intercept: Option<Intercept>,
}

impl Var {
    /// A variable declared in some scope; global iff that scope is the
    /// program.
    pub fn declared(name: Symbol, is_global: bool) -> Self {
        Self {
            name,
            is_global,
            is_implicit: false,
            is_param: false,
            is_operator: false,
            intercept: None,
        }
    }

    /// A declared parameter (also used for the preloaded `this` and
    /// `arguments`).
    pub fn param(name: Symbol) -> Self {
        Self {
            name,
            is_global: false,
            is_implicit: false,
            is_param: true,
            is_operator: false,
            intercept: None,
        }
    }

    /// A preloaded operator descriptor.
    pub fn operator(name: Symbol) -> Self {
        Self {
            name,
            is_global: true,
            is_implicit: false,
            is_param: false,
            is_operator: true,
            intercept: None,
        }
    }

    /// An implicit global, synthesized at program scope on first use of
    /// an undeclared name.
    pub fn implicit_global(name: Symbol) -> Self {
        Self {
            name,
            is_global: true,
            is_implicit: true,
            is_param: false,
            is_operator: false,
            intercept: None,
        }
    }

    /// An interceptor for `name` in a `with`/eval scope.
    pub fn interceptor(name: Symbol, intercepted: VarId, reason: InterceptReason) -> Self {
        Self {
            name,
            is_global: false,
            is_implicit: false,
            is_param: false,
            is_operator: false,
            intercept: Some(Intercept {
                intercepted,
                reason,
            }),
        }
    }

    /// True for interceptor vars.
    pub fn is_interceptor(&self) -> bool {
        self.intercept.is_some()
    }
}

/// The operator symbols preloaded into the program scope, in preload
/// order. Prefix `+ - ++ --` are distinguished from their binary twins by
/// the `prefix` marker the parser puts in op strings.
pub const OPERATOR_NAMES: &[&str] = &[
    "prefix+",
    "prefix-",
    "prefix++",
    "prefix--",
    "delete",
    "void",
    "typeof",
    "~",
    "!",
    "||",
    "&&",
    "|",
    "^",
    "&",
    "==",
    "!=",
    "===",
    "!==",
    "<",
    ">",
    "<=",
    ">=",
    "instanceof",
    "in",
    "<<",
    ">>",
    ">>>",
    "+",
    "-",
    "*",
    "/",
    "%",
];
