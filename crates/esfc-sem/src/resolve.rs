//! Scope resolution: two passes over the AST.
//!
//! The collector pass records every declaration into a per-scope map and
//! flags scopes containing a direct `eval` call. The binder pass then
//! resolves every variable reference against the scope stack, lazily
//! synthesizing implicit globals at program scope and interceptors in
//! `with`/eval scopes. Resolution is total: every reference ends up with
//! a var, and the pass emits no errors.
//!
//! A scope is one of `Program`, `Fun`, `NamedFun`, `With`, `Catch`,
//! identified by its node id. Two of them are deliberately partial:
//!
//! - a `Catch` map holds only the exception parameter, and
//! - a `With` map starts empty and only ever receives interceptors,
//!
//! because `var`s inside either body belong to the enclosing function -
//! the collector leaves its current scope unchanged for both bodies.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use esfc_par::ast::*;
use esfc_par::visit::{walk_expr, walk_fun, walk_stmt, Visit};
use esfc_par::ParseTree;
use esfc_util::{IndexVec, Symbol};

use crate::var::{InterceptReason, Var, VarId, OPERATOR_NAMES};

/// Per-scope declared-name map. Insertion order is preserved because var
/// numbering is observable through the annotated printer.
type ScopeMap = IndexMap<Symbol, VarId>;

/// The output of resolution: the var arena and a dense node-to-var table.
#[derive(Debug)]
pub struct Resolution {
    vars: IndexVec<VarId, Var>,
    assignments: IndexVec<NodeId, Option<VarId>>,
}

impl Resolution {
    /// The var a node resolved to, if the node is a variable or operator
    /// reference.
    pub fn var_of(&self, node: NodeId) -> Option<VarId> {
        self.assignments.get(node).copied().flatten()
    }

    /// The descriptor behind an id.
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id]
    }

    /// The descriptor a node resolved to.
    pub fn resolved(&self, node: NodeId) -> Option<&Var> {
        self.var_of(node).map(|id| &self.vars[id])
    }

    /// Number of vars in the arena.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// All vars, in allocation (unique id) order.
    pub fn vars(&self) -> impl Iterator<Item = (VarId, &Var)> {
        self.vars.iter_enumerated()
    }
}

/// Resolves a parsed program.
pub fn resolve(tree: &ParseTree) -> Resolution {
    let mut state = State {
        vars: IndexVec::new(),
        scopes: FxHashMap::default(),
        eval_scopes: FxHashSet::default(),
        with_scopes: FxHashSet::default(),
        assignments: IndexVec::from_elem(None, tree.node_count as usize),
    };

    // Program scope, preloaded with the operator set.
    let program = tree.program.id;
    state.open_scope(program);
    for name in OPERATOR_NAMES {
        let symbol = Symbol::intern(name);
        let id = state.vars.push(Var::operator(symbol));
        state.scope_mut(program).insert(symbol, id);
    }

    let mut collector = Collector {
        state: &mut state,
        current: program,
        program,
        eval: Symbol::intern("eval"),
    };
    collector.visit_program(&tree.program);

    let mut binder = Binder {
        state: &mut state,
        stack: vec![program],
    };
    binder.visit_program(&tree.program);

    Resolution {
        vars: state.vars,
        assignments: state.assignments,
    }
}

/// Shared state of the two passes.
struct State {
    vars: IndexVec<VarId, Var>,
    scopes: FxHashMap<NodeId, ScopeMap>,
    eval_scopes: FxHashSet<NodeId>,
    with_scopes: FxHashSet<NodeId>,
    assignments: IndexVec<NodeId, Option<VarId>>,
}

impl State {
    fn open_scope(&mut self, scope: NodeId) {
        self.scopes.insert(scope, ScopeMap::default());
    }

    fn scope_mut(&mut self, scope: NodeId) -> &mut ScopeMap {
        match self.scopes.get_mut(&scope) {
            Some(map) => map,
            None => unreachable!("scope map opened before use"),
        }
    }

    /// Declares `name` in `scope`, keeping the existing var on redeclaration.
    fn declare(&mut self, scope: NodeId, name: Symbol, var: Var) -> VarId {
        if let Some(&id) = self.scopes[&scope].get(&name) {
            return id;
        }
        let id = self.vars.push(var);
        self.scope_mut(scope).insert(name, id);
        id
    }
}

// ============================================================================
// Pass 1: collect declarations, mark eval scopes
// ============================================================================

struct Collector<'s> {
    state: &'s mut State,
    /// Innermost scope whose map receives declarations. Stays put for
    /// `with` and `catch` bodies.
    current: NodeId,
    program: NodeId,
    eval: Symbol,
}

impl Collector<'_> {
    fn with_scope(&mut self, scope: NodeId, f: impl FnOnce(&mut Self)) {
        let previous = std::mem::replace(&mut self.current, scope);
        f(self);
        self.current = previous;
    }

    fn preload_param(&mut self, scope: NodeId, name: &str) {
        let symbol = Symbol::intern(name);
        self.state.declare(scope, symbol, Var::param(symbol));
    }
}

impl Visit for Collector<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::NamedFun(named) => {
                // The name is hoisted into the named-function scope, so it
                // is visible only inside the expression's own body.
                self.state.open_scope(named.id);
                self.preload_param(named.id, "this");
                self.with_scope(named.id, |this| {
                    this.visit_var_decl(&named.name);
                    this.visit_fun(&named.fun);
                });
            }
            Expr::Call(call) => {
                if let Expr::VarUse(target) = &call.target {
                    if target.name == self.eval {
                        self.state.eval_scopes.insert(self.current);
                    }
                }
                walk_expr(self, expr);
            }
            _ => walk_expr(self, expr),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::With(with) = stmt {
            // Empty map now; interceptors arrive during the binder pass.
            // Declarations inside the body still target the enclosing
            // function scope.
            self.state.open_scope(with.id);
            self.state.with_scopes.insert(with.id);
        }
        walk_stmt(self, stmt);
    }

    fn visit_fun(&mut self, fun: &Fun) {
        self.state.open_scope(fun.id);
        self.preload_param(fun.id, "this");
        self.preload_param(fun.id, "arguments");
        self.with_scope(fun.id, |this| walk_fun(this, fun));
    }

    fn visit_catch(&mut self, catch: &Catch) {
        // Partial scope: only the exception parameter lives here. The body
        // is collected with the current scope unchanged so its `var`s flow
        // to the enclosing function.
        self.state.open_scope(catch.id);
        self.state
            .declare(catch.id, catch.param.name, Var::param(catch.param.name));
        self.visit_block(&catch.body);
    }

    fn visit_var_decl(&mut self, decl: &VariableDeclaration) {
        let is_global = self.current == self.program;
        self.state
            .declare(self.current, decl.name, Var::declared(decl.name, is_global));
    }

    fn visit_parameter(&mut self, param: &Parameter) {
        self.state
            .declare(self.current, param.name, Var::param(param.name));
    }
}

// ============================================================================
// Pass 2: resolve references
// ============================================================================

struct Binder<'s> {
    state: &'s mut State,
    /// The scope chain; index 0 is the program.
    stack: Vec<NodeId>,
}

impl Binder<'_> {
    fn in_scope(&mut self, scope: NodeId, f: impl FnOnce(&mut Self)) {
        self.stack.push(scope);
        f(self);
        self.stack.pop();
    }

    fn record(&mut self, node: NodeId, var: VarId) {
        self.state.assignments[node] = Some(var);
    }

    fn resolve_name(&mut self, name: Symbol) -> VarId {
        self.resolve_from(name, self.stack.len() - 1)
    }

    /// The four-step resolution rule, innermost scope first:
    /// declared here; implicit global at program; interceptor in
    /// `with`/eval scopes; otherwise the enclosing scope.
    fn resolve_from(&mut self, name: Symbol, depth: usize) -> VarId {
        let scope = self.stack[depth];
        if let Some(&id) = self.state.scopes[&scope].get(&name) {
            return id;
        }
        if depth == 0 {
            let id = self.state.vars.push(Var::implicit_global(name));
            self.state.scope_mut(scope).insert(name, id);
            return id;
        }
        let is_with = self.state.with_scopes.contains(&scope);
        if is_with || self.state.eval_scopes.contains(&scope) {
            let intercepted = self.resolve_from(name, depth - 1);
            let reason = if is_with {
                InterceptReason::WithScope(scope)
            } else {
                InterceptReason::EvalScope(scope)
            };
            let id = self
                .state
                .vars
                .push(Var::interceptor(name, intercepted, reason));
            // Future references through this scope share the interceptor.
            self.state.scope_mut(scope).insert(name, id);
            return id;
        }
        self.resolve_from(name, depth - 1)
    }
}

impl Visit for Binder<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::VarUse(use_) => {
                let var = self.resolve_name(use_.name);
                self.record(use_.id, var);
            }
            Expr::NamedFun(named) => {
                self.in_scope(named.id, |this| {
                    this.visit_var_decl(&named.name);
                    this.visit_fun(&named.fun);
                });
            }
            Expr::Binary(binary) => {
                let var = self.resolve_name(binary.op);
                self.record(binary.id, var);
                walk_expr(self, expr);
            }
            Expr::Prefix(prefix) => {
                let var = self.resolve_name(prefix.op);
                self.record(prefix.id, var);
                walk_expr(self, expr);
            }
            _ => walk_expr(self, expr),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::With(with) = stmt {
            // The object is evaluated in the enclosing scope; only the
            // body resolves through the with scope.
            self.visit_expr(&with.obj);
            self.in_scope(with.id, |this| this.visit_stmt(&with.body));
            return;
        }
        walk_stmt(self, stmt);
    }

    fn visit_fun(&mut self, fun: &Fun) {
        self.in_scope(fun.id, |this| walk_fun(this, fun));
    }

    fn visit_catch(&mut self, catch: &Catch) {
        self.in_scope(catch.id, |this| {
            this.visit_parameter(&catch.param);
            this.visit_block(&catch.body);
        });
    }

    fn visit_var_decl(&mut self, decl: &VariableDeclaration) {
        let var = self.resolve_name(decl.name);
        self.record(decl.id, var);
    }

    fn visit_parameter(&mut self, param: &Parameter) {
        let var = self.resolve_name(param.name);
        self.record(param.id, var);
    }
}
