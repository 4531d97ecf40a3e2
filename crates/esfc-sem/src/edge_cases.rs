//! Resolver tests: implicit globals, declarations, interceptors, operator
//! vars, and totality of the resolution map.

use esfc_lex::Lexer;
use esfc_par::ast::*;
use esfc_par::visit::{walk_expr, Visit};
use esfc_par::{ParseTree, Parser};
use esfc_util::Symbol;

use crate::resolve::{resolve, Resolution};
use crate::var::{InterceptReason, VarId, OPERATOR_NAMES};

fn parse(source: &str) -> ParseTree {
    Parser::new(Lexer::new(source, true))
        .parse_program()
        .expect("parse error")
}

fn resolve_source(source: &str) -> (ParseTree, Resolution) {
    let tree = parse(source);
    let resolution = resolve(&tree);
    (tree, resolution)
}

/// Collects the node ids of every kind of reference, in visit order.
#[derive(Default)]
struct Refs {
    uses: Vec<(Symbol, NodeId)>,
    decls: Vec<(Symbol, NodeId)>,
    params: Vec<(Symbol, NodeId)>,
    binaries: Vec<(Symbol, NodeId)>,
    prefixes: Vec<(Symbol, NodeId)>,
    postfixes: Vec<NodeId>,
}

impl Visit for Refs {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::VarUse(u) => self.uses.push((u.name, u.id)),
            Expr::Binary(b) => self.binaries.push((b.op, b.id)),
            Expr::Prefix(p) => self.prefixes.push((p.op, p.id)),
            Expr::Postfix(p) => self.postfixes.push(p.id),
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_var_decl(&mut self, decl: &VariableDeclaration) {
        self.decls.push((decl.name, decl.id));
    }

    fn visit_parameter(&mut self, param: &Parameter) {
        self.params.push((param.name, param.id));
    }
}

fn refs(tree: &ParseTree) -> Refs {
    let mut refs = Refs::default();
    refs.visit_program(&tree.program);
    refs
}

fn uses_of(refs: &Refs, name: &str) -> Vec<NodeId> {
    refs.uses
        .iter()
        .filter(|(n, _)| n.as_str() == name)
        .map(|&(_, id)| id)
        .collect()
}

fn var_of(resolution: &Resolution, node: NodeId) -> VarId {
    resolution.var_of(node).expect("reference not resolved")
}

// ==================== IMPLICIT GLOBALS ====================

#[test]
fn test_implicit_globals_are_distinct() {
    let (tree, resolution) = resolve_source("if(a)b;else c;");
    let refs = refs(&tree);
    assert_eq!(refs.uses.len(), 3);
    let mut ids = Vec::new();
    for &(_, node) in &refs.uses {
        let id = var_of(&resolution, node);
        let var = resolution.var(id);
        assert!(var.is_global && var.is_implicit);
        ids.push(id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_implicit_global_created_once_per_name() {
    let (tree, resolution) = resolve_source("a; a; a;");
    let refs = refs(&tree);
    let uses = uses_of(&refs, "a");
    assert_eq!(uses.len(), 3);
    let first = var_of(&resolution, uses[0]);
    assert!(uses.iter().all(|&u| var_of(&resolution, u) == first));
}

#[test]
fn test_declared_var_is_not_implicit() {
    let (tree, resolution) = resolve_source("var x; x;");
    let refs = refs(&tree);
    let decl_var = var_of(&resolution, refs.decls[0].1);
    let use_var = var_of(&resolution, uses_of(&refs, "x")[0]);
    assert_eq!(decl_var, use_var);
    let var = resolution.var(decl_var);
    assert!(var.is_global && !var.is_implicit);
}

#[test]
fn test_duplicate_declaration_shares_var() {
    let (tree, resolution) = resolve_source("var x; var x;");
    let refs = refs(&tree);
    assert_eq!(refs.decls.len(), 2);
    assert_eq!(
        var_of(&resolution, refs.decls[0].1),
        var_of(&resolution, refs.decls[1].1)
    );
}

// ==================== FUNCTIONS AND PARAMETERS ====================

#[test]
fn test_function_declaration_scenario() {
    let (tree, resolution) = resolve_source("function f(x){return x+1;}");
    let refs = refs(&tree);

    // f is declared at program scope.
    let f = resolution.var(var_of(&resolution, refs.decls[0].1));
    assert_eq!(f.name.as_str(), "f");
    assert!(f.is_global && !f.is_implicit);

    // x resolves to the parameter var both at the declaration and the use.
    let param = var_of(&resolution, refs.params[0].1);
    assert!(resolution.var(param).is_param);
    assert_eq!(var_of(&resolution, uses_of(&refs, "x")[0]), param);

    // + resolves to the program-scope operator var.
    let (op, binary_node) = refs.binaries[0];
    assert_eq!(op.as_str(), "+");
    let plus = resolution.var(var_of(&resolution, binary_node));
    assert!(plus.is_operator && plus.is_global);
}

#[test]
fn test_this_and_arguments_preloaded() {
    let (_, resolution) = resolve_source("function f(){}");
    let names: Vec<&str> = resolution
        .vars()
        .map(|(_, var)| var.name.as_str())
        .collect();
    assert!(names.contains(&"this"));
    assert!(names.contains(&"arguments"));
    let arguments = resolution
        .vars()
        .find(|(_, var)| var.name.as_str() == "arguments")
        .map(|(_, var)| var)
        .expect("arguments var");
    assert!(arguments.is_param);
}

#[test]
fn test_named_function_name_is_internal() {
    let (tree, resolution) = resolve_source("(function h(){h;});");
    let refs = refs(&tree);
    let decl = var_of(&resolution, refs.decls[0].1);
    let use_ = var_of(&resolution, uses_of(&refs, "h")[0]);
    assert_eq!(decl, use_);
    let var = resolution.var(decl);
    assert!(!var.is_global && !var.is_implicit);
}

#[test]
fn test_catch_parameter_is_scoped_vars_flow_out() {
    let (tree, resolution) = resolve_source("try { f(); } catch (e) { e; var v; }");
    let refs = refs(&tree);

    let param = var_of(&resolution, refs.params[0].1);
    assert!(resolution.var(param).is_param);
    assert_eq!(var_of(&resolution, uses_of(&refs, "e")[0]), param);

    // `var v` inside the catch body belongs to the enclosing (program)
    // scope, because catch is only a partial scope.
    let v = resolution.var(var_of(&resolution, refs.decls[0].1));
    assert_eq!(v.name.as_str(), "v");
    assert!(v.is_global);
}

// ==================== WITH AND EVAL INTERCEPTORS ====================

#[test]
fn test_with_interceptor_shared_and_wraps_global() {
    let (tree, resolution) = resolve_source("with(o){x=1;x=2;}");
    let refs = refs(&tree);
    let xs = uses_of(&refs, "x");
    assert_eq!(xs.len(), 2);

    let first = var_of(&resolution, xs[0]);
    // Both uses through the same with scope share one interceptor.
    assert_eq!(first, var_of(&resolution, xs[1]));

    let var = resolution.var(first);
    let intercept = var.intercept.expect("interceptor");
    assert!(matches!(intercept.reason, InterceptReason::WithScope(_)));

    let intercepted = resolution.var(intercept.intercepted);
    assert_eq!(intercepted.name.as_str(), "x");
    assert!(intercepted.is_global && intercepted.is_implicit);
}

#[test]
fn test_with_object_resolves_outside_the_scope() {
    let (tree, resolution) = resolve_source("with(o){}");
    let refs = refs(&tree);
    let o = resolution.var(var_of(&resolution, uses_of(&refs, "o")[0]));
    assert!(o.intercept.is_none(), "with object is not intercepted");
}

#[test]
fn test_eval_marks_scope_and_intercepts() {
    let (tree, resolution) = resolve_source("function g(){eval(\"\");y;}");
    let refs = refs(&tree);
    let y = resolution.var(var_of(&resolution, uses_of(&refs, "y")[0]));
    let intercept = y.intercept.expect("interceptor");
    assert!(matches!(intercept.reason, InterceptReason::EvalScope(_)));

    let intercepted = resolution.var(intercept.intercepted);
    assert_eq!(intercepted.name.as_str(), "y");
    assert!(intercepted.is_global && intercepted.is_implicit);
}

#[test]
fn test_eval_scope_declared_names_not_intercepted() {
    let (tree, resolution) = resolve_source("function g(x){eval(\"\");x;}");
    let refs = refs(&tree);
    let x = resolution.var(var_of(&resolution, uses_of(&refs, "x")[0]));
    assert!(x.is_param && x.intercept.is_none());
}

#[test]
fn test_operator_intercepted_inside_with() {
    // Operators resolve through the scope stack like names, so a with
    // scope wraps them too.
    let (tree, resolution) = resolve_source("with(o){a+b;}");
    let refs = refs(&tree);
    let plus = resolution.var(var_of(&resolution, refs.binaries[0].1));
    let intercept = plus.intercept.expect("interceptor");
    let intercepted = resolution.var(intercept.intercepted);
    assert!(intercepted.is_operator);
}

#[test]
fn test_nested_with_chains_interceptors() {
    let (tree, resolution) = resolve_source("with(a){with(b){x;}}");
    let refs = refs(&tree);
    let inner = resolution.var(var_of(&resolution, uses_of(&refs, "x")[0]));
    let inner_intercept = inner.intercept.expect("inner interceptor");
    let outer = resolution.var(inner_intercept.intercepted);
    let outer_intercept = outer.intercept.expect("outer interceptor");
    let root = resolution.var(outer_intercept.intercepted);
    assert!(root.is_global && root.is_implicit);
}

// ==================== OPERATOR VARS ====================

#[test]
fn test_operator_preload_set() {
    assert_eq!(OPERATOR_NAMES.len(), 32);
    let (_, resolution) = resolve_source("");
    assert_eq!(resolution.var_count(), OPERATOR_NAMES.len());
    for (_, var) in resolution.vars() {
        assert!(var.is_operator && var.is_global);
    }
}

#[test]
fn test_prefix_ops_resolve_to_operator_vars() {
    let (tree, resolution) = resolve_source("typeof a; ++b; -c;");
    let refs = refs(&tree);
    for &(op, node) in &refs.prefixes {
        let var = resolution.var(var_of(&resolution, node));
        assert!(var.is_operator, "op {} not an operator var", op.as_str());
        assert_eq!(var.name, op);
    }
}

#[test]
fn test_postfix_ops_are_not_resolved() {
    let (tree, resolution) = resolve_source("a++;");
    let refs = refs(&tree);
    assert_eq!(refs.postfixes.len(), 1);
    assert!(resolution.var_of(refs.postfixes[0]).is_none());
}

// ==================== TOTALITY ====================

#[test]
fn test_every_reference_is_resolved() {
    let source = r#"
        var a = 1;
        function f(p, q) {
            var local = p + q;
            try { g(); } catch (e) { a = e; }
            with (o) { inner = local; }
            return function nested() { return nested; };
        }
        for (var k in obj) { k++; }
    "#;
    let (tree, resolution) = resolve_source(source);
    let refs = refs(&tree);
    for &(_, node) in refs
        .uses
        .iter()
        .chain(refs.decls.iter())
        .chain(refs.params.iter())
        .chain(refs.binaries.iter())
        .chain(refs.prefixes.iter())
    {
        assert!(
            resolution.var_of(node).is_some(),
            "unresolved reference node {node:?}"
        );
    }
}

#[test]
fn test_var_count_accounting() {
    // operators + declared x + implicit y
    let (_, resolution) = resolve_source("var x; y;");
    assert_eq!(resolution.var_count(), OPERATOR_NAMES.len() + 2);
}
