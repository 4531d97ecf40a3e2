//! Parser tests: statement dispatch, ASI, the for/for-in split, the
//! expression grammar, and the error paths.

use esfc_lex::Lexer;

use crate::ast::*;
use crate::parser::{ParseError, ParseTree, Parser};

fn parse(source: &str) -> ParseTree {
    Parser::new(Lexer::new(source, true))
        .parse_program()
        .expect("parse error")
}

fn parse_err(source: &str) -> ParseError {
    match Parser::new(Lexer::new(source, true)).parse_program() {
        Ok(_) => panic!("expected a parse error for {source:?}"),
        Err(e) => e,
    }
}

/// The single expression statement of a one-statement program.
fn only_expr(source: &str) -> Expr {
    let tree = parse(source);
    assert_eq!(tree.program.body.len(), 1, "program: {source:?}");
    match tree.program.body.into_iter().next() {
        Some(Stmt::Expr(s)) => s.expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

// ==================== STATEMENTS ====================

#[test]
fn test_var_statement_shape() {
    let expr = only_expr("var x = 1;");
    let list = match expr {
        Expr::VarDecls(list) => list,
        other => panic!("expected var list, got {other:?}"),
    };
    assert_eq!(list.inits.len(), 1);
    assert_eq!(list.inits[0].decl.name.as_str(), "x");
    match &list.inits[0].value {
        Some(Expr::Num(n)) => assert_eq!(n.raw.as_str(), "1"),
        other => panic!("expected number initializer, got {other:?}"),
    }
}

#[test]
fn test_var_list_multiple() {
    let expr = only_expr("var a = 1, b, c = d;");
    match expr {
        Expr::VarDecls(list) => {
            assert_eq!(list.inits.len(), 3);
            assert!(list.inits[0].value.is_some());
            assert!(list.inits[1].value.is_none());
        }
        other => panic!("expected var list, got {other:?}"),
    }
}

#[test]
fn test_if_else_shape() {
    let tree = parse("if(a)b;else c;");
    let stmt = &tree.program.body[0];
    let if_stmt = match stmt {
        Stmt::If(s) => s,
        other => panic!("expected if, got {other:?}"),
    };
    assert!(matches!(&if_stmt.cond, Expr::VarUse(v) if v.name.as_str() == "a"));
    assert!(matches!(&if_stmt.then, Stmt::Expr(_)));
    assert!(if_stmt.has_else());
}

#[test]
fn test_if_without_else_has_empty_alt() {
    let tree = parse("if (a) b;");
    match &tree.program.body[0] {
        Stmt::If(s) => {
            assert!(!s.has_else());
            assert!(matches!(s.alt, Stmt::Empty(_)));
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_block_and_empty_statement() {
    let tree = parse("{ a; ; b; }");
    match &tree.program.body[0] {
        Stmt::Block(block) => {
            assert_eq!(block.stmts.len(), 3);
            assert!(matches!(block.stmts[1], Stmt::Empty(_)));
        }
        other => panic!("expected block, got {other:?}"),
    }
}

#[test]
fn test_while_and_do() {
    let tree = parse("while (a) b; do c; while (d);");
    assert!(matches!(tree.program.body[0], Stmt::While(_)));
    assert!(matches!(tree.program.body[1], Stmt::Do(_)));
}

#[test]
fn test_labeled_statement() {
    let tree = parse("loop: while (a) continue loop;");
    match &tree.program.body[0] {
        Stmt::Labeled(labeled) => {
            assert_eq!(labeled.label.as_str(), "loop");
            match &labeled.body {
                Stmt::While(w) => match &w.body {
                    Stmt::Continue(c) => {
                        assert_eq!(c.label.map(|l| l.as_str()), Some("loop"))
                    }
                    other => panic!("expected continue, got {other:?}"),
                },
                other => panic!("expected while, got {other:?}"),
            }
        }
        other => panic!("expected labeled statement, got {other:?}"),
    }
}

#[test]
fn test_break_without_label() {
    let tree = parse("while (a) break;");
    match &tree.program.body[0] {
        Stmt::While(w) => assert!(matches!(&w.body, Stmt::Break(b) if b.label.is_none())),
        other => panic!("expected while, got {other:?}"),
    }
}

#[test]
fn test_try_catch_finally() {
    let tree = parse("try { a; } catch (e) { b; } finally { c; }");
    match &tree.program.body[0] {
        Stmt::Try(t) => {
            let catch = t.catch.as_ref().expect("catch clause");
            assert_eq!(catch.param.name.as_str(), "e");
            assert!(t.finally.is_some());
        }
        other => panic!("expected try, got {other:?}"),
    }
}

#[test]
fn test_try_finally_only() {
    let tree = parse("try { a; } finally { b; }");
    match &tree.program.body[0] {
        Stmt::Try(t) => {
            assert!(t.catch.is_none());
            assert!(t.finally.is_some());
        }
        other => panic!("expected try, got {other:?}"),
    }
}

#[test]
fn test_try_without_handlers_errors() {
    assert!(matches!(
        parse_err("try { a; }"),
        ParseError::TryWithoutHandlers { .. }
    ));
}

#[test]
fn test_switch_clauses() {
    let tree = parse("switch (k) { case 1: a; b; case 2: c; default: d; }");
    match &tree.program.body[0] {
        Stmt::Switch(s) => {
            assert_eq!(s.cases.len(), 3);
            match &s.cases[0] {
                SwitchClause::Case(case) => assert_eq!(case.body.stmts.len(), 2),
                other => panic!("expected case, got {other:?}"),
            }
            assert!(matches!(s.cases[2], SwitchClause::Default(_)));
        }
        other => panic!("expected switch, got {other:?}"),
    }
}

#[test]
fn test_switch_duplicate_default_errors() {
    assert!(matches!(
        parse_err("switch (k) { default: a; default: b; }"),
        ParseError::DuplicateDefault { .. }
    ));
}

#[test]
fn test_with_statement() {
    let tree = parse("with (o) { x = 1; }");
    assert!(matches!(tree.program.body[0], Stmt::With(_)));
}

#[test]
fn test_function_declaration() {
    let tree = parse("function f(x, y) { return x; }");
    match &tree.program.body[0] {
        Stmt::FunctionDecl(decl) => {
            assert_eq!(decl.name.name.as_str(), "f");
            assert_eq!(decl.fun.params.len(), 2);
            assert_eq!(decl.fun.params[1].name.as_str(), "y");
        }
        other => panic!("expected function declaration, got {other:?}"),
    }
}

#[test]
fn test_function_declaration_requires_name() {
    assert!(matches!(
        parse_err("function () {}"),
        ParseError::Expected { .. }
    ));
}

// ==================== ASI AND RESTRICTED PRODUCTIONS ====================

#[test]
fn test_asi_splits_statements_at_newline() {
    let tree = parse("a\nb");
    assert_eq!(tree.program.body.len(), 2);
}

#[test]
fn test_asi_prefix_not_postfix() {
    // `a=b\n++c` is two statements, not a postfix on b.
    let tree = parse("a = b\n++c");
    assert_eq!(tree.program.body.len(), 2);
    match &tree.program.body[0] {
        Stmt::Expr(s) => match &s.expr {
            Expr::Assign(a) => assert!(matches!(&a.rhs, Expr::VarUse(_))),
            other => panic!("expected assignment, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
    match &tree.program.body[1] {
        Stmt::Expr(s) => match &s.expr {
            Expr::Prefix(p) => assert_eq!(p.op.as_str(), "prefix++"),
            other => panic!("expected prefix, got {other:?}"),
        },
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn test_missing_semicolon_without_newline_errors() {
    assert!(matches!(parse_err("a b"), ParseError::Expected { .. }));
}

#[test]
fn test_return_with_newline_has_no_argument() {
    let tree = parse("function f() { return\nx; }");
    let body = match &tree.program.body[0] {
        Stmt::FunctionDecl(decl) => &decl.fun.body.stmts,
        other => panic!("expected function declaration, got {other:?}"),
    };
    assert_eq!(body.len(), 2);
    match &body[0] {
        Stmt::Return(r) => assert!(matches!(r.value, Expr::Undefined(_))),
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn test_empty_return_stores_undefined() {
    let tree = parse("function f() { return; }");
    match &tree.program.body[0] {
        Stmt::FunctionDecl(decl) => match &decl.fun.body.stmts[0] {
            Stmt::Return(r) => assert!(matches!(r.value, Expr::Undefined(_))),
            other => panic!("expected return, got {other:?}"),
        },
        other => panic!("expected function declaration, got {other:?}"),
    }
}

#[test]
fn test_throw_newline_errors() {
    assert!(matches!(
        parse_err("throw\nx;"),
        ParseError::NewlineBeforeThrowValue { .. }
    ));
}

#[test]
fn test_continue_label_dropped_after_newline() {
    let tree = parse("while (a) { continue\nb; }");
    match &tree.program.body[0] {
        Stmt::While(w) => match &w.body {
            Stmt::Block(block) => {
                assert_eq!(block.stmts.len(), 2);
                assert!(matches!(&block.stmts[0], Stmt::Continue(c) if c.label.is_none()));
            }
            other => panic!("expected block, got {other:?}"),
        },
        other => panic!("expected while, got {other:?}"),
    }
}

// ==================== FOR AND FOR-IN ====================

#[test]
fn test_classic_for() {
    let tree = parse("for (var i = 0; i < n; i++) body();");
    match &tree.program.body[0] {
        Stmt::For(f) => {
            assert!(matches!(f.init, Some(Expr::VarDecls(_))));
            assert!(matches!(&f.cond, Expr::Binary(b) if b.op.as_str() == "<"));
            assert!(matches!(f.update, Some(Expr::Postfix(_))));
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn test_for_missing_cond_defaults_to_true() {
    let tree = parse("for (;;) x;");
    match &tree.program.body[0] {
        Stmt::For(f) => {
            assert!(f.init.is_none());
            assert!(matches!(&f.cond, Expr::Bool(b) if b.value));
            assert!(f.update.is_none());
        }
        other => panic!("expected for, got {other:?}"),
    }
}

#[test]
fn test_for_in_with_var() {
    let tree = parse("for (var k in o) x;");
    match &tree.program.body[0] {
        Stmt::ForIn(f) => match &f.lhs {
            Expr::VarDecls(list) => {
                assert_eq!(list.inits.len(), 1);
                assert_eq!(list.inits[0].decl.name.as_str(), "k");
            }
            other => panic!("expected var list, got {other:?}"),
        },
        other => panic!("expected for-in, got {other:?}"),
    }
}

#[test]
fn test_for_in_with_use_and_access() {
    assert!(matches!(
        parse("for (x in o) y;").program.body[0],
        Stmt::ForIn(_)
    ));
    assert!(matches!(
        parse("for (x.y in o) z;").program.body[0],
        Stmt::ForIn(_)
    ));
}

#[test]
fn test_for_in_multiple_declarations_errors() {
    assert!(matches!(
        parse_err("for (var a, b in o) x;"),
        ParseError::ForInMultipleDeclarations { .. }
    ));
}

#[test]
fn test_for_in_bad_target_errors() {
    assert!(matches!(
        parse_err("for (1 in o) x;"),
        ParseError::BadForInTarget { .. }
    ));
}

#[test]
fn test_in_allowed_outside_for_init() {
    let expr = only_expr("a in b;");
    assert!(matches!(expr, Expr::Binary(b) if b.op.as_str() == "in"));
}

// ==================== EXPRESSIONS ====================

#[test]
fn test_precedence_mul_over_add() {
    let expr = only_expr("a + b * c;");
    match expr {
        Expr::Binary(add) => {
            assert_eq!(add.op.as_str(), "+");
            assert!(matches!(&add.rhs, Expr::Binary(mul) if mul.op.as_str() == "*"));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn test_left_associativity() {
    let expr = only_expr("a - b - c;");
    match expr {
        Expr::Binary(outer) => {
            assert_eq!(outer.op.as_str(), "-");
            assert!(matches!(&outer.lhs, Expr::Binary(inner) if inner.op.as_str() == "-"));
            assert!(matches!(&outer.rhs, Expr::VarUse(v) if v.name.as_str() == "c"));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn test_logical_precedence() {
    // || binds loosest: a || (b && c)
    let expr = only_expr("a || b && c;");
    match expr {
        Expr::Binary(or) => {
            assert_eq!(or.op.as_str(), "||");
            assert!(matches!(&or.rhs, Expr::Binary(and) if and.op.as_str() == "&&"));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

#[test]
fn test_assignment_right_associative() {
    let expr = only_expr("a = b = c;");
    match expr {
        Expr::Assign(outer) => {
            assert!(outer.op.is_none());
            assert!(matches!(&outer.rhs, Expr::Assign(_)));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_compound_assignment_drops_equals() {
    let expr = only_expr("a += 1;");
    match expr {
        Expr::Assign(a) => assert_eq!(a.op.map(|s| s.as_str()), Some("+")),
        other => panic!("expected assignment, got {other:?}"),
    }

    let expr = only_expr("a >>>= 1;");
    match expr {
        Expr::Assign(a) => assert_eq!(a.op.map(|s| s.as_str()), Some(">>>")),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_bad_assignment_target_errors() {
    assert!(matches!(
        parse_err("1 = 2;"),
        ParseError::BadAssignmentTarget { .. }
    ));
    assert!(matches!(
        parse_err("a + b = c;"),
        ParseError::BadAssignmentTarget { .. }
    ));
}

#[test]
fn test_assignment_to_access_allowed() {
    let expr = only_expr("a.b = 1;");
    match expr {
        Expr::Assign(a) => assert!(matches!(&a.lhs, Expr::Access(_))),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_conditional_expression() {
    let expr = only_expr("a ? b : c;");
    assert!(matches!(expr, Expr::Cond(_)));
}

#[test]
fn test_sequence_expression() {
    let expr = only_expr("a, b, c;");
    match expr {
        Expr::Sequence(seq) => assert_eq!(seq.exprs.len(), 3),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn test_prefix_operators() {
    for (source, op) in [
        ("typeof x;", "typeof"),
        ("delete x;", "delete"),
        ("void x;", "void"),
        ("~x;", "~"),
        ("!x;", "!"),
        ("+x;", "prefix+"),
        ("-x;", "prefix-"),
        ("++x;", "prefix++"),
        ("--x;", "prefix--"),
    ] {
        let expr = only_expr(source);
        match expr {
            Expr::Prefix(p) => assert_eq!(p.op.as_str(), op, "source: {source:?}"),
            other => panic!("expected prefix for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_postfix_operators() {
    let expr = only_expr("x++;");
    match expr {
        Expr::Postfix(p) => assert_eq!(p.op.as_str(), "++"),
        other => panic!("expected postfix, got {other:?}"),
    }
}

#[test]
fn test_dot_access_normalized_to_string_selector() {
    let expr = only_expr("a.b;");
    match expr {
        Expr::Access(access) => {
            assert!(matches!(&access.receiver, Expr::VarUse(v) if v.name.as_str() == "a"));
            assert!(matches!(&access.selector, Expr::Str(s) if s.raw.as_str() == "\"b\""));
        }
        other => panic!("expected access, got {other:?}"),
    }
}

#[test]
fn test_access_call_chain() {
    // a.b[c]() is a call whose target is a nested access chain.
    let expr = only_expr("a.b[c]();");
    let call = match expr {
        Expr::Call(call) => call,
        other => panic!("expected call, got {other:?}"),
    };
    assert!(call.args.is_empty());
    let outer = match &call.target {
        Expr::Access(access) => access,
        other => panic!("expected access, got {other:?}"),
    };
    assert!(matches!(&outer.selector, Expr::VarUse(v) if v.name.as_str() == "c"));
    match &outer.receiver {
        Expr::Access(inner) => {
            assert!(matches!(&inner.receiver, Expr::VarUse(v) if v.name.as_str() == "a"));
            assert!(matches!(&inner.selector, Expr::Str(s) if s.raw.as_str() == "\"b\""));
        }
        other => panic!("expected access, got {other:?}"),
    }
}

#[test]
fn test_new_with_arguments() {
    let expr = only_expr("new a.b(1);");
    match expr {
        Expr::New(new) => {
            assert!(matches!(&new.target, Expr::Access(_)));
            assert_eq!(new.args.len(), 1);
        }
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn test_new_without_arguments() {
    let expr = only_expr("new a;");
    match expr {
        Expr::New(new) => assert!(new.args.is_empty()),
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn test_new_call_disambiguation() {
    // `new a()()` - the first parens feed the new, the second are a call.
    let expr = only_expr("new a()();");
    match expr {
        Expr::Call(call) => assert!(matches!(&call.target, Expr::New(_))),
        other => panic!("expected call, got {other:?}"),
    }

    // `new new a()()` - both parens feed news.
    let expr = only_expr("new new a()();");
    match expr {
        Expr::New(outer) => assert!(matches!(&outer.target, Expr::New(_))),
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn test_function_expressions() {
    let expr = only_expr("(function () { return 1; });");
    assert!(matches!(expr, Expr::Fun(_)));

    let expr = only_expr("(function g(a) { return a; });");
    match expr {
        Expr::NamedFun(named) => {
            assert_eq!(named.name.name.as_str(), "g");
            assert_eq!(named.fun.params.len(), 1);
        }
        other => panic!("expected named function, got {other:?}"),
    }
}

#[test]
fn test_literal_primaries() {
    assert!(matches!(only_expr("this;"), Expr::This(_)));
    assert!(matches!(only_expr("null;"), Expr::Null(_)));
    assert!(matches!(only_expr("true;"), Expr::Bool(b) if b.value));
    assert!(matches!(only_expr("false;"), Expr::Bool(b) if !b.value));
    assert!(matches!(only_expr("'s';"), Expr::Str(_)));
    assert!(matches!(only_expr("1.5e3;"), Expr::Num(_)));
}

#[test]
fn test_parenthesized_expression() {
    let expr = only_expr("(a + b) * c;");
    match expr {
        Expr::Binary(mul) => {
            assert_eq!(mul.op.as_str(), "*");
            assert!(matches!(&mul.lhs, Expr::Binary(add) if add.op.as_str() == "+"));
        }
        other => panic!("expected binary, got {other:?}"),
    }
}

// ==================== ARRAY AND OBJECT INITIALIZERS ====================

#[test]
fn test_array_initializer_lengths() {
    for (source, length, indices) in [
        ("[];", 0, vec![]),
        ("[a];", 1, vec![0]),
        ("[a, b];", 2, vec![0, 1]),
        ("[,];", 2, vec![]),
        ("[a,];", 1, vec![0]),
        ("[,a];", 2, vec![1]),
        ("[a,,];", 3, vec![0]),
    ] {
        let expr = only_expr(source);
        match expr {
            Expr::Array(array) => {
                assert_eq!(array.length, length, "length of {source:?}");
                let got: Vec<u32> = array.elements.iter().map(|e| e.index).collect();
                assert_eq!(got, indices, "indices of {source:?}");
            }
            other => panic!("expected array for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_object_initializer_key_forms() {
    let expr = only_expr("({ a: 1, \"b\": 2, 3: c });");
    match expr {
        Expr::Object(object) => {
            assert_eq!(object.properties.len(), 3);
            // Identifier keys are promoted to quoted strings.
            match &object.properties[0].name {
                PropertyName::Str(s) => assert_eq!(s.raw.as_str(), "\"a\""),
                other => panic!("expected string key, got {other:?}"),
            }
            match &object.properties[1].name {
                PropertyName::Str(s) => assert_eq!(s.raw.as_str(), "\"b\""),
                other => panic!("expected string key, got {other:?}"),
            }
            assert!(matches!(&object.properties[2].name, PropertyName::Num(_)));
        }
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn test_object_initializer_keyword_key_errors() {
    assert!(matches!(
        parse_err("({ if: 1 });"),
        ParseError::Unexpected { .. }
    ));
}

#[test]
fn test_empty_object() {
    let expr = only_expr("({});");
    match expr {
        Expr::Object(object) => assert!(object.properties.is_empty()),
        other => panic!("expected object, got {other:?}"),
    }
}

// ==================== REGULAR EXPRESSIONS ====================

#[test]
fn test_regex_in_primary_position() {
    let expr = only_expr("x = /ab+c/gi;");
    match expr {
        Expr::Assign(a) => match &a.rhs {
            Expr::RegExp(r) => assert_eq!(r.raw.as_str(), "/ab+c/gi"),
            other => panic!("expected regex, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_regex_statement_head() {
    let expr = only_expr("/re/.test;");
    match expr {
        Expr::Access(access) => {
            assert!(matches!(&access.receiver, Expr::RegExp(r) if r.raw.as_str() == "/re/"));
        }
        other => panic!("expected access, got {other:?}"),
    }
}

#[test]
fn test_slash_assign_starts_regex_in_primary() {
    let expr = only_expr("x = /=a/;");
    match expr {
        Expr::Assign(a) => {
            assert!(matches!(&a.rhs, Expr::RegExp(r) if r.raw.as_str() == "/=a/"));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_slash_is_division_after_operand() {
    let expr = only_expr("a / b;");
    assert!(matches!(expr, Expr::Binary(bin) if bin.op.as_str() == "/"));
}

// ==================== RESERVED WORDS ====================

#[test]
fn test_future_reserved_word_rejected_as_name() {
    assert!(matches!(parse_err("var class;"), ParseError::Expected { .. }));
}

#[test]
fn test_node_ids_are_dense() {
    let tree = parse("var x = 1; f(x);");
    assert!(tree.node_count > 0);
    // Program is a node too, so ids run from 0 to node_count - 1.
    assert!(tree.program.id.0 < tree.node_count);
}
