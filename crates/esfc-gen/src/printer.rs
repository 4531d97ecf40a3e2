//! The printer proper.

use rustc_hash::FxHashMap;

use esfc_par::ast::*;
use esfc_sem::{Resolution, VarId};

/// Annotation sink, invoked after every printed variable or operator
/// reference with the node that was printed.
pub trait Annotate {
    fn annotate(&mut self, out: &mut String, node: NodeId);
}

/// The no-op sink of the base printer.
pub struct Plain;

impl Annotate for Plain {
    fn annotate(&mut self, _out: &mut String, _node: NodeId) {}
}

/// The resolving sink: appends `<k>` where `k` numbers the resolved var
/// by first appearance in the output. Operator vars are not tagged.
pub struct ResolvedTags<'r> {
    resolution: &'r Resolution,
    numbers: FxHashMap<VarId, u32>,
}

impl<'r> ResolvedTags<'r> {
    pub fn new(resolution: &'r Resolution) -> Self {
        Self {
            resolution,
            numbers: FxHashMap::default(),
        }
    }
}

impl Annotate for ResolvedTags<'_> {
    fn annotate(&mut self, out: &mut String, node: NodeId) {
        let Some(var_id) = self.resolution.var_of(node) else {
            return;
        };
        if self.resolution.var(var_id).is_operator {
            return;
        }
        let next = self.numbers.len() as u32;
        let k = *self.numbers.entry(var_id).or_insert(next);
        out.push('<');
        out.push_str(&k.to_string());
        out.push('>');
    }
}

/// Prints a program with the base printer.
pub fn print(program: &Program) -> String {
    Printer::new(Plain).render(program)
}

/// Prints a program with resolved-variable tags.
pub fn print_resolved(program: &Program, resolution: &Resolution) -> String {
    Printer::new(ResolvedTags::new(resolution)).render(program)
}

/// AST-to-text renderer with two-space block indentation.
pub struct Printer<A> {
    out: String,
    indent: usize,
    notes: A,
}

impl<A: Annotate> Printer<A> {
    pub fn new(notes: A) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            notes,
        }
    }

    /// Renders a whole program, consuming the printer.
    pub fn render(mut self, program: &Program) -> String {
        self.out.push_str("/* Program */\n");
        for stmt in &program.body {
            self.stmt(stmt);
        }
        self.out
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn iwrite(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
    }

    /// A statement on its own line(s), starting at the current indent.
    fn stmt(&mut self, stmt: &Stmt) {
        self.iwrite("");
        self.stmt_tail(stmt);
    }

    /// Statement content continuing the current line, ending in a newline.
    fn stmt_tail(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.block_tail(block),
            Stmt::Expr(s) => {
                self.expr(&s.expr);
                self.out.push_str(";\n");
            }
            Stmt::Empty(_) => self.out.push_str(";\n"),
            Stmt::If(s) => self.if_tail(s),
            Stmt::For(s) => {
                self.out.push_str("for (");
                if let Some(init) = &s.init {
                    self.expr(init);
                }
                self.out.push_str("; ");
                self.expr(&s.cond);
                self.out.push(';');
                if let Some(update) = &s.update {
                    self.out.push(' ');
                    self.expr(update);
                }
                self.out.push_str(") ");
                self.stmt_tail(&s.body);
            }
            Stmt::ForIn(s) => {
                self.out.push_str("for (");
                self.expr(&s.lhs);
                self.out.push_str(" in ");
                self.expr(&s.obj);
                self.out.push_str(") ");
                self.stmt_tail(&s.body);
            }
            Stmt::While(s) => {
                self.out.push_str("while (");
                self.expr(&s.cond);
                self.out.push_str(") ");
                self.stmt_tail(&s.body);
            }
            Stmt::Do(s) => {
                self.out.push_str("do ");
                self.stmt_tail(&s.body);
                self.iwrite("while (");
                self.expr(&s.cond);
                self.out.push_str(");\n");
            }
            Stmt::Continue(s) => {
                self.out.push_str("continue");
                if let Some(label) = s.label {
                    self.out.push(' ');
                    self.out.push_str(label.as_str());
                }
                self.out.push_str(";\n");
            }
            Stmt::Break(s) => {
                self.out.push_str("break");
                if let Some(label) = s.label {
                    self.out.push(' ');
                    self.out.push_str(label.as_str());
                }
                self.out.push_str(";\n");
            }
            Stmt::Return(s) => {
                self.out.push_str("return ");
                self.expr(&s.value);
                self.out.push_str(";\n");
            }
            Stmt::Throw(s) => {
                self.out.push_str("throw ");
                self.expr(&s.expr);
                self.out.push_str(";\n");
            }
            Stmt::Try(s) => {
                self.out.push_str("try ");
                self.block_tail(&s.body);
                if let Some(catch) = &s.catch {
                    self.iwrite("catch (");
                    self.out.push_str(catch.param.name.as_str());
                    self.notes.annotate(&mut self.out, catch.param.id);
                    self.out.push_str(") ");
                    self.block_tail(&catch.body);
                }
                if let Some(finally) = &s.finally {
                    self.iwrite("finally ");
                    self.block_tail(finally);
                }
            }
            Stmt::With(s) => {
                self.out.push_str("with (");
                self.expr(&s.obj);
                self.out.push_str(") ");
                self.stmt_tail(&s.body);
            }
            Stmt::Switch(s) => {
                self.out.push_str("switch (");
                self.expr(&s.key);
                self.out.push_str(") {\n");
                self.indent += 1;
                for clause in &s.cases {
                    match clause {
                        SwitchClause::Case(case) => {
                            self.iwrite("case ");
                            self.expr(&case.test);
                            self.out.push_str(":\n");
                            self.clause_stmts(&case.body);
                        }
                        SwitchClause::Default(default) => {
                            self.iwrite("default:\n");
                            self.clause_stmts(&default.body);
                        }
                    }
                }
                self.indent -= 1;
                self.iwrite("}\n");
            }
            Stmt::FunctionDecl(s) => {
                self.out.push_str("function ");
                self.out.push_str(s.name.name.as_str());
                self.notes.annotate(&mut self.out, s.name.id);
                self.params(&s.fun.params);
                self.out.push(' ');
                self.block_tail(&s.fun.body);
            }
            Stmt::Labeled(s) => {
                self.out.push_str(s.label.as_str());
                self.out.push_str(": ");
                self.stmt_tail(&s.body);
            }
        }
    }

    fn if_tail(&mut self, s: &IfStmt) {
        self.out.push_str("if (");
        self.expr(&s.cond);
        self.out.push_str(") ");
        // A then branch that is itself an if must be braced when this if
        // has an else, or the else would rebind on re-parse.
        if s.has_else() && matches!(s.then, Stmt::If(_)) {
            self.out.push_str("{\n");
            self.indent += 1;
            self.stmt(&s.then);
            self.indent -= 1;
            self.iwrite("}\n");
        } else {
            self.stmt_tail(&s.then);
        }
        if s.has_else() {
            self.iwrite("else ");
            self.stmt_tail(&s.alt);
        }
    }

    /// `{ ... }` in statement position, newline after the brace.
    fn block_tail(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.iwrite("}\n");
    }

    /// `{ ... }` in expression position: no trailing newline, the caller
    /// continues the line.
    fn block_inline(&mut self, block: &Block) {
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.iwrite("}");
    }

    /// Switch clause statements, printed without an artificial brace pair
    /// so the output re-parses to the same clause body.
    fn clause_stmts(&mut self, body: &Block) {
        self.indent += 1;
        for stmt in &body.stmts {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn params(&mut self, params: &[Parameter]) {
        self.out.push('(');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(param.name.as_str());
            self.notes.annotate(&mut self.out, param.id);
        }
        self.out.push(')');
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Sequence(e) => {
                self.out.push('(');
                for (i, item) in e.exprs.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item);
                }
                self.out.push(')');
            }
            Expr::VarDecls(e) => {
                self.out.push_str("var ");
                for (i, init) in e.inits.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(init.decl.name.as_str());
                    self.notes.annotate(&mut self.out, init.decl.id);
                    if let Some(value) = &init.value {
                        self.out.push_str(" = ");
                        self.expr(value);
                    }
                }
            }
            Expr::Assign(e) => {
                self.out.push('(');
                self.expr(&e.lhs);
                self.out.push(' ');
                if let Some(op) = e.op {
                    self.out.push_str(op.as_str());
                }
                self.out.push_str("= ");
                self.expr(&e.rhs);
                self.out.push(')');
            }
            Expr::Cond(e) => {
                self.out.push('(');
                self.expr(&e.cond);
                self.out.push_str(" ? ");
                self.expr(&e.then);
                self.out.push_str(" : ");
                self.expr(&e.alt);
                self.out.push(')');
            }
            Expr::New(e) => {
                self.out.push_str("(new ");
                self.expr(&e.target);
                self.args(&e.args);
                self.out.push(')');
            }
            Expr::Call(e) => {
                self.out.push('(');
                self.expr(&e.target);
                self.args(&e.args);
                self.out.push(')');
            }
            Expr::Binary(e) => {
                self.out.push('(');
                self.expr(&e.lhs);
                self.out.push(' ');
                self.out.push_str(e.op.as_str());
                self.notes.annotate(&mut self.out, e.id);
                self.out.push(' ');
                self.expr(&e.rhs);
                self.out.push(')');
            }
            Expr::Prefix(e) => {
                self.out.push('(');
                let op = e.op.as_str();
                let op = op.strip_prefix("prefix").unwrap_or(op);
                self.out.push_str(op);
                self.notes.annotate(&mut self.out, e.id);
                if op.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                    self.out.push(' ');
                }
                self.expr(&e.expr);
                self.out.push(')');
            }
            Expr::Postfix(e) => {
                self.out.push('(');
                self.expr(&e.expr);
                self.out.push_str(e.op.as_str());
                self.out.push(')');
            }
            Expr::VarUse(e) => {
                self.out.push_str(e.name.as_str());
                self.notes.annotate(&mut self.out, e.id);
            }
            Expr::This(_) => self.out.push_str("this"),
            Expr::Access(e) => {
                self.expr(&e.receiver);
                self.out.push('[');
                self.expr(&e.selector);
                self.out.push(']');
            }
            Expr::NamedFun(e) => {
                self.out.push_str("(function ");
                self.out.push_str(e.name.name.as_str());
                self.notes.annotate(&mut self.out, e.name.id);
                self.params(&e.fun.params);
                self.out.push(' ');
                self.block_inline(&e.fun.body);
                self.out.push(')');
            }
            Expr::Fun(e) => {
                self.out.push_str("(function ");
                self.params(&e.params);
                self.out.push(' ');
                self.block_inline(&e.body);
                self.out.push(')');
            }
            Expr::Bool(e) => self.out.push_str(if e.value { "true" } else { "false" }),
            Expr::Str(e) => self.out.push_str(e.raw.as_str()),
            Expr::Num(e) => self.out.push_str(e.raw.as_str()),
            Expr::Null(_) => self.out.push_str("null"),
            Expr::Undefined(_) => self.out.push_str("(void 0)"),
            Expr::Array(e) => {
                self.out.push('[');
                let mut next_element = e.elements.iter().peekable();
                for slot in 0..e.length {
                    if slot > 0 {
                        self.out.push_str(", ");
                    }
                    if let Some(element) = next_element.peek() {
                        if element.index == slot {
                            let element = match next_element.next() {
                                Some(element) => element,
                                None => unreachable!("peeked element vanished"),
                            };
                            self.expr(&element.value);
                        }
                    }
                }
                self.out.push(']');
            }
            Expr::Object(e) => {
                self.out.push_str("({");
                for (i, property) in e.properties.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match &property.name {
                        PropertyName::Str(s) => self.out.push_str(s.raw.as_str()),
                        PropertyName::Num(n) => self.out.push_str(n.raw.as_str()),
                    }
                    self.out.push_str(": ");
                    self.expr(&property.value);
                }
                self.out.push_str("})");
            }
            Expr::RegExp(e) => self.out.push_str(e.raw.as_str()),
        }
    }

    fn args(&mut self, args: &[Expr]) {
        self.out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esfc_lex::Lexer;
    use esfc_par::{ParseTree, Parser};
    use esfc_sem::resolve;

    fn parse(source: &str) -> ParseTree {
        Parser::new(Lexer::new(source, true))
            .parse_program()
            .expect("parse error")
    }

    fn printed(source: &str) -> String {
        print(&parse(source).program)
    }

    fn printed_resolved(source: &str) -> String {
        let tree = parse(source);
        let resolution = resolve(&tree);
        print_resolved(&tree.program, &resolution)
    }

    // ==================== BASE PRINTER ====================

    #[test]
    fn test_var_statement() {
        assert_eq!(printed("var x=1;"), "/* Program */\nvar x = 1;\n");
    }

    #[test]
    fn test_var_list() {
        assert_eq!(printed("var a=1,b;"), "/* Program */\nvar a = 1, b;\n");
    }

    #[test]
    fn test_if_else() {
        assert_eq!(printed("if(a)b;else c;"), "/* Program */\nif (a) b;\nelse c;\n");
    }

    #[test]
    fn test_if_without_else() {
        assert_eq!(printed("if(a)b;"), "/* Program */\nif (a) b;\n");
    }

    #[test]
    fn test_dangling_else_braced() {
        let out = printed("if (a) if (b) c; else e; else d;");
        assert_eq!(
            out,
            "/* Program */\nif (a) {\n  if (b) c;\n  else e;\n}\nelse d;\n"
        );
    }

    #[test]
    fn test_block_indentation() {
        assert_eq!(
            printed("{a;{b;}}"),
            "/* Program */\n{\n  a;\n  {\n    b;\n  }\n}\n"
        );
    }

    #[test]
    fn test_access_call_chain() {
        assert_eq!(printed("a.b[c]();"), "/* Program */\n(a[\"b\"][c]());\n");
    }

    #[test]
    fn test_empty_return_prints_void() {
        assert_eq!(
            printed("function f(){return;}"),
            "/* Program */\nfunction f() {\n  return (void 0);\n}\n"
        );
    }

    #[test]
    fn test_classic_for() {
        assert_eq!(
            printed("for(var i=0;i<n;i++)b;"),
            "/* Program */\nfor (var i = 0; (i < n); (i++)) b;\n"
        );
    }

    #[test]
    fn test_empty_for_head() {
        assert_eq!(printed("for(;;)x;"), "/* Program */\nfor (; true;) x;\n");
    }

    #[test]
    fn test_for_in() {
        assert_eq!(
            printed("for(var k in o)b;"),
            "/* Program */\nfor (var k in o) b;\n"
        );
    }

    #[test]
    fn test_array_elisions() {
        assert_eq!(printed("[a,b];"), "/* Program */\n[a, b];\n");
        assert_eq!(printed("[,];"), "/* Program */\n[, ];\n");
        assert_eq!(printed("[a,];"), "/* Program */\n[a];\n");
        assert_eq!(printed("[a,,];"), "/* Program */\n[a, , ];\n");
        assert_eq!(printed("[,a];"), "/* Program */\n[, a];\n");
        assert_eq!(printed("[];"), "/* Program */\n[];\n");
    }

    #[test]
    fn test_object_initializer() {
        assert_eq!(printed("({a:1});"), "/* Program */\n({\"a\": 1});\n");
        assert_eq!(
            printed("({'x':1, 2:y});"),
            "/* Program */\n({'x': 1, 2: y});\n"
        );
        assert_eq!(printed("({});"), "/* Program */\n({});\n");
    }

    #[test]
    fn test_prefix_spacing() {
        assert_eq!(printed("typeof x;"), "/* Program */\n(typeof x);\n");
        assert_eq!(printed("++x;"), "/* Program */\n(++x);\n");
        assert_eq!(printed("+x;"), "/* Program */\n(+x);\n");
        assert_eq!(printed("~x;"), "/* Program */\n(~x);\n");
        assert_eq!(printed("delete x.y;"), "/* Program */\n(delete x[\"y\"]);\n");
    }

    #[test]
    fn test_postfix() {
        assert_eq!(printed("x++;"), "/* Program */\n(x++);\n");
        assert_eq!(printed("x--;"), "/* Program */\n(x--);\n");
    }

    #[test]
    fn test_new_expressions() {
        assert_eq!(printed("new X;"), "/* Program */\n(new X());\n");
        assert_eq!(printed("new X(1,2);"), "/* Program */\n(new X(1, 2));\n");
    }

    #[test]
    fn test_assignment_forms() {
        assert_eq!(printed("a=b;"), "/* Program */\n(a = b);\n");
        assert_eq!(printed("a+=1;"), "/* Program */\n(a += 1);\n");
        assert_eq!(printed("a>>>=1;"), "/* Program */\n(a >>>= 1);\n");
    }

    #[test]
    fn test_sequence_and_conditional() {
        assert_eq!(printed("a,b;"), "/* Program */\n(a, b);\n");
        assert_eq!(printed("a?b:c;"), "/* Program */\n(a ? b : c);\n");
    }

    #[test]
    fn test_raw_literals_preserved() {
        assert_eq!(printed("'s\\n';"), "/* Program */\n's\\n';\n");
        assert_eq!(printed("1.5e3;"), "/* Program */\n1.5e3;\n");
        assert_eq!(printed("x=/a[/]b/gi;"), "/* Program */\n(x = /a[/]b/gi);\n");
        assert_eq!(printed("null;this;true;"), "/* Program */\nnull;\nthis;\ntrue;\n");
    }

    #[test]
    fn test_do_while() {
        assert_eq!(printed("do x; while(a);"), "/* Program */\ndo x;\nwhile (a);\n");
    }

    #[test]
    fn test_switch() {
        assert_eq!(
            printed("switch(k){case 1: a; default: b;}"),
            "/* Program */\nswitch (k) {\n  case 1:\n    a;\n  default:\n    b;\n}\n"
        );
    }

    #[test]
    fn test_try_catch_finally() {
        assert_eq!(
            printed("try{a;}catch(e){b;}finally{c;}"),
            "/* Program */\ntry {\n  a;\n}\ncatch (e) {\n  b;\n}\nfinally {\n  c;\n}\n"
        );
    }

    #[test]
    fn test_with() {
        assert_eq!(printed("with(o)x;"), "/* Program */\nwith (o) x;\n");
    }

    #[test]
    fn test_labeled_and_break() {
        assert_eq!(
            printed("loop: while(a) break loop;"),
            "/* Program */\nloop: while (a) break loop;\n"
        );
    }

    #[test]
    fn test_function_expressions() {
        assert_eq!(
            printed("(function(){});"),
            "/* Program */\n(function () {\n});\n"
        );
        assert_eq!(
            printed("(function g(a){return a;});"),
            "/* Program */\n(function g(a) {\n  return a;\n});\n"
        );
    }

    // ==================== ROUND TRIP ====================

    #[test]
    fn test_round_trip_idempotent() {
        let corpus = [
            "var x = 1;",
            "if (a) b; else c;",
            "if (a) if (b) c; else e; else d;",
            "for (var i = 0; i < n; i++) f(i);",
            "for (;;) break;",
            "for (var k in o) g(k);",
            "a.b[c]();",
            "new new X()();",
            "x = y = z + 1 * -w;",
            "[1, , 'two', ];",
            "({a: 1, 'b': [2], 3: {c: d}});",
            "try { f(); } catch (e) { g(e); } finally { h(); }",
            "switch (k) { case 1: a; b; default: c; }",
            "with (o) { x = 1; }",
            "function f(a, b) { return a in b; }",
            "(function named() { return named; })();",
            "do { x--; } while (x > 0);",
            "loop: while (true) { continue loop; }",
            "throw (a, b);",
            "x = /ab[/]c/gi;",
            "typeof void delete a.b;",
            "a = b\n++c",
        ];
        for source in corpus {
            let once = print(&parse(source).program);
            let twice = print(&parse(&once).program);
            assert_eq!(once, twice, "round trip not idempotent for {source:?}");
        }
    }

    // ==================== RESOLVED TAGS ====================

    #[test]
    fn test_tags_number_by_first_appearance() {
        assert_eq!(
            printed_resolved("var x = 1; x; y;"),
            "/* Program */\nvar x<0> = 1;\nx<0>;\ny<1>;\n"
        );
    }

    #[test]
    fn test_tags_on_function_and_params() {
        assert_eq!(
            printed_resolved("function f(x){return x+1;}"),
            "/* Program */\nfunction f<0>(x<1>) {\n  return (x<1> + 1);\n}\n"
        );
    }

    #[test]
    fn test_operator_vars_untagged() {
        let out = printed_resolved("a + b;");
        assert_eq!(out, "/* Program */\n(a<0> + b<1>);\n");
    }

    #[test]
    fn test_intercepted_operator_gets_tag() {
        // Inside a with scope the operator resolves to an interceptor,
        // which is not operator-flagged, so it is tagged.
        let out = printed_resolved("with(o){a+b;}");
        assert!(out.contains("+<"), "output: {out}");
    }

    #[test]
    fn test_catch_param_tagged() {
        let out = printed_resolved("try{f();}catch(e){e;}");
        assert!(out.contains("catch (e<"), "output: {out}");
    }
}
