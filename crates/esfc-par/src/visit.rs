//! AST traversal.
//!
//! [`Visit`] replaces a class-hierarchy visitor with the usual Rust shape:
//! every method defaults to the matching free `walk_*` function, which
//! recurses into children in declaration order. A visitor overrides only
//! the cases it cares about and calls the walk function itself when it
//! still wants the children.

use crate::ast::*;

/// An AST visitor. All methods default to walking the children.
pub trait Visit {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_catch(&mut self, catch: &Catch) {
        walk_catch(self, catch);
    }

    fn visit_switch_clause(&mut self, clause: &SwitchClause) {
        walk_switch_clause(self, clause);
    }

    fn visit_var_init(&mut self, init: &VariableInitialization) {
        walk_var_init(self, init);
    }

    fn visit_var_decl(&mut self, _decl: &VariableDeclaration) {}

    fn visit_parameter(&mut self, _param: &Parameter) {}

    fn visit_fun(&mut self, fun: &Fun) {
        walk_fun(self, fun);
    }

    fn visit_property(&mut self, property: &Property) {
        walk_property(self, property);
    }

    fn visit_array_element(&mut self, element: &ArrayElement) {
        walk_array_element(self, element);
    }
}

pub fn walk_program<V: Visit + ?Sized>(v: &mut V, program: &Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Block(block) => v.visit_block(block),
        Stmt::Expr(s) => v.visit_expr(&s.expr),
        Stmt::Empty(_) => {}
        Stmt::If(s) => {
            v.visit_expr(&s.cond);
            v.visit_stmt(&s.then);
            v.visit_stmt(&s.alt);
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                v.visit_expr(init);
            }
            v.visit_expr(&s.cond);
            if let Some(update) = &s.update {
                v.visit_expr(update);
            }
            v.visit_stmt(&s.body);
        }
        Stmt::ForIn(s) => {
            v.visit_expr(&s.lhs);
            v.visit_expr(&s.obj);
            v.visit_stmt(&s.body);
        }
        Stmt::While(s) => {
            v.visit_expr(&s.cond);
            v.visit_stmt(&s.body);
        }
        Stmt::Do(s) => {
            v.visit_stmt(&s.body);
            v.visit_expr(&s.cond);
        }
        Stmt::Continue(_) | Stmt::Break(_) => {}
        Stmt::Return(s) => v.visit_expr(&s.value),
        Stmt::Throw(s) => v.visit_expr(&s.expr),
        Stmt::Try(s) => {
            v.visit_block(&s.body);
            if let Some(catch) = &s.catch {
                v.visit_catch(catch);
            }
            if let Some(finally) = &s.finally {
                v.visit_block(finally);
            }
        }
        Stmt::With(s) => {
            v.visit_expr(&s.obj);
            v.visit_stmt(&s.body);
        }
        Stmt::Switch(s) => {
            v.visit_expr(&s.key);
            for clause in &s.cases {
                v.visit_switch_clause(clause);
            }
        }
        Stmt::FunctionDecl(s) => {
            v.visit_var_decl(&s.name);
            v.visit_fun(&s.fun);
        }
        Stmt::Labeled(s) => v.visit_stmt(&s.body),
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, expr: &Expr) {
    match expr {
        Expr::Sequence(e) => {
            for expr in &e.exprs {
                v.visit_expr(expr);
            }
        }
        Expr::VarDecls(e) => {
            for init in &e.inits {
                v.visit_var_init(init);
            }
        }
        Expr::Assign(e) => {
            v.visit_expr(&e.lhs);
            v.visit_expr(&e.rhs);
        }
        Expr::Cond(e) => {
            v.visit_expr(&e.cond);
            v.visit_expr(&e.then);
            v.visit_expr(&e.alt);
        }
        Expr::New(e) => {
            v.visit_expr(&e.target);
            for arg in &e.args {
                v.visit_expr(arg);
            }
        }
        Expr::Call(e) => {
            v.visit_expr(&e.target);
            for arg in &e.args {
                v.visit_expr(arg);
            }
        }
        Expr::Binary(e) => {
            v.visit_expr(&e.lhs);
            v.visit_expr(&e.rhs);
        }
        Expr::Prefix(e) => v.visit_expr(&e.expr),
        Expr::Postfix(e) => v.visit_expr(&e.expr),
        Expr::VarUse(_) | Expr::This(_) => {}
        Expr::Access(e) => {
            v.visit_expr(&e.receiver);
            v.visit_expr(&e.selector);
        }
        Expr::NamedFun(e) => {
            v.visit_var_decl(&e.name);
            v.visit_fun(&e.fun);
        }
        Expr::Fun(e) => v.visit_fun(e),
        Expr::Bool(_)
        | Expr::Str(_)
        | Expr::Num(_)
        | Expr::Null(_)
        | Expr::Undefined(_)
        | Expr::RegExp(_) => {}
        Expr::Array(e) => {
            for element in &e.elements {
                v.visit_array_element(element);
            }
        }
        Expr::Object(e) => {
            for property in &e.properties {
                v.visit_property(property);
            }
        }
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_catch<V: Visit + ?Sized>(v: &mut V, catch: &Catch) {
    v.visit_parameter(&catch.param);
    v.visit_block(&catch.body);
}

pub fn walk_switch_clause<V: Visit + ?Sized>(v: &mut V, clause: &SwitchClause) {
    match clause {
        SwitchClause::Case(case) => {
            v.visit_expr(&case.test);
            v.visit_block(&case.body);
        }
        SwitchClause::Default(default) => v.visit_block(&default.body),
    }
}

pub fn walk_var_init<V: Visit + ?Sized>(v: &mut V, init: &VariableInitialization) {
    v.visit_var_decl(&init.decl);
    if let Some(value) = &init.value {
        v.visit_expr(value);
    }
}

pub fn walk_fun<V: Visit + ?Sized>(v: &mut V, fun: &Fun) {
    for param in &fun.params {
        v.visit_parameter(param);
    }
    v.visit_block(&fun.body);
}

pub fn walk_property<V: Visit + ?Sized>(v: &mut V, property: &Property) {
    v.visit_expr(&property.value);
}

pub fn walk_array_element<V: Visit + ?Sized>(v: &mut V, element: &ArrayElement) {
    v.visit_expr(&element.value);
}
