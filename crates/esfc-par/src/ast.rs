//! AST node definitions.
//!
//! The tree is a closed family of tagged variants split into statements
//! and expressions, plus a handful of shared nodes (`Catch`,
//! `SwitchClause`, `ArrayElement`, `Property`, `VariableInitialization`)
//! that are neither.
//!
//! Every node carries a dense [`NodeId`] assigned by the parser at
//! construction. Node identity matters because the resolver keys its
//! output by it; nothing else in the tree is shared.

use esfc_util::{define_idx, Span, Symbol};

define_idx!(
    /// Dense id of an AST node, unique within one parse.
    NodeId
);

/// The root of a parsed program.
#[derive(Debug, Clone)]
pub struct Program {
    pub id: NodeId,
    /// Top-level statements in source order.
    pub body: Vec<Stmt>,
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// Statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `{ ... }`
    Block(Block),

    /// An expression in statement position, including `var` lists.
    Expr(ExprStmt),

    /// A bare `;`.
    Empty(EmptyStmt),

    /// `if (cond) then else alt`
    If(Box<IfStmt>),

    /// `for (init; cond; update) body`
    For(Box<ForStmt>),

    /// `for (lhs in obj) body`
    ForIn(Box<ForInStmt>),

    /// `while (cond) body`
    While(Box<WhileStmt>),

    /// `do body while (cond);`
    Do(Box<DoStmt>),

    /// `continue label?;`
    Continue(ContinueStmt),

    /// `break label?;`
    Break(BreakStmt),

    /// `return value?;`
    Return(Box<ReturnStmt>),

    /// `throw expr;`
    Throw(Box<ThrowStmt>),

    /// `try body catch? finally?`
    Try(Box<TryStmt>),

    /// `with (obj) body`
    With(Box<WithStmt>),

    /// `switch (key) { cases }`
    Switch(Box<SwitchStmt>),

    /// `function name(params) { ... }` in statement position.
    FunctionDecl(Box<FunctionDecl>),

    /// `label: body`
    Labeled(Box<LabeledStmt>),
}

/// Braced statement list.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
}

/// Expression statement.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub id: NodeId,
    pub expr: Expr,
}

/// Empty statement.
#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub id: NodeId,
}

/// If statement. `alt` is always present; an absent `else` branch is an
/// [`EmptyStmt`], and [`IfStmt::has_else`] distinguishes the two.
#[derive(Debug, Clone)]
pub struct IfStmt {
    pub id: NodeId,
    pub cond: Expr,
    pub then: Stmt,
    pub alt: Stmt,
}

impl IfStmt {
    /// True if an `else` branch was written.
    pub fn has_else(&self) -> bool {
        !matches!(self.alt, Stmt::Empty(_))
    }
}

/// Classic three-part `for`. A missing condition parses as literal `true`.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub id: NodeId,
    pub init: Option<Expr>,
    pub cond: Expr,
    pub update: Option<Expr>,
    pub body: Stmt,
}

/// `for (lhs in obj)`. The left side is either a single-declaration `var`
/// list, a variable use, or a property access; the parser enforces this.
#[derive(Debug, Clone)]
pub struct ForInStmt {
    pub id: NodeId,
    pub lhs: Expr,
    pub obj: Expr,
    pub body: Stmt,
}

/// While loop.
#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub id: NodeId,
    pub cond: Expr,
    pub body: Stmt,
}

/// Do-while loop.
#[derive(Debug, Clone)]
pub struct DoStmt {
    pub id: NodeId,
    pub body: Stmt,
    pub cond: Expr,
}

/// Continue statement.
#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub id: NodeId,
    pub label: Option<Symbol>,
}

/// Break statement.
#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub id: NodeId,
    pub label: Option<Symbol>,
}

/// Return statement. An argument-less `return` stores
/// [`Expr::Undefined`].
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub id: NodeId,
    pub value: Expr,
}

/// Throw statement.
#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub id: NodeId,
    pub expr: Expr,
}

/// Try statement; at least one of `catch`/`finally` is present.
#[derive(Debug, Clone)]
pub struct TryStmt {
    pub id: NodeId,
    pub body: Block,
    pub catch: Option<Catch>,
    pub finally: Option<Block>,
}

/// Catch clause. A scope: the exception parameter is visible only inside
/// the clause body, while `var`s inside it belong to the enclosing
/// function.
#[derive(Debug, Clone)]
pub struct Catch {
    pub id: NodeId,
    pub param: Parameter,
    pub body: Block,
}

/// With statement. A scope that intercepts every name resolved through it.
#[derive(Debug, Clone)]
pub struct WithStmt {
    pub id: NodeId,
    pub obj: Expr,
    pub body: Stmt,
}

/// Switch statement; at most one clause is a `default`.
#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub id: NodeId,
    pub key: Expr,
    pub cases: Vec<SwitchClause>,
}

/// One arm of a switch.
#[derive(Debug, Clone)]
pub enum SwitchClause {
    Case(Case),
    Default(DefaultClause),
}

/// `case expr: body`
#[derive(Debug, Clone)]
pub struct Case {
    pub id: NodeId,
    pub test: Expr,
    pub body: Block,
}

/// `default: body`
#[derive(Debug, Clone)]
pub struct DefaultClause {
    pub id: NodeId,
    pub body: Block,
}

/// Function declaration. The name declares a variable in the enclosing
/// scope.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub id: NodeId,
    pub name: VariableDeclaration,
    pub fun: Fun,
}

/// Labeled statement.
#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub id: NodeId,
    pub label: Symbol,
    pub body: Stmt,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Comma expression: `a, b, c`
    Sequence(Box<SequenceExpr>),

    /// `var a = 1, b` - a declaration list in expression position.
    VarDecls(Box<VarDeclList>),

    /// Assignment, plain or compound.
    Assign(Box<AssignExpr>),

    /// `cond ? then : alt`
    Cond(Box<CondExpr>),

    /// `new target(args)`
    New(Box<NewExpr>),

    /// `target(args)`
    Call(Box<CallExpr>),

    /// Binary operation; `op` is the exact operator text.
    Binary(Box<BinaryExpr>),

    /// Prefix operation; `++`/`--`/`+`/`-` carry a `prefix` marker in the
    /// op text so later passes can tell them from their binary twins.
    Prefix(Box<PrefixExpr>),

    /// Postfix `++`/`--`.
    Postfix(Box<PostfixExpr>),

    /// An identifier in expression position.
    VarUse(VarUse),

    /// `this`
    This(ThisExpr),

    /// `receiver[selector]`; `.name` access is normalized to a string
    /// selector by the parser.
    Access(Box<AccessExpr>),

    /// Named function expression; the name is visible only inside it.
    NamedFun(Box<NamedFun>),

    /// Anonymous function expression.
    Fun(Box<Fun>),

    /// `true` / `false`
    Bool(BoolLit),

    /// String literal, raw slice with quotes.
    Str(StrLit),

    /// Number literal, raw slice.
    Num(NumLit),

    /// `null`
    Null(NullLit),

    /// The undefined value; only synthesized for argument-less `return`.
    Undefined(UndefinedLit),

    /// Array initializer with elision-aware length.
    Array(Box<ArrayInit>),

    /// Object initializer.
    Object(Box<ObjectInit>),

    /// Regular-expression literal, raw slice with slashes and flags.
    RegExp(RegExpLit),
}

/// Comma expression.
#[derive(Debug, Clone)]
pub struct SequenceExpr {
    pub id: NodeId,
    pub exprs: Vec<Expr>,
}

/// Variable declaration list.
#[derive(Debug, Clone)]
pub struct VarDeclList {
    pub id: NodeId,
    pub inits: Vec<VariableInitialization>,
}

/// One `name` or `name = value` entry of a declaration list.
#[derive(Debug, Clone)]
pub struct VariableInitialization {
    pub id: NodeId,
    pub decl: VariableDeclaration,
    pub value: Option<Expr>,
}

/// A declared variable name.
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub name: Symbol,
    pub span: Span,
}

/// A declared parameter name.
#[derive(Debug, Clone)]
pub struct Parameter {
    pub id: NodeId,
    pub name: Symbol,
    pub span: Span,
}

/// Assignment. `op` is `None` for plain `=`, otherwise the compound
/// operator text without its trailing `=`.
#[derive(Debug, Clone)]
pub struct AssignExpr {
    pub id: NodeId,
    pub lhs: Expr,
    pub op: Option<Symbol>,
    pub rhs: Expr,
}

/// Conditional expression.
#[derive(Debug, Clone)]
pub struct CondExpr {
    pub id: NodeId,
    pub cond: Expr,
    pub then: Expr,
    pub alt: Expr,
}

/// `new` expression. `new target` without parens has an empty `args`.
#[derive(Debug, Clone)]
pub struct NewExpr {
    pub id: NodeId,
    pub target: Expr,
    pub args: Vec<Expr>,
}

/// Call expression.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub id: NodeId,
    pub target: Expr,
    pub args: Vec<Expr>,
}

/// Binary expression.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub id: NodeId,
    pub op: Symbol,
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Prefix expression.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub id: NodeId,
    pub op: Symbol,
    pub expr: Expr,
}

/// Postfix expression.
#[derive(Debug, Clone)]
pub struct PostfixExpr {
    pub id: NodeId,
    pub op: Symbol,
    pub expr: Expr,
}

/// An identifier use.
#[derive(Debug, Clone)]
pub struct VarUse {
    pub id: NodeId,
    pub name: Symbol,
    pub span: Span,
}

/// `this`.
#[derive(Debug, Clone)]
pub struct ThisExpr {
    pub id: NodeId,
}

/// Property access in bracket form.
#[derive(Debug, Clone)]
pub struct AccessExpr {
    pub id: NodeId,
    pub receiver: Expr,
    pub selector: Expr,
}

/// Named function expression. A scope of its own: the name is declared
/// inside it, not in the enclosing scope.
#[derive(Debug, Clone)]
pub struct NamedFun {
    pub id: NodeId,
    pub name: VariableDeclaration,
    pub fun: Fun,
}

/// Function: parameters and body. A scope.
#[derive(Debug, Clone)]
pub struct Fun {
    pub id: NodeId,
    pub params: Vec<Parameter>,
    pub body: Block,
}

/// Boolean literal.
#[derive(Debug, Clone)]
pub struct BoolLit {
    pub id: NodeId,
    pub value: bool,
}

/// String literal; `raw` includes the surrounding quotes.
#[derive(Debug, Clone)]
pub struct StrLit {
    pub id: NodeId,
    pub raw: Symbol,
}

/// Number literal; `raw` is the source slice.
#[derive(Debug, Clone)]
pub struct NumLit {
    pub id: NodeId,
    pub raw: Symbol,
}

/// Null literal.
#[derive(Debug, Clone)]
pub struct NullLit {
    pub id: NodeId,
}

/// Undefined literal.
#[derive(Debug, Clone)]
pub struct UndefinedLit {
    pub id: NodeId,
}

/// Array initializer. `length` counts every slot including elisions;
/// `elements` is sorted by `index` with unique indices.
#[derive(Debug, Clone)]
pub struct ArrayInit {
    pub id: NodeId,
    pub length: u32,
    pub elements: Vec<ArrayElement>,
}

/// A present array slot.
#[derive(Debug, Clone)]
pub struct ArrayElement {
    pub id: NodeId,
    pub index: u32,
    pub value: Expr,
}

/// Object initializer.
#[derive(Debug, Clone)]
pub struct ObjectInit {
    pub id: NodeId,
    pub properties: Vec<Property>,
}

/// One `key: value` property. Identifier keys are promoted to quoted
/// string literals by the parser.
#[derive(Debug, Clone)]
pub struct Property {
    pub id: NodeId,
    pub name: PropertyName,
    pub value: Expr,
}

/// A property key literal.
#[derive(Debug, Clone)]
pub enum PropertyName {
    Str(StrLit),
    Num(NumLit),
}

/// Regular-expression literal; `raw` includes slashes and flags.
#[derive(Debug, Clone)]
pub struct RegExpLit {
    pub id: NodeId,
    pub raw: Symbol,
}
