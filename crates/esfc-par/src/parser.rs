//! The recursive-descent parser: token plumbing and statement grammar.
//!
//! Tokens are pulled from the lexer on demand through a small lookahead
//! buffer. `NewLine` tokens are consumed silently while filling the
//! buffer, but each buffered token remembers whether one preceded it -
//! that flag drives automatic semicolon insertion and the restricted
//! productions (`return`/`continue`/`break` arguments and postfix
//! `++`/`--`).
//!
//! The buffer holds at most two tokens. The second slot exists only for
//! the `ID :` probe that distinguishes a labeled statement from an
//! expression statement.
//!
//! All errors are fatal; there is no recovery.

use std::collections::VecDeque;

use thiserror::Error;

use esfc_lex::{LexError, Lexer, Token, TokenKind};
use esfc_util::{Span, Symbol};

use crate::ast::*;

/// A fatal syntax error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("unexpected token: expected {expected}. {found}")]
    Expected { expected: TokenKind, found: Token },

    #[error("unexpected token: {context}. {found}")]
    Unexpected {
        context: &'static str,
        found: Token,
    },

    #[error("invalid assignment target. {found}")]
    BadAssignmentTarget { found: Token },

    #[error("invalid for-in target. {found}")]
    BadForInTarget { found: Token },

    #[error("for-in declares more than one variable. {found}")]
    ForInMultipleDeclarations { found: Token },

    #[error("newline not allowed between 'throw' and its expression. {found}")]
    NewlineBeforeThrowValue { found: Token },

    #[error("'try' requires a 'catch' or 'finally' clause. {found}")]
    TryWithoutHandlers { found: Token },

    #[error("'switch' allows at most one 'default' clause. {found}")]
    DuplicateDefault { found: Token },
}

impl ParseError {
    /// The source location of the error.
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Expected { found, .. }
            | ParseError::Unexpected { found, .. }
            | ParseError::BadAssignmentTarget { found }
            | ParseError::BadForInTarget { found }
            | ParseError::ForInMultipleDeclarations { found }
            | ParseError::NewlineBeforeThrowValue { found }
            | ParseError::TryWithoutHandlers { found }
            | ParseError::DuplicateDefault { found } => found.span,
        }
    }
}

/// A parsed program plus the number of node ids handed out, so the
/// resolver can size its dense side table.
#[derive(Debug, Clone)]
pub struct ParseTree {
    pub program: Program,
    pub node_count: u32,
}

/// A token waiting in the lookahead buffer.
#[derive(Clone, Copy)]
struct Buffered {
    token: Token,
    newline_before: bool,
}

/// The parser. Owns the lexer so it can request contextual regex lexing.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Buffered>,
    next_node: u32,
}

/// Extracts the value of a token kind that always carries one.
pub(crate) fn token_value(token: &Token) -> Symbol {
    match token.value {
        Some(value) => value,
        None => unreachable!("token {} has no value", token.kind),
    }
}

impl<'a> Parser<'a> {
    /// Creates a parser over a lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            lookahead: VecDeque::with_capacity(2),
            next_node: 0,
        }
    }

    /// Parses a whole program, consuming the parser.
    pub fn parse_program(mut self) -> Result<ParseTree, ParseError> {
        let mut body = Vec::new();
        while self.peek_kind()? != TokenKind::Eof {
            body.push(self.parse_statement()?);
        }
        let program = Program {
            id: self.node(),
            body,
        };
        Ok(ParseTree {
            program,
            node_count: self.next_node,
        })
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn fill(&mut self, n: usize) -> Result<(), ParseError> {
        while self.lookahead.len() <= n {
            let mut newline_before = false;
            let token = loop {
                let token = self.lexer.next()?;
                if token.kind == TokenKind::NewLine {
                    newline_before = true;
                    continue;
                }
                break token;
            };
            self.lookahead.push_back(Buffered {
                token,
                newline_before,
            });
        }
        Ok(())
    }

    pub(crate) fn peek(&mut self) -> Result<Token, ParseError> {
        self.fill(0)?;
        Ok(self.lookahead[0].token)
    }

    pub(crate) fn peek_kind(&mut self) -> Result<TokenKind, ParseError> {
        Ok(self.peek()?.kind)
    }

    fn peek2_kind(&mut self) -> Result<TokenKind, ParseError> {
        self.fill(1)?;
        Ok(self.lookahead[1].token.kind)
    }

    /// True iff a line terminator was skipped just before the current
    /// lookahead token.
    pub(crate) fn at_new_line(&mut self) -> Result<bool, ParseError> {
        self.fill(0)?;
        Ok(self.lookahead[0].newline_before)
    }

    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        self.fill(0)?;
        match self.lookahead.pop_front() {
            Some(buffered) => Ok(buffered.token),
            None => unreachable!("lookahead buffer filled above"),
        }
    }

    pub(crate) fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        let found = self.peek()?;
        if found.kind == expected {
            self.advance()
        } else {
            Err(ParseError::Expected { expected, found })
        }
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.peek_kind()? == kind {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Hands out the next dense node id.
    pub(crate) fn node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Discards the buffered slash token and asks the lexer to re-read it
    /// as a regular expression. Only called from primary position, where
    /// the buffer holds exactly the slash.
    pub(crate) fn relex_regexp(&mut self) -> Result<Token, ParseError> {
        debug_assert_eq!(self.lookahead.len(), 1);
        let slash = self.lookahead[0].token;
        self.lookahead.clear();
        Ok(self.lexer.relex_regexp(slash.pos())?)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Statement terminator: an explicit `;`, or inserted before `}`,
    /// end of input, or after a line terminator.
    fn consume_statement_semicolon(&mut self) -> Result<(), ParseError> {
        let found = self.peek()?;
        match found.kind {
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(())
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ if self.at_new_line()? => Ok(()),
            _ => Err(ParseError::Expected {
                expected: TokenKind::Semicolon,
                found,
            }),
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind()? {
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Semicolon => {
                self.advance()?;
                Ok(Stmt::Empty(EmptyStmt { id: self.node() }))
            }
            TokenKind::Var => {
                let list = self.parse_var_decl_list(false)?;
                self.consume_statement_semicolon()?;
                Ok(Stmt::Expr(ExprStmt {
                    id: self.node(),
                    expr: list,
                }))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            TokenKind::With => self.parse_with(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::Ident if self.peek2_kind()? == TokenKind::Colon => self.parse_labeled(),
            _ => {
                let expr = self.parse_sequence(false)?;
                self.consume_statement_semicolon()?;
                Ok(Stmt::Expr(ExprStmt {
                    id: self.node(),
                    expr,
                }))
            }
        }
    }

    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while self.peek_kind()? != TokenKind::RBrace {
            stmts.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block {
            id: self.node(),
            stmts,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_sequence(false)?;
        self.expect(TokenKind::RParen)?;
        let then = self.parse_statement()?;
        let alt = if self.eat(TokenKind::Else)? {
            self.parse_statement()?
        } else {
            Stmt::Empty(EmptyStmt { id: self.node() })
        };
        Ok(Stmt::If(Box::new(IfStmt {
            id: self.node(),
            cond,
            then,
            alt,
        })))
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        if self.eat(TokenKind::Semicolon)? {
            return self.finish_classic_for(None);
        }

        // First part: a declaration list or an expression with `in`
        // suppressed as a binary operator.
        let init = if self.peek_kind()? == TokenKind::Var {
            self.parse_var_decl_list(true)?
        } else {
            self.parse_sequence(true)?
        };

        if self.peek_kind()? == TokenKind::In {
            self.check_for_in_lhs(&init)?;
            self.advance()?;
            let obj = self.parse_sequence(false)?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_statement()?;
            return Ok(Stmt::ForIn(Box::new(ForInStmt {
                id: self.node(),
                lhs: init,
                obj,
                body,
            })));
        }

        self.expect(TokenKind::Semicolon)?;
        self.finish_classic_for(Some(init))
    }

    fn finish_classic_for(&mut self, init: Option<Expr>) -> Result<Stmt, ParseError> {
        let cond = if self.peek_kind()? == TokenKind::Semicolon {
            // A missing condition defaults to `true`.
            Expr::Bool(BoolLit {
                id: self.node(),
                value: true,
            })
        } else {
            self.parse_sequence(false)?
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.peek_kind()? == TokenKind::RParen {
            None
        } else {
            Some(self.parse_sequence(false)?)
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(Stmt::For(Box::new(ForStmt {
            id: self.node(),
            init,
            cond,
            update,
            body,
        })))
    }

    fn check_for_in_lhs(&mut self, lhs: &Expr) -> Result<(), ParseError> {
        match lhs {
            Expr::VarDecls(list) if list.inits.len() == 1 => Ok(()),
            Expr::VarDecls(_) => Err(ParseError::ForInMultipleDeclarations {
                found: self.peek()?,
            }),
            Expr::VarUse(_) | Expr::Access(_) => Ok(()),
            _ => Err(ParseError::BadForInTarget {
                found: self.peek()?,
            }),
        }
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_sequence(false)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(Stmt::While(Box::new(WhileStmt {
            id: self.node(),
            cond,
            body,
        })))
    }

    fn parse_do(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Do)?;
        let body = self.parse_statement()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_sequence(false)?;
        self.expect(TokenKind::RParen)?;
        self.consume_statement_semicolon()?;
        Ok(Stmt::Do(Box::new(DoStmt {
            id: self.node(),
            body,
            cond,
        })))
    }

    /// Restricted production: a newline after the keyword means no label.
    fn parse_optional_label(&mut self) -> Result<Option<Symbol>, ParseError> {
        if !self.at_new_line()? && self.peek_kind()? == TokenKind::Ident {
            let token = self.advance()?;
            Ok(Some(token_value(&token)))
        } else {
            Ok(None)
        }
    }

    fn parse_continue(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Continue)?;
        let label = self.parse_optional_label()?;
        self.consume_statement_semicolon()?;
        Ok(Stmt::Continue(ContinueStmt {
            id: self.node(),
            label,
        }))
    }

    fn parse_break(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Break)?;
        let label = self.parse_optional_label()?;
        self.consume_statement_semicolon()?;
        Ok(Stmt::Break(BreakStmt {
            id: self.node(),
            label,
        }))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Return)?;
        // Restricted production: a newline means no argument. The missing
        // value is stored as the undefined literal.
        let value = if self.at_new_line()?
            || matches!(
                self.peek_kind()?,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
            ) {
            Expr::Undefined(UndefinedLit { id: self.node() })
        } else {
            self.parse_sequence(false)?
        };
        self.consume_statement_semicolon()?;
        Ok(Stmt::Return(Box::new(ReturnStmt {
            id: self.node(),
            value,
        })))
    }

    fn parse_throw(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Throw)?;
        if self.at_new_line()? {
            return Err(ParseError::NewlineBeforeThrowValue {
                found: self.peek()?,
            });
        }
        let expr = self.parse_sequence(false)?;
        self.consume_statement_semicolon()?;
        Ok(Stmt::Throw(Box::new(ThrowStmt {
            id: self.node(),
            expr,
        })))
    }

    fn parse_try(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Try)?;
        let body = self.parse_block()?;
        let catch = if self.eat(TokenKind::Catch)? {
            self.expect(TokenKind::LParen)?;
            let param_token = self.expect(TokenKind::Ident)?;
            let param = Parameter {
                id: self.node(),
                name: token_value(&param_token),
                span: param_token.span,
            };
            self.expect(TokenKind::RParen)?;
            let catch_body = self.parse_block()?;
            Some(Catch {
                id: self.node(),
                param,
                body: catch_body,
            })
        } else {
            None
        };
        let finally = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if catch.is_none() && finally.is_none() {
            return Err(ParseError::TryWithoutHandlers {
                found: self.peek()?,
            });
        }
        Ok(Stmt::Try(Box::new(TryStmt {
            id: self.node(),
            body,
            catch,
            finally,
        })))
    }

    fn parse_with(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::With)?;
        self.expect(TokenKind::LParen)?;
        let obj = self.parse_sequence(false)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(Stmt::With(Box::new(WithStmt {
            id: self.node(),
            obj,
            body,
        })))
    }

    fn parse_switch(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Switch)?;
        self.expect(TokenKind::LParen)?;
        let key = self.parse_sequence(false)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let mut cases = Vec::new();
        let mut seen_default = false;
        loop {
            match self.peek_kind()? {
                TokenKind::RBrace => {
                    self.advance()?;
                    break;
                }
                TokenKind::Case => {
                    self.advance()?;
                    let test = self.parse_sequence(false)?;
                    self.expect(TokenKind::Colon)?;
                    let body = self.parse_clause_body()?;
                    cases.push(SwitchClause::Case(Case {
                        id: self.node(),
                        test,
                        body,
                    }));
                }
                TokenKind::Default => {
                    let token = self.peek()?;
                    if seen_default {
                        return Err(ParseError::DuplicateDefault { found: token });
                    }
                    seen_default = true;
                    self.advance()?;
                    self.expect(TokenKind::Colon)?;
                    let body = self.parse_clause_body()?;
                    cases.push(SwitchClause::Default(DefaultClause {
                        id: self.node(),
                        body,
                    }));
                }
                _ => {
                    return Err(ParseError::Unexpected {
                        context: "expected 'case', 'default', or '}'",
                        found: self.peek()?,
                    })
                }
            }
        }
        Ok(Stmt::Switch(Box::new(SwitchStmt {
            id: self.node(),
            key,
            cases,
        })))
    }

    /// The statements of one switch clause, up to the next clause or the
    /// closing brace, wrapped in a block.
    fn parse_clause_body(&mut self) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        while !matches!(
            self.peek_kind()?,
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace
        ) {
            stmts.push(self.parse_statement()?);
        }
        Ok(Block {
            id: self.node(),
            stmts,
        })
    }

    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Function)?;
        let name_token = self.expect(TokenKind::Ident)?;
        let name = VariableDeclaration {
            id: self.node(),
            name: token_value(&name_token),
            span: name_token.span,
        };
        let fun = self.parse_fun_rest()?;
        Ok(Stmt::FunctionDecl(Box::new(FunctionDecl {
            id: self.node(),
            name,
            fun,
        })))
    }

    /// Parameter list and body, shared by declarations and expressions.
    pub(crate) fn parse_fun_rest(&mut self) -> Result<Fun, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.peek_kind()? != TokenKind::RParen {
            loop {
                let token = self.expect(TokenKind::Ident)?;
                params.push(Parameter {
                    id: self.node(),
                    name: token_value(&token),
                    span: token.span,
                });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Fun {
            id: self.node(),
            params,
            body,
        })
    }

    fn parse_labeled(&mut self) -> Result<Stmt, ParseError> {
        let label_token = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;
        Ok(Stmt::Labeled(Box::new(LabeledStmt {
            id: self.node(),
            label: token_value(&label_token),
            body,
        })))
    }

    /// `var` declaration list. Never consumes a statement terminator; the
    /// caller decides (statement position does, a `for` head does not).
    pub(crate) fn parse_var_decl_list(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        self.expect(TokenKind::Var)?;
        let mut inits = Vec::new();
        loop {
            let name_token = self.expect(TokenKind::Ident)?;
            let decl = VariableDeclaration {
                id: self.node(),
                name: token_value(&name_token),
                span: name_token.span,
            };
            let value = if self.eat(TokenKind::Assign)? {
                Some(self.parse_assign(no_in)?)
            } else {
                None
            };
            inits.push(VariableInitialization {
                id: self.node(),
                decl,
                value,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(Expr::VarDecls(Box::new(VarDeclList {
            id: self.node(),
            inits,
        })))
    }
}
