//! Expression parsing: precedence climbing over ten binary levels.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators |
//! |-------|-----------|
//! | 1 | `\|\|` |
//! | 2 | `&&` |
//! | 3 | `\|` |
//! | 4 | `^` |
//! | 5 | `&` |
//! | 6 | `==`, `!=`, `===`, `!==` |
//! | 7 | `<`, `>`, `<=`, `>=`, `instanceof`, `in` |
//! | 8 | `<<`, `>>`, `>>>` |
//! | 9 | `+`, `-` |
//! | 10 | `*`, `/`, `%` |
//!
//! All binaries are left-associative; assignment is right-associative and
//! sits above the comma (sequence) expression. In a `for` head the `in`
//! operator is suppressed so `for (x in o)` stays unambiguous.

use esfc_lex::TokenKind;
use esfc_util::Symbol;

use crate::ast::*;
use crate::parser::{token_value, ParseError, Parser};

/// Lowest binary precedence level.
const LOWEST_LEVEL: u8 = 1;
/// Highest binary precedence level (multiplicative).
const HIGHEST_LEVEL: u8 = 10;

/// The token kinds of one precedence level.
fn level_ops(level: u8) -> &'static [TokenKind] {
    use TokenKind::*;
    match level {
        1 => &[OrOr],
        2 => &[AndAnd],
        3 => &[Or],
        4 => &[Caret],
        5 => &[And],
        6 => &[EqEq, NotEq, EqEqEq, NotEqEq],
        7 => &[Lt, Gt, LtEq, GtEq, Instanceof, In],
        8 => &[Shl, Shr, UShr],
        9 => &[Plus, Minus],
        10 => &[Star, Slash, Percent],
        _ => &[],
    }
}

impl<'a> Parser<'a> {
    /// Comma-separated expression, the top of the expression grammar.
    pub(crate) fn parse_sequence(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let first = self.parse_assign(no_in)?;
        if self.peek_kind()? != TokenKind::Comma {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(TokenKind::Comma)? {
            exprs.push(self.parse_assign(no_in)?);
        }
        Ok(Expr::Sequence(Box::new(SequenceExpr {
            id: self.node(),
            exprs,
        })))
    }

    /// Right-associative assignment. The left side must be a variable use
    /// or a property access; compound operators drop their trailing `=`.
    pub(crate) fn parse_assign(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let lhs = self.parse_conditional(no_in)?;
        let kind = self.peek_kind()?;
        if !kind.is_assignment_op() {
            return Ok(lhs);
        }
        if !matches!(lhs, Expr::VarUse(_) | Expr::Access(_)) {
            return Err(ParseError::BadAssignmentTarget {
                found: self.peek()?,
            });
        }
        self.advance()?;
        let op = kind.compound_assign_op().map(Symbol::intern);
        let rhs = self.parse_assign(no_in)?;
        Ok(Expr::Assign(Box::new(AssignExpr {
            id: self.node(),
            lhs,
            op,
            rhs,
        })))
    }

    fn parse_conditional(&mut self, no_in: bool) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(LOWEST_LEVEL, no_in)?;
        if !self.eat(TokenKind::Question)? {
            return Ok(cond);
        }
        let then = self.parse_assign(false)?;
        self.expect(TokenKind::Colon)?;
        let alt = self.parse_assign(no_in)?;
        Ok(Expr::Cond(Box::new(CondExpr {
            id: self.node(),
            cond,
            then,
            alt,
        })))
    }

    fn parse_binary(&mut self, level: u8, no_in: bool) -> Result<Expr, ParseError> {
        if level > HIGHEST_LEVEL {
            return self.parse_unary();
        }
        let mut lhs = self.parse_binary(level + 1, no_in)?;
        loop {
            let kind = self.peek_kind()?;
            if !level_ops(level).contains(&kind) {
                break;
            }
            if kind == TokenKind::In && no_in {
                break;
            }
            self.advance()?;
            let op = match kind.binary_op_text() {
                Some(text) => Symbol::intern(text),
                None => unreachable!("level table holds only binary operators"),
            };
            let rhs = self.parse_binary(level + 1, no_in)?;
            lhs = Expr::Binary(Box::new(BinaryExpr {
                id: self.node(),
                op,
                lhs,
                rhs,
            }));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        // `++`/`--`/`+`/`-` carry a `prefix` marker so later passes can
        // tell them from their binary twins.
        let op = match self.peek_kind()? {
            TokenKind::Delete => "delete",
            TokenKind::Void => "void",
            TokenKind::Typeof => "typeof",
            TokenKind::Tilde => "~",
            TokenKind::Not => "!",
            TokenKind::PlusPlus => "prefix++",
            TokenKind::MinusMinus => "prefix--",
            TokenKind::Plus => "prefix+",
            TokenKind::Minus => "prefix-",
            _ => return self.parse_postfix(),
        };
        self.advance()?;
        let expr = self.parse_unary()?;
        Ok(Expr::Prefix(Box::new(PrefixExpr {
            id: self.node(),
            op: Symbol::intern(op),
            expr,
        })))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_lhs_expression()?;
        // Restricted production: postfix ++/-- must not be preceded by a
        // line terminator.
        if !self.at_new_line()? {
            let kind = self.peek_kind()?;
            if matches!(kind, TokenKind::PlusPlus | TokenKind::MinusMinus) {
                self.advance()?;
                let op = if kind == TokenKind::PlusPlus { "++" } else { "--" };
                return Ok(Expr::Postfix(Box::new(PostfixExpr {
                    id: self.node(),
                    op: Symbol::intern(op),
                    expr,
                })));
            }
        }
        Ok(expr)
    }

    /// `new`/call/access disambiguation. All leading `new` tokens are
    /// consumed first; each one captures an argument list only if a `(`
    /// shows up before any is spent on a call, and any left over become
    /// argument-less `new` wrappers.
    fn parse_lhs_expression(&mut self) -> Result<Expr, ParseError> {
        let mut new_count = 0usize;
        while self.peek_kind()? == TokenKind::New {
            self.advance()?;
            new_count += 1;
        }

        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind()? {
                TokenKind::LBracket => {
                    self.advance()?;
                    let selector = self.parse_sequence(false)?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Access(Box::new(AccessExpr {
                        id: self.node(),
                        receiver: expr,
                        selector,
                    }));
                }
                TokenKind::Dot => {
                    // `.name` is normalized to `["name"]`.
                    self.advance()?;
                    let name_token = self.expect(TokenKind::Ident)?;
                    let raw = format!("\"{}\"", token_value(&name_token));
                    let selector = Expr::Str(StrLit {
                        id: self.node(),
                        raw: Symbol::intern(&raw),
                    });
                    expr = Expr::Access(Box::new(AccessExpr {
                        id: self.node(),
                        receiver: expr,
                        selector,
                    }));
                }
                TokenKind::LParen => {
                    let args = self.parse_arguments()?;
                    if new_count > 0 {
                        new_count -= 1;
                        expr = Expr::New(Box::new(NewExpr {
                            id: self.node(),
                            target: expr,
                            args,
                        }));
                    } else {
                        expr = Expr::Call(Box::new(CallExpr {
                            id: self.node(),
                            target: expr,
                            args,
                        }));
                    }
                }
                _ => break,
            }
        }

        while new_count > 0 {
            new_count -= 1;
            expr = Expr::New(Box::new(NewExpr {
                id: self.node(),
                target: expr,
                args: Vec::new(),
            }));
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek_kind()? != TokenKind::RParen {
            loop {
                args.push(self.parse_assign(false)?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Function => self.parse_function_expr(),
            TokenKind::This => {
                self.advance()?;
                Ok(Expr::This(ThisExpr { id: self.node() }))
            }
            TokenKind::Null => {
                self.advance()?;
                Ok(Expr::Null(NullLit { id: self.node() }))
            }
            TokenKind::True | TokenKind::False => {
                self.advance()?;
                Ok(Expr::Bool(BoolLit {
                    id: self.node(),
                    value: token.kind == TokenKind::True,
                }))
            }
            TokenKind::Number => {
                self.advance()?;
                Ok(Expr::Num(NumLit {
                    id: self.node(),
                    raw: token_value(&token),
                }))
            }
            TokenKind::String => {
                self.advance()?;
                Ok(Expr::Str(StrLit {
                    id: self.node(),
                    raw: token_value(&token),
                }))
            }
            TokenKind::Ident => {
                self.advance()?;
                Ok(Expr::VarUse(VarUse {
                    id: self.node(),
                    name: token_value(&token),
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_sequence(false)?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_initializer(),
            TokenKind::LBrace => self.parse_object_initializer(),
            TokenKind::Slash | TokenKind::SlashAssign => {
                // A slash in primary position starts a regex literal.
                let regexp = self.relex_regexp()?;
                Ok(Expr::RegExp(RegExpLit {
                    id: self.node(),
                    raw: token_value(&regexp),
                }))
            }
            _ => Err(ParseError::Unexpected {
                context: "expected an expression",
                found: token,
            }),
        }
    }

    fn parse_function_expr(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::Function)?;
        let name = if self.peek_kind()? == TokenKind::Ident {
            let token = self.advance()?;
            Some(VariableDeclaration {
                id: self.node(),
                name: token_value(&token),
                span: token.span,
            })
        } else {
            None
        };
        let fun = self.parse_fun_rest()?;
        Ok(match name {
            Some(name) => Expr::NamedFun(Box::new(NamedFun {
                id: self.node(),
                name,
                fun,
            })),
            None => Expr::Fun(Box::new(fun)),
        })
    }

    /// Array initializer. Slots are comma-separated and may be empty
    /// (elisions); `[,]` has two empty slots, while a trailing comma after
    /// a present element adds none, so `[a,]` has length 1.
    fn parse_array_initializer(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let mut entries: Vec<Option<Expr>> = Vec::new();
        if self.peek_kind()? != TokenKind::RBracket {
            loop {
                let entry = match self.peek_kind()? {
                    TokenKind::Comma | TokenKind::RBracket => None,
                    _ => Some(self.parse_assign(false)?),
                };
                entries.push(entry);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
            // A trailing empty slot directly after a present element is
            // just a trailing comma, not an elision.
            if entries.len() >= 2
                && entries[entries.len() - 1].is_none()
                && entries[entries.len() - 2].is_some()
            {
                entries.pop();
            }
        }
        self.expect(TokenKind::RBracket)?;

        let length = entries.len() as u32;
        let mut elements = Vec::new();
        for (index, entry) in entries.into_iter().enumerate() {
            if let Some(value) = entry {
                elements.push(ArrayElement {
                    id: self.node(),
                    index: index as u32,
                    value,
                });
            }
        }
        Ok(Expr::Array(Box::new(ArrayInit {
            id: self.node(),
            length,
            elements,
        })))
    }

    /// Object initializer. Identifier keys are promoted to quoted string
    /// literals; string and number keys keep their raw text.
    fn parse_object_initializer(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut properties = Vec::new();
        if self.peek_kind()? != TokenKind::RBrace {
            loop {
                let token = self.peek()?;
                let name = match token.kind {
                    TokenKind::Ident => {
                        self.advance()?;
                        let raw = format!("\"{}\"", token_value(&token));
                        PropertyName::Str(StrLit {
                            id: self.node(),
                            raw: Symbol::intern(&raw),
                        })
                    }
                    TokenKind::String => {
                        self.advance()?;
                        PropertyName::Str(StrLit {
                            id: self.node(),
                            raw: token_value(&token),
                        })
                    }
                    TokenKind::Number => {
                        self.advance()?;
                        PropertyName::Num(NumLit {
                            id: self.node(),
                            raw: token_value(&token),
                        })
                    }
                    _ => {
                        return Err(ParseError::Unexpected {
                            context: "expected a property name",
                            found: token,
                        })
                    }
                };
                self.expect(TokenKind::Colon)?;
                let value = self.parse_assign(false)?;
                properties.push(Property {
                    id: self.node(),
                    name,
                    value,
                });
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Object(Box::new(ObjectInit {
            id: self.node(),
            properties,
        })))
    }
}
