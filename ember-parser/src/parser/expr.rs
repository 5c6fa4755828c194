use super::*;
use crate::ast::{BinaryOp, Expr, ExprKind, Field, Literal, UnaryOp};
use crate::lexer::Token;

/// Constructor of a binary node for one precedence level.
type BinaryNode = fn(Box<Expr>, BinaryOp, Box<Expr>) -> ExprKind;

/// Parses one precedence level. Returns `Ok(None)` if no expression starts at the lookahead token.
type Level<'a> = fn(&mut Parser<'a>) -> ParseResult<Option<Expr>>;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression. It is an error if no expression starts at the lookahead token.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.expect_expr("expected expression")
    }

    /// Parses an expression or returns `Ok(None)` without consuming anything.
    pub(super) fn parse_expr_opt(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_equality_expr()
    }

    pub(super) fn expect_expr(&mut self, message: &str) -> ParseResult<Expr> {
        match self.parse_expr_opt()? {
            Some(expr) => Ok(expr),
            None => Err(self.error_here(message)),
        }
    }

    /// Parses `operand (op operand)*` and folds it into a left-deep tree.
    fn parse_binary_level(
        &mut self,
        operators: &[(TokenKind, BinaryOp)],
        operand: Level<'a>,
        node: BinaryNode,
    ) -> ParseResult<Option<Expr>> {
        let mut lhs = match operand(self)? {
            Some(lhs) => lhs,
            None => return Ok(None),
        };

        while let Some(op) = self.match_any(operators) {
            let location = self.lexer.previous().location;
            let rhs = operand(self)?.ok_or_else(|| {
                SyntaxError::new(format!("missing right operand of {}", op), location)
            })?;
            lhs = Expr::new(node(Box::new(lhs), op, Box::new(rhs)), location);
        }

        Ok(Some(lhs))
    }

    fn parse_equality_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_level(
            &[
                (TokenKind::EqualsEquals, BinaryOp::Eq),
                (TokenKind::NotEquals, BinaryOp::NotEq),
            ],
            Self::parse_comparison_expr,
            |lhs, op, rhs| ExprKind::Equality { lhs, op, rhs },
        )
    }

    fn parse_comparison_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_level(
            &[
                (TokenKind::LessThan, BinaryOp::Less),
                (TokenKind::LessThanEquals, BinaryOp::LessEq),
                (TokenKind::GreaterThan, BinaryOp::Greater),
                (TokenKind::GreaterThanEquals, BinaryOp::GreaterEq),
            ],
            Self::parse_additive_expr,
            |lhs, op, rhs| ExprKind::Comparison { lhs, op, rhs },
        )
    }

    fn parse_additive_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_level(
            &[
                (TokenKind::Plus, BinaryOp::Add),
                (TokenKind::Minus, BinaryOp::Sub),
            ],
            Self::parse_multiplicative_expr,
            |lhs, op, rhs| ExprKind::Additive { lhs, op, rhs },
        )
    }

    fn parse_multiplicative_expr(&mut self) -> ParseResult<Option<Expr>> {
        self.parse_binary_level(
            &[
                (TokenKind::Asterisk, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Rem),
            ],
            Self::parse_unary_expr,
            |lhs, op, rhs| ExprKind::Multiplicative { lhs, op, rhs },
        )
    }

    /// Parses prefix operators, then falls back to postfix and keyword expressions.
    fn parse_unary_expr(&mut self) -> ParseResult<Option<Expr>> {
        let prefix = self.match_any(&[
            (TokenKind::Minus, UnaryOp::Neg),
            (TokenKind::LogicalNot, UnaryOp::Not),
        ]);
        if let Some(op) = prefix {
            let location = self.lexer.previous().location;
            let operand = self.parse_unary_expr()?.ok_or_else(|| {
                SyntaxError::new(format!("missing operand of {}", op), location)
            })?;
            return Ok(Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                location,
            )));
        }

        if let Some(postfix) = self.parse_postfix_expr()? {
            return Ok(Some(postfix));
        }

        self.parse_keyword_expr()
    }

    /* Expressions.Postfix */
    /// Parses a primary expression followed by any number of calls and field accesses.
    fn parse_postfix_expr(&mut self) -> ParseResult<Option<Expr>> {
        let mut expr = match self.parse_primary_expr()? {
            Some(expr) => expr,
            None => return Ok(None),
        };

        loop {
            if self.lexer.matches(TokenKind::OpenParen) {
                let location = expr.location;
                let args = self.parse_args()?;
                expr = Expr::new(
                    ExprKind::FnCall {
                        callee: Box::new(expr),
                        args,
                    },
                    location,
                );
            } else if self.lexer.matches(TokenKind::Dot) {
                let location = self.lexer.previous().location;
                let field = match self.lexer.peek().kind {
                    TokenKind::Identifier(ref name) => Field::Named(name.clone()),
                    TokenKind::NumberLit(index) => Field::Index(index),
                    _ => return Err(self.error_here("expected field name after .")),
                };
                self.lexer.advance();
                expr = Expr::new(
                    ExprKind::FieldAccess {
                        object: Box::new(expr),
                        field,
                    },
                    location,
                );
            } else {
                break;
            }
        }

        Ok(Some(expr))
    }

    /// Parses a comma separated argument list. The `(` must already be eaten.
    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();

        while !self.lexer.matches(TokenKind::CloseParen) {
            let arg = self.expect_expr("missing expression in argument list")?;
            args.push(arg);

            if !self.lexer.matches(TokenKind::Comma) && !self.lexer.check(&TokenKind::CloseParen) {
                let message = if self.lexer.check(&TokenKind::Eof) {
                    "missing ) to close argument list"
                } else {
                    "expected , between arguments"
                };
                return Err(self.error_here(message));
            }
        }

        Ok(args)
    }

    /* Expressions.Primary */
    /// Parses a literal, an identifier or a parenthesized expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Option<Expr>> {
        let Token { kind, location } = self.lexer.peek().clone();
        let kind = match kind {
            TokenKind::NumberLit(val) => ExprKind::Literal(Literal::Number(val)),
            TokenKind::StringLit(val) => ExprKind::Literal(Literal::String(val)),
            TokenKind::CharLit(val) => ExprKind::Literal(Literal::Char(val)),
            TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Identifier(ident) => ExprKind::VarAccess(ident),
            TokenKind::OpenParen => {
                self.lexer.advance();
                let inner = self.parse_expr_opt()?.ok_or_else(|| {
                    SyntaxError::new("missing expression inside ( )", location)
                })?;
                if !self.lexer.matches(TokenKind::CloseParen) {
                    return Err(self.error_here("missing ) after expression"));
                }
                return Ok(Some(inner));
            }
            TokenKind::Invalid(err) => {
                self.lexer.advance(); // eat the malformed token, its error replaces the syntax error
                return Err(err);
            }
            _ => return Ok(None),
        };

        self.lexer.advance();
        Ok(Some(Expr::new(kind, location)))
    }

    /* Expressions.Keyword */
    fn parse_keyword_expr(&mut self) -> ParseResult<Option<Expr>> {
        if self.lexer.matches(TokenKind::Return) {
            return self.parse_return_expr().map(Some);
        }
        if self.lexer.matches(TokenKind::OpenBrace) {
            return self.parse_block_expr().map(Some);
        }
        if self.lexer.matches(TokenKind::If) {
            return self.parse_if_expr().map(Some);
        }
        Ok(None)
    }

    /// `return [expr]`. The `return` must already be eaten.
    fn parse_return_expr(&mut self) -> ParseResult<Expr> {
        let location = self.lexer.previous().location;
        let returned = self.parse_expr_opt()?;
        Ok(Expr::new(ExprKind::Return(returned.map(Box::new)), location))
    }

    /// Parses the statements of a block up to the closing `}`. The `{` must already be eaten.
    /// Errors inside the block are recorded and recovered from here.
    fn parse_block_expr(&mut self) -> ParseResult<Expr> {
        let location = self.lexer.previous().location;
        let mut stmts = Vec::new();

        let tail = loop {
            if self.lexer.matches(TokenKind::CloseBrace) {
                break None;
            }
            if self.lexer.check(&TokenKind::Eof) {
                return Err(self.error_here("missing } to close block"));
            }

            match self.parse_stmt_or_err() {
                Ok(Some(Stmt::Expr(expr))) => {
                    // an unterminated expression must be the tail of the block
                    if self.lexer.matches(TokenKind::CloseBrace) {
                        break Some(Box::new(expr));
                    }
                    if self.lexer.check(&TokenKind::Eof) {
                        return Err(self.error_here("missing } to close block"));
                    }
                    self.report(self.error_here("expected ; or } after expression"));
                    self.synchronize_block();
                }
                Ok(Some(stmt)) => stmts.push(stmt),
                Ok(None) => {}
                Err(err) => {
                    self.report(err);
                    self.synchronize_block();
                }
            }
        };

        Ok(Expr::new(ExprKind::Block { stmts, tail }, location))
    }

    /// Parses both forms of `if`. The `if` must already be eaten.
    /// - `if cond [then] expr [else expr]`
    /// - `if var x = init; cond [then] expr [else expr]`
    fn parse_if_expr(&mut self) -> ParseResult<Expr> {
        let location = self.lexer.previous().location;

        // Only after the first statement is parsed do we know which form this is.
        let (binder, condition) = match self.parse_stmt_or_err()? {
            Some(Stmt::Expr(condition)) => (None, condition),
            Some(Stmt::Decl(Decl::Var(binder))) => {
                let condition = self.expect_expr("missing condition of if")?;
                (Some(Box::new(binder)), condition)
            }
            _ => {
                return Err(SyntaxError::new(
                    "expected condition or var binding after if",
                    location,
                ))
            }
        };

        self.lexer.matches(TokenKind::Then); // optional
        let then_branch = self.expect_expr("missing then branch of if")?;

        let else_branch = if self.lexer.matches(TokenKind::Else) {
            Some(Box::new(self.expect_expr("missing else branch of if")?))
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::If {
                binder,
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            location,
        ))
    }
}
