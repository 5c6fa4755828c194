use super::*;
use crate::ast::{FunDecl, VarDecl};

impl<'a> Parser<'a> {
    /* Statements */
    /// Parses a statement.
    /// Returns `Ok(None)` at EOF and for the empty statement `;`.
    pub(super) fn parse_stmt_or_err(&mut self) -> ParseResult<Option<Stmt>> {
        if self.lexer.check(&TokenKind::Eof) || self.lexer.matches(TokenKind::Semi) {
            return Ok(None);
        }

        if let Some(decl) = self.parse_decl()? {
            return Ok(Some(Stmt::Decl(decl)));
        }

        let expr = self.expect_expr("expected statement")?;

        if self.lexer.matches(TokenKind::Semi) {
            Ok(Some(Stmt::ExprStmt(expr)))
        } else if self.lexer.matches(TokenKind::Equals) {
            let location = self.lexer.previous().location;
            if !expr.is_assignable() {
                return Err(SyntaxError::new("invalid assignment target", expr.location));
            }
            let value = self.expect_expr("missing expression after =")?;
            if !self.lexer.matches(TokenKind::Semi) {
                return Err(self.error_here("missing ; after assignment"));
            }
            Ok(Some(Stmt::Assignment {
                target: expr,
                value,
                location,
            }))
        } else {
            Ok(Some(Stmt::Expr(expr)))
        }
    }

    /* Declarations */
    fn parse_decl(&mut self) -> ParseResult<Option<Decl>> {
        if self.lexer.matches(TokenKind::Var) {
            self.parse_var_decl().map(|decl| Some(Decl::Var(decl)))
        } else if self.lexer.matches(TokenKind::Fun) {
            self.parse_fun_decl().map(|decl| Some(Decl::Fun(decl)))
        } else {
            Ok(None)
        }
    }

    /// `var ident = expr;`. The `var` must already be eaten.
    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let location = self.lexer.previous().location;
        let ident = self.expect_ident("expected identifier after var")?;

        if !self.lexer.matches(TokenKind::Equals) {
            return Err(self.error_here("expected = after variable name"));
        }
        let initializer = self.expect_expr("missing definition of var")?;
        if !self.lexer.matches(TokenKind::Semi) {
            return Err(self.error_here("missing ; after var decl"));
        }

        Ok(VarDecl {
            ident,
            initializer,
            location,
        })
    }

    /// `fun ident params... = expr;`. The `fun` must already be eaten.
    fn parse_fun_decl(&mut self) -> ParseResult<FunDecl> {
        let location = self.lexer.previous().location;
        let ident = self.expect_ident("expected identifier after fun")?;

        let mut params = Vec::new();
        while let TokenKind::Identifier(param) = &self.lexer.peek().kind {
            params.push(param.clone());
            self.lexer.advance();
        }

        if !self.lexer.matches(TokenKind::Equals) {
            return Err(self.error_here("expected = after fun parameters"));
        }
        let body = self.expect_expr("missing definition of fun")?;
        if !self.lexer.matches(TokenKind::Semi) {
            return Err(self.error_here("missing ; after fun decl"));
        }

        Ok(FunDecl {
            ident,
            params,
            body,
            location,
        })
    }

    fn expect_ident(&mut self, message: &str) -> ParseResult<String> {
        match &self.lexer.peek().kind {
            TokenKind::Identifier(ident) => {
                let ident = ident.clone();
                self.lexer.advance();
                Ok(ident)
            }
            _ => Err(self.error_here(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt_error(source: &str) -> String {
        let source = source.into();
        let err = Parser::new(&source)
            .parse_stmt_or_err()
            .expect_err("statement should not parse");
        err.to_string()
    }

    fn decl(source: &str) -> Decl {
        let source = source.into();
        let stmt = Parser::new(&source).parse_stmt_or_err();
        match stmt {
            Ok(Some(Stmt::Decl(decl))) => decl,
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_decl_locations() {
        let var = decl("  var x = 1;");
        assert_eq!(var.ident(), "x");
        assert_eq!(var.location(), Location::new(0, 2));

        match decl("fun add a b = a + b;") {
            Decl::Fun(fun) => {
                assert_eq!(fun.ident, "add");
                assert_eq!(fun.params, vec!["a", "b"]);
                assert_eq!(fun.location, Location::new(0, 0));
            }
            other => panic!("expected fun decl, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_location() {
        let source = "x = 1;".into();
        let stmt = Parser::new(&source).parse_stmt_or_err();
        assert_eq!(
            stmt.map(|stmt| stmt.map(|stmt| stmt.location())),
            Ok(Some(Location::new(0, 2)))
        );
    }

    #[test]
    fn test_var_decl_errors() {
        assert_eq!(stmt_error("var 1 = 2;"), "expected identifier after var at 1:5");
        assert_eq!(stmt_error("var x 2;"), "expected = after variable name at 1:7");
        assert_eq!(stmt_error("var x = ;"), "missing definition of var at 1:9");
        assert_eq!(stmt_error("var x = 1"), "missing ; after var decl at 1:10");
    }

    #[test]
    fn test_fun_decl_errors() {
        assert_eq!(stmt_error("fun = 1;"), "expected identifier after fun at 1:5");
        assert_eq!(stmt_error("fun f a, b = 1;"), "expected = after fun parameters at 1:8");
        assert_eq!(stmt_error("fun f ="), "missing definition of fun at 1:8");
        assert_eq!(stmt_error("fun f = 1 var"), "missing ; after fun decl at 1:11");
    }

    #[test]
    fn test_stmt_errors() {
        assert_eq!(stmt_error(")"), "expected statement at 1:1");
        assert_eq!(stmt_error("x = ;"), "missing expression after = at 1:5");
        assert_eq!(stmt_error("x = 1"), "missing ; after assignment at 1:6");
        assert_eq!(stmt_error("f() = 1 }"), "missing ; after assignment at 1:9");
    }
}
