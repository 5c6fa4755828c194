//! Recursive descent parser with panic-mode error recovery.

use crate::ast::{Decl, Stmt};
use crate::lexer::{Lexer, TokenKind};
use ember_source::{Location, Source, SyntaxError};
use log::debug;
use std::cell::Ref;

mod expr;
mod stmt;

/// Parse functions return the node or the first syntax error met.
/// Errors are recorded and recovered from by the caller (block and top level).
pub type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            lexer: Lexer::new(source.content),
            source,
        }
    }

    /// The underlying token stream. Gives access to the lexical errors.
    pub fn lexer(&self) -> &Lexer<'a> {
        &self.lexer
    }

    /// Syntax errors recorded so far, in source order.
    pub fn errors(&self) -> Ref<'_, [SyntaxError]> {
        self.source.errors.errors()
    }
}

impl<'a> Parser<'a> {
    /// Parses declarations until EOF.
    /// Every error is recorded and followed by synchronization, so parsing always reaches the end.
    pub fn parse_all(&mut self) -> Vec<Decl> {
        let mut decls = Vec::new();

        while !self.lexer.matches(TokenKind::Eof) {
            let location = self.lexer.peek().location;
            match self.parse_stmt_or_err() {
                Ok(Some(Stmt::Decl(decl))) => decls.push(decl),
                Ok(Some(_)) => {
                    self.report(SyntaxError::new("expected declaration at top level", location))
                }
                Ok(None) => {}
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        decls
    }

    /// Parses a single statement.
    /// Returns `None` if there was nothing to parse or if a syntax error was recorded.
    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        match self.parse_stmt_or_err() {
            Ok(stmt) => stmt,
            Err(err) => {
                self.report(err);
                self.synchronize();
                None
            }
        }
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    /// Adds an error to the source's error reporter.
    fn report(&self, error: SyntaxError) {
        debug!("syntax error: {}", error);
        self.source.errors.add_error(error);
    }

    /// Creates an error located at the lookahead token.
    fn error_here(&self, message: &str) -> SyntaxError {
        SyntaxError::new(message, self.lexer.peek().location)
    }

    fn peek_location(&self) -> Location {
        self.lexer.peek().location
    }

    /// Eats the lookahead token if it has the same kind as one of the table entries and returns the mapped value.
    fn match_any<T: Copy>(&mut self, table: &[(TokenKind, T)]) -> Option<T> {
        for (kind, value) in table {
            if self.lexer.check(kind) {
                self.lexer.advance();
                return Some(*value);
            }
        }
        None
    }

    /// Top level recovery: skips past the next `;` or up to the next `var`/`fun`.
    fn synchronize(&mut self) {
        self.skip_to_boundary(false);
    }

    /// Block level recovery: like [`Self::synchronize`] but also stops before `}`
    /// so the enclosing block can still be closed.
    fn synchronize_block(&mut self) {
        self.skip_to_boundary(true);
    }

    fn skip_to_boundary(&mut self, stop_at_close_brace: bool) {
        let mut skipped = 0;
        while !self.lexer.matches(TokenKind::Semi) && !self.lexer.check(&TokenKind::Eof) {
            match &self.lexer.peek().kind {
                TokenKind::Var | TokenKind::Fun => break,
                TokenKind::CloseBrace if stop_at_close_brace => break,
                TokenKind::Invalid(err) => self.report(err.clone()),
                _ => {}
            }
            self.lexer.advance();
            skipped += 1;
        }
        debug!(
            "synchronized at {} after skipping {} tokens",
            self.peek_location(),
            skipped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{print_decls, print_stmt};
    use insta::assert_snapshot;

    /// Parses one statement that must be free of errors and returns its tree.
    fn stmt(source: &str) -> String {
        let source = source.into();
        let mut parser = Parser::new(&source);
        let stmt = parser.parse_stmt();
        assert!(source.has_no_errors(), "{}", source.errors);
        assert!(parser.lexer.matches(TokenKind::Eof));
        stmt.map(|stmt| print_stmt(&stmt)).unwrap_or_default()
    }

    /// Parses one erroneous statement and returns the error messages.
    fn stmt_errors(source: &str) -> Vec<String> {
        let source = source.into();
        let mut parser = Parser::new(&source);
        assert!(parser.parse_stmt().is_none());
        assert!(parser.lexer.matches(TokenKind::Eof));
        let errors: Vec<_> = parser.errors().iter().map(ToString::to_string).collect();
        errors
    }

    /// Parses a whole program and returns the declaration trees and the error messages.
    fn all(source: &str) -> (Vec<Decl>, Vec<String>) {
        let source = source.into();
        let mut parser = Parser::new(&source);
        let decls = parser.parse_all();
        assert!(parser.lexer.matches(TokenKind::Eof));
        let errors = parser.errors().iter().map(ToString::to_string).collect();
        (decls, errors)
    }

    #[test]
    fn test_empty() {
        assert_eq!(stmt(""), "");
        assert_eq!(stmt(";"), "");
    }

    #[test]
    fn test_var_decl() {
        assert_snapshot!(stmt("var x = 0;"), @r###"
        var x
          0
        "###);
    }

    #[test]
    fn test_fun_decl() {
        assert_snapshot!(stmt("fun main argc argv = 0;"), @r###"
        fun main(argc, argv)
          0
        "###);
    }

    #[test]
    fn test_assignment() {
        assert_snapshot!(stmt("x = true;"), @r###"
        =
          x
          true
        "###);
    }

    #[test]
    fn test_block() {
        let source = r#"
{
  var x = 0;
  x = "mama";
  'i'
}
"#;
        assert_snapshot!(stmt(source), @r###"
        {}
          var x
            0
          =
            x
            "mama"
          'i'
        "###);
    }

    #[test]
    fn test_if_with_binder() {
        let source = r#"
fun IsCorrect answer = {
  if var true_ans = TheAnswer(time.now()); answer == true_ans {
    return true;
  };
  false
};
"#;
        assert_snapshot!(stmt(source), @r###"
        fun IsCorrect(answer)
          {}
            ;
              if
                var true_ans
                  call
                    TheAnswer
                    call
                      .now
                        time
                ==
                  answer
                  true_ans
                {}
                  ;
                    return
                      true
            false
        "###);
    }

    #[test]
    fn test_if_then_else() {
        assert_snapshot!(stmt(r#"if x == 1 then "one" else "other""#), @r###"
        if
          ==
            x
            1
          "one"
          else
            "other"
        "###);
    }

    #[test]
    fn test_stmt_errors() {
        assert_eq!(
            stmt_errors("var x = (2 + 2 * 2;"),
            vec!["missing ) after expression at 1:19"]
        );
        assert_eq!(
            stmt_errors("var x = 2 + "),
            vec!["missing right operand of + at 1:11"]
        );
        assert_eq!(
            stmt_errors("7 - ()"),
            vec!["missing expression inside ( ) at 1:5"]
        );
        assert_eq!(
            stmt_errors("{\n2 + 2;\ntrue\n"),
            vec!["missing } to close block at 4:1"]
        );
        assert_eq!(
            stmt_errors("{\n2 + 2;\n"),
            vec!["missing } to close block at 3:1"]
        );
        assert_eq!(
            stmt_errors("f(7, '',)"),
            vec!["lex error: empty char literal at 1:6"]
        );
        assert_eq!(
            stmt_errors("fun main argc '' = 0"),
            vec![
                "expected = after fun parameters at 1:15",
                "lex error: empty char literal at 1:15",
            ]
        );
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(stmt_errors("1 = 2;"), vec!["invalid assignment target at 1:1"]);
        assert_eq!(
            stmt_errors("-x = 2;"),
            vec!["invalid assignment target at 1:1"]
        );
    }

    #[test]
    fn test_if_requires_condition_or_binder() {
        assert_eq!(
            stmt_errors("if x = 1; true then 1"),
            vec!["expected condition or var binding after if at 1:1"]
        );
    }

    #[test]
    fn test_parse_all() {
        let source = r#"
# it's five
var x = 5;

fun main argc argv = {
  printf("Hello, %s
", argv(1));
  # return 0
};


var str = "boom";
"#;
        let (decls, errors) = all(source);
        assert!(errors.is_empty(), "{:?}", errors);
        let idents: Vec<_> = decls.iter().map(Decl::ident).collect();
        assert_eq!(idents, vec!["x", "main", "str"]);
    }

    #[test]
    fn test_parse_all_errors() {
        let source = r#"
var x = 2 + 2 * 2

fun main = {
  var msg = "hello";
  var x = 2 * (5 + 1;

  var y = -x
  (y / 2) # consumes together with above var decl
};"#;
        let (decls, errors) = all(source);
        assert_eq!(
            errors,
            vec![
                "missing ; after var decl at 4:1",
                "missing ) after expression at 6:21",
                "missing ; after var decl at 10:1",
            ]
        );
        assert_snapshot!(print_decls(&decls), @r###"
        fun main()
          {}
            var msg
              "hello"
        "###);

        let source = r#"
fun foo = {
  if true else
}

var y = 5;;
"#;
        let (decls, errors) = all(source);
        assert_eq!(
            errors,
            vec![
                "missing then branch of if at 3:11",
                "missing ; after fun decl at 6:1",
            ]
        );
        let idents: Vec<_> = decls.iter().map(Decl::ident).collect();
        assert_eq!(idents, vec!["y"]);
    }

    #[test]
    fn test_top_level_requires_declarations() {
        let (decls, errors) = all("x = 1; 3 - 2 - 1; var y = 2;");
        assert_eq!(
            errors,
            vec![
                "expected declaration at top level at 1:1",
                "expected declaration at top level at 1:8",
            ]
        );
        assert_eq!(decls.len(), 1);
    }

    #[test]
    fn test_block_recovery_keeps_closing_brace() {
        // recovery inside the block stops before `}` so `f` is still declared
        let (decls, errors) = all("fun f = { var = 3 }; var g = 1;");
        assert_eq!(errors, vec!["expected identifier after var at 1:15"]);
        let idents: Vec<_> = decls.iter().map(Decl::ident).collect();
        assert_eq!(idents, vec!["f", "g"]);

        // recovery at the top level runs through `}` up to the next `;`
        let (decls, errors) = all("var = 3 }; var g = 1;");
        assert_eq!(errors, vec!["expected identifier after var at 1:5"]);
        let idents: Vec<_> = decls.iter().map(Decl::ident).collect();
        assert_eq!(idents, vec!["g"]);
    }

    #[test]
    fn test_block_recovery_continues() {
        let (decls, errors) = all("fun f = { 1 + ; 2 };");
        assert_eq!(errors, vec!["missing right operand of + at 1:13"]);
        assert_snapshot!(print_decls(&decls), @r###"
        fun f()
          {}
            2
        "###);
    }

    #[test]
    fn test_invalid_tokens_reported_while_synchronizing() {
        let (decls, errors) = all("var x = 1 ? 2; var y = 3;");
        assert_eq!(
            errors,
            vec![
                "missing ; after var decl at 1:11",
                "lex error: unexpected symbol ? at 1:11",
            ]
        );
        assert_eq!(decls.len(), 1);

        let (decls, errors) = all("fun f = { 1 + ; 2 ? 3; 4 };");
        assert_eq!(
            errors,
            vec![
                "missing right operand of + at 1:13",
                "expected ; or } after expression at 1:19",
                "lex error: unexpected symbol ? at 1:19",
            ]
        );
        assert_snapshot!(print_decls(&decls), @r###"
        fun f()
          {}
            4
        "###);
    }
}
