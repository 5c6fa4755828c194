//! Front door of the language: parsing and running whole programs or single statements.

pub mod builtin_functions;

use ember_eval::{Interpreter, InterpreterOptions, RuntimeError};
use ember_parser::ast::Decl;
use ember_parser::lexer::TokenKind;
use ember_parser::parser::Parser;
use ember_source::{Source, SyntaxError};
use ember_value::Value;
use log::debug;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{}", join_errors(.0))]
    Syntax(Vec<SyntaxError>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses a whole program. Fails with every syntax error if there is at least one.
pub fn parse_program(source: &str) -> Result<Vec<Decl>, Error> {
    let source = Source::new(source);
    let decls = Parser::new(&source).parse_all();

    if source.has_no_errors() {
        Ok(decls)
    } else {
        Err(Error::Syntax(source.errors.to_vec()))
    }
}

/// Evaluates the declarations of a program in order, then calls `main` if it is declared without parameters.
/// Returns the value of `main`, or Unit if there is none.
pub fn run_program(source: &str, options: InterpreterOptions) -> Result<Value, Error> {
    let decls = parse_program(source)?;
    let mut interpreter = Interpreter::new(&builtin_functions::default_builtin_vars(), options);

    for decl in &decls {
        interpreter.eval_decl(decl)?;
    }

    // the last binding of `main` wins, whatever declared it
    let entry = match interpreter.lookup("main") {
        Some(Value::Fn(main)) if main.arity() == 0 => Value::Fn(main.clone()),
        _ => return Ok(Value::Unit),
    };
    let location = decls
        .iter()
        .rev()
        .find(|decl| decl.ident() == "main")
        .map(Decl::location)
        .unwrap_or_default();
    debug!("calling main");
    Ok(interpreter.call_function(&entry, Vec::new(), location)?)
}

/// Parses every statement in `source` and evaluates them in `interpreter`.
/// Nothing is evaluated if there is a syntax error. Returns the value of the last statement.
pub fn eval_line(interpreter: &mut Interpreter, source: &str) -> Result<Value, Error> {
    let source = Source::new(source);
    let mut parser = Parser::new(&source);

    let mut stmts = Vec::new();
    while !parser.lexer().check(&TokenKind::Eof) {
        if let Some(stmt) = parser.parse_stmt() {
            stmts.push(stmt);
        }
    }
    if !source.has_no_errors() {
        return Err(Error::Syntax(source.errors.to_vec()));
    }

    let mut value = Value::Unit;
    for stmt in &stmts {
        value = interpreter.eval_stmt(stmt)?;
    }
    Ok(value)
}

/// Evaluates `source` in a fresh interpreter with the default built-in functions.
pub fn eval_statement(source: &str) -> Result<Value, Error> {
    let mut interpreter = Interpreter::new(
        &builtin_functions::default_builtin_vars(),
        InterpreterOptions::default(),
    );
    eval_line(&mut interpreter, source)
}
