//! Runtime values of the tree-walking interpreter.

use ember_parser::ast::Expr;
use std::fmt;
use std::rc::Rc;

/// Runtime type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    String,
    Char,
    Unit,
    /// Tag of a value that cannot be produced.
    Never,
    Fn,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Int => "Int",
            Type::Bool => "Bool",
            Type::String => "String",
            Type::Char => "Char",
            Type::Unit => "Unit",
            Type::Never => "Never",
            Type::Fn => "Fn",
        })
    }
}

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Char(char),
    /// Value of statements and of blocks without a tail expression.
    Unit,
    Never,
    Fn(Rc<Function>),
    NativeFn(NativeFn),
}

impl Default for Value {
    fn default() -> Self {
        Value::Never
    }
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            Value::Char(_) => Type::Char,
            Value::Unit => Type::Unit,
            Value::Never => Type::Never,
            Value::Fn(_) | Value::NativeFn(_) => Type::Fn,
        }
    }

    /// Attempts to cast the `Value` into a `&str` or `None` if wrong type.
    pub fn cast_to_str(&self) -> Option<&str> {
        match self {
            Value::String(val) => Some(val),
            _ => None,
        }
    }

    pub fn cast_to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(val) => Some(*val),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Char(l), Value::Char(r)) => l == r,
            (Value::Unit, Value::Unit) => true,
            (Value::Never, Value::Never) => true,
            // functions are equal only to themselves
            (Value::Fn(l), Value::Fn(r)) => Rc::ptr_eq(l, r),
            (Value::NativeFn(l), Value::NativeFn(r)) => l.ident == r.ident,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(val) => write!(f, "{}", val),
            Value::Bool(val) => write!(f, "{}", val),
            Value::String(val) => write!(f, "{:?}", val),
            Value::Char(val) => write!(f, "{:?}", val),
            Value::Unit => f.write_str("()"),
            Value::Never => f.write_str("!"),
            Value::Fn(fun) => write!(f, "<fun {}>", fun.ident),
            Value::NativeFn(NativeFn { ident, .. }) => write!(f, "<native fun {}>", ident),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A user function. Created by evaluating a `fun` declaration.
#[derive(Debug)]
pub struct Function {
    pub ident: String,
    pub params: Vec<String>,
    pub body: Expr,
}

impl Function {
    /// Number of arguments that the function accepts.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A function implemented in Rust. Failures are reported with a message.
#[derive(Clone)]
pub struct NativeFn {
    pub ident: String,
    pub arity: usize,
    pub func: &'static dyn Fn(&[Value]) -> Result<Value, String>,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn")
            .field("ident", &self.ident)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Variables that are defined before any user code runs.
#[derive(Debug, Clone, Default)]
pub struct BuiltinVars {
    pub values: Vec<(String, Value)>,
}

impl BuiltinVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_native_fn(
        &mut self,
        ident: &str,
        func: &'static dyn Fn(&[Value]) -> Result<Value, String>,
        arity: usize,
    ) {
        self.values.push((
            ident.to_string(),
            Value::NativeFn(NativeFn {
                ident: ident.to_string(),
                arity,
                func,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_parser::ast::{ExprKind, Literal};

    fn function(ident: &str) -> Rc<Function> {
        Rc::new(Function {
            ident: ident.to_string(),
            params: vec!["a".to_string()],
            body: Expr::new(ExprKind::Literal(Literal::Number(0)), Default::default()),
        })
    }

    fn first(_args: &[Value]) -> Result<Value, String> {
        Ok(Value::Unit)
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("a\"b".to_string()).to_string(), r#""a\"b""#);
        assert_eq!(Value::Char('c').to_string(), "'c'");
        assert_eq!(Value::Unit.to_string(), "()");
        assert_eq!(Value::default().to_string(), "!");
        assert_eq!(Value::Fn(function("f")).to_string(), "<fun f>");
    }

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::Int(1).ty(), Type::Int);
        assert_eq!(Value::Never.ty(), Type::Never);
        assert_eq!(Value::Fn(function("f")).ty(), Type::Fn);
        assert_eq!(Type::String.to_string(), "String");
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::String("ab".into()), Value::String("ab".into()));
        assert_ne!(Value::Int(1), Value::Bool(true));

        let f = function("f");
        assert_eq!(Value::Fn(f.clone()), Value::Fn(f));
        assert_ne!(Value::Fn(function("f")), Value::Fn(function("f")));
    }

    #[test]
    fn test_builtin_vars() {
        let mut builtin_vars = BuiltinVars::new();
        builtin_vars.add_native_fn("first", &first, 1);
        let (ident, value) = &builtin_vars.values[0];
        assert_eq!(ident, "first");
        match value {
            Value::NativeFn(native) => {
                assert_eq!(native.arity, 1);
                assert_eq!((native.func)(&[]), Ok(Value::Unit));
            }
            other => panic!("expected native function, got {}", other),
        }
    }
}
