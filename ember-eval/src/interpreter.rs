//! Tree-walking evaluation of the syntax tree.

use crate::environment::Environment;
use crate::error::RuntimeError;
use ember_parser::ast::{BinaryOp, Decl, Expr, ExprKind, Literal, Stmt, UnaryOp, VarDecl};
use ember_source::Location;
use ember_value::{BuiltinVars, Function, Value};
use log::trace;
use std::convert::TryFrom;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Maximum number of nested user function calls.
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_call_depth: 256,
        }
    }
}

/// Why evaluation of an expression stopped early.
enum Unwind {
    /// `return` propagating to the nearest call.
    Return(Value, Location),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

type EvalResult<T> = Result<T, Unwind>;

/// Converts an unwind that escaped every call into an error.
fn top_level<T>(result: EvalResult<T>) -> Result<T, RuntimeError> {
    result.map_err(|unwind| match unwind {
        Unwind::Return(_, location) => RuntimeError::ReturnOutsideFunction { location },
        Unwind::Error(err) => err,
    })
}

pub struct Interpreter {
    env: Environment,
    options: InterpreterOptions,
    call_depth: usize,
}

impl Interpreter {
    pub fn new(builtin_vars: &BuiltinVars, options: InterpreterOptions) -> Self {
        let mut env = Environment::new();
        for (ident, value) in &builtin_vars.values {
            env.define(ident.as_str(), value.clone());
        }
        Self {
            env,
            options,
            call_depth: 0,
        }
    }

    /// Looks up a binding visible from the current scope.
    pub fn lookup(&self, ident: &str) -> Option<&Value> {
        self.env.get(ident)
    }

    /// Evaluates a declaration, binding its name in the current scope.
    pub fn eval_decl(&mut self, decl: &Decl) -> Result<(), RuntimeError> {
        top_level(self.decl(decl))
    }

    /// Evaluates a statement. Only an unterminated expression produces a value other than Unit.
    pub fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Value, RuntimeError> {
        top_level(self.stmt(stmt))
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        top_level(self.expr(expr))
    }

    /// Calls a user or native function value with already evaluated arguments.
    pub fn call_function(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        location: Location,
    ) -> Result<Value, RuntimeError> {
        top_level(self.call(callee, args, location))
    }
}

/* Statements */
impl Interpreter {
    fn stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        match stmt {
            Stmt::Expr(expr) => self.expr(expr),
            Stmt::ExprStmt(expr) => {
                self.expr(expr)?;
                Ok(Value::Unit)
            }
            Stmt::Assignment {
                target,
                value,
                location,
            } => {
                self.assign(target, value, *location)?;
                Ok(Value::Unit)
            }
            Stmt::Decl(decl) => {
                self.decl(decl)?;
                Ok(Value::Unit)
            }
        }
    }

    fn assign(&mut self, target: &Expr, value: &Expr, location: Location) -> EvalResult<()> {
        let ident = match &target.kind {
            ExprKind::VarAccess(ident) => ident,
            ExprKind::FieldAccess { .. } => {
                return Err(Self::unsupported("assignment to a field", location))
            }
            ExprKind::FnCall { .. } => {
                return Err(Self::unsupported("assignment to a call result", location))
            }
            _ => return Err(Self::unsupported("assignment to this expression", location)),
        };

        let value = self.expr(value)?;
        if self.env.assign(ident, value) {
            Ok(())
        } else {
            Err(RuntimeError::UndefinedVariable {
                ident: ident.clone(),
                location: target.location,
            }
            .into())
        }
    }

    fn decl(&mut self, decl: &Decl) -> EvalResult<()> {
        match decl {
            Decl::Var(decl) => self.var_decl(decl),
            Decl::Fun(decl) => {
                let function = Function {
                    ident: decl.ident.clone(),
                    params: decl.params.clone(),
                    body: decl.body.clone(),
                };
                self.env
                    .define(decl.ident.as_str(), Value::Fn(Rc::new(function)));
                Ok(())
            }
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> EvalResult<()> {
        let value = self.expr(&decl.initializer)?;
        self.env.define(decl.ident.as_str(), value);
        Ok(())
    }

    /// Runs `f` in a new innermost scope. The scope is dropped even if `f` fails.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    fn unsupported(construct: &'static str, location: Location) -> Unwind {
        RuntimeError::Unsupported {
            construct,
            location,
        }
        .into()
    }
}

/// Remaining stack below which evaluation continues on a freshly allocated segment.
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT_SIZE: usize = 4 * 1024 * 1024;

/* Expressions */
impl Interpreter {
    /// Evaluates `expr`. Recursion is bounded by `max_call_depth`, not by the native stack.
    fn expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || self.expr_kind(expr))
    }

    fn expr_kind(&mut self, expr: &Expr) -> EvalResult<Value> {
        let location = expr.location;
        match &expr.kind {
            ExprKind::Equality { lhs, op, rhs } => {
                let (lhs, rhs) = self.operands("equality operands", lhs, rhs, location)?;
                Self::equality(*op, lhs, rhs, location)
            }
            ExprKind::Comparison { lhs, op, rhs } => {
                let (lhs, rhs) = self.operands("comparison operands", lhs, rhs, location)?;
                Self::comparison(*op, lhs, rhs, location)
            }
            ExprKind::Additive { lhs, op, rhs } => {
                let (lhs, rhs) = self.operands("additive operands", lhs, rhs, location)?;
                Self::additive(*op, lhs, rhs, location)
            }
            ExprKind::Multiplicative { lhs, op, rhs } => {
                let (lhs, rhs) = self.operands("multiplicative operands", lhs, rhs, location)?;
                Self::multiplicative(*op, lhs, rhs, location)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.expr(operand)?;
                Self::unary(*op, operand, location)
            }
            ExprKind::FnCall { callee, args } => {
                let callee = self.expr(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call(&callee, args, location)
            }
            ExprKind::FieldAccess { .. } => Err(Self::unsupported("field access", location)),
            ExprKind::Literal(literal) => Self::literal(literal, location),
            ExprKind::VarAccess(ident) => match self.env.get(ident) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedVariable {
                    ident: ident.clone(),
                    location,
                }
                .into()),
            },
            ExprKind::If {
                binder,
                condition,
                then_branch,
                else_branch,
            } => {
                let eval_if = |this: &mut Self| -> EvalResult<Value> {
                    if let Some(binder) = binder {
                        this.var_decl(binder)?;
                    }
                    match this.expr(condition)? {
                        Value::Bool(true) => this.expr(then_branch),
                        Value::Bool(false) => match else_branch {
                            Some(else_branch) => this.expr(else_branch),
                            None => Ok(Value::Unit),
                        },
                        other => Err(RuntimeError::NonBoolCondition {
                            ty: other.ty(),
                            location: condition.location,
                        }
                        .into()),
                    }
                };
                if binder.is_some() {
                    self.scoped(eval_if)
                } else {
                    eval_if(self)
                }
            }
            ExprKind::Block { stmts, tail } => self.scoped(|this| {
                for stmt in stmts {
                    this.stmt(stmt)?;
                }
                match tail {
                    Some(tail) => this.expr(tail),
                    None => Ok(Value::Unit),
                }
            }),
            ExprKind::Return(returned) => {
                let value = match returned {
                    Some(returned) => self.expr(returned)?,
                    None => Value::Unit,
                };
                Err(Unwind::Return(value, location))
            }
        }
    }

    /// Evaluates both operands (left first) and checks that they have the same type.
    fn operands(
        &mut self,
        construct: &'static str,
        lhs: &Expr,
        rhs: &Expr,
        location: Location,
    ) -> EvalResult<(Value, Value)> {
        let lhs = self.expr(lhs)?;
        let rhs = self.expr(rhs)?;
        if lhs.ty() != rhs.ty() {
            return Err(RuntimeError::TypeMismatch {
                construct,
                location,
            }
            .into());
        }
        Ok((lhs, rhs))
    }

    fn equality(op: BinaryOp, lhs: Value, rhs: Value, location: Location) -> EvalResult<Value> {
        let equal = match (&lhs, &rhs) {
            (Value::Int(l), Value::Int(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Char(l), Value::Char(r)) => l == r,
            _ => {
                return Err(RuntimeError::UnsupportedType {
                    construct: "equality operands",
                    ty: lhs.ty(),
                    location,
                }
                .into())
            }
        };
        Ok(Value::Bool(if op == BinaryOp::NotEq { !equal } else { equal }))
    }

    fn comparison(op: BinaryOp, lhs: Value, rhs: Value, location: Location) -> EvalResult<Value> {
        let result = match (&lhs, &rhs) {
            (Value::Int(l), Value::Int(r)) => compare(op, l, r),
            (Value::String(l), Value::String(r)) => compare(op, l, r),
            (Value::Char(l), Value::Char(r)) => compare(op, l, r),
            _ => {
                return Err(RuntimeError::UnsupportedType {
                    construct: "comparison operands",
                    ty: lhs.ty(),
                    location,
                }
                .into())
            }
        };
        Ok(Value::Bool(result))
    }

    fn additive(op: BinaryOp, lhs: Value, rhs: Value, location: Location) -> EvalResult<Value> {
        match (lhs, rhs, op) {
            (Value::Int(l), Value::Int(r), BinaryOp::Add) => checked(l.checked_add(r), location),
            (Value::Int(l), Value::Int(r), _) => checked(l.checked_sub(r), location),
            (Value::String(l), Value::String(r), BinaryOp::Add) => Ok(Value::String(l + &r)),
            (lhs, _, _) => Err(RuntimeError::UnsupportedType {
                construct: "additive operands",
                ty: lhs.ty(),
                location,
            }
            .into()),
        }
    }

    fn multiplicative(
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
        location: Location,
    ) -> EvalResult<Value> {
        let (l, r) = match (&lhs, &rhs) {
            (Value::Int(l), Value::Int(r)) => (*l, *r),
            _ => {
                return Err(RuntimeError::UnsupportedType {
                    construct: "multiplicative operands",
                    ty: lhs.ty(),
                    location,
                }
                .into())
            }
        };
        match op {
            BinaryOp::Mul => checked(l.checked_mul(r), location),
            _ if r == 0 => Err(RuntimeError::DivisionByZero { location }.into()),
            // truncating, like Rust's `/` and `%`
            BinaryOp::Div => checked(l.checked_div(r), location),
            _ => checked(l.checked_rem(r), location),
        }
    }

    fn unary(op: UnaryOp, operand: Value, location: Location) -> EvalResult<Value> {
        match (op, operand) {
            (UnaryOp::Neg, Value::Int(val)) => checked(val.checked_neg(), location),
            (UnaryOp::Not, Value::Bool(val)) => Ok(Value::Bool(!val)),
            (_, operand) => Err(RuntimeError::UnsupportedType {
                construct: "unary operand",
                ty: operand.ty(),
                location,
            }
            .into()),
        }
    }

    fn literal(literal: &Literal, location: Location) -> EvalResult<Value> {
        Ok(match literal {
            Literal::Number(val) => match i64::try_from(*val) {
                Ok(val) => Value::Int(val),
                Err(_) => return Err(RuntimeError::IntegerOverflow { location }.into()),
            },
            Literal::String(val) => Value::String(val.clone()),
            Literal::Char(val) => Value::Char(*val),
            Literal::Bool(val) => Value::Bool(*val),
        })
    }
}

/* Calls */
impl Interpreter {
    fn call(&mut self, callee: &Value, args: Vec<Value>, location: Location) -> EvalResult<Value> {
        match callee {
            Value::Fn(function) => {
                Self::check_arity(&function.ident, function.arity(), args.len(), location)?;
                if self.call_depth >= self.options.max_call_depth {
                    return Err(RuntimeError::CallDepthExceeded {
                        max: self.options.max_call_depth,
                        location,
                    }
                    .into());
                }
                trace!("calling {} at depth {}", function.ident, self.call_depth);

                // the body sees the globals, itself and its parameters only
                let saved = self.env.enter_frame();
                self.env.push_scope();
                self.env
                    .define(function.ident.as_str(), Value::Fn(Rc::clone(function)));
                for (param, arg) in function.params.iter().zip(args) {
                    self.env.define(param.as_str(), arg);
                }
                self.call_depth += 1;
                let result = self.expr(&function.body);
                self.call_depth -= 1;
                self.env.leave_frame(saved);

                match result {
                    Err(Unwind::Return(value, _)) => Ok(value),
                    result => result,
                }
            }
            Value::NativeFn(native) => {
                Self::check_arity(&native.ident, native.arity, args.len(), location)?;
                trace!("calling native {}", native.ident);
                (native.func)(&args).map_err(|message| {
                    RuntimeError::NativeFnFailed {
                        ident: native.ident.clone(),
                        message,
                        location,
                    }
                    .into()
                })
            }
            other => Err(RuntimeError::NotCallable {
                ty: other.ty(),
                location,
            }
            .into()),
        }
    }

    fn check_arity(ident: &str, expected: usize, found: usize, location: Location) -> EvalResult<()> {
        if expected == found {
            Ok(())
        } else {
            Err(RuntimeError::ArityMismatch {
                ident: ident.to_string(),
                expected,
                found,
                location,
            }
            .into())
        }
    }
}

fn compare<T: PartialOrd>(op: BinaryOp, lhs: T, rhs: T) -> bool {
    match op {
        BinaryOp::Less => lhs < rhs,
        BinaryOp::LessEq => lhs <= rhs,
        BinaryOp::Greater => lhs > rhs,
        _ => lhs >= rhs,
    }
}

fn checked(result: Option<i64>, location: Location) -> EvalResult<Value> {
    result
        .map(Value::Int)
        .ok_or_else(|| RuntimeError::IntegerOverflow { location }.into())
}
