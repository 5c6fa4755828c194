//! Syntax tree. Every node owns its children exclusively.

use ember_source::Location;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /* Equality */
    Eq,
    NotEq,
    /* Comparison */
    Less,
    LessEq,
    Greater,
    GreaterEq,
    /* Additive */
    Add,
    Sub,
    /* Multiplicative */
    Mul,
    Div,
    Rem,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(u64),
    String(String),
    Char(char),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(val) => write!(f, "{}", val),
            Literal::String(val) => write!(f, "{:?}", val),
            Literal::Char(val) => write!(f, "{:?}", val),
            Literal::Bool(val) => write!(f, "{}", val),
        }
    }
}

/// Field selector of a field access expression (`obj.name` or `tuple.0`).
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Named(String),
    Index(u64),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Named(name) => f.write_str(name),
            Field::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// For operators this is the location of the operator token.
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `==` `!=`
    Equality {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// `<` `<=` `>` `>=`
    Comparison {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// `+` `-`
    Additive {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    /// `*` `/` `%`
    Multiplicative {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// A call expression (e.g. `foo(1, bar)`).
    FnCall {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    FieldAccess {
        object: Box<Expr>,
        field: Field,
    },
    Literal(Literal),
    /// An identifier (e.g. `foo`). Resolved by name during evaluation.
    VarAccess(String),
    If {
        /// `if var x = ...; cond ...`
        binder: Option<Box<VarDecl>>,
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Block {
        stmts: Vec<Stmt>,
        /// Trailing expression without `;`. Its value is the value of the block.
        tail: Option<Box<Expr>>,
    },
    Return(Option<Box<Expr>>),
}

impl Expr {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Returns `true` if the expression can appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::VarAccess(_) | ExprKind::FieldAccess { .. } | ExprKind::FnCall { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression that is not terminated by `;`.
    Expr(Expr),
    /// An expression terminated by `;`. Its value is discarded.
    ExprStmt(Expr),
    Assignment {
        target: Expr,
        value: Expr,
        /// Location of the `=`.
        location: Location,
    },
    Decl(Decl),
}

impl Stmt {
    pub fn location(&self) -> Location {
        match self {
            Stmt::Expr(expr) | Stmt::ExprStmt(expr) => expr.location,
            Stmt::Assignment { location, .. } => *location,
            Stmt::Decl(decl) => decl.location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fun(FunDecl),
}

impl Decl {
    pub fn ident(&self) -> &str {
        match self {
            Decl::Var(decl) => &decl.ident,
            Decl::Fun(decl) => &decl.ident,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Decl::Var(decl) => decl.location,
            Decl::Fun(decl) => decl.location,
        }
    }
}

/// `var ident = initializer;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ident: String,
    pub initializer: Expr,
    pub location: Location,
}

/// `fun ident params... = body;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunDecl {
    pub ident: String,
    pub params: Vec<String>,
    pub body: Expr,
    pub location: Location,
}
