//! Visitor pattern for AST nodes.

use crate::ast::{Decl, Expr, ExprKind, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }
}

/// Visits the children of `expr` in source order.
pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Equality { lhs, op: _, rhs }
        | ExprKind::Comparison { lhs, op: _, rhs }
        | ExprKind::Additive { lhs, op: _, rhs }
        | ExprKind::Multiplicative { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        ExprKind::Unary { op: _, operand } => visitor.visit_expr(operand),
        ExprKind::FnCall { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::FieldAccess { object, field: _ } => visitor.visit_expr(object),
        ExprKind::Literal(_) => {}
        ExprKind::VarAccess(_) => {}
        ExprKind::If {
            binder,
            condition,
            then_branch,
            else_branch,
        } => {
            if let Some(binder) = binder {
                visitor.visit_expr(&binder.initializer);
            }
            visitor.visit_expr(condition);
            visitor.visit_expr(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_expr(else_branch);
            }
        }
        ExprKind::Block { stmts, tail } => {
            for stmt in stmts {
                visitor.visit_stmt(stmt);
            }
            if let Some(tail) = tail {
                visitor.visit_expr(tail);
            }
        }
        ExprKind::Return(returned) => {
            if let Some(returned) = returned {
                visitor.visit_expr(returned);
            }
        }
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Expr(expr) => visitor.visit_expr(expr),
        Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::Assignment {
            target,
            value,
            location: _,
        } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Stmt::Decl(decl) => visitor.visit_decl(decl),
    }
}

pub fn walk_decl<'ast>(visitor: &mut impl Visitor<'ast>, decl: &'ast Decl) {
    match decl {
        Decl::Var(decl) => visitor.visit_expr(&decl.initializer),
        Decl::Fun(decl) => visitor.visit_expr(&decl.body),
    }
}
