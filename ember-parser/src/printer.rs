//! Renders syntax trees as indented text for debugging.

use crate::ast::{Decl, Expr, ExprKind, Stmt, VarDecl};
use crate::visitor::{walk_decl, walk_expr, walk_stmt, Visitor};
use std::fmt::{self, Write};

/// Writes one line per node, children indented by two spaces below their parent.
#[derive(Default)]
pub struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes `self` and returns the rendered text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        let _ = writeln!(self.out, "{}", text);
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn print_var_decl(&mut self, decl: &VarDecl) {
        self.line(format_args!("var {}", decl.ident));
        self.nested(|p| p.visit_expr(&decl.initializer));
    }
}

pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.visit_expr(expr);
    printer.finish()
}

pub fn print_stmt(stmt: &Stmt) -> String {
    let mut printer = Printer::new();
    printer.visit_stmt(stmt);
    printer.finish()
}

pub fn print_decls(decls: &[Decl]) -> String {
    let mut printer = Printer::new();
    for decl in decls {
        printer.visit_decl(decl);
    }
    printer.finish()
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::Equality { op, .. }
            | ExprKind::Comparison { op, .. }
            | ExprKind::Additive { op, .. }
            | ExprKind::Multiplicative { op, .. } => self.line(op),
            ExprKind::Unary { op, .. } => self.line(op),
            ExprKind::FnCall { .. } => self.line("call"),
            ExprKind::FieldAccess { field, .. } => self.line(format_args!(".{}", field)),
            ExprKind::Literal(literal) => self.line(literal),
            ExprKind::VarAccess(ident) => self.line(ident),
            ExprKind::If { .. } => self.line("if"),
            ExprKind::Block { .. } => self.line("{}"),
            ExprKind::Return(_) => self.line("return"),
        }

        self.nested(|p| match &expr.kind {
            // the binder is a declaration, not just its initializer
            ExprKind::If {
                binder,
                condition,
                then_branch,
                else_branch,
            } => {
                if let Some(binder) = binder {
                    p.print_var_decl(binder);
                }
                p.visit_expr(condition);
                p.visit_expr(then_branch);
                if let Some(else_branch) = else_branch {
                    p.line("else");
                    p.nested(|p| p.visit_expr(else_branch));
                }
            }
            _ => walk_expr(p, expr),
        });
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.visit_expr(expr),
            Stmt::ExprStmt(_) => {
                self.line(";");
                self.nested(|p| walk_stmt(p, stmt));
            }
            Stmt::Assignment { .. } => {
                self.line("=");
                self.nested(|p| walk_stmt(p, stmt));
            }
            Stmt::Decl(_) => walk_stmt(self, stmt),
        }
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        match decl {
            Decl::Var(var) => self.line(format_args!("var {}", var.ident)),
            Decl::Fun(fun) => {
                self.line(format_args!("fun {}({})", fun.ident, fun.params.join(", ")))
            }
        }
        self.nested(|p| walk_decl(p, decl));
    }
}
