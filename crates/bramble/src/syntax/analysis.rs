//! Free-variable analysis for function literals
//!
//! Computes, for each function body, the names it references without
//! binding them itself. The evaluator consults this list when the
//! function's defining scope exits to build the captures snapshot.

use std::collections::HashSet;

use indexmap::IndexSet;

use super::ast::{Block, Expr, Stmt};

/// Names referenced free inside a function body, in first-reference
/// order, deduplicated.
///
/// A name is free when it is read or assigned without being bound by a
/// parameter or by a `let` in an enclosing position within the body.
/// Free names of nested function literals count too, minus the ones the
/// outer body binds: the outer function must capture them on behalf of
/// the inner one.
pub fn free_names(params: &[String], body: &Block) -> Vec<String> {
    let mut walker = Walker {
        scopes: vec![params.iter().cloned().collect()],
        free: IndexSet::new(),
    };
    walker.walk_stmts(&body.stmts);
    walker.free.into_iter().collect()
}

struct Walker {
    scopes: Vec<HashSet<String>>,
    free: IndexSet<String>,
}

impl Walker {
    fn reference(&mut self, name: &str) {
        if !self.scopes.iter().any(|s| s.contains(name)) {
            self.free.insert(name.to_string());
        }
    }

    fn bind(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn walk_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.scopes.push(HashSet::new());
                self.walk_stmts(&block.stmts);
                self.scopes.pop();
            }
            Stmt::Expr(expr) => self.walk_expr(expr),
            Stmt::Let { name, value, .. } => {
                // The initializer runs before the name exists.
                self.walk_expr(value);
                self.bind(name);
            }
            Stmt::Assign { name, value, .. } => {
                self.reference(name);
                self.walk_expr(value);
            }
            Stmt::Return { value, .. } => {
                if let Some(expr) = value {
                    self.walk_expr(expr);
                }
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.walk_expr(cond);
                self.scopes.push(HashSet::new());
                self.walk_stmts(&then_branch.stmts);
                self.scopes.pop();
                if let Some(branch) = else_branch {
                    self.scopes.push(HashSet::new());
                    self.walk_stmts(&branch.stmts);
                    self.scopes.pop();
                }
            }
            Stmt::External { .. } => {}
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Int(..) | Expr::Bool(..) | Expr::Str(..) => {}
            Expr::Variable(name, _) => self.reference(name),
            Expr::Not { operand, .. } => self.walk_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            Expr::Call { callee, args, .. } => {
                self.walk_expr(callee);
                for arg in args {
                    self.walk_expr(arg);
                }
            }
            Expr::Index { target, index, .. } => {
                self.walk_expr(target);
                self.walk_expr(index);
            }
            Expr::Array(items, _) => {
                for item in items {
                    self.walk_expr(item);
                }
            }
            Expr::Dict(pairs, _) => {
                for (key, value) in pairs {
                    self.walk_expr(key);
                    self.walk_expr(value);
                }
            }
            // The nested literal's own list is already computed; anything
            // it needs that we don't bind must flow through us.
            Expr::Function(decl, _) => {
                for name in &decl.free_names {
                    self.reference(name);
                }
            }
        }
    }
}
