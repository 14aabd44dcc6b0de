//! Statement execution

use crate::error::EvalError;
use crate::syntax::ast::{Block, Expr, Stmt};
use crate::value::Value;

use super::{Interpreter, ReturnAction};

impl Interpreter {
    /// Execute a block in a fresh scope.
    pub(crate) fn exec_block(&mut self, block: &Block) -> Result<ReturnAction, EvalError> {
        self.env.scope_in_block();
        let result = self.exec_stmts(&block.stmts);
        // scope_out must run even when unwinding an error
        self.env.scope_out(&mut self.arena);
        result
    }

    /// Execute statements in order, stopping at the first one that
    /// returns.
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt]) -> Result<ReturnAction, EvalError> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                ReturnAction::DidntReturn => {}
                action => return Ok(action),
            }
        }
        Ok(ReturnAction::DidntReturn)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<ReturnAction, EvalError> {
        match stmt {
            Stmt::Block(block) => self.exec_block(block),

            // The grammar guarantees expression statements are calls;
            // re-checked here since External bodies are synthesized.
            Stmt::Expr(expr) => match expr {
                Expr::Call { callee, args, span } => {
                    // Void is allowed here; a produced value is discarded.
                    self.eval_call(callee, args, *span)?;
                    Ok(ReturnAction::DidntReturn)
                }
                other => Err(self.fail(EvalError::NonCallStatement {
                    span: Some(other.span()),
                })),
            },

            Stmt::Let { name, value, span } => {
                let value = self.eval_expr(value)?;
                if !self.env.declare(name, value) {
                    return Err(self.fail(EvalError::AlreadyDeclared {
                        name: name.clone(),
                        span: Some(*span),
                    }));
                }
                Ok(ReturnAction::DidntReturn)
            }

            Stmt::Assign { name, value, span } => {
                // Resolve the target before evaluating the new value.
                let slot = match self.env.resolve_assignable(name, &self.arena) {
                    Some(slot) => slot,
                    None => {
                        return Err(self.fail(EvalError::ImmutableAssignment {
                            name: name.clone(),
                            span: Some(*span),
                        }));
                    }
                };
                let value = self.eval_expr(value)?;
                self.env.write(slot, value);
                Ok(ReturnAction::DidntReturn)
            }

            Stmt::Return { value, .. } => match value {
                None => Ok(ReturnAction::ReturnedVoid),
                Some(expr) => Ok(ReturnAction::ReturnedValue(self.eval_expr(expr)?)),
            },

            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                let condition = self.eval_expr(cond)?;
                let flag = match condition {
                    Value::Bool(flag) => flag,
                    other => {
                        return Err(self.fail(EvalError::NonBoolCondition {
                            type_name: other.type_name(),
                            span: Some(cond.span()),
                        }));
                    }
                };
                self.env.scope_in_block();
                let result = if flag {
                    self.exec_stmts(&then_branch.stmts)
                } else if let Some(branch) = else_branch {
                    self.exec_stmts(&branch.stmts)
                } else {
                    Ok(ReturnAction::DidntReturn)
                };
                self.env.scope_out(&mut self.arena);
                result
            }

            Stmt::External { id } => self.exec_external(*id),
        }
    }

    fn exec_external(&mut self, id: usize) -> Result<ReturnAction, EvalError> {
        let handler = match self.builtins.get(id) {
            Some(builtin) => builtin.handler,
            None => {
                return Err(self.fail(EvalError::TypeError {
                    message: format!("Unknown builtin id {id}"),
                    span: None,
                }));
            }
        };
        handler(self)
    }
}
