//! Expression evaluation

use indexmap::IndexMap;

use crate::error::EvalError;
use crate::syntax::ast::{Expr, Span};
use crate::value::{FunctionValue, HashableValue, Value};

use super::Interpreter;

impl Interpreter {
    /// Evaluate an expression to a value.
    ///
    /// A call that returns void is an error here; statement execution
    /// calls into [`eval_call`](Self::eval_call) directly when void is
    /// acceptable.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(n, _) => Ok(Value::Int(*n)),
            Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            Expr::Str(s, _) => Ok(Value::string(s.clone())),

            Expr::Variable(name, span) => match self.env.lookup(name, &self.arena) {
                Some(value) => Ok(value.deep_copy()),
                None => Err(self.fail(EvalError::IdentifierNotFound {
                    name: name.clone(),
                    span: Some(*span),
                })),
            },

            Expr::Not { operand, span } => {
                let value = self.eval_expr(operand)?;
                match value {
                    Value::Bool(b) => Ok(Value::Bool(!b)),
                    other => Err(self.fail(EvalError::InvalidUnaryOperand {
                        op: "!",
                        operand_type: other.type_name(),
                        span: Some(*span),
                    })),
                }
            }

            Expr::Binary {
                left,
                op,
                right,
                span,
            } => self.eval_binary(*op, left, right, *span),

            Expr::Call { callee, args, span } => match self.eval_call(callee, args, *span)? {
                Some(value) => Ok(value),
                None => Err(self.fail(EvalError::VoidResult { span: Some(*span) })),
            },

            Expr::Index {
                target,
                index,
                span,
            } => self.eval_index(target, index, *span),

            Expr::Array(items, _) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::array(values))
            }

            Expr::Dict(pairs, _) => {
                let mut entries = IndexMap::with_capacity(pairs.len());
                for (key_expr, value_expr) in pairs {
                    let key = HashableValue(self.eval_expr(key_expr)?);
                    let value = self.eval_expr(value_expr)?;
                    if entries.contains_key(&key) {
                        return Err(self.fail(EvalError::DuplicateKey {
                            span: Some(key_expr.span()),
                        }));
                    }
                    entries.insert(key, value);
                }
                Ok(Value::dict(entries))
            }

            // A function literal allocates its capture cell, registers
            // itself for finalization when the defining scope exits, and
            // is the produced value.
            Expr::Function(decl, _) => {
                let func = FunctionValue::new(decl.clone(), self.arena.alloc());
                self.env.add_pending(func.clone());
                Ok(Value::Function(func))
            }
        }
    }

    fn eval_index(&mut self, target: &Expr, index: &Expr, span: Span) -> Result<Value, EvalError> {
        let collection = self.eval_expr(target)?;
        let key = self.eval_expr(index)?;

        match collection {
            Value::Array(items) => {
                let idx = match key {
                    Value::Int(n) => n,
                    other => {
                        return Err(self.fail(EvalError::TypeError {
                            message: format!(
                                "Array index must be an int, got {}",
                                other.type_name()
                            ),
                            span: Some(index.span()),
                        }));
                    }
                };
                if idx < 0 || idx as usize >= items.len() {
                    return Err(self.fail(EvalError::IndexOutOfRange {
                        index: idx,
                        len: items.len(),
                        span: Some(span),
                    }));
                }
                Ok(items[idx as usize].deep_copy())
            }

            Value::Dict(entries) => match entries.get(&HashableValue(key)) {
                Some(value) => Ok(value.deep_copy()),
                None => Err(self.fail(EvalError::KeyNotFound { span: Some(span) })),
            },

            other => Err(self.fail(EvalError::CannotIndex {
                type_name: other.type_name(),
                span: Some(span),
            })),
        }
    }
}
