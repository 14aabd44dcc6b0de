//! Function invocation

use crate::environment::Frame;
use crate::error::EvalError;
use crate::syntax::ast::{Expr, Span};
use crate::value::{FunctionValue, Value};

use super::{Interpreter, ReturnAction};

impl Interpreter {
    /// Evaluate an invocation expression.
    ///
    /// The callee is evaluated first, then every argument left to
    /// right, then the target is verified to be a function. Returns
    /// `None` for a void call; the caller decides whether void is
    /// acceptable.
    pub(crate) fn eval_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        span: Span,
    ) -> Result<Option<Value>, EvalError> {
        let target = self.eval_expr(callee)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        let func = match target {
            Value::Function(func) => func,
            other => {
                return Err(self.fail(EvalError::NotInvocable {
                    type_name: other.type_name(),
                    span: Some(span),
                }));
            }
        };

        // The display name is whatever the call site called the target;
        // an immediately-invoked literal has none.
        let name = match callee {
            Expr::Variable(name, _) => name.as_str(),
            _ => "",
        };
        self.call_value(&func, values, name, Some(span))
    }

    /// Invoke a function value with already-evaluated arguments.
    ///
    /// Pushes a Function scope (and its call frame), binds each
    /// parameter to a deep copy of its argument, executes the body as a
    /// block, then scopes out — releasing the argument bindings — and
    /// translates the body's `ReturnAction` into `Some(value)` or
    /// `None` for void.
    pub(crate) fn call_value(
        &mut self,
        func: &FunctionValue,
        args: Vec<Value>,
        name: &str,
        span: Option<Span>,
    ) -> Result<Option<Value>, EvalError> {
        let params = &func.decl.params;
        if args.len() != params.len() {
            return Err(self.fail(EvalError::ArityMismatch {
                expected: params.len(),
                got: args.len(),
                span,
            }));
        }
        if self.env.call_depth() >= self.ctx.max_call_depth {
            return Err(self.fail(EvalError::StackOverflow {
                max: self.ctx.max_call_depth,
            }));
        }

        let frame = Frame {
            name: func.signature(name),
            span: span.unwrap_or_default(),
        };
        self.env.scope_in_function(func.clone(), frame);

        let mut result = Ok(ReturnAction::DidntReturn);
        for (param, arg) in func.decl.params.iter().zip(args) {
            if !self.env.declare(param, arg.deep_copy()) {
                result = Err(self.fail(EvalError::AlreadyDeclared {
                    name: param.clone(),
                    span,
                }));
                break;
            }
        }
        if result.is_ok() {
            result = self.exec_block(&func.decl.body);
        }

        self.env.scope_out(&mut self.arena);

        match result? {
            ReturnAction::ReturnedValue(value) => Ok(Some(value)),
            ReturnAction::ReturnedVoid | ReturnAction::DidntReturn => Ok(None),
        }
    }
}
