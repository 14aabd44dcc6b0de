//! Binary operation evaluation

use indexmap::IndexMap;

use crate::error::EvalError;
use crate::syntax::ast::{BinOp, Expr, Span};
use crate::value::{HashableValue, Value};

use super::Interpreter;

impl Interpreter {
    /// Evaluate a binary operation.
    ///
    /// Both operands are always evaluated before the operator is
    /// applied; `&&` and `||` do not short-circuit.
    pub(crate) fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        span: Span,
    ) -> Result<Value, EvalError> {
        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        self.apply_binary(op, lhs, rhs, span)
    }

    fn apply_binary(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        span: Span,
    ) -> Result<Value, EvalError> {
        match op {
            BinOp::Add => self.eval_add(lhs, rhs, span),
            BinOp::Sub => self.eval_arith(op, lhs, rhs, span, i64::checked_sub),
            BinOp::Mul => self.eval_arith(op, lhs, rhs, span, i64::checked_mul),
            BinOp::Div => self.eval_div(lhs, rhs, span),

            // Equality is structural and defined for every pair of types.
            BinOp::Eq => Ok(Value::Bool(lhs == rhs)),
            BinOp::NotEq => Ok(Value::Bool(lhs != rhs)),

            BinOp::Lt | BinOp::Gt => self.eval_compare(op, lhs, rhs, span),
            BinOp::And | BinOp::Or => self.eval_logical(op, lhs, rhs, span),
        }
    }

    /// `+` is overloaded: integer sum, string concatenation with the
    /// right operand's top-level rendering, array concatenation, and
    /// dict merge with key collisions treated as errors. Array and dict
    /// results contain deep copies of both sides' elements.
    fn eval_add(&mut self, lhs: Value, rhs: Value, span: Span) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => match a.checked_add(b) {
                Some(n) => Ok(Value::Int(n)),
                None => Err(self.fail(EvalError::IntegerOverflow { span: Some(span) })),
            },

            (Value::String(a), rhs) => Ok(Value::string(format!("{a}{rhs}"))),

            (Value::Array(a), Value::Array(b)) => Ok(Value::array(
                a.iter().chain(b.iter()).map(Value::deep_copy).collect(),
            )),

            (Value::Dict(a), Value::Dict(b)) => {
                let mut merged = IndexMap::with_capacity(a.len() + b.len());
                for (key, value) in a.iter().chain(b.iter()) {
                    let key = HashableValue(key.0.deep_copy());
                    if merged.contains_key(&key) {
                        return Err(self.fail(EvalError::DuplicateKey { span: Some(span) }));
                    }
                    merged.insert(key, value.deep_copy());
                }
                Ok(Value::dict(merged))
            }

            (lhs, rhs) => Err(self.fail(EvalError::InvalidBinaryOperands {
                op: "+",
                left_type: lhs.type_name(),
                right_type: rhs.type_name(),
                span: Some(span),
            })),
        }
    }

    fn eval_arith(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        span: Span,
        apply: fn(i64, i64) -> Option<i64>,
    ) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => match apply(a, b) {
                Some(n) => Ok(Value::Int(n)),
                None => Err(self.fail(EvalError::IntegerOverflow { span: Some(span) })),
            },
            (lhs, rhs) => Err(self.fail(EvalError::InvalidBinaryOperands {
                op: op.as_str(),
                left_type: lhs.type_name(),
                right_type: rhs.type_name(),
                span: Some(span),
            })),
        }
    }

    /// Integer quotient, truncating toward zero.
    fn eval_div(&mut self, lhs: Value, rhs: Value, span: Span) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Int(_), Value::Int(0)) => {
                Err(self.fail(EvalError::DivisionByZero { span: Some(span) }))
            }
            (Value::Int(a), Value::Int(b)) => match a.checked_div(b) {
                Some(n) => Ok(Value::Int(n)),
                None => Err(self.fail(EvalError::IntegerOverflow { span: Some(span) })),
            },
            (lhs, rhs) => Err(self.fail(EvalError::InvalidBinaryOperands {
                op: "/",
                left_type: lhs.type_name(),
                right_type: rhs.type_name(),
                span: Some(span),
            })),
        }
    }

    fn eval_compare(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        span: Span,
    ) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(match op {
                BinOp::Lt => a < b,
                _ => a > b,
            })),
            (lhs, rhs) => Err(self.fail(EvalError::InvalidBinaryOperands {
                op: op.as_str(),
                left_type: lhs.type_name(),
                right_type: rhs.type_name(),
                span: Some(span),
            })),
        }
    }

    fn eval_logical(
        &mut self,
        op: BinOp,
        lhs: Value,
        rhs: Value,
        span: Span,
    ) -> Result<Value, EvalError> {
        match (lhs, rhs) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(match op {
                BinOp::And => a && b,
                _ => a || b,
            })),
            (lhs, rhs) => Err(self.fail(EvalError::InvalidBinaryOperands {
                op: op.as_str(),
                left_type: lhs.type_name(),
                right_type: rhs.type_name(),
                span: Some(span),
            })),
        }
    }
}
