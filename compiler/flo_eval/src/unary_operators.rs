//! Unary operator implementations for the evaluator.

use flo_ir::UnaryOp;
use flo_patterns::{integer_overflow, unary_type_mismatch, EvalError, Value};

/// Evaluate a unary operation.
///
/// `!` accepts any value and negates its truthiness; `-` and `+` are
/// numeric only.
pub fn evaluate_unary(value: Value, op: UnaryOp) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
        (UnaryOp::Neg, Value::Int(n)) => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| integer_overflow("negation")),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Plus, v @ (Value::Int(_) | Value::Float(_))) => Ok(v),
        (op, v) => Err(unary_type_mismatch(op, v.type_name())),
    }
}
