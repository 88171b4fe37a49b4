//! Binary operator implementations for the evaluator.
//!
//! Direct enum dispatch over `(left, right)` value tags. Short-circuit
//! logic and pipelines need unevaluated operands or a call, so the
//! interpreter handles those itself; they only reach this module with
//! both sides already evaluated.

use std::cmp::Ordering;

use flo_ir::BinaryOp;
use flo_patterns::{
    binary_type_mismatch, division_by_zero, integer_overflow, type_mismatch, EvalError, Value,
};

/// Checked integer arithmetic; `None` means overflow.
#[inline]
fn checked_int(result: Option<i64>, operation: &'static str) -> Result<Value, EvalError> {
    result.map(Value::Int).ok_or_else(|| integer_overflow(operation))
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Int(n) => *n == 0,
        Value::Float(x) => *x == 0.0,
        _ => false,
    }
}

/// Floored modulo: the result takes the sign of the divisor.
fn floored_mod(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

/// Evaluate an arithmetic, comparison or equality operator.
pub fn evaluate_binary(left: Value, right: Value, op: BinaryOp) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left.equals(&right))),
        BinaryOp::NotEq => Ok(Value::Bool(!left.equals(&right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            compare(&left, &right, op)
        }
        BinaryOp::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        BinaryOp::Div | BinaryOp::Mod if is_zero(&right) && left.as_float().is_some() => {
            Err(division_by_zero())
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            arithmetic(left, right, op)
        }
        BinaryOp::PipeForward | BinaryOp::PipeBackward => Err(binary_type_mismatch(
            op,
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn arithmetic(left: Value, right: Value, op: BinaryOp) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinaryOp::Add => checked_int(a.checked_add(b), "addition"),
                BinaryOp::Sub => checked_int(a.checked_sub(b), "subtraction"),
                BinaryOp::Mul => checked_int(a.checked_mul(b), "multiplication"),
                BinaryOp::Div => Ok(Value::Float(float_div(&left, &right))),
                _ => checked_int(floored_mod(a, b), "modulo"),
            }
        }
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            if op == BinaryOp::Mod {
                return Err(type_mismatch("int operands for `%`", "float"));
            }
            let (Some(a), Some(b)) = (left.as_float(), right.as_float()) else {
                return Err(binary_type_mismatch(op, left.type_name(), right.type_name()));
            };
            Ok(Value::Float(float_op(a, b, op)))
        }
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            let mut joined = String::with_capacity(a.len().saturating_add(b.len()));
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::List(a), Value::List(b)) if op == BinaryOp::Add => {
            let mut items = Vec::with_capacity(a.len().saturating_add(b.len()));
            items.extend(a.iter().cloned());
            items.extend(b.iter().cloned());
            Ok(Value::list(items))
        }
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

#[allow(
    clippy::arithmetic_side_effects,
    reason = "IEEE-754 arithmetic cannot trap; zero divisors are rejected earlier"
)]
fn float_op(a: f64, b: f64, op: BinaryOp) -> f64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        _ => a / b,
    }
}

fn float_div(left: &Value, right: &Value) -> f64 {
    float_op(
        left.as_float().unwrap_or(0.0),
        right.as_float().unwrap_or(1.0),
        BinaryOp::Div,
    )
}

fn compare(left: &Value, right: &Value, op: BinaryOp) -> Result<Value, EvalError> {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            }
        }
        _ => return Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    };
    // NaN compares false under every ordering operator.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}
