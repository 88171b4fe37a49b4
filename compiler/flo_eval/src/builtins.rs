//! Native functions bound in the root frame.

use flo_patterns::{arity_mismatch, type_mismatch, Builtin, EvalError, SetValue, Value};

use crate::PrintHandler;

fn count(n: usize) -> Value {
    Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

/// Call `builtin` with already-evaluated arguments.
pub fn call_builtin(
    builtin: Builtin,
    args: &[Value],
    print: &PrintHandler,
) -> Result<Value, EvalError> {
    if let Some(expected) = builtin.arity() {
        if args.len() != expected {
            return Err(arity_mismatch(builtin.name(), expected, args.len()));
        }
    }
    match builtin {
        Builtin::Print => {
            let line = args
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            print.println(&line);
            Ok(Value::Nil)
        }
        Builtin::Range => match (&args[0], &args[1]) {
            (Value::Int(start), Value::Int(end)) => Ok(Value::range(*start, *end)),
            (Value::Int(_), other) | (other, _) => Err(type_mismatch("int", other.type_name())),
        },
        Builtin::Len => length(&args[0]),
        Builtin::Str => Ok(Value::string(args[0].to_string())),
        Builtin::Int => to_int(&args[0]),
        Builtin::Float => to_float(&args[0]),
        Builtin::Set => match &args[0] {
            Value::List(items) => Ok(Value::set(SetValue::from_values(items.iter().cloned()))),
            Value::Set(_) => Ok(args[0].clone()),
            Value::Range(range) => Ok(Value::set(SetValue::from_values(
                range.iter().map(Value::Int),
            ))),
            other => Err(type_mismatch("list, set or range", other.type_name())),
        },
    }
}

fn length(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Str(s) => Ok(count(s.chars().count())),
        Value::List(items) => Ok(count(items.len())),
        Value::Map(map) => Ok(count(map.len())),
        Value::Set(set) => Ok(count(set.len())),
        Value::Range(range) => Ok(count(range.len())),
        other => Err(type_mismatch("str or collection", other.type_name())),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "bounds are checked before the cast"
)]
fn to_int(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(x) => {
            let truncated = x.trunc();
            if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64
            {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(EvalError::new(format!("cannot convert {x:?} to int")))
            }
        }
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::new(format!("invalid integer literal: {:?}", s.as_str()))),
        other => Err(type_mismatch("int, float, bool or str", other.type_name())),
    }
}

fn to_float(value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(_) | Value::Float(_) => Ok(Value::Float(value.as_float().unwrap_or(0.0))),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::new(format!("invalid float literal: {:?}", s.as_str()))),
        other => Err(type_mismatch("int, float, bool or str", other.type_name())),
    }
}
