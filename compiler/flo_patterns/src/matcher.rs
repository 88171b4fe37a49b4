//! Structural pattern matching.
//!
//! Matching is pure and total over every value tag: a pattern of the wrong
//! shape simply fails. Exhaustiveness is the `match` expression's concern,
//! never the matcher's.

use flo_ir::{LiteralPattern, MatchPattern, Name, StringInterner, VariantTag};

use crate::Value;

/// Match `value` against `pattern`.
///
/// Returns the introduced bindings in left-to-right order, or `None` when
/// the pattern does not match.
pub fn match_pattern(
    pattern: &MatchPattern,
    value: &Value,
    interner: &StringInterner,
) -> Option<Vec<(Name, Value)>> {
    let mut bindings = Vec::new();
    bind_into(pattern, value, interner, &mut bindings).then_some(bindings)
}

fn bind_into(
    pattern: &MatchPattern,
    value: &Value,
    interner: &StringInterner,
    out: &mut Vec<(Name, Value)>,
) -> bool {
    match pattern {
        MatchPattern::Wildcard => true,
        MatchPattern::Binding(name) => {
            out.push((*name, value.clone()));
            true
        }
        MatchPattern::Literal(literal) => literal_matches(*literal, value, interner),
        MatchPattern::Variant { tag, inner } => {
            let payload = match (tag, value) {
                (VariantTag::Some, Value::Some(v))
                | (VariantTag::Ok, Value::Ok(v))
                | (VariantTag::Err, Value::Err(v)) => Some(&**v),
                (VariantTag::None, Value::None) => None,
                _ => return false,
            };
            match (inner, payload) {
                (Some(inner), Some(payload)) => bind_into(inner, payload, interner, out),
                (None, _) => true,
                (Some(_), None) => false,
            }
        }
        MatchPattern::List(items) => match value {
            Value::List(values) if values.len() == items.len() => items
                .iter()
                .zip(values.iter())
                .all(|(item, v)| bind_into(item, v, interner, out)),
            _ => false,
        },
    }
}

fn literal_matches(literal: LiteralPattern, value: &Value, interner: &StringInterner) -> bool {
    match (literal, value) {
        (LiteralPattern::Str(s), Value::Str(v)) => interner.lookup(s) == v.as_str(),
        (LiteralPattern::Nil, Value::Nil) => true,
        (LiteralPattern::Bool(b), Value::Bool(v)) => b == *v,
        (LiteralPattern::Int(n), Value::Int(_) | Value::Float(_)) => Value::Int(n).equals(value),
        (LiteralPattern::Float(x), Value::Int(_) | Value::Float(_)) => {
            Value::Float(x).equals(value)
        }
        _ => false,
    }
}
