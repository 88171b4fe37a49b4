//! Indexing, field access and optional chaining.

use flo_ir::Name;
use flo_patterns::{
    index_out_of_bounds, key_not_found, type_mismatch, EvalError, Value,
};

use super::Interpreter;

/// Resolve a possibly negative index against `len`.
fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 {
        index.checked_add(signed_len)
    } else {
        Some(index)
    };
    resolved
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < len)
        .ok_or_else(|| index_out_of_bounds(index, len))
}

impl Interpreter<'_> {
    /// `receiver[index]`
    pub(super) fn index_value(&self, receiver: &Value, index: &Value) -> Result<Value, EvalError> {
        match (receiver, index) {
            (Value::List(items), Value::Int(i)) => {
                let at = resolve_index(*i, items.len())?;
                Ok(items[at].clone())
            }
            (Value::Str(s), Value::Int(i)) => {
                let len = s.chars().count();
                let at = resolve_index(*i, len)?;
                Ok(s.chars()
                    .nth(at)
                    .map(|c| Value::string(c.to_string()))
                    .unwrap_or(Value::Nil))
            }
            (Value::Map(map), key) => map.get(key).cloned().ok_or_else(|| key_not_found(key)),
            (Value::List(_) | Value::Str(_), other) => {
                Err(type_mismatch("int index", other.type_name()))
            }
            (other, _) => Err(type_mismatch("list, str or map", other.type_name())),
        }
    }

    /// `receiver.name`
    ///
    /// Maps answer with the value under the string key, or `nil`. Tokens
    /// expose `.name`; modules expose their operations.
    pub(super) fn field_value(&self, receiver: &Value, name: Name) -> Result<Value, EvalError> {
        let field = self.interner.lookup(name);
        match receiver {
            Value::Map(map) => Ok(map.get_str(field).cloned().unwrap_or(Value::Nil)),
            Value::Capability(token) if field == "name" => Ok(Value::string(token.name())),
            Value::Capability(_) => Err(key_not_found(&Value::string(field))),
            Value::Module(module) => {
                if module.provider.operations().contains(&field) {
                    Ok(Value::provider_op(module, field))
                } else {
                    Err(EvalError::new(format!(
                        "module {} has no operation `{field}`",
                        module.path
                    )))
                }
            }
            other => Err(type_mismatch("map, module or capability", other.type_name())),
        }
    }

    /// `receiver?.name`
    ///
    /// `nil` and `None` short-circuit to `None`. `Some(inner)` looks the
    /// field up on `inner` and yields an Option, never a nested one. Any
    /// other receiver behaves like `.`.
    pub(super) fn optional_field_value(
        &self,
        receiver: &Value,
        name: Name,
    ) -> Result<Value, EvalError> {
        match receiver {
            Value::Nil | Value::None => Ok(Value::None),
            Value::Some(inner) => Ok(match self.field_value(inner, name)? {
                Value::Nil | Value::None => Value::None,
                found @ Value::Some(_) => found,
                found => Value::some(found),
            }),
            plain => self.field_value(plain, name),
        }
    }
}
