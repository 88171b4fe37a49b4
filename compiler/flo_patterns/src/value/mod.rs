//! Runtime values for the Flo interpreter.
//!
//! `Value` is a closed tagged union. Heap payloads go through `Heap<T>`,
//! whose constructor is private to this crate, so all construction happens
//! through the factory methods below:
//!
//! ```text
//! let s = Value::string("hello");
//! let xs = Value::list(vec![Value::Int(1)]);
//! let opt = Value::some(Value::Nil);
//! ```
//!
//! Containers have value semantics: nothing hands out `&mut` to a payload,
//! so binding a list to a second name can never alias a mutation.

mod composite;
mod heap;

use std::fmt;
use std::sync::Arc;

use flo_caps::CapabilityToken;

pub use composite::{
    Builtin, FunctionValue, MapValue, ModuleValue, ProviderOpValue, RangeValue, SetValue,
    StrandHandle, StrandId,
};
pub use heap::Heap;

use crate::Provider;

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    // Primitives
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,

    // Heap types
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    Map(Heap<MapValue>),
    Set(Heap<SetValue>),
    /// Lazy integer range.
    Range(RangeValue),

    // Callables
    Function(Heap<FunctionValue>),
    Builtin(Builtin),

    // Option / Result
    Some(Heap<Value>),
    None,
    Ok(Heap<Value>),
    Err(Heap<Value>),

    // Handles
    Strand(StrandHandle),
    Capability(CapabilityToken),
    Module(Heap<ModuleValue>),
    ProviderOp(Heap<ProviderOpValue>),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    #[inline]
    pub fn map(map: MapValue) -> Self {
        Value::Map(Heap::new(map))
    }

    /// Map with string keys, in the given order.
    pub fn map_from_str_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Value)>) -> Self {
        Value::map(MapValue::from_pairs(
            pairs.into_iter().map(|(k, v)| (Value::string(k), v)),
        ))
    }

    #[inline]
    pub fn set(set: SetValue) -> Self {
        Value::Set(Heap::new(set))
    }

    #[inline]
    pub fn range(start: i64, end: i64) -> Self {
        Value::Range(RangeValue::new(start, end))
    }

    #[inline]
    pub fn function(function: FunctionValue) -> Self {
        Value::Function(Heap::new(function))
    }

    #[inline]
    pub fn some(value: Value) -> Self {
        Value::Some(Heap::new(value))
    }

    #[inline]
    pub fn ok(value: Value) -> Self {
        Value::Ok(Heap::new(value))
    }

    #[inline]
    pub fn err(value: Value) -> Self {
        Value::Err(Heap::new(value))
    }

    #[inline]
    pub fn strand(id: StrandId) -> Self {
        Value::Strand(StrandHandle { id })
    }

    pub fn module(path: impl Into<String>, version: Option<String>, provider: Arc<dyn Provider>) -> Self {
        Value::Module(Heap::new(ModuleValue {
            path: path.into(),
            version,
            provider,
        }))
    }

    pub fn provider_op(module: &ModuleValue, op: impl Into<String>) -> Self {
        Value::ProviderOp(Heap::new(ProviderOpValue {
            path: module.path.clone(),
            op: op.into(),
            provider: Arc::clone(&module.provider),
        }))
    }
}

// Value Methods

impl Value {
    /// Truthiness used by conditions and logical operators.
    ///
    /// `false`, `nil`, `None`, `Err(_)`, zero and empty strings or
    /// collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Set(set) => !set.is_empty(),
            Value::Range(range) => !range.is_empty(),
            Value::Nil | Value::None | Value::Err(_) => false,
            Value::Function(_)
            | Value::Builtin(_)
            | Value::Some(_)
            | Value::Ok(_)
            | Value::Strand(_)
            | Value::Capability(_)
            | Value::Module(_)
            | Value::ProviderOp(_) => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; ints widen to float.
    #[allow(clippy::cast_precision_loss, reason = "i64 -> f64 promotion is the language rule")]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Range(_) => "range",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::Some(_) | Value::None => "Option",
            Value::Ok(_) | Value::Err(_) => "Result",
            Value::Strand(_) => "strand",
            Value::Capability(_) => "capability",
            Value::Module(_) => "module",
            Value::ProviderOp(_) => "provider operation",
        }
    }

    /// Structural equality.
    ///
    /// Ints and floats compare numerically. Lists are order-sensitive; maps
    /// and sets are not. Functions, modules and operations compare by
    /// identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(_), Value::Float(b)) => self.as_float() == Some(*b),
            (Value::Float(a), Value::Int(_)) => other.as_float() == Some(*a),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) | (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => **a == **b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Map(a), Value::Map(b)) => a.equals(b),
            (Value::Set(a), Value::Set(b)) => a.equals(b),
            (Value::Range(a), Value::Range(b)) => a == b,
            (Value::Some(a), Value::Some(b))
            | (Value::Ok(a), Value::Ok(b))
            | (Value::Err(a), Value::Err(b)) => a.equals(b),
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Strand(a), Value::Strand(b)) => a == b,
            (Value::Capability(a), Value::Capability(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => {
                a.path == b.path && Arc::ptr_eq(&a.provider, &b.provider)
            }
            (Value::ProviderOp(a), Value::ProviderOp(b)) => {
                a.op == b.op && a.path == b.path && Arc::ptr_eq(&a.provider, &b.provider)
            }
            _ => false,
        }
    }

    /// Quoted rendering used for values nested inside containers.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s.as_str()),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

struct Nested<'a>(&'a Value);

impl fmt::Display for Nested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_nested(f)
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Nested(item))?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::Str(s) => write!(f, "{}", s.as_str()),
            Value::List(items) => write_seq(f, "[", items.iter(), "]"),
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", Nested(k), Nested(v))?;
                }
                f.write_str("}")
            }
            Value::Set(set) => write_seq(f, "set([", set.iter(), "])"),
            Value::Range(r) => write!(f, "range({}, {})", r.start, r.end),
            Value::Function(func) => match func.name {
                Some(_) => write!(f, "<fn/{}>", func.arity()),
                None => write!(f, "<lambda/{}>", func.arity()),
            },
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name()),
            Value::Some(v) => write!(f, "Some({})", Nested(v)),
            Value::None => write!(f, "None"),
            Value::Ok(v) => write!(f, "Ok({})", Nested(v)),
            Value::Err(v) => write!(f, "Err({})", Nested(v)),
            Value::Strand(h) => write!(f, "<{}>", h.id),
            Value::Capability(token) => write!(f, "<cap {}>", token.name()),
            Value::Module(m) => write!(f, "<module {}>", m.path),
            Value::ProviderOp(op) => write!(f, "<op {}.{}>", op.path, op.op),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;
