//! Composite value payloads: collections, ranges, callables and handles.

use std::fmt;
use std::sync::Arc;

use flo_ir::{Name, SharedArena, StmtRange};

use super::Value;
use crate::{Provider, SharedScope};

/// Insertion-ordered map keyed by structural equality.
///
/// Floats are valid keys, so there is no hashing; lookups are linear.
#[derive(Clone, Default, Debug)]
pub struct MapValue {
    entries: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs; a later duplicate key overwrites the earlier value
    /// but keeps the earlier position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, value);
        }
        map
    }

    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| k.equals(&key)) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.equals(key))
            .map(|(_, v)| v)
    }

    /// Lookup by string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Equality ignoring insertion order.
    pub fn equals(&self, other: &MapValue) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov.equals(v)))
    }
}

/// Insertion-ordered set of structurally distinct values.
#[derive(Clone, Default, Debug)]
pub struct SetValue {
    items: Vec<Value>,
}

impl SetValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut set = Self::new();
        for value in values {
            set.insert(value);
        }
        set
    }

    /// Insert; returns false if an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item.equals(value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn equals(&self, other: &SetValue) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}

/// Lazy, end-exclusive integer range produced by `range(start, end)`.
///
/// Restartable: iterating creates a fresh cursor every time.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RangeValue {
    pub start: i64,
    pub end: i64,
}

impl RangeValue {
    pub fn new(start: i64, end: i64) -> Self {
        RangeValue { start, end }
    }

    pub fn iter(&self) -> std::ops::Range<i64> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        usize::try_from(self.end.saturating_sub(self.start)).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// User-defined function or lambda.
///
/// Owns a handle to the frame that was active when it was defined, so
/// `var` bindings of enclosing frames stay shared, never copied.
#[derive(Clone)]
pub struct FunctionValue {
    /// `None` for lambdas.
    pub name: Option<Name>,
    pub params: Vec<Name>,
    pub body: StmtRange,
    /// Arena the body indexes into.
    pub arena: SharedArena,
    pub captured: SharedScope,
}

impl FunctionValue {
    pub fn new(
        name: Option<Name>,
        params: Vec<Name>,
        body: StmtRange,
        arena: SharedArena,
        captured: SharedScope,
    ) -> Self {
        FunctionValue {
            name,
            params,
            body,
            arena,
            captured,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

/// Native functions bound in the root frame.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Print,
    Range,
    Len,
    Str,
    Int,
    Float,
    Set,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Print,
        Builtin::Range,
        Builtin::Len,
        Builtin::Str,
        Builtin::Int,
        Builtin::Float,
        Builtin::Set,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Range => "range",
            Builtin::Len => "len",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Set => "set",
        }
    }

    /// Accepted argument count; `None` means variadic.
    pub const fn arity(self) -> Option<usize> {
        match self {
            Builtin::Print => None,
            Builtin::Range => Some(2),
            Builtin::Len | Builtin::Str | Builtin::Int | Builtin::Float | Builtin::Set => Some(1),
        }
    }
}

/// Identifier of a scheduled strand, unique within one interpreter.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct StrandId(u64);

impl StrandId {
    pub const fn new(raw: u64) -> Self {
        StrandId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strand#{}", self.0)
    }
}

/// Opaque reference to a scheduled strand or external task.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StrandHandle {
    pub id: StrandId,
}

/// A bound provider namespace, produced by `bind`.
#[derive(Clone)]
pub struct ModuleValue {
    /// Provider path, e.g. `std/db`.
    pub path: String,
    pub version: Option<String>,
    pub provider: Arc<dyn Provider>,
}

impl fmt::Debug for ModuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleValue")
            .field("path", &self.path)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// One operation of a bound module; callable with a capability token.
#[derive(Clone)]
pub struct ProviderOpValue {
    pub path: String,
    pub op: String,
    pub provider: Arc<dyn Provider>,
}

impl fmt::Debug for ProviderOpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderOp({}.{})", self.path, self.op)
    }
}
