//! Lexical scope frames.
//!
//! Frames form a tree rooted at the module frame. A frame is shared (not
//! copied) by every closure defined in it and every call or strand running
//! in it, and lives as long as the last of those. Lookups and assignments
//! walk the parent chain outward; the first frame holding the name wins.
//!
//! Only one strand evaluates at a time, so the lock never contends; it is
//! there to make frames `Send + Sync` alongside the rest of `Value`.

use std::fmt;
use std::sync::Arc;

use flo_ir::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Value;

/// How a name was declared.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Let,
    Var,
    Const,
}

impl BindingKind {
    #[inline]
    pub fn is_mutable(self) -> bool {
        matches!(self, BindingKind::Var)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BindingKind::Let => "let",
            BindingKind::Var => "var",
            BindingKind::Const => "const",
        }
    }
}

/// Why a define or assign failed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BindError {
    /// Name already bound in this frame.
    Duplicate,
    /// Nearest binding is `let` or `const`.
    Immutable(BindingKind),
    /// Not bound in any enclosing frame.
    Undefined,
}

#[derive(Clone, Debug)]
struct Binding {
    value: Value,
    kind: BindingKind,
}

#[derive(Default)]
struct Frame {
    bindings: FxHashMap<Name, Binding>,
    parent: Option<SharedScope>,
}

/// Shared handle to one scope frame.
#[derive(Clone, Default)]
pub struct SharedScope(Arc<RwLock<Frame>>);

impl SharedScope {
    /// A root frame with no parent.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new frame whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        SharedScope(Arc::new(RwLock::new(Frame {
            bindings: FxHashMap::default(),
            parent: Some(self.clone()),
        })))
    }

    pub fn parent(&self) -> Option<SharedScope> {
        self.0.read().parent.clone()
    }

    /// Whether both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &SharedScope) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Bind `name` in this frame.
    pub fn define(&self, name: Name, value: Value, kind: BindingKind) -> Result<(), BindError> {
        let mut frame = self.0.write();
        if frame.bindings.contains_key(&name) {
            return Err(BindError::Duplicate);
        }
        frame.bindings.insert(name, Binding { value, kind });
        Ok(())
    }

    /// Replace the value of the nearest `var` binding of `name`.
    pub fn assign(&self, name: Name, value: Value) -> Result<(), BindError> {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut frame = current.0.write();
                if let Some(binding) = frame.bindings.get_mut(&name) {
                    if !binding.kind.is_mutable() {
                        return Err(BindError::Immutable(binding.kind));
                    }
                    binding.value = value;
                    return Ok(());
                }
                frame.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return Err(BindError::Undefined),
            }
        }
    }

    /// Value of the nearest binding of `name`.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.lookup_binding(name).map(|(value, _)| value)
    }

    /// Value and declaration kind of the nearest binding of `name`.
    pub fn lookup_binding(&self, name: Name) -> Option<(Value, BindingKind)> {
        let mut current = self.clone();
        loop {
            let parent = {
                let frame = current.0.read();
                if let Some(binding) = frame.bindings.get(&name) {
                    return Some((binding.value.clone(), binding.kind));
                }
                frame.parent.clone()
            };
            current = parent?;
        }
    }

    /// Whether `name` is bound directly in this frame.
    pub fn contains_local(&self, name: Name) -> bool {
        self.0.read().bindings.contains_key(&name)
    }

    /// Number of bindings in this frame.
    pub fn local_len(&self) -> usize {
        self.0.read().bindings.len()
    }

    /// Chain length from this frame to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(frame) = current {
            depth += 1;
            current = frame.parent();
        }
        depth
    }
}

impl fmt::Debug for SharedScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedScope")
            .field("locals", &self.local_len())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests;
