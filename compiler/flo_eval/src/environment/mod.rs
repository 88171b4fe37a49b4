//! Environment for variable scoping in the interpreter.
//!
//! A stack of [`SharedScope`] frames for the code currently running. Block
//! bodies push and pop frames on the stack; calls and strands swap in a
//! fresh stack rooted at the frame they captured, so a callee never sees
//! the caller's locals.

use flo_ir::{Name, StringInterner};
use flo_patterns::{BindError, BindingKind, Builtin, SharedScope, Value};

/// Scope stack over shared frames.
#[derive(Clone, Debug)]
pub struct Environment {
    /// Innermost frame last. Never empty.
    scopes: Vec<SharedScope>,
    /// Module frame; builtins and top-level declarations live here.
    global: SharedScope,
}

impl Environment {
    /// An environment with an empty root frame.
    pub fn new() -> Self {
        let global = SharedScope::root();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// A root frame pre-populated with the builtin functions as `let`
    /// bindings.
    pub fn with_builtins(interner: &StringInterner) -> Self {
        let env = Self::new();
        for builtin in Builtin::ALL {
            // Fresh root frame, so names cannot collide.
            let _ = env.global.define(
                interner.intern(builtin.name()),
                Value::Builtin(builtin),
                BindingKind::Let,
            );
        }
        env
    }

    /// A stack whose only entry is `frame`, sharing this environment's
    /// module frame.
    #[must_use]
    pub fn enter(&self, frame: SharedScope) -> Self {
        Environment {
            scopes: vec![frame],
            global: self.global.clone(),
        }
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    #[inline]
    pub fn current(&self) -> &SharedScope {
        self.scopes.last().unwrap_or(&self.global)
    }

    pub fn global(&self) -> &SharedScope {
        &self.global
    }

    /// Push a child of the current frame.
    #[inline]
    pub fn push_scope(&mut self) {
        let child = self.current().child();
        self.scopes.push(child);
    }

    /// Pop the current frame. The bottom frame is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    #[inline]
    pub fn define(&self, name: Name, value: Value, kind: BindingKind) -> Result<(), BindError> {
        self.current().define(name, value, kind)
    }

    #[inline]
    pub fn assign(&self, name: Name, value: Value) -> Result<(), BindError> {
        self.current().assign(name, value)
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.current().lookup(name)
    }

    /// Bind `name` in the module frame.
    pub fn define_global(&self, name: Name, value: Value, kind: BindingKind) -> Result<(), BindError> {
        self.global.define(name, value, kind)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
