//! RAII scope guards for the interpreter's environment.
//!
//! [`ScopedInterpreter`] pushes a child frame on creation and pops it on
//! drop, including during unwinding, so a block's bindings never leak into
//! the enclosing frame whichever way the block exits.
//!
//! ```text
//! interpreter.with_env_scope(|scoped| {
//!     scoped.define(name, value, BindingKind::Let)?;
//!     scoped.eval_stmts(body)
//! })
//! ```
//!
//! Calls and strands do not push onto the caller's stack; they swap in a
//! whole new stack rooted at the frame they captured (`with_frame`).

use std::ops::{Deref, DerefMut};

use flo_ir::SharedArena;
use flo_patterns::SharedScope;

use super::Interpreter;

/// Guard holding a freshly pushed frame. Derefs to the interpreter.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a child frame, popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` inside a fresh child frame.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` with `frame` as the only frame on the stack and `arena` as
    /// the current arena, then restore the caller's.
    pub(crate) fn with_frame<T>(
        &mut self,
        frame: SharedScope,
        arena: SharedArena,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let callee_env = self.env.enter(frame);
        let saved_env = std::mem::replace(&mut self.env, callee_env);
        let saved_arena = std::mem::replace(&mut self.arena, arena);
        let result = f(self);
        self.env = saved_env;
        self.arena = saved_arena;
        result
    }
}
