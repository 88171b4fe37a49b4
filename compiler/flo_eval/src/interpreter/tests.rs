use std::sync::Arc;

use flo_ir::{ExprArena, StringInterner};
use flo_patterns::{Builtin, SharedScope};
use pretty_assertions::assert_eq;

use super::*;
use crate::{silent_handler, PrintHandler};

fn interpreter(interner: &StringInterner) -> Interpreter<'_> {
    InterpreterBuilder::new(interner)
        .print_handler(silent_handler())
        .build()
}

#[test]
fn builder_defaults() {
    let interner = StringInterner::new();
    let interp = InterpreterBuilder::new(&interner).build();
    assert!(matches!(**interp.print_handler(), PrintHandler::Stdout));
    assert_eq!(interp.capabilities().iter().count(), 0);
    assert_eq!(interp.env().depth(), 1);
    assert_eq!(interp.scheduler().next_unfinished(), None);
    assert_eq!(interp.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
    assert!(interp.env().lookup(interner.intern("print")).is_some());
}

#[test]
fn scoped_guard_pops_on_drop() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    {
        let scoped = interp.scoped();
        assert_eq!(scoped.env().depth(), 2);
    }
    assert_eq!(interp.env().depth(), 1);
}

#[test]
fn scope_bindings_do_not_leak() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    let x = interner.intern("x");
    let seen = interp.with_env_scope(|scoped| {
        scoped.define(x, Value::Int(1), BindingKind::Let).unwrap();
        scoped.env().lookup(x)
    });
    assert_eq!(seen, Some(Value::Int(1)));
    assert_eq!(interp.env().lookup(x), None);
}

#[test]
fn with_frame_restores_environment_and_arena() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    let x = interner.intern("x");
    interp.env.define(x, Value::Int(1), BindingKind::Let).unwrap();
    interp.env.push_scope();
    let before = Arc::clone(&interp.arena);

    let other = Arc::new(ExprArena::new());
    let inside = interp.with_frame(SharedScope::root(), Arc::clone(&other), |inner| {
        assert!(Arc::ptr_eq(&inner.arena, &other));
        (inner.env().depth(), inner.env().lookup(x))
    });

    assert_eq!(inside, (1, None));
    assert_eq!(interp.env().depth(), 2);
    assert!(Arc::ptr_eq(&interp.arena, &before));
    assert_eq!(interp.env().lookup(x), Some(Value::Int(1)));
}

#[test]
fn call_value_dispatches_builtins() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    let value = interp
        .call_value(Value::Builtin(Builtin::Len), &[Value::string("abc")])
        .unwrap();
    assert_eq!(value, Value::Int(3));
}

#[test]
fn calling_a_number_fails() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    let err = interp.call_value(Value::Int(1), &[]).unwrap_err();
    assert!(matches!(
        err.as_error().map(|e| &e.kind),
        Some(flo_patterns::EvalErrorKind::NotCallable { .. })
    ));
}

#[test]
fn awaiting_an_unknown_strand_fails() {
    let interner = StringInterner::new();
    let mut interp = interpreter(&interner);
    let err = interp
        .await_strand(flo_patterns::StrandId::new(99))
        .unwrap_err();
    assert_eq!(
        err.kind,
        flo_patterns::EvalErrorKind::UnknownStrand { strand: 99 }
    );
}
