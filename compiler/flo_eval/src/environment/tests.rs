use super::*;
use flo_ir::SharedInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_environment_push_pop() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Int(1), BindingKind::Let).unwrap();

    env.push_scope();
    env.define(x, Value::Int(2), BindingKind::Let).unwrap();
    assert_eq!(env.lookup(x), Some(Value::Int(2)));
    assert_eq!(env.depth(), 2);

    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(1)));
}

#[test]
fn test_environment_pop_keeps_bottom_frame() {
    let mut env = Environment::new();
    env.pop_scope();
    env.pop_scope();
    assert_eq!(env.depth(), 1);
    assert!(env.current().ptr_eq(env.global()));
}

#[test]
fn test_environment_var_assign_through_child() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let mut env = Environment::new();
    env.define(x, Value::Int(1), BindingKind::Var).unwrap();
    env.push_scope();
    env.assign(x, Value::Int(5)).unwrap();
    env.pop_scope();
    assert_eq!(env.lookup(x), Some(Value::Int(5)));
}

#[test]
fn test_environment_let_is_immutable() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let env = Environment::new();
    env.define(x, Value::Int(1), BindingKind::Let).unwrap();
    assert_eq!(
        env.assign(x, Value::Int(2)),
        Err(BindError::Immutable(BindingKind::Let))
    );
}

#[test]
fn test_environment_duplicate_in_same_frame() {
    let interner = SharedInterner::default();
    let x = interner.intern("x");

    let env = Environment::new();
    env.define(x, Value::Int(1), BindingKind::Var).unwrap();
    assert_eq!(
        env.define(x, Value::Int(2), BindingKind::Var),
        Err(BindError::Duplicate)
    );
}

#[test]
fn test_with_builtins_binds_every_builtin() {
    let interner = SharedInterner::default();
    let env = Environment::with_builtins(&interner);
    for builtin in Builtin::ALL {
        assert_eq!(
            env.lookup(interner.intern(builtin.name())),
            Some(Value::Builtin(builtin))
        );
    }
}

#[test]
fn test_enter_isolates_caller_locals() {
    let interner = SharedInterner::default();
    let local = interner.intern("local");
    let shared = interner.intern("shared");

    let mut env = Environment::new();
    env.define_global(shared, Value::Int(1), BindingKind::Let)
        .unwrap();
    env.push_scope();
    env.define(local, Value::Int(2), BindingKind::Let).unwrap();

    let callee = env.enter(env.global().child());
    assert_eq!(callee.lookup(local), None);
    assert_eq!(callee.lookup(shared), Some(Value::Int(1)));
    assert!(callee.global().ptr_eq(env.global()));
}
