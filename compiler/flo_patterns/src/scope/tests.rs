use pretty_assertions::assert_eq;

use super::*;

fn name(n: u32) -> Name {
    Name::from_raw(n)
}

#[test]
fn test_define_and_lookup() {
    let root = SharedScope::root();
    root.define(name(1), Value::Int(1), BindingKind::Let).unwrap();
    assert_eq!(root.lookup(name(1)), Some(Value::Int(1)));
    assert_eq!(root.lookup(name(2)), None);
}

#[test]
fn test_duplicate_in_same_frame() {
    let root = SharedScope::root();
    root.define(name(1), Value::Int(1), BindingKind::Var).unwrap();
    assert_eq!(
        root.define(name(1), Value::Int(2), BindingKind::Var),
        Err(BindError::Duplicate)
    );
}

#[test]
fn test_shadowing_in_child_frame() {
    let root = SharedScope::root();
    root.define(name(1), Value::Int(1), BindingKind::Let).unwrap();
    let child = root.child();
    child.define(name(1), Value::Int(2), BindingKind::Let).unwrap();
    assert_eq!(child.lookup(name(1)), Some(Value::Int(2)));
    assert_eq!(root.lookup(name(1)), Some(Value::Int(1)));
}

#[test]
fn test_assign_let_is_immutable() {
    let root = SharedScope::root();
    root.define(name(1), Value::Int(1), BindingKind::Let).unwrap();
    root.define(name(2), Value::Int(1), BindingKind::Const).unwrap();
    assert_eq!(
        root.assign(name(1), Value::Int(2)),
        Err(BindError::Immutable(BindingKind::Let))
    );
    assert_eq!(
        root.child().assign(name(2), Value::Int(2)),
        Err(BindError::Immutable(BindingKind::Const))
    );
    assert_eq!(root.lookup(name(1)), Some(Value::Int(1)));
}

#[test]
fn test_assign_var_through_child_mutates_outer() {
    let root = SharedScope::root();
    root.define(name(1), Value::Int(1), BindingKind::Var).unwrap();
    let child = root.child().child();
    child.assign(name(1), Value::Int(5)).unwrap();
    assert_eq!(root.lookup(name(1)), Some(Value::Int(5)));
}

#[test]
fn test_assign_undefined() {
    let root = SharedScope::root();
    assert_eq!(root.assign(name(9), Value::Nil), Err(BindError::Undefined));
}

#[test]
fn test_child_bindings_do_not_leak() {
    let root = SharedScope::root();
    let child = root.child();
    child.define(name(3), Value::Nil, BindingKind::Let).unwrap();
    assert!(child.contains_local(name(3)));
    assert!(!root.contains_local(name(3)));
    assert_eq!(root.lookup(name(3)), None);
}

#[test]
fn test_shared_frame_sees_updates() {
    let root = SharedScope::root();
    let alias = root.clone();
    root.define(name(1), Value::Int(0), BindingKind::Var).unwrap();
    alias.assign(name(1), Value::Int(7)).unwrap();
    assert!(alias.ptr_eq(&root));
    assert_eq!(root.lookup_binding(name(1)), Some((Value::Int(7), BindingKind::Var)));
}

#[test]
fn test_depth() {
    let root = SharedScope::root();
    assert_eq!(root.depth(), 1);
    assert_eq!(root.child().child().depth(), 3);
}
