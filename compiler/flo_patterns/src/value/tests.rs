use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn ints(xs: &[i64]) -> Value {
    Value::list(xs.iter().copied().map(Value::Int).collect())
}

#[test]
fn test_int_float_compare_numerically() {
    assert!(Value::Int(2).equals(&Value::Float(2.0)));
    assert!(Value::Float(2.0).equals(&Value::Int(2)));
    assert!(!Value::Int(2).equals(&Value::Float(2.5)));
}

#[test]
fn test_list_equality_is_order_sensitive() {
    assert_eq!(ints(&[1, 2, 3]), ints(&[1, 2, 3]));
    assert_ne!(ints(&[1, 2, 3]), ints(&[3, 2, 1]));
    assert_ne!(ints(&[1, 2]), ints(&[1, 2, 3]));
}

#[test]
fn test_map_equality_ignores_order() {
    let a = Value::map_from_str_pairs([("x", Value::Int(1)), ("y", Value::Int(2))]);
    let b = Value::map_from_str_pairs([("y", Value::Int(2)), ("x", Value::Int(1))]);
    let c = Value::map_from_str_pairs([("y", Value::Int(3)), ("x", Value::Int(1))]);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_map_insert_overwrites_in_place() {
    let mut map = MapValue::new();
    map.insert(Value::string("a"), Value::Int(1));
    map.insert(Value::string("b"), Value::Int(2));
    map.insert(Value::string("a"), Value::Int(3));
    let keys: Vec<_> = map.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(map.get_str("a"), Some(&Value::Int(3)));
}

#[test]
fn test_map_float_and_int_keys_collide() {
    let map = MapValue::from_pairs([
        (Value::Int(1), Value::string("int")),
        (Value::Float(1.0), Value::string("float")),
    ]);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Value::Int(1)), Some(&Value::string("float")));
}

#[test]
fn test_set_deduplicates() {
    let set = SetValue::from_values([Value::Int(1), Value::Int(1), Value::string("1")]);
    assert_eq!(set.len(), 2);
    let other = SetValue::from_values([Value::string("1"), Value::Int(1)]);
    assert_eq!(Value::set(set), Value::set(other));
}

#[test]
fn test_truthiness() {
    let falsy = [
        Value::Bool(false),
        Value::Nil,
        Value::None,
        Value::err(Value::Int(1)),
        Value::Int(0),
        Value::Float(0.0),
        Value::string(""),
        Value::list(vec![]),
        Value::map(MapValue::new()),
        Value::range(3, 3),
    ];
    for value in &falsy {
        assert!(!value.is_truthy(), "{value} should be falsy");
    }
    let truthy = [
        Value::Bool(true),
        Value::Int(-1),
        Value::string("x"),
        Value::some(Value::Nil),
        Value::ok(Value::Int(0)),
        Value::Builtin(Builtin::Len),
    ];
    for value in &truthy {
        assert!(value.is_truthy(), "{value} should be truthy");
    }
}

#[test]
fn test_display() {
    let value = Value::list(vec![
        Value::Int(1),
        Value::Float(2.0),
        Value::string("a"),
        Value::some(Value::string("b")),
        Value::Nil,
    ]);
    assert_eq!(value.to_string(), r#"[1, 2.0, "a", Some("b"), nil]"#);
    assert_eq!(Value::string("plain").to_string(), "plain");
    assert_eq!(
        Value::map_from_str_pairs([("k", Value::Bool(true))]).to_string(),
        r#"{"k": true}"#
    );
    assert_eq!(Value::range(0, 3).to_string(), "range(0, 3)");
    assert_eq!(Value::strand(StrandId::new(4)).to_string(), "<strand#4>");
}

#[test]
fn test_range_len_and_iter() {
    let range = RangeValue::new(2, 5);
    assert_eq!(range.len(), 3);
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    // restartable
    assert_eq!(range.iter().count(), 3);
    assert_eq!(RangeValue::new(5, 2).len(), 0);
}

#[test]
fn test_type_names() {
    assert_eq!(Value::None.type_name(), "Option");
    assert_eq!(Value::ok(Value::Nil).type_name(), "Result");
    assert_eq!(Value::range(0, 1).type_name(), "range");
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{0,6}".prop_map(Value::string),
        Just(Value::Nil),
    ]
}

fn nested() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::list),
            inner.clone().prop_map(Value::some),
            prop::collection::vec(("[a-c]", inner), 0..4).prop_map(|pairs| {
                Value::map(MapValue::from_pairs(
                    pairs.into_iter().map(|(k, v)| (Value::string(k), v)),
                ))
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_equality_is_reflexive(v in nested()) {
        prop_assert!(v.equals(&v));
    }

    #[test]
    fn prop_equality_is_symmetric(a in nested(), b in nested()) {
        prop_assert_eq!(a.equals(&b), b.equals(&a));
    }

    #[test]
    fn prop_clone_is_equal(v in nested()) {
        prop_assert!(v.clone().equals(&v));
    }

    #[test]
    fn prop_map_order_irrelevant(pairs in prop::collection::vec(("[a-e]", any::<i64>()), 0..6)) {
        let forward = MapValue::from_pairs(
            pairs.iter().map(|(k, v)| (Value::string(k.as_str()), Value::Int(*v))),
        );
        let reversed = MapValue::from_pairs(
            forward.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>().into_iter().rev(),
        );
        prop_assert!(forward.equals(&reversed));
    }
}
