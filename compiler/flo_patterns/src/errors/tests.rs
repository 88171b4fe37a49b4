use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_factory_message_matches_kind() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.to_string(), "DivisionByZero: division by zero");
}

#[test]
fn test_binary_mismatch_names_operator() {
    let err = binary_type_mismatch(BinaryOp::Mod, "float", "int");
    assert_eq!(
        err.message,
        "type mismatch: expected operands supported by `%`, got float and int"
    );
}

#[test]
fn test_arity_message_pluralises() {
    assert_eq!(arity_mismatch("f", 1, 2).message, "f expects 1 argument, got 2");
    assert_eq!(arity_mismatch("", 2, 0).message, "expected 2 arguments, got 0");
}

#[test]
fn test_rescue_value_of_raised_value_is_the_value() {
    let err = user_raised(Value::string("boom"));
    assert_eq!(err.rescue_value(), Value::string("boom"));
}

#[test]
fn test_rescue_value_of_provider_error_is_the_payload() {
    let payload = Value::map_from_str_pairs([("message", Value::string("no such table"))]);
    let err = provider_error(payload.clone());
    assert_eq!(err.rescue_value(), payload);
    assert_eq!(err.message, "provider error: no such table");
}

#[test]
fn test_rescue_value_of_runtime_error_is_map() {
    let err = undefined_variable("x");
    let expected = Value::map_from_str_pairs([
        ("message", Value::string("undefined variable: x")),
        ("kind", Value::string("UndefinedVariable")),
    ]);
    assert_eq!(err.rescue_value(), expected);
}

#[test]
fn test_with_span_keeps_innermost() {
    let err = key_not_found(&Value::string("k"))
        .with_span(Span::new(1, 2))
        .with_span(Span::new(0, 9));
    assert_eq!(err.span, Some(Span::new(1, 2)));
    assert_eq!(err.to_string(), "KeyNotFound: key not found: k at 1..2");
}

#[test]
fn test_with_span_ignores_dummy() {
    let err = not_callable("int").with_span(Span::DUMMY);
    assert_eq!(err.span, None);
}

#[test]
fn test_backtrace_display() {
    let mut err = recursion_limit_exceeded(10);
    err.push_frame("inner", Some(Span::new(4, 8)));
    err.push_frame("outer", None);
    assert_eq!(err.backtrace.len(), 2);
    assert_eq!(
        err.backtrace.to_string(),
        "stack backtrace:\n  0: inner at 4..8\n  1: outer\n"
    );
}

#[test]
fn test_control_action_from_error() {
    let action: ControlAction = capability_denied("db", "capability `db` is disabled").into();
    let err = action.as_error().unwrap();
    assert_eq!(err.kind.name(), "CapabilityDenied");
    assert!(ControlAction::Return(Value::Nil).as_error().is_none());
}
