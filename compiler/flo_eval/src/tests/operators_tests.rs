//! Tests for binary and unary operators, direct and through programs.

use flo_ir::syntax::build::{
    binary, boolean, call, expr, float, ident, int, lambda, let_, list, ret, str, unary,
};
use flo_ir::{BinaryOp, UnaryOp};

use super::{eval, run};
use crate::{evaluate_binary, evaluate_unary, EvalErrorKind, Value};

fn kind_of(result: Result<Value, crate::EvalError>) -> EvalErrorKind {
    match result {
        Ok(value) => panic!("expected an error, got {value}"),
        Err(err) => err.kind,
    }
}

mod arithmetic {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_division_yields_float() {
        assert_eq!(
            evaluate_binary(Value::Int(7), Value::Int(2), BinaryOp::Div).unwrap(),
            Value::Float(3.5)
        );
    }

    #[test]
    fn modulo_is_floored() {
        let cases = [(7, 3, 1), (-7, 3, 2), (7, -3, -2), (-7, -3, -1)];
        for (a, b, expected) in cases {
            assert_eq!(
                evaluate_binary(Value::Int(a), Value::Int(b), BinaryOp::Mod).unwrap(),
                Value::Int(expected),
                "{a} % {b}"
            );
        }
    }

    #[test]
    fn float_modulo_is_a_type_error() {
        let kind = kind_of(evaluate_binary(
            Value::Float(7.5),
            Value::Int(2),
            BinaryOp::Mod,
        ));
        assert!(matches!(kind, EvalErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn zero_divisor_wins_over_float_modulo() {
        assert_eq!(
            kind_of(evaluate_binary(
                Value::Float(1.5),
                Value::Float(0.0),
                BinaryOp::Mod
            )),
            EvalErrorKind::DivisionByZero
        );
    }

    #[test]
    fn overflow_is_an_error() {
        for op in [BinaryOp::Add, BinaryOp::Mul] {
            let kind = kind_of(evaluate_binary(Value::Int(i64::MAX), Value::Int(2), op));
            assert!(matches!(kind, EvalErrorKind::IntegerOverflow { .. }), "{op:?}");
        }
        let kind = kind_of(evaluate_binary(
            Value::Int(i64::MIN),
            Value::Int(1),
            BinaryOp::Sub,
        ));
        assert!(matches!(kind, EvalErrorKind::IntegerOverflow { .. }));
    }

    #[test]
    fn mixed_numbers_promote_to_float() {
        assert_eq!(
            evaluate_binary(Value::Int(1), Value::Float(0.5), BinaryOp::Add).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn strings_and_lists_concatenate() {
        assert_eq!(
            evaluate_binary(Value::string("ab"), Value::string("cd"), BinaryOp::Add).unwrap(),
            Value::string("abcd")
        );
        assert_eq!(
            evaluate_binary(
                Value::list(vec![Value::Int(1)]),
                Value::list(vec![Value::Int(2)]),
                BinaryOp::Add
            )
            .unwrap(),
            Value::list(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn string_plus_int_is_a_type_error() {
        let kind = kind_of(evaluate_binary(
            Value::string("a"),
            Value::Int(1),
            BinaryOp::Add,
        ));
        assert!(matches!(kind, EvalErrorKind::TypeMismatch { .. }));
    }
}

mod comparison {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(
            evaluate_binary(Value::Int(1), Value::Float(1.5), BinaryOp::Lt).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            evaluate_binary(Value::Int(2), Value::Float(2.0), BinaryOp::Eq).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn strings_compare_lexicographically() {
        assert_eq!(
            evaluate_binary(Value::string("apple"), Value::string("banana"), BinaryOp::Lt)
                .unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn nan_is_unordered() {
        for op in [BinaryOp::Lt, BinaryOp::LtEq, BinaryOp::Gt, BinaryOp::GtEq] {
            assert_eq!(
                evaluate_binary(Value::Float(f64::NAN), Value::Int(1), op).unwrap(),
                Value::Bool(false),
                "{op:?}"
            );
        }
    }

    #[test]
    fn equality_never_fails() {
        assert_eq!(
            evaluate_binary(Value::string("1"), Value::Int(1), BinaryOp::Eq).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            evaluate_binary(Value::Nil, Value::None, BinaryOp::NotEq).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn ordering_incomparable_values_fails() {
        let kind = kind_of(evaluate_binary(
            Value::list(vec![]),
            Value::Int(1),
            BinaryOp::Gt,
        ));
        assert!(matches!(kind, EvalErrorKind::TypeMismatch { .. }));
    }
}

mod unary_ops {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_uses_truthiness() {
        assert_eq!(
            evaluate_unary(Value::Int(0), UnaryOp::Not).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            evaluate_unary(Value::string("x"), UnaryOp::Not).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn negating_min_int_overflows() {
        let kind = kind_of(evaluate_unary(Value::Int(i64::MIN), UnaryOp::Neg));
        assert!(matches!(kind, EvalErrorKind::IntegerOverflow { .. }));
    }

    #[test]
    fn unary_plus_keeps_numbers() {
        let value = eval(unary(UnaryOp::Plus, float(2.5))).unwrap();
        assert_eq!(value, Value::Float(2.5));
    }

    #[test]
    fn negating_a_string_fails() {
        let kind = kind_of(evaluate_unary(Value::string("x"), UnaryOp::Neg));
        assert!(matches!(kind, EvalErrorKind::TypeMismatch { .. }));
    }
}

mod logical {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn and_skips_right_operand() {
        let value = eval(binary(BinaryOp::And, boolean(false), ident("missing"))).unwrap();
        assert_eq!(value, Value::Bool(false));
    }

    #[test]
    fn or_skips_right_operand() {
        let value = eval(binary(BinaryOp::Or, int(1), ident("missing"))).unwrap();
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn right_operand_decides_otherwise() {
        let value = eval(binary(BinaryOp::And, boolean(true), str(""))).unwrap();
        assert_eq!(value, Value::Bool(false));
    }
}

mod pipelines {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pipe_into_builtin() {
        let value = eval(binary(
            BinaryOp::PipeForward,
            list(vec![int(1), int(2), int(3)]),
            ident("len"),
        ))
        .unwrap();
        assert_eq!(value, Value::Int(3));
    }

    #[test]
    fn piping_into_non_callable_fails() {
        let kind = kind_of(eval(binary(BinaryOp::PipeForward, int(1), int(2))));
        assert!(matches!(kind, EvalErrorKind::NotCallable { .. }));
    }
}

mod proptest_operators {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// `let f := fn(n) do return n * 2 + 1 end`, then `body`.
    fn with_double_plus_one(body: flo_ir::syntax::SyntaxExpr) -> Value {
        run(vec![
            let_(
                "f",
                lambda(
                    &["n"],
                    vec![ret(binary(
                        BinaryOp::Add,
                        binary(BinaryOp::Mul, ident("n"), int(2)),
                        int(1),
                    ))],
                ),
            ),
            expr(body),
        ])
        .value()
        .clone()
    }

    proptest! {
        #[test]
        fn int_division_by_zero_always_fails(a in any::<i64>()) {
            for op in [BinaryOp::Div, BinaryOp::Mod] {
                let result = evaluate_binary(Value::Int(a), Value::Int(0), op);
                prop_assert_eq!(result.map_err(|e| e.kind), Err(EvalErrorKind::DivisionByZero));
            }
        }

        #[test]
        fn float_division_by_zero_always_fails(a in any::<f64>()) {
            let result = evaluate_binary(Value::Float(a), Value::Float(0.0), BinaryOp::Div);
            prop_assert_eq!(result.map_err(|e| e.kind), Err(EvalErrorKind::DivisionByZero));
        }

        #[test]
        fn floored_modulo_has_divisor_sign(a in -10_000i64..10_000, b in 1i64..100) {
            for divisor in [b, -b] {
                let Value::Int(r) = evaluate_binary(Value::Int(a), Value::Int(divisor), BinaryOp::Mod).unwrap() else {
                    panic!("int modulo must stay int");
                };
                prop_assert!(r == 0 || (r < 0) == (divisor < 0));
                prop_assert!(r.abs() < divisor.abs());
            }
        }

        #[test]
        fn pipelines_equal_direct_calls(x in -1_000_000i64..1_000_000) {
            let direct = with_double_plus_one(call(ident("f"), vec![int(x)]));
            let forward = with_double_plus_one(binary(BinaryOp::PipeForward, int(x), ident("f")));
            let backward = with_double_plus_one(binary(BinaryOp::PipeBackward, ident("f"), int(x)));
            prop_assert_eq!(&direct, &Value::Int(x * 2 + 1));
            prop_assert_eq!(&forward, &direct);
            prop_assert_eq!(&backward, &direct);
        }

        #[test]
        fn negation_round_trips(x in (i64::MIN + 1)..=i64::MAX) {
            let once = evaluate_unary(Value::Int(x), UnaryOp::Neg).unwrap();
            prop_assert_eq!(evaluate_unary(once, UnaryOp::Neg).unwrap(), Value::Int(x));
        }
    }
}
