use pretty_assertions::assert_eq;

use super::*;
use crate::{Name, Span};

#[test]
fn test_alloc_expr_returns_sequential_ids() {
    let mut arena = ExprArena::new();
    let a = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::DUMMY));
    let b = arena.alloc_expr(Expr::new(ExprKind::Nil, Span::new(3, 6)));
    assert_eq!(a, ExprId::new(0));
    assert_eq!(b, ExprId::new(1));
    assert_eq!(arena.expr(b).span, Span::new(3, 6));
    assert_eq!(arena.expr_count(), 2);
}

#[test]
fn test_lists_are_contiguous() {
    let mut arena = ExprArena::new();
    let ids: Vec<_> = (0..3)
        .map(|i| arena.alloc_expr(Expr::new(ExprKind::Int(i), Span::DUMMY)))
        .collect();
    let first = arena.alloc_expr_list(ids.iter().copied());
    let second = arena.alloc_expr_list([ids[2]]);
    assert_eq!(arena.expr_list(first), ids.as_slice());
    assert_eq!(arena.expr_list(second), &[ids[2]]);
    assert_eq!(second.start, 3);
}

#[test]
fn test_empty_range() {
    let arena = ExprArena::new();
    assert!(StmtRange::EMPTY.is_empty());
    assert!(arena.stmt_list(StmtRange::EMPTY).is_empty());
    assert_eq!(format!("{:?}", ArmRange::new(2, 3)), "ArmRange(2..5)");
}

#[test]
fn test_invalid_id_debug() {
    assert!(!ExprId::INVALID.is_valid());
    assert_eq!(format!("{:?}", StmtId::INVALID), "StmtId(INVALID)");
    assert_eq!(format!("{:?}", StmtId::new(7)), "StmtId(7)");
}

#[test]
fn test_pattern_bindings_in_order() {
    let a = Name::from_raw(1);
    let b = Name::from_raw(2);
    let pattern = MatchPattern::List(vec![
        MatchPattern::Binding(a),
        MatchPattern::Wildcard,
        MatchPattern::Variant {
            tag: VariantTag::Some,
            inner: Some(Box::new(MatchPattern::Binding(b))),
        },
    ]);
    assert_eq!(pattern.bindings(), vec![a, b]);
}

#[test]
fn test_declared_name() {
    let x = Name::from_raw(4);
    let alias = Name::from_raw(5);
    let bind = StmtKind::Bind {
        name: x,
        path: Name::from_raw(6),
        version: None,
        alias: Some(alias),
    };
    assert_eq!(bind.declared_name(), Some(alias));
    assert_eq!(StmtKind::Return(None).declared_name(), None);
}

#[test]
fn test_operator_symbols() {
    assert_eq!(BinaryOp::PipeForward.as_symbol(), "|>");
    assert_eq!(BinaryOp::Mod.as_symbol(), "%");
    assert_eq!(UnaryOp::Not.as_symbol(), "!");
    assert!(BinaryOp::Or.is_short_circuit());
    assert!(!BinaryOp::Add.is_short_circuit());
}
