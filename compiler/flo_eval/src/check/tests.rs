use flo_ir::syntax::build::{
    assign, expr, fn_, ident, if_, int, lambda, let_, module, ret, request_cap, spanned_stmt,
    var,
};
use flo_ir::syntax::SyntaxStmt;
use flo_ir::{lower_module, Span, StringInterner};
use pretty_assertions::assert_eq;

use super::*;

fn check(body: Vec<SyntaxStmt>) -> Vec<CheckProblem> {
    let interner = StringInterner::new();
    let lowered = lower_module(&module(body), &interner).unwrap();
    check_module(&lowered, &interner)
}

fn kinds(body: Vec<SyntaxStmt>) -> Vec<ProblemKind> {
    check(body).into_iter().map(|p| p.kind).collect()
}

#[test]
fn clean_module_has_no_problems() {
    let problems = kinds(vec![
        request_cap("net", "net"),
        var("n", int(0)),
        fn_("bump", &[], vec![expr(assign("n", int(1)))]),
        expr(ident("bump")),
    ]);
    assert!(problems.is_empty(), "{problems:?}");
}

#[test]
fn request_inside_function() {
    let problems = kinds(vec![fn_("f", &[], vec![request_cap("db", "db")])]);
    assert_eq!(
        problems,
        vec![ProblemKind::CapabilityOutsideModule {
            capability: "db".to_owned()
        }]
    );
}

#[test]
fn request_inside_lambda_block() {
    let problems = kinds(vec![let_(
        "f",
        lambda(
            &[],
            vec![expr(if_(int(1), vec![request_cap("net", "n")], vec![], None))],
        ),
    )]);
    assert_eq!(problems.len(), 1);
    assert!(matches!(
        problems[0],
        ProblemKind::CapabilityOutsideModule { .. }
    ));
}

#[test]
fn unknown_capability() {
    let problems = kinds(vec![request_cap("teleport", "t")]);
    assert_eq!(
        problems,
        vec![ProblemKind::UnknownCapability {
            name: "teleport".to_owned()
        }]
    );
}

#[test]
fn duplicate_declaration_in_one_block() {
    let problems = kinds(vec![let_("x", int(1)), var("x", int(2))]);
    assert_eq!(
        problems,
        vec![ProblemKind::DuplicateDeclaration {
            name: "x".to_owned()
        }]
    );
}

#[test]
fn shadowing_in_inner_block_is_fine() {
    let problems = kinds(vec![
        let_("x", int(1)),
        expr(if_(int(1), vec![var("x", int(2)), expr(assign("x", int(3)))], vec![], None)),
    ]);
    assert!(problems.is_empty(), "{problems:?}");
}

#[test]
fn assignment_to_let_and_const() {
    let problems = kinds(vec![
        let_("a", int(1)),
        flo_ir::syntax::build::const_("b", int(1)),
        expr(assign("a", int(2))),
        expr(assign("b", int(2))),
    ]);
    assert_eq!(
        problems,
        vec![
            ProblemKind::AssignToImmutable {
                name: "a".to_owned(),
                kind: BindingKind::Let
            },
            ProblemKind::AssignToImmutable {
                name: "b".to_owned(),
                kind: BindingKind::Const
            },
        ]
    );
}

#[test]
fn assignment_to_parameter() {
    let problems = kinds(vec![fn_(
        "f",
        &["p"],
        vec![expr(assign("p", int(1))), ret(ident("p"))],
    )]);
    assert_eq!(
        problems,
        vec![ProblemKind::AssignToImmutable {
            name: "p".to_owned(),
            kind: BindingKind::Let
        }]
    );
}

#[test]
fn assignment_to_unknown_name_is_left_to_runtime() {
    assert!(kinds(vec![expr(assign("global", int(1)))]).is_empty());
}

#[test]
fn problem_display_includes_span() {
    let problems = check(vec![spanned_stmt(
        Span::new(3, 9),
        request_cap("teleport", "t"),
    )]);
    assert_eq!(
        problems[0].to_string(),
        "unknown capability `teleport` at 3..9"
    );
}
