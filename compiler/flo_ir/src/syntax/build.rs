//! Terse constructors for syntax trees.
//!
//! Used by tests and embedders that build programs in Rust instead of
//! loading JSON.

use crate::{BinaryOp, Span, UnaryOp};

use super::{
    SyntaxArm, SyntaxElif, SyntaxEntry, SyntaxExpr, SyntaxModule, SyntaxPattern, SyntaxRescue,
    SyntaxStmt,
};

pub fn module(body: Vec<SyntaxStmt>) -> SyntaxModule {
    SyntaxModule { body }
}

// Statements

pub fn let_(name: &str, value: SyntaxExpr) -> SyntaxStmt {
    SyntaxStmt::Let {
        name: name.to_owned(),
        value,
    }
}

pub fn var(name: &str, value: SyntaxExpr) -> SyntaxStmt {
    SyntaxStmt::Var {
        name: name.to_owned(),
        value,
    }
}

pub fn const_(name: &str, value: SyntaxExpr) -> SyntaxStmt {
    SyntaxStmt::Const {
        name: name.to_owned(),
        value,
    }
}

pub fn fn_(name: &str, params: &[&str], body: Vec<SyntaxStmt>) -> SyntaxStmt {
    SyntaxStmt::Fn {
        name: name.to_owned(),
        params: strings(params),
        body,
    }
}

pub fn ret(value: SyntaxExpr) -> SyntaxStmt {
    SyntaxStmt::Return { value: Some(value) }
}

pub fn ret_nil() -> SyntaxStmt {
    SyntaxStmt::Return { value: None }
}

pub fn expr(expr: SyntaxExpr) -> SyntaxStmt {
    SyntaxStmt::Expr { expr }
}

pub fn bind(name: &str, path: &str, version: Option<&str>, alias: Option<&str>) -> SyntaxStmt {
    SyntaxStmt::Bind {
        name: name.to_owned(),
        path: path.to_owned(),
        version: version.map(str::to_owned),
        alias: alias.map(str::to_owned),
    }
}

pub fn request_cap(capability: &str, alias: &str) -> SyntaxStmt {
    SyntaxStmt::RequestCap {
        capability: capability.to_owned(),
        alias: alias.to_owned(),
    }
}

pub fn spanned_stmt(span: Span, stmt: SyntaxStmt) -> SyntaxStmt {
    SyntaxStmt::Spanned {
        span,
        stmt: Box::new(stmt),
    }
}

// Expressions

pub fn int(value: i64) -> SyntaxExpr {
    SyntaxExpr::Int { value }
}

pub fn float(value: f64) -> SyntaxExpr {
    SyntaxExpr::Float { value }
}

pub fn str(value: &str) -> SyntaxExpr {
    SyntaxExpr::Str {
        value: value.to_owned(),
    }
}

pub fn boolean(value: bool) -> SyntaxExpr {
    SyntaxExpr::Bool { value }
}

pub fn nil() -> SyntaxExpr {
    SyntaxExpr::Nil
}

pub fn ident(name: &str) -> SyntaxExpr {
    SyntaxExpr::Ident {
        name: name.to_owned(),
    }
}

pub fn binary(op: BinaryOp, left: SyntaxExpr, right: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn unary(op: UnaryOp, operand: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Unary {
        op,
        operand: Box::new(operand),
    }
}

pub fn assign(name: &str, value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Assign {
        name: name.to_owned(),
        value: Box::new(value),
    }
}

pub fn call(func: SyntaxExpr, args: Vec<SyntaxExpr>) -> SyntaxExpr {
    SyntaxExpr::Call {
        func: Box::new(func),
        args,
    }
}

/// Call of a function named by a plain identifier.
pub fn call_named(name: &str, args: Vec<SyntaxExpr>) -> SyntaxExpr {
    call(ident(name), args)
}

pub fn index(receiver: SyntaxExpr, index: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Index {
        receiver: Box::new(receiver),
        index: Box::new(index),
    }
}

pub fn field(receiver: SyntaxExpr, name: &str) -> SyntaxExpr {
    SyntaxExpr::Field {
        receiver: Box::new(receiver),
        name: name.to_owned(),
    }
}

pub fn opt_field(receiver: SyntaxExpr, name: &str) -> SyntaxExpr {
    SyntaxExpr::OptionalField {
        receiver: Box::new(receiver),
        name: name.to_owned(),
    }
}

pub fn list(items: Vec<SyntaxExpr>) -> SyntaxExpr {
    SyntaxExpr::List { items }
}

pub fn map(entries: Vec<(SyntaxExpr, SyntaxExpr)>) -> SyntaxExpr {
    SyntaxExpr::Map {
        entries: entries
            .into_iter()
            .map(|(key, value)| SyntaxEntry { key, value })
            .collect(),
    }
}

pub fn if_(
    cond: SyntaxExpr,
    then: Vec<SyntaxStmt>,
    elifs: Vec<(SyntaxExpr, Vec<SyntaxStmt>)>,
    else_block: Option<Vec<SyntaxStmt>>,
) -> SyntaxExpr {
    SyntaxExpr::If {
        cond: Box::new(cond),
        then,
        elifs: elifs
            .into_iter()
            .map(|(cond, body)| SyntaxElif { cond, body })
            .collect(),
        else_block,
    }
}

pub fn match_(scrutinee: SyntaxExpr, arms: Vec<(SyntaxPattern, Vec<SyntaxStmt>)>) -> SyntaxExpr {
    SyntaxExpr::Match {
        scrutinee: Box::new(scrutinee),
        arms: arms
            .into_iter()
            .map(|(pattern, body)| SyntaxArm { pattern, body })
            .collect(),
    }
}

pub fn for_(binding: &str, iterable: SyntaxExpr, body: Vec<SyntaxStmt>) -> SyntaxExpr {
    SyntaxExpr::For {
        binding: binding.to_owned(),
        iterable: Box::new(iterable),
        body,
    }
}

pub fn while_(cond: SyntaxExpr, body: Vec<SyntaxStmt>) -> SyntaxExpr {
    SyntaxExpr::While {
        cond: Box::new(cond),
        body,
    }
}

pub fn attempt(
    body: Vec<SyntaxStmt>,
    rescue: Option<(&str, Vec<SyntaxStmt>)>,
    finally: Option<Vec<SyntaxStmt>>,
) -> SyntaxExpr {
    SyntaxExpr::Attempt {
        body,
        rescue: rescue.map(|(name, body)| SyntaxRescue {
            name: name.to_owned(),
            body,
        }),
        finally,
    }
}

pub fn lambda(params: &[&str], body: Vec<SyntaxStmt>) -> SyntaxExpr {
    SyntaxExpr::Lambda {
        params: strings(params),
        body,
    }
}

pub fn strand(body: Vec<SyntaxStmt>) -> SyntaxExpr {
    SyntaxExpr::Strand { body }
}

pub fn await_(value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Await {
        value: Box::new(value),
    }
}

pub fn raise(value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Raise {
        value: Box::new(value),
    }
}

pub fn some(value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Some {
        value: Box::new(value),
    }
}

pub fn none() -> SyntaxExpr {
    SyntaxExpr::None
}

pub fn ok(value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Ok {
        value: Box::new(value),
    }
}

pub fn err(value: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Err {
        value: Box::new(value),
    }
}

pub fn spanned(span: Span, expr: SyntaxExpr) -> SyntaxExpr {
    SyntaxExpr::Spanned {
        span,
        expr: Box::new(expr),
    }
}

// Patterns

pub fn p_wild() -> SyntaxPattern {
    SyntaxPattern::Wildcard
}

pub fn p_bind(name: &str) -> SyntaxPattern {
    SyntaxPattern::Binding {
        name: name.to_owned(),
    }
}

pub fn p_int(value: i64) -> SyntaxPattern {
    SyntaxPattern::Int { value }
}

pub fn p_float(value: f64) -> SyntaxPattern {
    SyntaxPattern::Float { value }
}

pub fn p_str(value: &str) -> SyntaxPattern {
    SyntaxPattern::Str {
        value: value.to_owned(),
    }
}

pub fn p_bool(value: bool) -> SyntaxPattern {
    SyntaxPattern::Bool { value }
}

pub fn p_nil() -> SyntaxPattern {
    SyntaxPattern::Nil
}

pub fn p_some(inner: SyntaxPattern) -> SyntaxPattern {
    SyntaxPattern::Some {
        inner: Box::new(inner),
    }
}

pub fn p_none() -> SyntaxPattern {
    SyntaxPattern::None
}

pub fn p_ok(inner: SyntaxPattern) -> SyntaxPattern {
    SyntaxPattern::Ok {
        inner: Box::new(inner),
    }
}

pub fn p_err(inner: SyntaxPattern) -> SyntaxPattern {
    SyntaxPattern::Err {
        inner: Box::new(inner),
    }
}

pub fn p_list(items: Vec<SyntaxPattern>) -> SyntaxPattern {
    SyntaxPattern::List { items }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
