//! Owned syntax tree: the interchange format handed in by a front-end.
//!
//! Every node is an internally tagged serde enum (`"node": "Let"`), so a
//! parser written in any language can emit it as JSON. Nodes carry no
//! location by default; wrap one in `Spanned` to attach a [`Span`].
//!
//! ```json
//! {"body": [
//!   {"node": "Let", "name": "x", "value": {"node": "Int", "value": 1}}
//! ]}
//! ```

pub mod build;

use serde::{Deserialize, Serialize};

use crate::{BinaryOp, Span, UnaryOp};

/// A whole program.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct SyntaxModule {
    pub body: Vec<SyntaxStmt>,
}

/// Statements.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SyntaxStmt {
    Let {
        name: String,
        value: SyntaxExpr,
    },
    Var {
        name: String,
        value: SyntaxExpr,
    },
    Const {
        name: String,
        value: SyntaxExpr,
    },
    Fn {
        name: String,
        #[serde(default)]
        params: Vec<String>,
        body: Vec<SyntaxStmt>,
    },
    Return {
        #[serde(default)]
        value: Option<SyntaxExpr>,
    },
    Expr {
        expr: SyntaxExpr,
    },
    Bind {
        name: String,
        path: String,
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        alias: Option<String>,
    },
    RequestCap {
        capability: String,
        alias: String,
    },
    Spanned {
        span: Span,
        stmt: Box<SyntaxStmt>,
    },
}

/// Expressions.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SyntaxExpr {
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    Str {
        value: String,
    },
    Bool {
        value: bool,
    },
    Nil,
    Ident {
        name: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<SyntaxExpr>,
        right: Box<SyntaxExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SyntaxExpr>,
    },
    Assign {
        name: String,
        value: Box<SyntaxExpr>,
    },
    Call {
        func: Box<SyntaxExpr>,
        #[serde(default)]
        args: Vec<SyntaxExpr>,
    },
    Index {
        receiver: Box<SyntaxExpr>,
        index: Box<SyntaxExpr>,
    },
    Field {
        receiver: Box<SyntaxExpr>,
        name: String,
    },
    OptionalField {
        receiver: Box<SyntaxExpr>,
        name: String,
    },
    List {
        #[serde(default)]
        items: Vec<SyntaxExpr>,
    },
    Map {
        #[serde(default)]
        entries: Vec<SyntaxEntry>,
    },
    If {
        cond: Box<SyntaxExpr>,
        then: Vec<SyntaxStmt>,
        #[serde(default)]
        elifs: Vec<SyntaxElif>,
        #[serde(default, rename = "else")]
        else_block: Option<Vec<SyntaxStmt>>,
    },
    Match {
        scrutinee: Box<SyntaxExpr>,
        arms: Vec<SyntaxArm>,
    },
    For {
        binding: String,
        iterable: Box<SyntaxExpr>,
        body: Vec<SyntaxStmt>,
    },
    While {
        cond: Box<SyntaxExpr>,
        body: Vec<SyntaxStmt>,
    },
    Attempt {
        body: Vec<SyntaxStmt>,
        #[serde(default)]
        rescue: Option<SyntaxRescue>,
        #[serde(default)]
        finally: Option<Vec<SyntaxStmt>>,
    },
    Lambda {
        #[serde(default)]
        params: Vec<String>,
        body: Vec<SyntaxStmt>,
    },
    Strand {
        body: Vec<SyntaxStmt>,
    },
    Await {
        value: Box<SyntaxExpr>,
    },
    Raise {
        value: Box<SyntaxExpr>,
    },
    Some {
        value: Box<SyntaxExpr>,
    },
    None,
    Ok {
        value: Box<SyntaxExpr>,
    },
    Err {
        value: Box<SyntaxExpr>,
    },
    Spanned {
        span: Span,
        expr: Box<SyntaxExpr>,
    },
}

/// `key: value` in a map literal.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SyntaxEntry {
    pub key: SyntaxExpr,
    pub value: SyntaxExpr,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SyntaxElif {
    pub cond: SyntaxExpr,
    pub body: Vec<SyntaxStmt>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SyntaxArm {
    pub pattern: SyntaxPattern,
    pub body: Vec<SyntaxStmt>,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SyntaxRescue {
    pub name: String,
    pub body: Vec<SyntaxStmt>,
}

/// Match patterns.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum SyntaxPattern {
    Wildcard,
    Binding {
        name: String,
    },
    Int {
        value: i64,
    },
    Float {
        value: f64,
    },
    Str {
        value: String,
    },
    Bool {
        value: bool,
    },
    Nil,
    Some {
        inner: Box<SyntaxPattern>,
    },
    None,
    Ok {
        inner: Box<SyntaxPattern>,
    },
    Err {
        inner: Box<SyntaxPattern>,
    },
    List {
        #[serde(default)]
        items: Vec<SyntaxPattern>,
    },
}
