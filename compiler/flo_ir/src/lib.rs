//! Flo IR - syntax trees and the arena AST consumed by the evaluator.
//!
//! The core never parses source text. An external front-end hands in a
//! [`syntax::SyntaxModule`] (usually as JSON), which [`lower_module`] turns
//! into a flat, frozen [`ExprArena`] addressed by [`ExprId`] / [`StmtId`].
//!
//! # Layout
//!
//! - `name` / `interner`: 32-bit interned identifiers
//! - `span`: byte-offset source spans
//! - `ast`: arena nodes, ids and ranges
//! - `syntax`: owned serde tree (interchange format)
//! - `lower`: syntax tree -> arena
//! - `pretty`: indented tree rendering for `flo ast`

mod interner;
mod lower;
mod name;
mod pretty;
mod span;

pub mod ast;
pub mod syntax;

pub use ast::{
    ArmRange, BinaryOp, ElifBranch, ElifRange, EntryRange, Expr, ExprArena, ExprId, ExprKind,
    ExprRange, LiteralPattern, MapEntry, MatchArm, MatchPattern, Module, ParamRange, RescueClause,
    SharedArena, Stmt, StmtId, StmtKind, StmtRange, UnaryOp, VariantTag,
};
pub use interner::{SharedInterner, StringInterner};
pub use lower::{lower_module, LowerError};
pub use name::Name;
pub use pretty::pretty_print;
pub use span::Span;
