//! Flat AST types using arena allocation.
//!
//! - No `Box<Expr>`: children are `ExprId` / `StmtId` indices
//! - Child lists are contiguous ranges into the arena
//! - The arena is frozen after lowering and shared as [`SharedArena`]
//!
//! # Module Structure
//!
//! - `ids`: `ExprId`, `StmtId`
//! - `ranges`: arena range types
//! - `expr`: expression nodes
//! - `stmt`: statement nodes
//! - `operators`: binary and unary operators
//! - `patterns`: match patterns and arms
//! - `arena`: the arena itself and [`Module`]

mod arena;
mod expr;
mod ids;
mod operators;
mod patterns;
mod ranges;
mod stmt;

pub use arena::{ExprArena, Module, SharedArena};
pub use expr::{ElifBranch, Expr, ExprKind, MapEntry, RescueClause};
pub use ids::{ExprId, StmtId};
pub use operators::{BinaryOp, UnaryOp};
pub use patterns::{LiteralPattern, MatchArm, MatchPattern, VariantTag};
pub use ranges::{ArmRange, ElifRange, EntryRange, ExprRange, ParamRange, StmtRange};
pub use stmt::{Stmt, StmtKind};

#[cfg(test)]
mod tests;
