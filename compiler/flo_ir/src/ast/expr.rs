//! Expression Types
//!
//! Expression node and its variants. Blocks are `StmtRange`s; everything
//! else points at children by `ExprId`.

use std::fmt;

use crate::{Name, Span};

use super::{
    ArmRange, BinaryOp, ElifRange, EntryRange, ExprId, ExprRange, ParamRange, StmtRange, UnaryOp,
};

/// Expression node.
#[derive(Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    // Literals
    Int(i64),
    Float(f64),
    /// Interned string literal.
    Str(Name),
    Bool(bool),
    Nil,

    /// Variable reference.
    Ident(Name),

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },

    /// `name = value`; evaluates to the assigned value.
    Assign { name: Name, value: ExprId },

    Call { func: ExprId, args: ExprRange },
    /// `receiver[index]`
    Index { receiver: ExprId, index: ExprId },
    /// `receiver.name`
    Field { receiver: ExprId, name: Name },
    /// `receiver?.name`
    OptionalField { receiver: ExprId, name: Name },

    List(ExprRange),
    Map(EntryRange),

    If {
        cond: ExprId,
        then_block: StmtRange,
        elifs: ElifRange,
        else_block: Option<StmtRange>,
    },
    Match {
        scrutinee: ExprId,
        arms: ArmRange,
    },
    For {
        binding: Name,
        iterable: ExprId,
        body: StmtRange,
    },
    While {
        cond: ExprId,
        body: StmtRange,
    },
    Attempt {
        body: StmtRange,
        rescue: Option<RescueClause>,
        finally: Option<StmtRange>,
    },

    /// Anonymous function `fn(params) do ... end`.
    Lambda { params: ParamRange, body: StmtRange },

    /// `strand do ... end`
    Strand { body: StmtRange },
    Await(ExprId),
    Raise(ExprId),

    // Option / Result constructors
    Some(ExprId),
    None,
    Ok(ExprId),
    Err(ExprId),
}

/// `elif cond do ... ` branch of an `if`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElifBranch {
    pub cond: ExprId,
    pub body: StmtRange,
}

/// `rescue name do ...` clause of an `attempt`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RescueClause {
    pub name: Name,
    pub body: StmtRange,
}

/// `key: value` entry of a map literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MapEntry {
    pub key: ExprId,
    pub value: ExprId,
}
