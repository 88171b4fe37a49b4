//! Statement Types

use std::fmt;

use crate::{Name, Span};

use super::{ExprId, ParamRange, StmtRange};

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// `let name := init`
    Let { name: Name, init: ExprId },
    /// `var name := init`
    Var { name: Name, init: ExprId },
    /// `const name := init`
    Const { name: Name, init: ExprId },

    /// Named function declaration.
    Fn {
        name: Name,
        params: ParamRange,
        body: StmtRange,
    },

    Return(Option<ExprId>),

    /// Expression statement
    Expr(ExprId),

    /// `bind name ::: path@version as alias`
    Bind {
        name: Name,
        path: Name,
        version: Option<Name>,
        alias: Option<Name>,
    },

    /// `request cap capability as alias`
    RequestCap { capability: Name, alias: Name },
}

impl StmtKind {
    /// Name introduced into the enclosing frame, if any.
    pub fn declared_name(&self) -> Option<Name> {
        match self {
            StmtKind::Let { name, .. }
            | StmtKind::Var { name, .. }
            | StmtKind::Const { name, .. }
            | StmtKind::Fn { name, .. } => Some(*name),
            StmtKind::Bind { name, alias, .. } => Some(alias.unwrap_or(*name)),
            StmtKind::RequestCap { alias, .. } => Some(*alias),
            StmtKind::Return(_) | StmtKind::Expr(_) => None,
        }
    }
}
