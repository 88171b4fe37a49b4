//! Expression arena.
//!
//! Every node and child list of a module lives in one [`ExprArena`]. Child
//! lists are allocated in one go so each range stays contiguous; callers
//! lower all children first and then push the finished list.

use std::sync::Arc;

use crate::Name;

use super::{
    ArmRange, ElifBranch, ElifRange, EntryRange, Expr, ExprId, ExprRange, MapEntry, MatchArm,
    ParamRange, Stmt, StmtId, StmtRange,
};

/// Arena shared by the evaluator, closures and strands once lowering is done.
pub type SharedArena = Arc<ExprArena>;

/// Flat storage for a module's AST.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    arms: Vec<MatchArm>,
    entries: Vec<MapEntry>,
    elifs: Vec<ElifBranch>,
    params: Vec<Name>,
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Append `items` to `table`, returning `(start, len)`.
fn push_all<T>(table: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> (u32, u32) {
    let start = table.len();
    table.extend(items);
    (to_u32(start), to_u32(table.len() - start))
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let (start, len) = push_all(&mut self.expr_lists, ids);
        ExprRange::new(start, len)
    }

    pub fn alloc_stmt_list(&mut self, ids: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let (start, len) = push_all(&mut self.stmt_lists, ids);
        StmtRange::new(start, len)
    }

    pub fn alloc_arms(&mut self, arms: impl IntoIterator<Item = MatchArm>) -> ArmRange {
        let (start, len) = push_all(&mut self.arms, arms);
        ArmRange::new(start, len)
    }

    pub fn alloc_entries(&mut self, entries: impl IntoIterator<Item = MapEntry>) -> EntryRange {
        let (start, len) = push_all(&mut self.entries, entries);
        EntryRange::new(start, len)
    }

    pub fn alloc_elifs(&mut self, elifs: impl IntoIterator<Item = ElifBranch>) -> ElifRange {
        let (start, len) = push_all(&mut self.elifs, elifs);
        ElifRange::new(start, len)
    }

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Name>) -> ParamRange {
        let (start, len) = push_all(&mut self.params, params);
        ParamRange::new(start, len)
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.indices()]
    }

    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.indices()]
    }

    #[inline]
    pub fn arms(&self, range: ArmRange) -> &[MatchArm] {
        &self.arms[range.indices()]
    }

    #[inline]
    pub fn entries(&self, range: EntryRange) -> &[MapEntry] {
        &self.entries[range.indices()]
    }

    #[inline]
    pub fn elifs(&self, range: ElifRange) -> &[ElifBranch] {
        &self.elifs[range.indices()]
    }

    #[inline]
    pub fn params(&self, range: ParamRange) -> &[Name] {
        &self.params[range.indices()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }
}

/// A lowered module: frozen arena plus its top-level statements.
#[derive(Clone, Debug)]
pub struct Module {
    pub arena: SharedArena,
    pub body: StmtRange,
}

impl Module {
    pub fn new(arena: ExprArena, body: StmtRange) -> Self {
        Module {
            arena: Arc::new(arena),
            body,
        }
    }

    /// Top-level statement ids in source order.
    pub fn statements(&self) -> &[StmtId] {
        self.arena.stmt_list(self.body)
    }
}
