//! Static checks run by `flo check`.
//!
//! A single walk over the arena with a stack of declared-name scopes
//! mirroring the frames the evaluator would create. Problems are
//! collected, never raised: a module with problems still loads.

use std::fmt;

use flo_caps::CapabilityKind;
use flo_ir::{
    ExprId, ExprKind, Module, Name, SharedArena, Span, StmtKind, StmtRange, StringInterner,
};
use flo_patterns::BindingKind;
use flo_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

/// What a problem is about.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ProblemKind {
    /// `request cap` inside a block, function or strand.
    CapabilityOutsideModule { capability: String },
    /// `request cap` naming no known capability.
    UnknownCapability { name: String },
    /// Two declarations of one name in the same block.
    DuplicateDeclaration { name: String },
    /// Assignment to a `let` or `const` binding.
    AssignToImmutable { name: String, kind: BindingKind },
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapabilityOutsideModule { capability } => write!(
                f,
                "`request cap {capability}` is only allowed at module scope"
            ),
            Self::UnknownCapability { name } => write!(f, "unknown capability `{name}`"),
            Self::DuplicateDeclaration { name } => {
                write!(f, "`{name}` is declared twice in the same block")
            }
            Self::AssignToImmutable { name, kind } => {
                write!(f, "cannot assign to `{name}`: declared with `{}`", kind.as_str())
            }
        }
    }
}

/// One reported problem.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CheckProblem {
    pub kind: ProblemKind,
    pub span: Span,
}

impl fmt::Display for CheckProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_dummy() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} at {}", self.kind, self.span)
        }
    }
}

/// Check `module`, returning problems in source order of discovery.
pub fn check_module(module: &Module, interner: &StringInterner) -> Vec<CheckProblem> {
    let mut checker = Checker {
        arena: &module.arena,
        interner,
        scopes: Vec::new(),
        problems: Vec::new(),
    };
    checker.block(module.body, true, &[]);
    checker.problems
}

struct Checker<'a> {
    arena: &'a SharedArena,
    interner: &'a StringInterner,
    scopes: Vec<FxHashMap<Name, BindingKind>>,
    problems: Vec<CheckProblem>,
}

impl Checker<'_> {
    fn report(&mut self, kind: ProblemKind, span: Span) {
        self.problems.push(CheckProblem { kind, span });
    }

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_owned()
    }

    fn declare(&mut self, name: Name, kind: BindingKind, span: Span) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.insert(name, kind).is_some() {
            let name = self.name(name);
            self.report(ProblemKind::DuplicateDeclaration { name }, span);
        }
    }

    fn lookup(&self, name: Name) -> Option<BindingKind> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    /// Check a block in a new scope pre-seeded with `bound` (parameters,
    /// loop variables, pattern bindings).
    fn block(&mut self, range: StmtRange, module_scope: bool, bound: &[Name]) {
        self.scopes
            .push(bound.iter().map(|name| (*name, BindingKind::Let)).collect());
        let arena = self.arena;
        for id in arena.stmt_list(range) {
            let stmt = arena.stmt(*id);
            let span = stmt.span;
            match &stmt.kind {
                StmtKind::Let { name, init } => {
                    self.expr(*init);
                    self.declare(*name, BindingKind::Let, span);
                }
                StmtKind::Var { name, init } => {
                    self.expr(*init);
                    self.declare(*name, BindingKind::Var, span);
                }
                StmtKind::Const { name, init } => {
                    self.expr(*init);
                    self.declare(*name, BindingKind::Const, span);
                }
                StmtKind::Fn { name, params, body } => {
                    // Declared first so the body may recurse.
                    self.declare(*name, BindingKind::Let, span);
                    self.block(*body, false, arena.params(*params));
                }
                StmtKind::Return(value) => {
                    if let Some(value) = value {
                        self.expr(*value);
                    }
                }
                StmtKind::Expr(expr) => self.expr(*expr),
                StmtKind::Bind { .. } => {
                    if let Some(name) = stmt.kind.declared_name() {
                        self.declare(name, BindingKind::Let, span);
                    }
                }
                StmtKind::RequestCap { capability, alias } => {
                    let capability = self.name(*capability);
                    if capability.parse::<CapabilityKind>().is_err() {
                        self.report(
                            ProblemKind::UnknownCapability {
                                name: capability.clone(),
                            },
                            span,
                        );
                    }
                    if !module_scope {
                        self.report(ProblemKind::CapabilityOutsideModule { capability }, span);
                    }
                    self.declare(*alias, BindingKind::Let, span);
                }
            }
        }
        self.scopes.pop();
    }

    fn expr(&mut self, id: ExprId) {
        ensure_sufficient_stack(|| self.expr_inner(id));
    }

    fn expr_inner(&mut self, id: ExprId) {
        let arena = self.arena;
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Nil
            | ExprKind::None
            | ExprKind::Ident(_) => {}
            ExprKind::Binary { left, right, .. } => {
                self.expr(*left);
                self.expr(*right);
            }
            ExprKind::Unary { operand, .. } => self.expr(*operand),
            ExprKind::Assign { name, value } => {
                self.expr(*value);
                if let Some(kind @ (BindingKind::Let | BindingKind::Const)) = self.lookup(*name) {
                    let name = self.name(*name);
                    self.report(ProblemKind::AssignToImmutable { name, kind }, expr.span);
                }
            }
            ExprKind::Call { func, args } => {
                self.expr(*func);
                for arg in arena.expr_list(*args) {
                    self.expr(*arg);
                }
            }
            ExprKind::Index { receiver, index } => {
                self.expr(*receiver);
                self.expr(*index);
            }
            ExprKind::Field { receiver, .. } | ExprKind::OptionalField { receiver, .. } => {
                self.expr(*receiver);
            }
            ExprKind::List(items) => {
                for item in arena.expr_list(*items) {
                    self.expr(*item);
                }
            }
            ExprKind::Map(entries) => {
                for entry in arena.entries(*entries) {
                    self.expr(entry.key);
                    self.expr(entry.value);
                }
            }
            ExprKind::If {
                cond,
                then_block,
                elifs,
                else_block,
            } => {
                self.expr(*cond);
                self.block(*then_block, false, &[]);
                for branch in arena.elifs(*elifs) {
                    self.expr(branch.cond);
                    self.block(branch.body, false, &[]);
                }
                if let Some(block) = else_block {
                    self.block(*block, false, &[]);
                }
            }
            ExprKind::Match { scrutinee, arms } => {
                self.expr(*scrutinee);
                for arm in arena.arms(*arms) {
                    self.block(arm.body, false, &arm.pattern.bindings());
                }
            }
            ExprKind::For {
                binding,
                iterable,
                body,
            } => {
                self.expr(*iterable);
                self.block(*body, false, &[*binding]);
            }
            ExprKind::While { cond, body } => {
                self.expr(*cond);
                self.block(*body, false, &[]);
            }
            ExprKind::Attempt {
                body,
                rescue,
                finally,
            } => {
                self.block(*body, false, &[]);
                if let Some(clause) = rescue {
                    self.block(clause.body, false, &[clause.name]);
                }
                if let Some(block) = finally {
                    self.block(*block, false, &[]);
                }
            }
            ExprKind::Lambda { params, body } => self.block(*body, false, arena.params(*params)),
            ExprKind::Strand { body } => self.block(*body, false, &[]),
            ExprKind::Await(inner)
            | ExprKind::Raise(inner)
            | ExprKind::Some(inner)
            | ExprKind::Ok(inner)
            | ExprKind::Err(inner) => self.expr(*inner),
        }
    }
}

#[cfg(test)]
mod tests;
