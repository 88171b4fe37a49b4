//! Conditionals, `match`, loops and `attempt/rescue/finally`.

use flo_ir::{ArmRange, ElifRange, ExprId, Name, RescueClause, SharedArena, StmtRange};
use flo_patterns::{
    match_not_exhaustive, match_pattern, type_mismatch, BindingKind, ControlAction, EvalResult,
    Value,
};

use super::Interpreter;

impl Interpreter<'_> {
    /// First true branch runs in a child frame; no branch and no `else`
    /// gives `nil`.
    pub(super) fn eval_if(
        &mut self,
        arena: &SharedArena,
        cond: ExprId,
        then_block: StmtRange,
        elifs: ElifRange,
        else_block: Option<StmtRange>,
    ) -> EvalResult {
        if self.eval_expr(cond)?.is_truthy() {
            return self.eval_block(then_block);
        }
        for branch in arena.elifs(elifs) {
            if self.eval_expr(branch.cond)?.is_truthy() {
                return self.eval_block(branch.body);
            }
        }
        match else_block {
            Some(block) => self.eval_block(block),
            None => Ok(Value::Nil),
        }
    }

    /// Arms are tried in source order; the first match runs in a child frame
    /// holding the pattern's bindings.
    pub(super) fn eval_match(
        &mut self,
        arena: &SharedArena,
        scrutinee: ExprId,
        arms: ArmRange,
    ) -> EvalResult {
        let value = self.eval_expr(scrutinee)?;
        for arm in arena.arms(arms) {
            let Some(bindings) = match_pattern(&arm.pattern, &value, self.interner) else {
                continue;
            };
            return self.with_env_scope(|scoped| {
                for (name, bound) in bindings {
                    scoped.define(name, bound, BindingKind::Let)?;
                }
                scoped.eval_stmts(arm.body)
            });
        }
        Err(match_not_exhaustive(&value).into())
    }

    /// `for binding in iterable do ... end`, one child frame per iteration.
    pub(super) fn eval_for(&mut self, binding: Name, iterable: ExprId, body: StmtRange) -> EvalResult {
        let iterable = self.eval_expr(iterable)?;
        match &iterable {
            Value::List(items) => self.iterate(binding, body, items.iter().cloned()),
            Value::Set(items) => self.iterate(binding, body, items.iter().cloned()),
            Value::Map(map) => self.iterate(binding, body, map.keys().cloned()),
            Value::Range(range) => self.iterate(binding, body, range.iter().map(Value::Int)),
            Value::Str(s) => self.iterate(
                binding,
                body,
                s.chars().map(|c| Value::string(c.to_string())),
            ),
            other => Err(type_mismatch("iterable", other.type_name()).into()),
        }
    }

    fn iterate(
        &mut self,
        binding: Name,
        body: StmtRange,
        items: impl Iterator<Item = Value>,
    ) -> EvalResult {
        for item in items {
            self.with_env_scope(|scoped| {
                scoped.define(binding, item, BindingKind::Let)?;
                scoped.eval_stmts(body)
            })?;
        }
        Ok(Value::Nil)
    }

    /// The condition is re-evaluated before every iteration.
    pub(super) fn eval_while(&mut self, cond: ExprId, body: StmtRange) -> EvalResult {
        while self.eval_expr(cond)?.is_truthy() {
            self.eval_block(body)?;
        }
        Ok(Value::Nil)
    }

    /// `attempt do ... rescue err do ... finally do ... end`
    ///
    /// `finally` runs exactly once on every exit path. An error or `return`
    /// leaving `finally` replaces whatever outcome was pending.
    pub(super) fn eval_attempt(
        &mut self,
        body: StmtRange,
        rescue: Option<RescueClause>,
        finally: Option<StmtRange>,
    ) -> EvalResult {
        let outcome = match (self.eval_block(body), rescue) {
            (Err(ControlAction::Error(err)), Some(clause)) => {
                tracing::trace!(error = %err, "rescued");
                self.with_env_scope(|scoped| {
                    scoped.define(clause.name, err.rescue_value(), BindingKind::Let)?;
                    scoped.eval_stmts(clause.body)
                })
            }
            (outcome, _) => outcome,
        };
        if let Some(finally) = finally {
            self.eval_block(finally)?;
        }
        outcome
    }
}
