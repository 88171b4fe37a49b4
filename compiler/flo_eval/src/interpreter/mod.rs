//! Tree-walking interpreter for Flo.
//!
//! # Control transfer
//!
//! Every evaluation step returns [`EvalResult`]. A raised error or a
//! `return` travels on the `Err` side as a [`ControlAction`] and is
//! propagated with `?`; the only places that stop one are `attempt`
//! (errors), function calls, strand bodies and the module (returns).
//!
//! # Arena threading
//!
//! Functions and strands carry the [`SharedArena`] their body indexes
//! into. Entering one swaps `self.arena` together with the environment
//! (see `scope_guard.rs`), so ids are always resolved against the arena
//! they came from.
//!
//! # Layout
//!
//! - `builder`: [`InterpreterBuilder`]
//! - `scope_guard`: block scopes and frame switching
//! - `function_call`: calls, pipelines and the provider checkpoint
//! - `control`: `if`, `match`, loops and `attempt`
//! - `access`: indexing, fields and optional chaining
//! - `strands`: `strand`, `await` and the end-of-module drain

mod access;
mod builder;
mod control;
mod function_call;
mod scope_guard;
mod strands;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use std::sync::Arc;

use flo_caps::CapabilityTable;
use flo_ir::{
    BinaryOp, ExprId, ExprKind, Module, Name, SharedArena, StmtId, StmtKind, StmtRange,
    StringInterner,
};
use flo_patterns::{
    capability_denied, duplicate_binding, immutable_binding, undefined_variable,
    unresolved_import, user_raised, BindError, BindingKind, ControlAction, EvalError, EvalResult,
    FunctionValue, MapValue, ProviderRegistry, StrandId, Value,
};
use flo_stack::ensure_sufficient_stack;
use parking_lot::MutexGuard;

use crate::{evaluate_binary, evaluate_unary, Environment, Scheduler, SharedPrintHandler};
use strands::{Parker, StrandRuntime};

/// Default limit on nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Tree-walking interpreter.
pub struct Interpreter<'a> {
    pub(crate) interner: &'a StringInterner,
    /// Arena the currently running code indexes into.
    pub(crate) arena: SharedArena,
    pub(crate) env: Environment,
    pub(crate) capabilities: Arc<CapabilityTable>,
    pub(crate) providers: ProviderRegistry,
    pub(crate) strands: Arc<StrandRuntime>,
    /// Executor this interpreter is: `MAIN` for the module body, otherwise
    /// the strand it runs.
    pub(crate) strand: StrandId,
    pub(crate) parker: Parker,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
}

impl<'a> Interpreter<'a> {
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Lock the scheduler shared by this interpreter's executors.
    pub fn scheduler(&self) -> MutexGuard<'_, Scheduler> {
        self.strands.scheduler.lock()
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    /// Run a module to completion.
    ///
    /// Statements execute in three passes: every top-level `request cap`
    /// (so a denial stops the module before any other code runs), then
    /// top-level `const` initialisers, then everything else in source
    /// order. A top-level `return` ends the module with its value.
    /// Afterwards every strand still queued is run to completion. If the
    /// body fails instead, queued strands never start and strands parked
    /// on an `await` are cancelled.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run_module(&mut self, module: &Module) -> Result<Value, EvalError> {
        self.arena = Arc::clone(&module.arena);
        self.run_with_strands(module)
    }

    fn run_main(&mut self, module: &Module) -> Result<Value, EvalError> {
        let value = match self.run_statements(module) {
            Ok(value) | Err(ControlAction::Return(value)) => value,
            Err(ControlAction::Error(err)) => return Err(*err),
        };
        self.drain_strands();
        Ok(value)
    }

    fn run_statements(&mut self, module: &Module) -> EvalResult {
        let statements = module.statements();
        let arena = &module.arena;

        for id in statements {
            if matches!(arena.stmt(*id).kind, StmtKind::RequestCap { .. }) {
                self.request_capability(*id)?;
            }
        }
        for id in statements {
            if matches!(arena.stmt(*id).kind, StmtKind::Const { .. }) {
                self.eval_stmt(*id)?;
            }
        }
        let mut last = Value::Nil;
        for id in statements {
            if !matches!(
                arena.stmt(*id).kind,
                StmtKind::RequestCap { .. } | StmtKind::Const { .. }
            ) {
                last = self.eval_stmt(*id)?;
            }
        }
        Ok(last)
    }

    /// Evaluate the statements of `range` in the current frame; the block's
    /// value is that of its last statement.
    pub(crate) fn eval_stmts(&mut self, range: StmtRange) -> EvalResult {
        let arena = Arc::clone(&self.arena);
        let mut last = Value::Nil;
        for id in arena.stmt_list(range) {
            last = self.eval_stmt(*id)?;
        }
        Ok(last)
    }

    /// Evaluate `range` in a fresh child frame.
    pub(crate) fn eval_block(&mut self, range: StmtRange) -> EvalResult {
        self.with_env_scope(|scoped| scoped.eval_stmts(range))
    }

    /// Evaluate one statement. Declarations evaluate to `nil`.
    pub fn eval_stmt(&mut self, id: StmtId) -> EvalResult {
        let arena = Arc::clone(&self.arena);
        let stmt = arena.stmt(id);
        let span = stmt.span;
        let result = match &stmt.kind {
            StmtKind::Let { name, init } => self.eval_declaration(*name, *init, BindingKind::Let),
            StmtKind::Var { name, init } => self.eval_declaration(*name, *init, BindingKind::Var),
            StmtKind::Const { name, init } => {
                self.eval_declaration(*name, *init, BindingKind::Const)
            }
            StmtKind::Fn { name, params, body } => {
                let function = FunctionValue::new(
                    Some(*name),
                    arena.params(*params).to_vec(),
                    *body,
                    Arc::clone(&arena),
                    self.env.current().clone(),
                );
                self.define(*name, Value::function(function), BindingKind::Let)
                    .map(|()| Value::Nil)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(*expr)?,
                    None => Value::Nil,
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Expr(expr) => self.eval_expr(*expr),
            StmtKind::Bind {
                name,
                path,
                version,
                alias,
            } => self.eval_bind(*name, *path, *version, *alias),
            StmtKind::RequestCap { capability, .. } => Err(capability_denied(
                self.interner.lookup(*capability),
                "`request cap` is only allowed at module scope",
            )
            .into()),
        };
        result.map_err(|action| with_span(action, span))
    }

    fn eval_declaration(&mut self, name: Name, init: ExprId, kind: BindingKind) -> EvalResult {
        let value = self.eval_expr(init)?;
        self.define(name, value, kind)?;
        Ok(Value::Nil)
    }

    /// `bind name ::: path@version as alias`
    fn eval_bind(
        &mut self,
        name: Name,
        path: Name,
        version: Option<Name>,
        alias: Option<Name>,
    ) -> EvalResult {
        let path_str = self.interner.lookup(path);
        let Some(provider) = self.providers.get(path_str) else {
            return Err(unresolved_import(path_str).into());
        };
        let version = version.map(|v| self.interner.lookup(v).to_owned());
        tracing::debug!(path = path_str, version = ?version, "module bound");
        let module = Value::module(path_str, version, provider);
        self.define(alias.unwrap_or(name), module, BindingKind::Let)?;
        Ok(Value::Nil)
    }

    /// `request cap name as alias`, at module scope.
    fn request_capability(&mut self, id: StmtId) -> Result<(), ControlAction> {
        let arena = Arc::clone(&self.arena);
        let stmt = arena.stmt(id);
        let StmtKind::RequestCap { capability, alias } = &stmt.kind else {
            return Ok(());
        };
        let name = self.interner.lookup(*capability);
        match self.capabilities.grant(name) {
            Ok(token) => {
                tracing::debug!(capability = name, "capability granted");
                self.define(*alias, Value::Capability(token), BindingKind::Let)
                    .map_err(|action| with_span(action, stmt.span))
            }
            Err(denial) => {
                tracing::debug!(capability = name, %denial, "capability request denied");
                Err(with_span(
                    capability_denied(name, &denial.to_string()).into(),
                    stmt.span,
                ))
            }
        }
    }

    /// Bind `name` in the current frame.
    pub(crate) fn define(
        &mut self,
        name: Name,
        value: Value,
        kind: BindingKind,
    ) -> Result<(), ControlAction> {
        self.env
            .define(name, value, kind)
            .map_err(|err| self.bind_error(err, name).into())
    }

    fn bind_error(&self, err: BindError, name: Name) -> EvalError {
        let name = self.interner.lookup(name);
        match err {
            BindError::Duplicate => duplicate_binding(name),
            BindError::Immutable(_) => immutable_binding(name),
            BindError::Undefined => undefined_variable(name),
        }
    }

    /// Evaluate an expression.
    pub fn eval_expr(&mut self, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| {
            let arena = Arc::clone(&self.arena);
            let expr = arena.expr(id);
            self.eval_expr_kind(&arena, &expr.kind)
                .map_err(|action| with_span(action, expr.span))
        })
    }

    fn eval_expr_kind(&mut self, arena: &SharedArena, kind: &ExprKind) -> EvalResult {
        match kind {
            ExprKind::Int(n) => Ok(Value::Int(*n)),
            ExprKind::Float(x) => Ok(Value::Float(*x)),
            ExprKind::Str(s) => Ok(Value::string(self.interner.lookup(*s))),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Ident(name) => self
                .env
                .lookup(*name)
                .ok_or_else(|| undefined_variable(self.interner.lookup(*name)).into()),

            ExprKind::Binary { op, left, right } => self.eval_binary(*op, *left, *right),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(*operand)?;
                Ok(evaluate_unary(value, *op)?)
            }
            ExprKind::Assign { name, value } => {
                let value = self.eval_expr(*value)?;
                self.env
                    .assign(*name, value.clone())
                    .map_err(|err| self.bind_error(err, *name))?;
                Ok(value)
            }

            ExprKind::Call { func, args } => self.eval_call(*func, *args),
            ExprKind::Index { receiver, index } => {
                let receiver = self.eval_expr(*receiver)?;
                let index = self.eval_expr(*index)?;
                Ok(self.index_value(&receiver, &index)?)
            }
            ExprKind::Field { receiver, name } => {
                let receiver = self.eval_expr(*receiver)?;
                Ok(self.field_value(&receiver, *name)?)
            }
            ExprKind::OptionalField { receiver, name } => {
                let receiver = self.eval_expr(*receiver)?;
                Ok(self.optional_field_value(&receiver, *name)?)
            }

            ExprKind::List(items) => {
                let items = arena
                    .expr_list(*items)
                    .iter()
                    .map(|id| self.eval_expr(*id))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(items))
            }
            ExprKind::Map(entries) => {
                let mut map = MapValue::new();
                for entry in arena.entries(*entries) {
                    let key = self.eval_expr(entry.key)?;
                    let value = self.eval_expr(entry.value)?;
                    map.insert(key, value);
                }
                Ok(Value::map(map))
            }

            ExprKind::If {
                cond,
                then_block,
                elifs,
                else_block,
            } => self.eval_if(arena, *cond, *then_block, *elifs, *else_block),
            ExprKind::Match { scrutinee, arms } => self.eval_match(arena, *scrutinee, *arms),
            ExprKind::For {
                binding,
                iterable,
                body,
            } => self.eval_for(*binding, *iterable, *body),
            ExprKind::While { cond, body } => self.eval_while(*cond, *body),
            ExprKind::Attempt {
                body,
                rescue,
                finally,
            } => self.eval_attempt(*body, *rescue, *finally),

            ExprKind::Lambda { params, body } => Ok(Value::function(FunctionValue::new(
                None,
                arena.params(*params).to_vec(),
                *body,
                Arc::clone(arena),
                self.env.current().clone(),
            ))),

            ExprKind::Strand { body } => Ok(self.spawn_strand(*body)),
            ExprKind::Await(target) => {
                let target = self.eval_expr(*target)?;
                self.eval_await(target)
            }
            ExprKind::Raise(value) => {
                let value = self.eval_expr(*value)?;
                Err(user_raised(value).into())
            }

            ExprKind::Some(inner) => Ok(Value::some(self.eval_expr(*inner)?)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ok(inner) => Ok(Value::ok(self.eval_expr(*inner)?)),
            ExprKind::Err(inner) => Ok(Value::err(self.eval_expr(*inner)?)),
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> EvalResult {
        match op {
            BinaryOp::And => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval_expr(right)?.is_truthy()))
            }
            BinaryOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval_expr(right)?.is_truthy()))
            }
            // data |> f
            BinaryOp::PipeForward => {
                let data = self.eval_expr(left)?;
                let func = self.eval_expr(right)?;
                self.call_value(func, &[data])
            }
            // f <| data
            BinaryOp::PipeBackward => {
                let func = self.eval_expr(left)?;
                let data = self.eval_expr(right)?;
                self.call_value(func, &[data])
            }
            _ => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(evaluate_binary(left, right, op)?)
            }
        }
    }
}

/// Attach `span` to an error that has none yet.
fn with_span(action: ControlAction, span: flo_ir::Span) -> ControlAction {
    match action {
        ControlAction::Error(err) => ControlAction::Error(Box::new((*err).with_span(span))),
        ret @ ControlAction::Return(_) => ret,
    }
}

#[cfg(test)]
mod tests;
