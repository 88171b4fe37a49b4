//! Function calls.
//!
//! A call evaluates the callee, then the arguments left to right, then
//! dispatches on the callee's tag:
//!
//! - user functions run their body in a child of the captured frame
//! - builtins run natively
//! - provider operations go through the capability checkpoint
//!
//! Pipelines (`|>`, `<|`) are calls with a single argument and come
//! through [`Interpreter::call_value`] as well.

use flo_ir::{ExprId, ExprRange};
use flo_patterns::{
    arity_mismatch, not_callable, recursion_limit_exceeded, BindingKind, ControlAction,
    EvalResult, FunctionValue, Value,
};
use smallvec::SmallVec;

use super::Interpreter;
use crate::{call_builtin, call_provider, ProviderOutcome};

/// Call arguments; most calls take few enough to stay inline.
type Args = SmallVec<[Value; 4]>;

impl Interpreter<'_> {
    pub(super) fn eval_call(&mut self, func: ExprId, args: ExprRange) -> EvalResult {
        let arena = std::sync::Arc::clone(&self.arena);
        let callee = self.eval_expr(func)?;
        let args = arena
            .expr_list(args)
            .iter()
            .map(|id| self.eval_expr(*id))
            .collect::<Result<Args, _>>()?;
        self.call_value(callee, &args)
    }

    /// Call any callable value.
    pub fn call_value(&mut self, callee: Value, args: &[Value]) -> EvalResult {
        match callee {
            Value::Function(function) => self.call_function(&function, args),
            Value::Builtin(builtin) => Ok(call_builtin(builtin, args, &self.print_handler)?),
            Value::ProviderOp(op) => match call_provider(&self.capabilities, &op, args)? {
                ProviderOutcome::Value(value) => Ok(value),
                ProviderOutcome::Deferred(deferred) => {
                    Ok(Value::strand(self.scheduler().spawn_external(deferred)))
                }
            },
            other => Err(not_callable(other.type_name()).into()),
        }
    }

    /// Run a user function. `return` inside the body stops here.
    #[tracing::instrument(level = "debug", skip_all, fields(depth = self.call_depth))]
    fn call_function(&mut self, function: &FunctionValue, args: &[Value]) -> EvalResult {
        let name = match function.name {
            Some(name) => self.interner.lookup(name),
            None => "<lambda>",
        };
        if args.len() != function.arity() {
            return Err(arity_mismatch(name, function.arity(), args.len()).into());
        }
        if self.call_depth >= self.max_call_depth {
            return Err(recursion_limit_exceeded(self.max_call_depth).into());
        }

        let frame = function.captured.child();
        for (param, arg) in function.params.iter().zip(args) {
            // Lowering rejects duplicate parameter names.
            let _ = frame.define(*param, arg.clone(), BindingKind::Let);
        }

        self.call_depth = self.call_depth.saturating_add(1);
        let result = self.with_frame(frame, function.arena.clone(), |callee| {
            callee.eval_stmts(function.body)
        });
        self.call_depth = self.call_depth.saturating_sub(1);

        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(mut err)) => {
                let span = err.span;
                err.push_frame(name, span);
                Err(ControlAction::Error(err))
            }
        }
    }
}
