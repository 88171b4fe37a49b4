#![deny(clippy::arithmetic_side_effects)]
//! Flo Eval - the tree-walking evaluator.
//!
//! This crate runs a lowered [`Module`](flo_ir::Module) directly.
//!
//! # Architecture
//!
//! The evaluator uses:
//! - `Environment`: scope stack over shared [`SharedScope`] frames
//! - `evaluate_binary` / `evaluate_unary`: enum-dispatched operators
//! - `call_builtin`: the native functions bound in the root frame
//! - `Scheduler`: the cooperative strand queue behind `strand` / `await`
//! - `enforcement`: the capability checkpoint in front of every provider call
//! - `check_module`: a static pass for the `check` subcommand
//!
//! Values, scope frames, errors and the pattern matcher live in
//! `flo_patterns` and are re-exported here.

mod builtins;
mod check;
mod enforcement;
mod environment;
pub mod interpreter;
mod operators;
mod print_handler;
mod scheduler;
mod unary_operators;

use std::sync::Arc;

use flo_caps::CapabilityTable;
use flo_ir::{Module, StringInterner};

pub use flo_patterns::{
    BindingKind, ControlAction, EvalError, EvalErrorKind, EvalResult, FunctionValue, Heap,
    MapValue, Provider, ProviderRegistry, SetValue, SharedScope, StrandId, Value,
};

pub use builtins::call_builtin;
pub use check::{check_module, CheckProblem, ProblemKind};
pub use enforcement::{call_provider, ProviderOutcome};
pub use environment::Environment;
pub use interpreter::{Interpreter, InterpreterBuilder, ScopedInterpreter};
pub use operators::evaluate_binary;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use scheduler::{AwaitStatus, Scheduler, StrandState, StrandTask, Turn, MAIN};
pub use unary_operators::evaluate_unary;

/// Evaluate `module` in `env` against `capabilities`.
///
/// Runs with no providers registered, so every `bind` fails with
/// `UnresolvedImport`, and prints to stdout. Use [`evaluate_with`] to supply
/// providers, or [`InterpreterBuilder`] for full control.
pub fn evaluate(
    module: &Module,
    interner: &StringInterner,
    env: Environment,
    capabilities: Arc<CapabilityTable>,
) -> Result<Value, EvalError> {
    evaluate_with(module, interner, env, capabilities, ProviderRegistry::new())
}

/// [`evaluate`] with `providers` available to `bind`.
pub fn evaluate_with(
    module: &Module,
    interner: &StringInterner,
    env: Environment,
    capabilities: Arc<CapabilityTable>,
    providers: ProviderRegistry,
) -> Result<Value, EvalError> {
    InterpreterBuilder::new(interner)
        .env(env)
        .capabilities(capabilities)
        .providers(providers)
        .build()
        .run_module(module)
}

#[cfg(test)]
mod tests;
