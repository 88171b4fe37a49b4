//! Flo Patterns - runtime values, scope frames, errors and the matcher.
//!
//! This crate provides:
//! - Runtime value types (`Value`, `Heap`, `MapValue`, `FunctionValue`, ...)
//! - Lexical scope frames (`SharedScope`) captured by closures and strands
//! - Evaluation errors and control transfer (`EvalError`, `ControlAction`)
//! - The structural pattern matcher used by `match`
//! - The provider contract every effectful standard-library module implements
//!
//! # Value Types
//!
//! All heap payloads sit behind `Heap<T>` (an `Arc`), so values are cheap to
//! clone and `Send + Sync`: provider threads may complete deferred calls with
//! plain values.

mod errors;
mod matcher;
mod provider;
mod scope;
mod value;

pub use errors::{
    BacktraceFrame, ControlAction, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use matcher::match_pattern;
pub use provider::{
    deferred, error_value, Deferred, Provider, ProviderRegistry, ProviderReply, ProviderResult,
    Resolver,
};
pub use scope::{BindError, BindingKind, SharedScope};
pub use value::{
    Builtin, FunctionValue, Heap, MapValue, ModuleValue, ProviderOpValue, RangeValue, SetValue,
    StrandHandle, StrandId, Value,
};

// Re-export error constructors for use by the evaluator
pub use errors::{
    arity_mismatch, await_cycle, binary_type_mismatch, capability_denied, division_by_zero,
    duplicate_binding, immutable_binding, index_out_of_bounds, integer_overflow, key_not_found,
    match_not_exhaustive, not_callable, provider_error, recursion_limit_exceeded,
    strand_cancelled, type_mismatch, unary_type_mismatch, undefined_variable, unknown_strand,
    unresolved_import, user_raised,
};
