//! The capability checkpoint in front of every provider call.
//!
//! A provider operation is called as `Module.op(token)` or
//! `Module.op(token, {args})`. Before the provider runs:
//!
//! 1. the first argument must be a capability token
//! 2. the provider names the [`ScopeClaim`](flo_caps::ScopeClaim)s the call
//!    would exercise
//! 3. the capability table authorizes token and claims
//!
//! Any failure is a `CapabilityDenied` error for this call; nothing falls
//! back to a default.

use flo_caps::CapabilityTable;
use flo_patterns::{
    arity_mismatch, capability_denied, provider_error, type_mismatch, Deferred, EvalError,
    MapValue, ProviderOpValue, ProviderReply, Value,
};

/// Result of an authorized provider call.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// Completed synchronously.
    Value(Value),
    /// Completes later; the evaluator turns it into an external task.
    Deferred(Deferred),
}

/// Authorize and perform one provider operation.
pub fn call_provider(
    table: &CapabilityTable,
    op: &ProviderOpValue,
    args: &[Value],
) -> Result<ProviderOutcome, EvalError> {
    let required = op.provider.capability();
    let call_name = format!("{}.{}", op.path, op.op);

    let Some(Value::Capability(token)) = args.first() else {
        tracing::debug!(call = %call_name, "provider call without a capability token");
        return Err(capability_denied(
            required.as_str(),
            &format!("{call_name} requires a `{required}` capability token as its first argument"),
        ));
    };

    let empty = MapValue::new();
    let op_args = match args {
        [_] => &empty,
        [_, Value::Map(map)] => &**map,
        [_, other] => return Err(type_mismatch("map of arguments", other.type_name())),
        _ => return Err(arity_mismatch(&call_name, 2, args.len())),
    };

    let claims = op
        .provider
        .claims(&op.op, op_args)
        .map_err(provider_error)?;

    if let Err(denial) = table.authorize(token, required, &claims) {
        tracing::debug!(call = %call_name, %denial, "provider call denied");
        return Err(capability_denied(required.as_str(), &denial.to_string()));
    }
    tracing::debug!(call = %call_name, claims = claims.len(), "provider call authorized");

    match op.provider.invoke(&op.op, op_args) {
        ProviderReply::Ready(Ok(value)) => Ok(ProviderOutcome::Value(value)),
        ProviderReply::Ready(Err(error)) => Err(provider_error(error)),
        ProviderReply::Deferred(deferred) => Ok(ProviderOutcome::Deferred(deferred)),
    }
}

#[cfg(test)]
mod tests;
