//! Native stack growth for the tree-walking evaluator.
//!
//! Every nested call, block and awaited strand recurses on the host stack.
//! Strands in particular run on top of whichever evaluation awaited them,
//! so the depth is the sum of all suspended evaluations. Wrapping the
//! evaluator's recursive entry points in [`ensure_sufficient_stack`] moves
//! the failure mode from a host crash to the interpreter's own call-depth
//! limit.
//!
//! On `wasm32` this is a passthrough.

/// Grow when less than this much stack remains (128 KiB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2 MiB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes left on the current stack segment, when the platform can tell.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
