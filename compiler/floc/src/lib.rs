//! Flo command-line runtime.
//!
//! The `flo` binary takes a program as a JSON syntax tree (the output of an
//! external parser), lowers it and runs it under a capability table. The
//! pieces live here so integration tests can drive them without a process:
//!
//! - `commands`: `run`, `check` and `ast`
//! - `options`: flag parsing for `run`
//! - `providers`: the demo `std/db` and `std/env` modules

pub mod commands;
mod error;
pub mod options;
pub mod providers;

use std::sync::Once;

pub use error::CommandError;
pub use options::{parse_run_args, DenyFlags, RunOptions, UsageError};

static TRACING_INIT: Once = Once::new();

/// Install the tree-shaped tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=flo_eval=trace flo run prog.json`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
