//! The `run` command: load a syntax tree and evaluate it under a capability
//! table.

use std::path::Path;
use std::sync::Arc;

use flo_eval::{InterpreterBuilder, SharedPrintHandler, Value};
use flo_ir::{pretty_print, StringInterner};

use super::{load_capabilities, load_env, load_module};
use crate::providers::standard_providers;
use crate::{CommandError, RunOptions};

/// Run the program at `path`, sending `print` output (and `--debug`
/// output) to `print`.
///
/// Capability and environment files are loaded before the program, so a
/// bad `--cap-file` stops the run before any user code executes.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn run_file(
    path: &Path,
    options: &RunOptions,
    print: SharedPrintHandler,
) -> Result<Value, CommandError> {
    let capabilities = Arc::new(load_capabilities(options)?);
    let providers = standard_providers(load_env(options)?);

    let interner = StringInterner::new();
    let module = load_module(path, &interner)?;

    if options.debug {
        for line in pretty_print(&module, &interner).lines() {
            print.println(line);
        }
    }

    let value = InterpreterBuilder::new(&interner)
        .capabilities(capabilities)
        .providers(providers)
        .print_handler(Arc::clone(&print))
        .build()
        .run_module(&module)?;

    if options.debug {
        print.println(&format!("=> {value}"));
    }
    Ok(value)
}
