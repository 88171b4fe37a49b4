//! The `check` command: load a program and run the static checks without
//! evaluating anything.

use std::path::Path;

use flo_eval::{check_module, CheckProblem};
use flo_ir::StringInterner;

use super::load_module;
use crate::CommandError;

/// Problems found in the program at `path`; empty when it is clean.
pub fn check_file(path: &Path) -> Result<Vec<CheckProblem>, CommandError> {
    let interner = StringInterner::new();
    let module = load_module(path, &interner)?;
    Ok(check_module(&module, &interner))
}
