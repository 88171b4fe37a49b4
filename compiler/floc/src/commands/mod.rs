//! Command handlers for the `flo` CLI.
//!
//! Each submodule implements one subcommand. Handlers return their result
//! instead of exiting, so `main` owns every exit code and the integration
//! tests can call them directly. Shared loading lives in the module root.

mod ast;
mod check;
mod run;

use std::path::Path;

use flo_caps::CapabilityTable;
use flo_ir::syntax::SyntaxModule;
use flo_ir::{lower_module, Module, StringInterner};

use crate::providers::{parse_env_file, EnvProvider};
use crate::{CommandError, RunOptions};

pub use ast::ast_file;
pub use check::check_file;
pub use run::run_file;

/// Read a file from disk.
pub(crate) fn read_file(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON syntax tree.
pub fn load_syntax(path: &Path) -> Result<SyntaxModule, CommandError> {
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|source| CommandError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read, deserialize and lower a program.
pub fn load_module(path: &Path, interner: &StringInterner) -> Result<Module, CommandError> {
    let syntax = load_syntax(path)?;
    let module = lower_module(&syntax, interner)?;
    tracing::debug!(path = %path.display(), statements = module.body.len(), "module loaded");
    Ok(module)
}

/// Capability table for a run: the `--cap-file` contents (or nothing),
/// with `--deny-*` entries forced off.
pub fn load_capabilities(options: &RunOptions) -> Result<CapabilityTable, CommandError> {
    let table = match &options.cap_file {
        Some(path) => CapabilityTable::load(path)?,
        None => CapabilityTable::empty(),
    };
    Ok(table.deny(options.deny.kinds()))
}

/// `std/env` provider seeded from `--env-file`, if given.
pub fn load_env(options: &RunOptions) -> Result<EnvProvider, CommandError> {
    let Some(path) = &options.env_file else {
        return Ok(EnvProvider::new());
    };
    let text = read_file(path)?;
    let vars = parse_env_file(&text).map_err(|line| CommandError::EnvFile {
        path: path.clone(),
        line,
    })?;
    tracing::debug!(path = %path.display(), vars = vars.len(), "environment file loaded");
    Ok(EnvProvider::with_vars(vars))
}
