//! Errors surfaced by CLI commands.

use std::io;
use std::path::PathBuf;

use flo_caps::CapabilityFileError;
use flo_eval::EvalError;
use flo_ir::LowerError;

/// Anything that stops a command before or while the program runs.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{}", describe_io(.path, .source))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not a Flo syntax tree: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed environment file '{}' at line {line}", .path.display())]
    EnvFile { path: PathBuf, line: usize },

    #[error(transparent)]
    CapabilityFile(#[from] CapabilityFileError),

    #[error("invalid program: {0}")]
    Lower(#[from] LowerError),

    #[error("runtime error: {0}")]
    Eval(#[from] EvalError),
}

fn describe_io(path: &std::path::Path, err: &io::Error) -> String {
    let path = path.display();
    match err.kind() {
        io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {err}"),
    }
}
