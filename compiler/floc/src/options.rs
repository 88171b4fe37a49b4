//! Flags accepted by `flo run`.

use std::path::PathBuf;

use bitflags::bitflags;
use flo_caps::CapabilityKind;

bitflags! {
    /// Capabilities forced off from the command line.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DenyFlags: u8 {
        const NET = 1 << 0;
        const FS = 1 << 1;
        const DB = 1 << 2;
    }
}

impl Default for DenyFlags {
    fn default() -> Self {
        DenyFlags::empty()
    }
}

impl DenyFlags {
    /// The capabilities these flags switch off.
    pub fn kinds(self) -> impl Iterator<Item = CapabilityKind> {
        [
            (DenyFlags::NET, CapabilityKind::Net),
            (DenyFlags::FS, CapabilityKind::Fs),
            (DenyFlags::DB, CapabilityKind::Db),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, kind)| kind)
    }
}

/// Everything `flo run` needs besides the program path.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct RunOptions {
    /// JSON capability file. Without one, every `request cap` is denied.
    pub cap_file: Option<PathBuf>,
    pub deny: DenyFlags,
    /// `KEY=VALUE` lines served by `std/env` ahead of the process
    /// environment.
    pub env_file: Option<PathBuf>,
    /// Print the AST before running and the result after.
    pub debug: bool,
}

/// A command line `flo run` cannot make sense of.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum UsageError {
    #[error("missing file path")]
    MissingPath,

    #[error("`{0}` needs a value")]
    MissingValue(&'static str),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
}

/// Parse the arguments following `run`.
///
/// Valued options take either `--opt=value` or `--opt value`; flags and
/// the path may come in any order.
pub fn parse_run_args(args: &[String]) -> Result<(PathBuf, RunOptions), UsageError> {
    let mut options = RunOptions::default();
    let mut path = None;
    let mut rest = args.iter();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--deny-net" => options.deny |= DenyFlags::NET,
            "--deny-fs" => options.deny |= DenyFlags::FS,
            "--deny-db" => options.deny |= DenyFlags::DB,
            "--debug" => options.debug = true,
            "--cap-file" => {
                let value = rest.next().ok_or(UsageError::MissingValue("--cap-file"))?;
                options.cap_file = Some(PathBuf::from(value));
            }
            "--env-file" => {
                let value = rest.next().ok_or(UsageError::MissingValue("--env-file"))?;
                options.env_file = Some(PathBuf::from(value));
            }
            other => {
                if let Some(value) = other.strip_prefix("--cap-file=") {
                    options.cap_file = Some(PathBuf::from(value));
                } else if let Some(value) = other.strip_prefix("--env-file=") {
                    options.env_file = Some(PathBuf::from(value));
                } else if other.starts_with('-') {
                    return Err(UsageError::UnknownOption(other.to_owned()));
                } else if path.is_none() {
                    path = Some(PathBuf::from(other));
                } else {
                    return Err(UsageError::UnexpectedArgument(other.to_owned()));
                }
            }
        }
    }

    let path = path.ok_or(UsageError::MissingPath)?;
    Ok((path, options))
}
