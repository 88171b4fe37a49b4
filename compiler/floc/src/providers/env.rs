//! `std/env`: read-only access to environment variables.
//!
//! Variables loaded from `--env-file` shadow the process environment.

use std::collections::BTreeMap;

use flo_caps::{CapabilityKind, ScopeClaim};
use flo_patterns::{error_value, MapValue, Provider, ProviderReply, Value};

use super::required_str;

/// `std/env` provider. Claims every variable it reads.
#[derive(Clone, Debug, Default)]
pub struct EnvProvider {
    overrides: BTreeMap<String, String>,
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vars(overrides: BTreeMap<String, String>) -> Self {
        EnvProvider { overrides }
    }

    pub fn lookup(&self, name: &str) -> Option<String> {
        self.overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }
}

impl Provider for EnvProvider {
    fn path(&self) -> &str {
        "std/env"
    }

    fn capability(&self) -> CapabilityKind {
        CapabilityKind::Env
    }

    fn operations(&self) -> &[&'static str] {
        &["get", "require"]
    }

    fn claims(&self, op: &str, args: &MapValue) -> Result<Vec<ScopeClaim>, Value> {
        let name = required_str(op, args, "name")?;
        Ok(vec![ScopeClaim::EnvVar(name.to_owned())])
    }

    fn invoke(&self, op: &str, args: &MapValue) -> ProviderReply {
        let result = required_str(op, args, "name").and_then(|name| {
            let value = self.lookup(name);
            tracing::debug!(name, found = value.is_some(), "env lookup");
            match (op, value) {
                ("get", Some(value)) => Ok(Value::some(Value::string(value))),
                ("get", None) => Ok(Value::None),
                ("require", Some(value)) => Ok(Value::string(value)),
                ("require", None) => Err(error_value(format!(
                    "environment variable `{name}` is not set"
                ))),
                (other, _) => Err(error_value(format!("std/env has no operation `{other}`"))),
            }
        });
        ProviderReply::Ready(result)
    }
}

/// Parse `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is
/// accepted, and one pair of matching quotes around the value is removed.
/// A malformed line yields its 1-based line number.
pub fn parse_env_file(text: &str) -> Result<BTreeMap<String, String>, usize> {
    let mut vars = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err(index + 1);
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(index + 1);
        }
        vars.insert(key.to_owned(), unquote(value.trim()).to_owned());
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            value
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(value)
}

#[cfg(test)]
mod tests;
