//! Demo standard-library providers shipped with the CLI.
//!
//! Neither touches anything outside the process: `std/db` keeps its tables
//! in memory, and `std/env` only reads variables.

mod db;
mod env;

use std::sync::Arc;

use flo_eval::ProviderRegistry;
use flo_patterns::{error_value, MapValue, Value};

pub use db::InMemoryDb;
pub use env::{parse_env_file, EnvProvider};

/// `std/db` (in-memory) and `std/env` (with `env` as its override map).
pub fn standard_providers(env: EnvProvider) -> ProviderRegistry {
    ProviderRegistry::new()
        .with(Arc::new(InMemoryDb::new()))
        .with(Arc::new(env))
}

/// String argument `key`, or an error value naming `op`.
fn required_str<'a>(op: &str, args: &'a MapValue, key: &str) -> Result<&'a str, Value> {
    args.get_str(key)
        .and_then(Value::as_str)
        .ok_or_else(|| error_value(format!("`{op}` needs a string `{key}` argument")))
}

/// Map argument `key`, or an error value naming `op`.
fn required_map<'a>(op: &str, args: &'a MapValue, key: &str) -> Result<&'a MapValue, Value> {
    args.get_str(key)
        .and_then(Value::as_map)
        .ok_or_else(|| error_value(format!("`{op}` needs a map `{key}` argument")))
}
