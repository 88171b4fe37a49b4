//! `std/db`: a document store held in memory.
//!
//! ```text
//! request cap db as db
//! bind store ::: std/db as Db
//! let user = await Db.insert(db, {table: "users", data: {name: "ada"}})
//! let found = await Db.findOne(db, {table: "users", where: {id: user.id}})
//! ```
//!
//! Every operation completes from a worker thread, so callers `await` the
//! result the way they would for a real database.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use flo_caps::{CapabilityKind, ScopeClaim};
use flo_patterns::{deferred, error_value, MapValue, Provider, ProviderReply, ProviderResult, Value};
use parking_lot::Mutex;

use super::{required_map, required_str};

const OPERATIONS: &[&str] = &["insert", "find", "findOne", "update", "delete"];

#[derive(Default)]
struct Tables {
    rows: BTreeMap<String, Vec<MapValue>>,
    next_id: i64,
}

impl Tables {
    fn apply(&mut self, op: &str, args: &MapValue) -> ProviderResult {
        let table = required_str(op, args, "table")?.to_owned();
        let filter = match args.get_str("where") {
            None | Some(Value::Nil) => MapValue::new(),
            Some(Value::Map(filter)) => (**filter).clone(),
            Some(other) => {
                return Err(error_value(format!(
                    "`{op}` filter must be a map, got {}",
                    other.type_name()
                )))
            }
        };
        let rows = self.rows.entry(table).or_default();

        match op {
            "insert" => {
                let mut row = required_map(op, args, "data")?.clone();
                self.next_id += 1;
                row.insert(Value::string("id"), Value::Int(self.next_id));
                rows.push(row.clone());
                Ok(Value::map(row))
            }
            "find" => Ok(Value::list(
                rows.iter()
                    .filter(|row| matches_filter(row, &filter))
                    .map(|row| Value::map(row.clone()))
                    .collect(),
            )),
            "findOne" => Ok(rows
                .iter()
                .find(|row| matches_filter(row, &filter))
                .map_or(Value::None, |row| Value::some(Value::map(row.clone())))),
            "update" => {
                let data = required_map(op, args, "data")?;
                let mut updated = 0;
                for row in rows.iter_mut().filter(|row| matches_filter(row, &filter)) {
                    for (key, value) in data.iter() {
                        row.insert(key.clone(), value.clone());
                    }
                    updated += 1;
                }
                Ok(Value::Int(updated))
            }
            "delete" => {
                let before = rows.len();
                rows.retain(|row| !matches_filter(row, &filter));
                Ok(Value::Int(i64::try_from(before - rows.len()).unwrap_or(i64::MAX)))
            }
            other => Err(error_value(format!("std/db has no operation `{other}`"))),
        }
    }
}

/// Every filter entry equals the row's field.
fn matches_filter(row: &MapValue, filter: &MapValue) -> bool {
    filter
        .iter()
        .all(|(key, expected)| row.get(key).is_some_and(|actual| actual.equals(expected)))
}

/// In-memory `std/db` provider. Claims its adapter name on every call.
pub struct InMemoryDb {
    adapter: String,
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::with_adapter("inmemory")
    }

    /// Same store, reported under another adapter name.
    pub fn with_adapter(adapter: impl Into<String>) -> Self {
        InMemoryDb {
            adapter: adapter.into(),
            tables: Arc::new(Mutex::new(Tables::default())),
        }
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }
}

impl Default for InMemoryDb {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for InMemoryDb {
    fn path(&self) -> &str {
        "std/db"
    }

    fn capability(&self) -> CapabilityKind {
        CapabilityKind::Db
    }

    fn operations(&self) -> &[&'static str] {
        OPERATIONS
    }

    fn claims(&self, op: &str, args: &MapValue) -> Result<Vec<ScopeClaim>, Value> {
        required_str(op, args, "table")?;
        Ok(vec![ScopeClaim::Adapter(self.adapter.clone())])
    }

    fn invoke(&self, op: &str, args: &MapValue) -> ProviderReply {
        tracing::debug!(adapter = %self.adapter, op, "db call");
        let (resolver, pending) = deferred();
        let tables = Arc::clone(&self.tables);
        let op = op.to_owned();
        let args = args.clone();
        thread::spawn(move || {
            let result = tables.lock().apply(&op, &args);
            resolver.resolve(result);
        });
        ProviderReply::Deferred(pending)
    }
}
