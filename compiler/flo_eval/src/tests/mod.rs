//! End-to-end evaluator tests.
//!
//! Programs are built with `flo_ir::syntax::build`, lowered, and run on a
//! fresh interpreter with a buffered print handler.

mod operators_tests;

use std::sync::Arc;
use std::thread;

use flo_caps::{CapabilityKind, CapabilityTable, ScopeClaim};
use flo_ir::syntax::{build, SyntaxStmt};
use flo_ir::{lower_module, StringInterner};
use flo_patterns::{deferred, error_value, ProviderReply};

use crate::{buffer_handler, EvalError, InterpreterBuilder, MapValue, Provider, ProviderRegistry, Value};

/// Network-shaped provider at `test/net`.
///
/// - `get`: replies at once with `{host, status: 200}`
/// - `later`: same reply, completed from another thread
/// - `fail`: replies with a `timeout` error value
pub(crate) struct Fetch;

impl Fetch {
    fn reply(host: &str) -> Value {
        Value::map_from_str_pairs([("host", Value::string(host)), ("status", Value::Int(200))])
    }
}

impl Provider for Fetch {
    fn path(&self) -> &str {
        "test/net"
    }

    fn capability(&self) -> CapabilityKind {
        CapabilityKind::Net
    }

    fn operations(&self) -> &[&'static str] {
        &["get", "later", "fail"]
    }

    fn claims(&self, _op: &str, args: &MapValue) -> Result<Vec<ScopeClaim>, Value> {
        match args.get_str("host").and_then(Value::as_str) {
            Some(host) => Ok(vec![ScopeClaim::Host(host.to_owned())]),
            None => Err(error_value("fetch needs a host")),
        }
    }

    fn invoke(&self, op: &str, args: &MapValue) -> ProviderReply {
        let host = args
            .get_str("host")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        match op {
            "later" => {
                let (resolver, pending) = deferred();
                thread::spawn(move || resolver.resolve(Ok(Self::reply(&host))));
                ProviderReply::Deferred(pending)
            }
            "fail" => ProviderReply::Ready(Err(error_value("timeout"))),
            _ => ProviderReply::Ready(Ok(Self::reply(&host))),
        }
    }
}

/// Outcome of one program run.
pub(crate) struct Run {
    pub result: Result<Value, EvalError>,
    pub output: String,
}

impl Run {
    pub fn value(&self) -> &Value {
        match &self.result {
            Ok(value) => value,
            Err(err) => panic!("program failed: {err}"),
        }
    }

    pub fn error(&self) -> &EvalError {
        match &self.result {
            Ok(value) => panic!("program succeeded with {value}"),
            Err(err) => err,
        }
    }

    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

/// Run `body` against `table` with [`Fetch`] registered.
pub(crate) fn run_with(table: CapabilityTable, body: Vec<SyntaxStmt>) -> Run {
    let interner = StringInterner::new();
    let module = lower_module(&build::module(body), &interner).unwrap();
    let print = buffer_handler();
    let result = InterpreterBuilder::new(&interner)
        .capabilities(Arc::new(table))
        .providers(ProviderRegistry::new().with(Arc::new(Fetch)))
        .print_handler(Arc::clone(&print))
        .build()
        .run_module(&module);
    Run {
        result,
        output: print.output(),
    }
}

/// Run `body` with every capability granted.
pub(crate) fn run(body: Vec<SyntaxStmt>) -> Run {
    run_with(CapabilityTable::permissive(), body)
}

/// Value of the single expression `expr`.
pub(crate) fn eval(expr: flo_ir::syntax::SyntaxExpr) -> Result<Value, EvalError> {
    run(vec![build::expr(expr)]).result
}
