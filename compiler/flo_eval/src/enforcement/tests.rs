use std::sync::Arc;

use flo_caps::{CapabilityEntry, CapabilityKind};
use flo_patterns::{error_value, EvalErrorKind};
use pretty_assertions::assert_eq;

use super::*;
use crate::tests::Fetch;

fn net_table(hosts: &[&str]) -> CapabilityTable {
    CapabilityTable::empty().with_entry(
        CapabilityKind::Net,
        CapabilityEntry {
            hosts: Some(hosts.iter().map(|h| (*h).to_owned()).collect()),
            ..CapabilityEntry::enabled()
        },
    )
}

fn op(name: &str) -> ProviderOpValue {
    ProviderOpValue {
        path: "test/net".to_owned(),
        op: name.to_owned(),
        provider: Arc::new(Fetch),
    }
}

fn host_args(host: &str) -> Value {
    Value::map_from_str_pairs([("host", Value::string(host))])
}

fn denied_reason(err: &EvalError) -> &str {
    match &err.kind {
        EvalErrorKind::CapabilityDenied { reason, .. } => reason,
        other => panic!("expected CapabilityDenied, got {other:?}"),
    }
}

#[test]
fn allowlisted_host_is_invoked() {
    let table = net_table(&["api.example.com"]);
    let token = table.grant("net").unwrap();
    let outcome = call_provider(
        &table,
        &op("get"),
        &[Value::Capability(token), host_args("api.example.com")],
    )
    .unwrap();
    let ProviderOutcome::Value(value) = outcome else {
        panic!("expected a synchronous reply");
    };
    assert_eq!(
        value.as_map().unwrap().get_str("status"),
        Some(&Value::Int(200))
    );
}

#[test]
fn host_outside_allowlist_is_denied() {
    let table = net_table(&["api.example.com"]);
    let token = table.grant("net").unwrap();
    let err = call_provider(
        &table,
        &op("get"),
        &[Value::Capability(token), host_args("evil.example.org")],
    )
    .unwrap_err();
    assert!(denied_reason(&err).contains("evil.example.org"));
}

#[test]
fn missing_token_is_denied() {
    let table = net_table(&["api.example.com"]);
    let err = call_provider(&table, &op("get"), &[host_args("api.example.com")]).unwrap_err();
    assert!(denied_reason(&err).contains("capability token"));
}

#[test]
fn wrong_capability_is_denied() {
    let table = net_table(&["*"]).with_entry(CapabilityKind::Db, CapabilityEntry::enabled());
    let token = table.grant("db").unwrap();
    let err = call_provider(
        &table,
        &op("get"),
        &[Value::Capability(token), host_args("a.example.com")],
    )
    .unwrap_err();
    assert!(denied_reason(&err).contains("`db` token"));
}

#[test]
fn token_from_another_table_is_denied() {
    let other = net_table(&["*"]);
    let table = net_table(&["*"]);
    let token = other.grant("net").unwrap();
    let err = call_provider(
        &table,
        &op("get"),
        &[Value::Capability(token), host_args("a.example.com")],
    )
    .unwrap_err();
    assert!(denied_reason(&err).contains("not issued by this runtime"));
}

#[test]
fn bad_arguments_fail_before_authorization() {
    let table = net_table(&["*"]);
    let token = Value::Capability(table.grant("net").unwrap());

    let err = call_provider(&table, &op("get"), &[token.clone(), Value::Int(1)]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::TypeMismatch { .. }));

    let err = call_provider(
        &table,
        &op("get"),
        &[token.clone(), host_args("a"), Value::Nil],
    )
    .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ArityMismatch { .. }));

    let err = call_provider(&table, &op("get"), &[token]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::ProviderError(error_value("fetch needs a host"))
    );
}

#[test]
fn provider_failure_surfaces_error_value() {
    let table = net_table(&["*"]);
    let token = table.grant("net").unwrap();
    let err = call_provider(
        &table,
        &op("fail"),
        &[Value::Capability(token), host_args("a.example.com")],
    )
    .unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ProviderError(error_value("timeout")));
}

#[test]
fn deferred_reply_is_passed_through() {
    let table = net_table(&["*"]);
    let token = table.grant("net").unwrap();
    let outcome = call_provider(
        &table,
        &op("later"),
        &[Value::Capability(token), host_args("a.example.com")],
    )
    .unwrap();
    assert!(matches!(outcome, ProviderOutcome::Deferred(_)));
}
