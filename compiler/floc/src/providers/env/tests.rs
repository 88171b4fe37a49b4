use std::collections::BTreeMap;

use flo_caps::ScopeClaim;
use flo_patterns::{MapValue, Provider, ProviderReply, Value};
use pretty_assertions::assert_eq;

use super::{parse_env_file, EnvProvider};

fn name_arg(name: &str) -> MapValue {
    MapValue::from_pairs([(Value::string("name"), Value::string(name))])
}

fn ready(reply: ProviderReply) -> Result<Value, Value> {
    match reply {
        ProviderReply::Ready(result) => result,
        ProviderReply::Deferred(_) => panic!("std/env never defers"),
    }
}

fn provider() -> EnvProvider {
    EnvProvider::with_vars(BTreeMap::from([(
        "FLO_TEST_TOKEN".to_owned(),
        "s3cret".to_owned(),
    )]))
}

#[test]
fn get_wraps_in_option() {
    let env = provider();
    assert_eq!(
        ready(env.invoke("get", &name_arg("FLO_TEST_TOKEN"))),
        Ok(Value::some(Value::string("s3cret")))
    );
    assert_eq!(
        ready(env.invoke("get", &name_arg("FLO_TEST_SURELY_UNSET"))),
        Ok(Value::None)
    );
}

#[test]
fn require_fails_when_unset() {
    let env = provider();
    assert_eq!(
        ready(env.invoke("require", &name_arg("FLO_TEST_TOKEN"))),
        Ok(Value::string("s3cret"))
    );
    let err = ready(env.invoke("require", &name_arg("FLO_TEST_SURELY_UNSET"))).unwrap_err();
    assert_eq!(
        err.as_map().and_then(|m| m.get_str("message")).cloned(),
        Some(Value::string(
            "environment variable `FLO_TEST_SURELY_UNSET` is not set"
        ))
    );
}

#[test]
fn claims_each_variable() {
    let env = EnvProvider::new();
    assert_eq!(
        env.claims("get", &name_arg("HOME")).unwrap(),
        vec![ScopeClaim::EnvVar("HOME".to_owned())]
    );
    assert!(env.claims("get", &MapValue::new()).is_err());
}

#[test]
fn env_file_syntax() {
    let vars = parse_env_file(
        "# comment\n\nexport API_KEY=abc\nGREETING = \"hello world\"\nQUOTED='x'\nEMPTY=\n",
    )
    .unwrap();
    assert_eq!(
        vars,
        BTreeMap::from([
            ("API_KEY".to_owned(), "abc".to_owned()),
            ("EMPTY".to_owned(), String::new()),
            ("GREETING".to_owned(), "hello world".to_owned()),
            ("QUOTED".to_owned(), "x".to_owned()),
        ])
    );
}

#[test]
fn env_file_reports_bad_line() {
    assert_eq!(parse_env_file("A=1\njust words\n"), Err(2));
    assert_eq!(parse_env_file("=value"), Err(1));
}
