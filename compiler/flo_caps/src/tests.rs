use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

fn table_from(json: &str) -> CapabilityTable {
    CapabilityTable::from_json(json).unwrap()
}

const SAMPLE: &str = r#"{
  "capabilities": {
    "db":    { "enabled": true, "adapters": ["inmemory", "postgres"] },
    "net":   { "enabled": true, "hosts": ["api.example.com", "*.internal"] },
    "email": { "enabled": true, "allowed_domains": ["example.com"], "smtp_hosts": ["smtp.example.com"] },
    "ai":    { "enabled": false, "providers": ["openai"] },
    "fs":    { "enabled": true, "files": ["/tmp/flo/*", "/etc/hosts"] },
    "env":   { "enabled": true }
  }
}"#;

#[test]
fn test_grant_enabled_capability() {
    let table = table_from(SAMPLE);
    let token = table.grant("db").unwrap();
    assert_eq!(token.kind(), CapabilityKind::Db);
    assert_eq!(token.name(), "db");
    assert_eq!(token.table_id(), table.id());
    assert_eq!(
        token.attrs().adapters.as_deref(),
        Some(&["inmemory".to_owned(), "postgres".to_owned()][..])
    );
}

#[test]
fn test_grant_refusals() {
    let table = table_from(SAMPLE);
    assert_eq!(
        table.grant("ai").unwrap_err(),
        CapabilityDenial::Disabled(CapabilityKind::Ai)
    );
    assert_eq!(
        table.grant("mnstor").unwrap_err(),
        CapabilityDenial::NotConfigured(CapabilityKind::Mnstor)
    );
    assert_eq!(
        table.grant("teleport").unwrap_err(),
        CapabilityDenial::Unknown("teleport".to_owned())
    );
}

#[test]
fn test_authorize_adapter_allowlist() {
    let table = table_from(SAMPLE);
    let token = table.grant("db").unwrap();
    let ok = [ScopeClaim::Adapter("postgres".to_owned())];
    assert_eq!(table.authorize(&token, CapabilityKind::Db, &ok), Ok(()));

    let bad = ScopeClaim::Adapter("mysql".to_owned());
    assert_eq!(
        table.authorize(&token, CapabilityKind::Db, &[bad.clone()]),
        Err(CapabilityDenial::OutOfScope {
            kind: CapabilityKind::Db,
            claim: bad,
        })
    );
}

#[test]
fn test_host_wildcards() {
    let table = table_from(SAMPLE);
    let token = table.grant("net").unwrap();
    let check = |host: &str| {
        table
            .authorize(&token, CapabilityKind::Net, &[ScopeClaim::Host(host.to_owned())])
            .is_ok()
    };
    assert!(check("api.example.com"));
    assert!(check("API.Example.com"));
    assert!(check("db.internal"));
    assert!(check("a.b.internal"));
    assert!(!check("internal"));
    assert!(!check("evilinternal"));
    assert!(!check("example.com"));
}

#[test]
fn test_file_prefix_patterns() {
    let table = table_from(SAMPLE);
    let token = table.grant("fs").unwrap();
    let check = |path: &str| {
        table
            .authorize(&token, CapabilityKind::Fs, &[ScopeClaim::File(path.to_owned())])
            .is_ok()
    };
    assert!(check("/tmp/flo/out.txt"));
    assert!(check("/etc/hosts"));
    assert!(!check("/tmp/flo"));
    assert!(!check("/tmp/flowers"));
    assert!(!check("/etc/passwd"));
}

#[test]
fn test_absent_allowlist_is_unrestricted() {
    let table = table_from(SAMPLE);
    let token = table.grant("env").unwrap();
    let claims = [ScopeClaim::EnvVar("HOME".to_owned())];
    assert_eq!(table.authorize(&token, CapabilityKind::Env, &claims), Ok(()));
}

#[test]
fn test_empty_allowlist_permits_nothing() {
    let table = CapabilityTable::empty().with_entry(
        CapabilityKind::Net,
        CapabilityEntry {
            hosts: Some(Vec::new()),
            ..CapabilityEntry::enabled()
        },
    );
    let token = table.grant("net").unwrap();
    let claims = [ScopeClaim::Host("localhost".to_owned())];
    assert!(table.authorize(&token, CapabilityKind::Net, &claims).is_err());
}

#[test]
fn test_wrong_capability_rejected() {
    let table = table_from(SAMPLE);
    let token = table.grant("env").unwrap();
    assert_eq!(
        table.authorize(&token, CapabilityKind::Db, &[]),
        Err(CapabilityDenial::WrongCapability {
            required: CapabilityKind::Db,
            presented: CapabilityKind::Env,
        })
    );
}

#[test]
fn test_token_from_other_table_rejected() {
    let first = CapabilityTable::permissive();
    let second = CapabilityTable::permissive();
    let token = first.grant("db").unwrap();
    assert_eq!(
        second.authorize(&token, CapabilityKind::Db, &[]),
        Err(CapabilityDenial::ForeignToken(CapabilityKind::Db))
    );
}

#[test]
fn test_deny_forces_disabled_and_changes_id() {
    let table = table_from(SAMPLE);
    let before = table.id();
    let token = table.grant("net").unwrap();
    let denied = table.deny([CapabilityKind::Net, CapabilityKind::Fs]);
    assert_ne!(denied.id(), before);
    assert!(!denied.is_enabled(CapabilityKind::Net));
    assert!(!denied.is_enabled(CapabilityKind::Fs));
    assert!(denied.is_enabled(CapabilityKind::Db));
    assert_eq!(
        denied.grant("net").unwrap_err(),
        CapabilityDenial::Disabled(CapabilityKind::Net)
    );
    // tokens from before the deny do not carry over
    assert!(denied.authorize(&token, CapabilityKind::Net, &[]).is_err());
}

#[test]
fn test_unknown_capability_in_file_rejected() {
    let err = CapabilityTable::from_json(r#"{"capabilities": {"gpu": {"enabled": true}}}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown capability `gpu`");
}

#[test]
fn test_missing_enabled_defaults_to_false() {
    let table = table_from(r#"{"capabilities": {"db": {"adapters": ["inmemory"]}}}"#);
    assert!(!table.is_enabled(CapabilityKind::Db));
}

#[test]
fn test_malformed_file() {
    let err = CapabilityTable::from_json("{ not json").unwrap_err();
    assert!(matches!(err, CapabilityFileError::Json(_)));
}

#[test]
fn test_load_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let table = CapabilityTable::load(file.path()).unwrap();
    assert!(table.is_enabled(CapabilityKind::Email));
    assert_eq!(table.iter().count(), 6);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CapabilityTable::load(&dir.path().join("caps.json")).unwrap_err();
    assert!(matches!(err, CapabilityFileError::Io { .. }));
}

#[test]
fn test_kind_round_trip_names() {
    for kind in CapabilityKind::ALL {
        assert_eq!(kind.as_str().parse::<CapabilityKind>(), Ok(kind));
    }
}
