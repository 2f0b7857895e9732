//! Credential entries flowing from config file to lookup

use bindery::{ConfigError, PropertyValue};

use crate::common::TestRuntime;

const TWO_ENTRIES: &str = r#"
[[auth_data]]
id = "dbUser"
user = "dbuser"
password = "{xor}Lz4sLCgwLTs="

[[auth_data]]
id = "dataSource[ds1]/containerAuthData[default-0]"
display_id = "dataSource[ds1]/containerAuthData"
krb5_principal = "dbsvc@EXAMPLE.COM"
krb5_ticket_cache = "/tmp/krb5cc_dbsvc"
"#;

#[test]
fn entries_resolve_by_alias() {
    let t = TestRuntime::with_config(TWO_ENTRIES);

    let db = t.runtime.auth_data("dbUser").unwrap();
    assert_eq!(db.user(), Some("dbuser"));
    assert_eq!(db.decoded_password().unwrap().unwrap().expose(), b"password");

    let container = t.runtime.auth_data("dataSource[ds1]/containerAuthData").unwrap();
    assert_eq!(container.krb5_principal(), Some("dbsvc@EXAMPLE.COM"));
    assert_eq!(container.krb5_ticket_cache(), Some("/tmp/krb5cc_dbsvc"));
    assert!(container.decoded_password().unwrap().is_none());
}

#[test]
fn conflicting_identities_reported_on_lookup() {
    let t = TestRuntime::with_config(
        r#"
[[auth_data]]
id = "both"
user = "u"
password = "p"
krb5_principal = "u@EXAMPLE.COM"
"#,
    );
    match t.runtime.auth_data("both") {
        Err(ConfigError::MutuallyExclusiveAttributes { alias, .. }) => assert_eq!(alias, "both"),
        other => panic!("expected mutually exclusive error, got {:?}", other),
    }
}

#[test]
fn removed_entry_no_longer_resolves() {
    let t = TestRuntime::with_config(TWO_ENTRIES);
    let summary = t.rewrite(
        r#"
[[auth_data]]
id = "dbUser"
user = "dbuser"
password = "{xor}Lz4sLCgwLTs="
"#,
    );
    assert_eq!(summary.removed, 1);
    assert!(matches!(
        t.runtime.auth_data("dataSource[ds1]/containerAuthData"),
        Err(ConfigError::NotFound { .. })
    ));
    assert_eq!(t.runtime.store().aliases(), vec!["dbUser".to_string()]);
}

#[test]
fn entry_properties_match_container_keys() {
    let t = TestRuntime::with_config(TWO_ENTRIES);
    let config = bindery::RuntimeConfig::from_file(&t.config_path).unwrap();
    let p = config.auth_data[1].to_properties();
    assert_eq!(
        p.get("config.displayId"),
        Some(&PropertyValue::from("dataSource[ds1]/containerAuthData"))
    );
    assert_eq!(p.get("krb5TicketCache"), Some(&PropertyValue::from("/tmp/krb5cc_dbsvc")));
}
