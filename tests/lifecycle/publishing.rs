//! Publishing a resource once its credentials and prerequisites are ready

use std::sync::Arc;

use bindery::testing::{InMemoryHandle, InMemoryRegistry};
use bindery::{
    props, Binding, BindingListener, Prerequisite, Properties, Resource, ResourcePublisher,
};

use crate::common::{JdbcDriver, TestRuntime};

const CONFIG: &str = r#"
[[auth_data]]
id = "dbUser"
user = "dbuser"
password = "{xor}Lz4sLCgwLTs="

[startup]
prerequisites = ["jdbcDriver"]
"#;

struct DataSource {
    user: String,
}

#[test]
fn data_source_published_after_prerequisites() {
    let t = TestRuntime::with_config(CONFIG);
    let registry = InMemoryRegistry::new();
    let publisher: ResourcePublisher<InMemoryHandle> = ResourcePublisher::new();

    // properties arrive before the resource is live and are buffered
    publisher
        .set_properties(props([("jndiName", "jdbc/db")]))
        .unwrap();
    assert!(!t.runtime.gate().is_satisfied());
    assert_eq!(registry.active_count(), 0);

    let driver: Arc<dyn Prerequisite> = Arc::new(JdbcDriver);
    t.runtime
        .gate()
        .on_added(&Binding::new(driver, Properties::new()));
    assert!(t.runtime.gate().is_satisfied());

    let entry = t.runtime.auth_data("dbUser").unwrap();
    let resource: Resource = Arc::new(DataSource {
        user: entry.user().unwrap_or_default().to_string(),
    });
    // the published data source carries the configured user
    let user = resource
        .downcast_ref::<DataSource>()
        .map(|ds| ds.user.as_str());
    assert_eq!(user, Some("dbuser"));
    assert!(publisher.register(&registry, "DataSource", resource).unwrap());
    assert_eq!(registry.active_count(), 1);
    assert_eq!(registry.last_update(), Some(props([("jndiName", "jdbc/db")])));

    // a later attempt from another callback is a no-op
    let again: Resource = Arc::new(DataSource {
        user: "dbuser".to_string(),
    });
    assert!(!publisher.register(&registry, "DataSource", again).unwrap());
    assert_eq!(registry.register_count(), 1);

    publisher.set_property("state", "ready").unwrap();
    let expected = props([("jndiName", "jdbc/db"), ("state", "ready")]);
    assert_eq!(registry.last_update(), Some(expected));

    publisher.unregister().unwrap();
    assert_eq!(registry.active_count(), 0);
    t.runtime.deactivate();
    assert!(t.runtime.store().is_empty());
}

#[test]
fn registry_shutdown_is_not_an_error() {
    let registry = InMemoryRegistry::new();
    let publisher: ResourcePublisher<InMemoryHandle> = ResourcePublisher::new();
    let resource: Resource = Arc::new(DataSource {
        user: "u".to_string(),
    });
    assert!(publisher.register(&registry, "DataSource", resource).unwrap());

    registry.invalidate_all();
    publisher.set_properties(props([("state", "stopping")])).unwrap();
    assert!(!publisher.is_registered());
    publisher.unregister().unwrap();
}
