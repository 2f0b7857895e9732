//! Prerequisites declared by config and realized by bindings

use std::sync::Arc;

use bindery::{Binding, BindingListener, Prerequisite, Properties};

use crate::common::{JdbcDriver, Messaging, TestRuntime};

const DECLARED: &str = r#"
[startup]
prerequisites = ["jdbcDriver", "messaging"]
"#;

fn binding(p: impl Prerequisite + 'static) -> Binding<dyn Prerequisite> {
    let reference: Arc<dyn Prerequisite> = Arc::new(p);
    Binding::new(reference, Properties::new())
}

#[test]
fn gate_reports_outstanding_until_bound() {
    let t = TestRuntime::with_config(DECLARED);
    let gate = Arc::clone(t.runtime.gate());
    assert_eq!(gate.outstanding().len(), 2);

    let driver = binding(JdbcDriver);
    gate.on_added(&driver);
    let outstanding: Vec<String> = gate.outstanding().into_iter().collect();
    assert_eq!(outstanding, vec!["messaging".to_string()]);

    gate.on_added(&binding(Messaging));
    assert!(gate.is_satisfied());

    gate.on_removed(&driver);
    assert!(!gate.is_satisfied());
}

#[test]
fn reconfiguration_keeps_realized_prerequisites() {
    let t = TestRuntime::with_config(DECLARED);
    let gate = Arc::clone(t.runtime.gate());
    gate.on_added(&binding(Messaging));

    t.rewrite("[startup]\nprerequisites = [\"messaging\"]\n");
    assert!(gate.is_satisfied());

    t.rewrite("");
    let snapshot = t.runtime.gate_snapshot();
    assert!(snapshot.declared.is_empty());
    assert!(snapshot.realized.contains("messaging"));
}

#[test]
fn deactivate_clears_declared_prerequisites() {
    let t = TestRuntime::with_config(DECLARED);
    t.runtime.deactivate();
    assert!(t.runtime.gate().is_satisfied());
}
