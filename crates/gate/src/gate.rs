//! StartupGate: declared versus realized prerequisites
//!
//! The declared set comes from configuration and is replaced wholesale on
//! every activate/modify. The realized set follows prerequisite services as
//! the container binds and unbinds them. Both sets sit behind one lock, so a
//! snapshot always pairs a declared set with the realized set that matched
//! it at the same instant.
//!
//! The gate is diagnostic: it reports what is outstanding but never blocks
//! anything. Callers that need to wait for prerequisites build that on top.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use tracing::{debug, info};

use bindery_core::{Binding, BindingListener, Properties};

/// Property key listing the declared prerequisites
pub const PREREQUISITE: &str = "prerequisite";

/// A prerequisite service bound by the container
///
/// Prerequisites are identified by their concrete type name.
pub trait Prerequisite: Send + Sync {
    /// Identifier recorded in the realized set
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[derive(Debug, Default)]
struct Ledger {
    declared: BTreeSet<String>,
    realized: BTreeSet<String>,
}

/// Point-in-time copy of the gate's ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateSnapshot {
    /// Prerequisites the configuration expects
    pub declared: BTreeSet<String>,
    /// Prerequisites currently bound
    pub realized: BTreeSet<String>,
}

impl GateSnapshot {
    /// Declared prerequisites that are not realized
    pub fn outstanding(&self) -> BTreeSet<String> {
        self.declared.difference(&self.realized).cloned().collect()
    }

    /// True when every declared prerequisite is realized
    pub fn is_satisfied(&self) -> bool {
        self.declared.is_subset(&self.realized)
    }
}

/// Tracks declared and realized prerequisites
#[derive(Debug, Default)]
pub struct StartupGate {
    ledger: Mutex<Ledger>,
}

impl StartupGate {
    /// Create a gate with nothing declared or realized
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the declared set
    pub fn set_declared<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ledger = self.ledger.lock();
        ledger.declared = ids.into_iter().map(Into::into).collect();
        let outstanding: Vec<&String> = ledger.declared.difference(&ledger.realized).collect();
        if outstanding.is_empty() {
            info!(target: "bindery::gate", declared = ledger.declared.len(), "All prerequisites realized");
        } else {
            info!(target: "bindery::gate", ?outstanding, "Waiting for prerequisites");
        }
    }

    /// Record a realized prerequisite
    ///
    /// Returns `false` if it was already recorded.
    pub fn add_realized(&self, id: impl Into<String>) -> bool {
        let id = id.into();
        let mut ledger = self.ledger.lock();
        let added = ledger.realized.insert(id.clone());
        if added {
            debug!(target: "bindery::gate", prerequisite = %id, declared = ledger.declared.contains(&id), "Prerequisite realized");
        }
        added
    }

    /// Forget a realized prerequisite
    ///
    /// Returns `false` if it was not recorded.
    pub fn remove_realized(&self, id: &str) -> bool {
        let removed = self.ledger.lock().realized.remove(id);
        if removed {
            debug!(target: "bindery::gate", prerequisite = %id, "Prerequisite withdrawn");
        }
        removed
    }

    /// Declare prerequisites from an activation property bag
    ///
    /// Reads the `prerequisite` key; a missing key declares nothing.
    pub fn activate(&self, properties: &Properties) {
        let declared = properties
            .get(PREREQUISITE)
            .and_then(|v| v.to_string_list())
            .unwrap_or_default();
        self.set_declared(declared);
    }

    /// Re-declare prerequisites after a configuration change
    pub fn modify(&self, properties: &Properties) {
        self.activate(properties);
    }

    /// Consistent copy of both sets
    pub fn snapshot(&self) -> GateSnapshot {
        let ledger = self.ledger.lock();
        GateSnapshot {
            declared: ledger.declared.clone(),
            realized: ledger.realized.clone(),
        }
    }

    /// Declared prerequisites that are not realized
    pub fn outstanding(&self) -> BTreeSet<String> {
        self.snapshot().outstanding()
    }

    /// True when every declared prerequisite is realized
    pub fn is_satisfied(&self) -> bool {
        let ledger = self.ledger.lock();
        ledger.declared.is_subset(&ledger.realized)
    }
}

impl BindingListener<dyn Prerequisite> for StartupGate {
    fn on_added(&self, binding: &Binding<dyn Prerequisite>) {
        self.add_realized(binding.reference.type_name());
    }

    fn on_removed(&self, binding: &Binding<dyn Prerequisite>) {
        self.remove_realized(binding.reference.type_name());
    }
}
