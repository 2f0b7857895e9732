//! Runtime: the store and gate driven by `bindery.toml`
//!
//! The runtime plays the container's part. It turns each configured
//! credential entry into a binding delivered to the store, and hands the
//! declared prerequisites to the gate. Re-applying a changed configuration
//! delivers the difference: new entries are added, changed entries replace
//! their predecessors wholesale, and entries that disappeared are removed.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use bindery_core::{Binding, BindingListener, ConfigError};
use bindery_gate::{GateSnapshot, StartupGate};
use bindery_store::{ConfigEntry, ConfigStore};

use crate::config::{AuthDataConfig, RuntimeConfig, CONFIG_FILE_NAME};
use crate::error::RuntimeResult;

/// What an [`Runtime::apply`] call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Entries bound for the first time
    pub added: usize,
    /// Entries replaced because their configuration changed
    pub modified: usize,
    /// Entries no longer configured
    pub removed: usize,
}

struct Installed {
    config: AuthDataConfig,
    binding: Binding<ConfigEntry>,
}

/// Owns the credential store and startup gate for one configuration
pub struct Runtime {
    store: Arc<ConfigStore>,
    gate: Arc<StartupGate>,
    installed: Mutex<HashMap<String, Installed>>,
}

impl Runtime {
    /// Create a runtime with an empty store and gate
    pub fn new() -> Self {
        Self {
            store: Arc::new(ConfigStore::new()),
            gate: Arc::new(StartupGate::new()),
            installed: Mutex::new(HashMap::new()),
        }
    }

    /// Open a runtime from `bindery.toml` in `dir`
    ///
    /// A default config file is written first if none exists.
    pub fn open(dir: &Path) -> RuntimeResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        RuntimeConfig::write_default_if_missing(&path)?;
        let config = RuntimeConfig::from_file(&path)?;
        let runtime = Self::new();
        runtime.apply(&config)?;
        Ok(runtime)
    }

    /// Re-read `path` and apply the result
    pub fn reload(&self, path: &Path) -> RuntimeResult<ApplySummary> {
        let config = RuntimeConfig::from_file(path)?;
        self.apply(&config)
    }

    /// Deliver `config` to the store and gate
    ///
    /// The configuration is validated before anything is delivered, so a
    /// rejected configuration leaves the previous one in place.
    pub fn apply(&self, config: &RuntimeConfig) -> RuntimeResult<ApplySummary> {
        config.validate()?;

        let mut wanted: HashMap<String, &AuthDataConfig> = HashMap::new();
        for entry in &config.auth_data {
            if let Some(alias) = entry.alias() {
                wanted.insert(alias, entry);
            }
        }

        let mut summary = ApplySummary::default();
        let mut installed = self.installed.lock();

        let gone: Vec<String> = installed
            .keys()
            .filter(|alias| !wanted.contains_key(*alias))
            .cloned()
            .collect();
        for alias in gone {
            if let Some(old) = installed.remove(&alias) {
                self.store.on_removed(&old.binding);
                summary.removed += 1;
            }
        }

        for (alias, entry) in wanted {
            let previous = installed.get(&alias);
            if previous.map(|p| &p.config == entry).unwrap_or(false) {
                continue;
            }
            if previous.is_some() {
                summary.modified += 1;
            } else {
                summary.added += 1;
            }
            // on_added replaces the mapping in one step, so readers never
            // see the alias missing between the old and new entry
            let binding = bind(&alias, entry);
            self.store.on_added(&binding);
            installed.insert(
                alias,
                Installed {
                    config: entry.clone(),
                    binding,
                },
            );
        }

        // still under the installed lock, so concurrent applies cannot
        // leave the store and the gate on different configurations
        self.gate.modify(&config.startup.to_properties());
        drop(installed);

        info!(
            target: "bindery::runtime",
            added = summary.added,
            modified = summary.modified,
            removed = summary.removed,
            "Configuration applied"
        );
        Ok(summary)
    }

    /// Remove every entry this runtime installed and clear declared prerequisites
    pub fn deactivate(&self) {
        let mut installed = self.installed.lock();
        let removed = installed.len();
        for (_, old) in installed.drain() {
            self.store.on_removed(&old.binding);
        }
        self.gate.set_declared(Vec::<String>::new());
        drop(installed);
        info!(target: "bindery::runtime", removed, "Runtime deactivated");
    }

    /// Resolve and validate the entry for `alias`
    pub fn auth_data(&self, alias: &str) -> Result<Arc<ConfigEntry>, ConfigError> {
        self.store.get(alias)
    }

    /// Current state of the startup gate
    pub fn gate_snapshot(&self) -> GateSnapshot {
        self.gate.snapshot()
    }

    /// The credential store
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// The startup gate
    pub fn gate(&self) -> &Arc<StartupGate> {
        &self.gate
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("store", &self.store)
            .field("gate", &self.gate)
            .field("installed", &self.installed.lock().len())
            .finish()
    }
}

fn bind(alias: &str, config: &AuthDataConfig) -> Binding<ConfigEntry> {
    let properties = config.to_properties();
    let entry = ConfigEntry::from_properties(alias, &properties);
    Binding::new(Arc::new(entry), properties)
}
