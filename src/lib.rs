//! Bindery - registration and configuration bookkeeping for component containers
//!
//! Bindery provides three small, thread-safe building blocks that a
//! component container drives through bind/unbind callbacks:
//!
//! - [`ConfigStore`]: keyed credential entries, validated on lookup
//! - [`ResourcePublisher`]: at-most-one registration of a resource with a
//!   registry, with property updates buffered until it is live
//! - [`StartupGate`]: declared versus realized prerequisites
//!
//! [`Runtime`] wires the store and gate to a `bindery.toml` file.
//!
//! # Quick Start
//!
//! ```no_run
//! use bindery::Runtime;
//!
//! let runtime = Runtime::open(std::path::Path::new("/etc/bindery"))?;
//! let entry = runtime.auth_data("dbUser")?;
//! println!("user = {:?}", entry.user());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use bindery_core::{
    props, Binding, BindingListener, BinderyError, BinderyResult, ConfigError, Properties,
    PropertyValue, RegistryError,
};
pub use bindery_gate::{GateSnapshot, Prerequisite, StartupGate};
pub use bindery_publisher::{RegistrationHandle, Resource, ResourcePublisher, ResourceRegistry};
pub use bindery_runtime::{
    ApplySummary, Runtime, RuntimeConfig, RuntimeError, CONFIG_FILE_NAME as CONFIG_FILE,
};
pub use bindery_store::{ConfigEntry, ConfigStore, Secret};

/// Test doubles for driving a [`ResourcePublisher`] without a real registry
pub use bindery_publisher::testing;
