//! Configuration-driven composition of the bindery components
//!
//! Loads `bindery.toml`, publishes its credential entries to a
//! [`ConfigStore`](bindery_store::ConfigStore) and hands its declared
//! prerequisites to a [`StartupGate`](bindery_gate::StartupGate).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod runtime;

pub use config::{AuthDataConfig, RuntimeConfig, StartupConfig, CONFIG_FILE_NAME};
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::{ApplySummary, Runtime};
