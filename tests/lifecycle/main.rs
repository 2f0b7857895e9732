//! Lifecycle Integration Tests
//!
//! Drive the store, gate and publisher together the way a container would:
//! configuration arrives from `bindery.toml`, prerequisites bind and unbind,
//! and a resource is published once its credentials and prerequisites are
//! in place.

#[path = "../common/mod.rs"]
mod common;

mod credentials;
mod publishing;
mod startup;
