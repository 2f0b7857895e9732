//! Idempotent resource publication for bindery
//!
//! This crate wraps a single resource published into an external registry:
//! - ResourcePublisher: atomic register / unregister / property updates
//! - ResourceRegistry / RegistrationHandle: the registry boundary
//! - testing: a recording in-memory registry for tests
//!
//! Races with the registry reporting a handle as already invalid are part of
//! normal operation and never surface as errors.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod publisher;
pub mod registry;
pub mod testing;

pub use publisher::ResourcePublisher;
pub use registry::{RegistrationHandle, Resource, ResourceRegistry};
