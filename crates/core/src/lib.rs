//! Core types and traits for bindery
//!
//! This crate defines the vocabulary shared by every component:
//! - Properties: string-keyed property bags carried by container callbacks
//! - Binding / BindingListener: add/remove notifications for collaborators
//! - Error: configuration and registry error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod error;
pub mod properties;

pub use binding::{Binding, BindingListener};
pub use error::{BinderyError, BinderyResult, ConfigError, RegistryError};
pub use properties::{get_str, props, Properties, PropertyValue};
