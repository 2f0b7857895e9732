//! Credential entry store for bindery
//!
//! This crate implements the alias → entry map that the container fills
//! with add/remove notifications and application code reads from:
//! - ConfigStore: RwLock-guarded map with compare-and-remove semantics
//! - ConfigEntry: immutable user/password or Kerberos credential entry
//! - alias_for: derives lookup aliases, skipping generated default ids
//! - Secret: decoded password with redacted `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alias;
pub mod entry;
pub mod password;
pub mod store;

pub use alias::{alias_for, is_default_id};
pub use entry::{validate, ConfigEntry};
pub use password::{decode_password, encode_xor, Secret};
pub use store::ConfigStore;
