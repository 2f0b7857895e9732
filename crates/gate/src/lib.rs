//! Prerequisite ledger for bindery
//!
//! Tracks which prerequisites a component's configuration declares and
//! which ones the container has actually bound, for startup diagnostics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gate;

pub use gate::{GateSnapshot, Prerequisite, StartupGate, PREREQUISITE};
