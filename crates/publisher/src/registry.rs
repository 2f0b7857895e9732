//! Outbound interface to the external registry
//!
//! The registry is owned by the hosting container. Any call may fail with
//! [`RegistryError::Invalidated`] when the handle, or the context that
//! registers, was torn down on another thread.

use std::any::Any;
use std::sync::Arc;

use bindery_core::{Properties, RegistryError};

/// A published resource instance
pub type Resource = Arc<dyn Any + Send + Sync>;

/// One active registration in the external registry
pub trait RegistrationHandle: Send + Sync {
    /// Replace the registration's properties
    fn set_properties(&self, properties: &Properties) -> Result<(), RegistryError>;

    /// Withdraw the registration
    fn unregister(&self) -> Result<(), RegistryError>;

    /// Probe whether the registry still considers this handle live
    fn is_valid(&self) -> bool;
}

/// The registry resources are published into
pub trait ResourceRegistry: Send + Sync {
    /// Handle type returned for each registration
    type Handle: RegistrationHandle;

    /// Publish `resource` under `resource_type` with `properties`
    fn register(
        &self,
        resource_type: &str,
        resource: Resource,
        properties: &Properties,
    ) -> Result<Self::Handle, RegistryError>;
}
