//! Container binding events
//!
//! The hosting container reports collaborators coming and going through
//! [`BindingListener`]. A [`Binding`] pairs the shared reference with the
//! property bag the container published alongside it. Notifications can
//! arrive on any thread and in any order, so listeners must tolerate a
//! removal for a reference they have already replaced.

use std::fmt;
use std::sync::Arc;

use crate::properties::Properties;

/// A reference to a bound collaborator plus its properties
pub struct Binding<T: ?Sized> {
    /// The bound collaborator
    pub reference: Arc<T>,
    /// Properties published with it
    pub properties: Properties,
}

impl<T: ?Sized> Binding<T> {
    /// Create a binding
    pub fn new(reference: Arc<T>, properties: Properties) -> Self {
        Self {
            reference,
            properties,
        }
    }

    /// True if both bindings point at the same allocation
    pub fn same_reference(&self, other: &Binding<T>) -> bool {
        Arc::ptr_eq(&self.reference, &other.reference)
    }
}

impl<T: ?Sized> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            reference: Arc::clone(&self.reference),
            properties: self.properties.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("reference", &Arc::as_ptr(&self.reference).cast::<()>())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Receiver of add/remove notifications from the container
pub trait BindingListener<T: ?Sized>: Send + Sync {
    /// A collaborator became available
    fn on_added(&self, binding: &Binding<T>);

    /// A collaborator went away
    fn on_removed(&self, binding: &Binding<T>);
}
