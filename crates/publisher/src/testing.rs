//! Testing utilities for publisher behavior
//!
//! [`InMemoryRegistry`] is a registry that records every call made against
//! it and lets tests simulate the conditions a real container produces:
//! handles invalidated from another thread, a registering context that has
//! shut down, injected failures, and slow registration calls that widen
//! race windows.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bindery_publisher::{ResourcePublisher, testing::InMemoryRegistry};
//!
//! let registry = InMemoryRegistry::new();
//! let publisher = ResourcePublisher::new();
//! publisher.register(&registry, "Greeter", Arc::new("hello")).unwrap();
//! assert_eq!(registry.active_count(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use bindery_core::{Properties, RegistryError};

use crate::registry::{RegistrationHandle, Resource, ResourceRegistry};

/// A call recorded by [`InMemoryRegistry`]
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryCall {
    /// A registration was created
    Register {
        /// Registration id
        id: u64,
        /// Type the resource was published under
        resource_type: String,
        /// Properties passed at registration
        properties: Properties,
    },
    /// Properties of a live registration were replaced
    Update {
        /// Registration id
        id: u64,
        /// New properties
        properties: Properties,
    },
    /// A live registration was withdrawn
    Unregister {
        /// Registration id
        id: u64,
    },
}

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    closed: AtomicBool,
    invalidate_next_update: AtomicBool,
    active: Mutex<HashMap<u64, Properties>>,
    calls: Mutex<Vec<RegistryCall>>,
    fail_next_register: Mutex<Option<RegistryError>>,
    register_delay: Mutex<Option<Duration>>,
}

/// Recording in-memory registry
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    inner: Arc<Inner>,
}

/// Handle issued by [`InMemoryRegistry`]
#[derive(Debug)]
pub struct InMemoryHandle {
    id: u64,
    inner: Arc<Inner>,
}

impl InMemoryHandle {
    /// Registration id
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl InMemoryRegistry {
    /// Create an open registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` inside every `register` call
    pub fn with_register_delay(self, delay: Duration) -> Self {
        *self.inner.register_delay.lock() = Some(delay);
        self
    }

    /// Make the next `register` call fail with `error`
    pub fn fail_next_register(&self, error: RegistryError) {
        *self.inner.fail_next_register.lock() = Some(error);
    }

    /// Reject further registrations as `Invalidated`
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }

    /// Make the next property update find its registration already gone
    pub fn invalidate_next_update(&self) {
        self.inner.invalidate_next_update.store(true, Ordering::SeqCst);
    }

    /// Invalidate every live registration without recording a call
    pub fn invalidate_all(&self) {
        self.inner.active.lock().clear();
    }

    /// Number of live registrations
    pub fn active_count(&self) -> usize {
        self.inner.active.lock().len()
    }

    /// Properties of a live registration
    pub fn properties_of(&self, id: u64) -> Option<Properties> {
        self.inner.active.lock().get(&id).cloned()
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.inner.calls.lock().clone()
    }

    /// Number of registrations ever created
    pub fn register_count(&self) -> usize {
        self.count(|c| matches!(c, RegistryCall::Register { .. }))
    }

    /// Number of property updates
    pub fn update_count(&self) -> usize {
        self.count(|c| matches!(c, RegistryCall::Update { .. }))
    }

    /// Number of withdrawn registrations
    pub fn unregister_count(&self) -> usize {
        self.count(|c| matches!(c, RegistryCall::Unregister { .. }))
    }

    /// Properties of the most recent update call
    pub fn last_update(&self) -> Option<Properties> {
        self.inner
            .calls
            .lock()
            .iter()
            .rev()
            .find_map(|c| match c {
                RegistryCall::Update { properties, .. } => Some(properties.clone()),
                _ => None,
            })
    }

    fn count(&self, pred: impl Fn(&RegistryCall) -> bool) -> usize {
        self.inner.calls.lock().iter().filter(|c| pred(c)).count()
    }
}

impl ResourceRegistry for InMemoryRegistry {
    type Handle = InMemoryHandle;

    fn register(
        &self,
        resource_type: &str,
        _resource: Resource,
        properties: &Properties,
    ) -> Result<InMemoryHandle, RegistryError> {
        if let Some(error) = self.inner.fail_next_register.lock().take() {
            return Err(error);
        }
        let delay = *self.inner.register_delay.lock();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(RegistryError::Invalidated);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.active.lock().insert(id, properties.clone());
        self.inner.calls.lock().push(RegistryCall::Register {
            id,
            resource_type: resource_type.to_string(),
            properties: properties.clone(),
        });
        Ok(InMemoryHandle {
            id,
            inner: Arc::clone(&self.inner),
        })
    }
}

impl RegistrationHandle for InMemoryHandle {
    fn set_properties(&self, properties: &Properties) -> Result<(), RegistryError> {
        let mut active = self.inner.active.lock();
        if self.inner.invalidate_next_update.swap(false, Ordering::SeqCst) {
            active.remove(&self.id);
            return Err(RegistryError::Invalidated);
        }
        let slot = active.get_mut(&self.id).ok_or(RegistryError::Invalidated)?;
        *slot = properties.clone();
        self.inner.calls.lock().push(RegistryCall::Update {
            id: self.id,
            properties: properties.clone(),
        });
        Ok(())
    }

    fn unregister(&self) -> Result<(), RegistryError> {
        if self.inner.active.lock().remove(&self.id).is_none() {
            return Err(RegistryError::Invalidated);
        }
        self.inner
            .calls
            .lock()
            .push(RegistryCall::Unregister { id: self.id });
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.inner.active.lock().contains_key(&self.id)
    }
}

impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("active", &self.active.lock().len())
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner, f)
    }
}
