//! ResourcePublisher: idempotent publication of a single resource
//!
//! Publishes one resource into an external registry while tolerating:
//! - concurrent `register` calls from several threads
//! - the registry invalidating the handle on its own (e.g. the surrounding
//!   module shutting down mid-registration)
//! - property updates arriving before any registration exists
//!
//! ## State machine
//!
//! ```text
//! Unregistered --register--> (Registering) --CAS handle--> Registered
//! Registered --unregister / invalidation detected--> Unregistered
//! ```
//!
//! `registering` is a CAS flag that admits one registration call at a time.
//! It is released by a drop guard, so it never stays set after an error or a
//! panic. The handle itself is installed with a second CAS. A caller that
//! loses that CAS, because another thread slipped in after the flag was
//! released, withdraws its own registration immediately.
//!
//! ## Buffered properties
//!
//! Property updates made while unregistered set `dirty`. The first
//! successful registration pushes the current property set once more, under
//! the same lock that property updates take. An update that raced with the
//! registration therefore cannot be lost.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::{debug, warn};

use bindery_core::{Properties, PropertyValue, RegistryError};

use crate::registry::{RegistrationHandle, Resource, ResourceRegistry};

#[derive(Default)]
struct PropertyState {
    /// Full property set, `None` until `set_properties` is first called
    properties: Option<Properties>,
    /// Single-property overrides layered on top of `properties`
    overlay: Properties,
}

/// Clears the `registering` flag when dropped
struct RegisteringGuard<'a>(&'a AtomicBool);

impl Drop for RegisteringGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Publishes exactly one resource into a registry with handle type `H`
pub struct ResourcePublisher<H> {
    handle: ArcSwapOption<H>,
    state: Mutex<PropertyState>,
    /// Properties changed while no registration was live
    dirty: AtomicBool,
    /// A registration call is in flight
    registering: AtomicBool,
}

impl<H: RegistrationHandle> ResourcePublisher<H> {
    /// Create an unregistered publisher with no properties
    pub fn new() -> Self {
        Self {
            handle: ArcSwapOption::empty(),
            state: Mutex::new(PropertyState::default()),
            dirty: AtomicBool::new(false),
            registering: AtomicBool::new(false),
        }
    }

    /// Replace the full property set
    ///
    /// Overlay properties set through [`set_property`](Self::set_property)
    /// are merged over `properties` so they survive the replacement. The
    /// result is pushed to the live registration, if any. If the
    /// registration turns out to be stale, the handle is cleared and the
    /// properties are kept for the next `register`.
    pub fn set_properties(&self, properties: Properties) -> Result<(), RegistryError> {
        let mut state = self.state.lock();
        let mut merged = properties;
        for (name, value) in &state.overlay {
            merged.insert(name.clone(), value.clone());
        }
        state.properties = Some(merged);
        self.push_locked(&state)
    }

    /// Set a single overlay property
    ///
    /// Returns `Ok(false)` without touching the registry if `name` already
    /// has `value`.
    pub fn set_property(
        &self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<bool, RegistryError> {
        let name = name.into();
        let value = value.into();

        let mut state = self.state.lock();
        if state.overlay.get(&name) == Some(&value) {
            return Ok(false);
        }
        state.overlay.insert(name.clone(), value.clone());

        let active = match state.properties.as_mut() {
            Some(properties) => {
                properties.insert(name, value);
                true
            }
            None => false,
        };
        if active {
            self.push_locked(&state)?;
        }
        Ok(true)
    }

    /// Publish `resource` unless a registration already exists
    ///
    /// Returns `Ok(true)` if this call installed a registration that is
    /// live on return. `Ok(false)` means nothing is live because of this
    /// call: already registered, another thread was registering, the race
    /// for the handle was lost, or the registry invalidated the registration
    /// before it or its buffered properties landed. Other registry failures
    /// propagate.
    pub fn register<R>(
        &self,
        registry: &R,
        resource_type: &str,
        resource: Resource,
    ) -> Result<bool, RegistryError>
    where
        R: ResourceRegistry<Handle = H> + ?Sized,
    {
        if self.handle.load().is_some() {
            return Ok(false);
        }
        if self
            .registering
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(target: "bindery::publisher", resource_type, "Registration already in flight");
            return Ok(false);
        }

        let created = {
            let _registering = RegisteringGuard(&self.registering);
            let properties = self.state.lock().properties.clone().unwrap_or_default();
            match registry.register(resource_type, resource, &properties) {
                Ok(handle) => Arc::new(handle),
                Err(RegistryError::Invalidated) => {
                    debug!(target: "bindery::publisher", resource_type, "Registry invalidated during registration");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            }
        };

        let empty: Option<Arc<H>> = None;
        let previous = self.handle.compare_and_swap(&empty, Some(Arc::clone(&created)));
        if previous.is_some() {
            warn!(target: "bindery::publisher", resource_type, "Discarding duplicate registration");
            return match created.unregister() {
                Ok(()) | Err(RegistryError::Invalidated) => Ok(false),
                Err(e) => Err(e),
            };
        }
        debug!(target: "bindery::publisher", resource_type, "Registration installed");

        let state = self.state.lock();
        if self.dirty.swap(false, Ordering::AcqRel) {
            if let Some(properties) = &state.properties {
                match created.set_properties(properties) {
                    Ok(()) => {}
                    Err(RegistryError::Invalidated) => {
                        self.clear_stale(&created);
                        self.dirty.store(true, Ordering::Release);
                        return Ok(false);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(true)
    }

    /// Withdraw the registration, if any
    ///
    /// Safe to call repeatedly. A registry that reports the handle as
    /// already invalid is treated as success. The `registering` flag is
    /// always cleared.
    pub fn unregister(&self) -> Result<(), RegistryError> {
        let _registering = RegisteringGuard(&self.registering);
        let Some(handle) = self.handle.swap(None) else {
            return Ok(());
        };
        match handle.unregister() {
            Ok(()) => {
                debug!(target: "bindery::publisher", "Registration withdrawn");
                Ok(())
            }
            Err(RegistryError::Invalidated) => {
                debug!(target: "bindery::publisher", "Registration was already withdrawn");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// True if a live registration exists
    ///
    /// A handle the registry reports as stale is cleared on the spot.
    pub fn is_registered(&self) -> bool {
        match self.handle.load_full() {
            Some(handle) if handle.is_valid() => true,
            Some(handle) => {
                self.clear_stale(&handle);
                false
            }
            None => false,
        }
    }

    /// Snapshot of the current full property set
    pub fn properties(&self) -> Option<Properties> {
        self.state.lock().properties.clone()
    }

    /// Push the current properties to the live handle, or mark them dirty
    ///
    /// Must be called with the state lock held.
    fn push_locked(&self, state: &PropertyState) -> Result<(), RegistryError> {
        let Some(properties) = &state.properties else {
            return Ok(());
        };
        match self.handle.load_full() {
            Some(handle) => match handle.set_properties(properties) {
                Ok(()) => Ok(()),
                Err(RegistryError::Invalidated) => {
                    self.clear_stale(&handle);
                    self.dirty.store(true, Ordering::Release);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            None => {
                self.dirty.store(true, Ordering::Release);
                Ok(())
            }
        }
    }

    /// Clear `stale` if it is still the installed handle
    fn clear_stale(&self, stale: &Arc<H>) -> bool {
        let previous = self.handle.compare_and_swap(stale, None::<Arc<H>>);
        let cleared = match &*previous {
            Some(current) => Arc::ptr_eq(current, stale),
            None => false,
        };
        if cleared {
            warn!(target: "bindery::publisher", "Cleared stale registration handle");
        }
        cleared
    }
}

impl<H: RegistrationHandle> Default for ResourcePublisher<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for ResourcePublisher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePublisher")
            .field("has_handle", &self.handle.load().is_some())
            .field("dirty", &self.dirty.load(Ordering::Relaxed))
            .field("registering", &self.registering.load(Ordering::Relaxed))
            .finish()
    }
}
