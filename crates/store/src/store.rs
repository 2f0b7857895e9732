//! ConfigStore: alias → credential entry map
//!
//! The container mutates the store from its notification threads while
//! application threads look entries up on hot request paths. Mutations are
//! rare, so a single `parking_lot::RwLock` lets lookups proceed in parallel
//! and serializes only the writers.
//!
//! # Ordering
//!
//! Add/remove notifications are not delivered in a guaranteed order. A
//! remove only takes effect if it names the exact entry currently installed
//! (`Arc::ptr_eq`), so a late remove for a replaced entry cannot delete its
//! successor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use bindery_core::{Binding, BindingListener, ConfigError};

use crate::alias::alias_for;
use crate::entry::{validate, ConfigEntry};

/// Concurrent keyed store of credential entries
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: RwLock<HashMap<String, Arc<ConfigEntry>>>,
}

impl ConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`
    ///
    /// Returns the entry that was replaced, if any.
    pub fn put(&self, key: impl Into<String>, entry: Arc<ConfigEntry>) -> Option<Arc<ConfigEntry>> {
        let key = key.into();
        let previous = self.entries.write().insert(key.clone(), entry);
        debug!(target: "bindery::store", alias = %key, replaced = previous.is_some(), "Entry installed");
        previous
    }

    /// Remove the mapping for `key` if it still points at `entry`
    ///
    /// Returns `true` if the mapping was removed. A removal naming an entry
    /// that has since been replaced (or already removed) is a no-op.
    pub fn remove(&self, key: &str, entry: &Arc<ConfigEntry>) -> bool {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(current) if Arc::ptr_eq(current, entry) => {
                entries.remove(key);
                drop(entries);
                debug!(target: "bindery::store", alias = %key, "Entry removed");
                true
            }
            Some(_) => {
                drop(entries);
                warn!(target: "bindery::store", alias = %key, "Ignoring stale removal of replaced entry");
                false
            }
            None => false,
        }
    }

    /// Resolve and validate the entry for `key`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is mapped under `key`; otherwise any error from
    /// [`validate`].
    pub fn get(&self, key: &str) -> Result<Arc<ConfigEntry>, ConfigError> {
        let entry = self
            .entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                alias: key.to_string(),
            })?;
        validate(key, Some(&entry))?;
        Ok(entry)
    }

    /// True if an entry is mapped under `key` (valid or not)
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of mapped entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted snapshot of the mapped aliases
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.entries.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

impl BindingListener<ConfigEntry> for ConfigStore {
    fn on_added(&self, binding: &Binding<ConfigEntry>) {
        match alias_for(&binding.properties) {
            Some(alias) => {
                self.put(alias, Arc::clone(&binding.reference));
            }
            None => {
                warn!(target: "bindery::store", "Ignoring entry published without id or display id");
            }
        }
    }

    fn on_removed(&self, binding: &Binding<ConfigEntry>) {
        if let Some(alias) = alias_for(&binding.properties) {
            self.remove(&alias, &binding.reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::props;

    fn entry(alias: &str, user: &str) -> Arc<ConfigEntry> {
        Arc::new(
            ConfigEntry::new(alias)
                .with_user(user)
                .with_password("secret"),
        )
    }

    #[test]
    fn test_put_then_get() {
        let store = ConfigStore::new();
        let e = entry("dbUser", "scott");
        assert!(store.put("dbUser", Arc::clone(&e)).is_none());
        let got = store.get("dbUser").unwrap();
        assert!(Arc::ptr_eq(&got, &e));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = ConfigStore::new();
        assert_eq!(
            store.get("nope").unwrap_err(),
            ConfigError::NotFound {
                alias: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_put_replaces_wholesale() {
        let store = ConfigStore::new();
        let e1 = entry("a", "first");
        let e2 = entry("a", "second");
        store.put("a", Arc::clone(&e1));
        let previous = store.put("a", Arc::clone(&e2)).unwrap();
        assert!(Arc::ptr_eq(&previous, &e1));
        assert_eq!(store.get("a").unwrap().user(), Some("second"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_requires_matching_reference() {
        let store = ConfigStore::new();
        let e1 = entry("a", "first");
        let e2 = entry("a", "second");
        store.put("a", Arc::clone(&e1));
        assert!(store.remove("a", &e1));
        store.put("a", Arc::clone(&e2));

        // late removal notification for e1
        assert!(!store.remove("a", &e1));
        assert!(Arc::ptr_eq(&store.get("a").unwrap(), &e2));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let store = ConfigStore::new();
        assert!(!store.remove("a", &entry("a", "x")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_validates() {
        let store = ConfigStore::new();
        store.put(
            "half",
            Arc::new(ConfigEntry::new("half").with_user("scott")),
        );
        let err = store.get("half").unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteConfiguration { .. }));
        // invalid entries stay mapped
        assert!(store.contains("half"));
    }

    #[test]
    fn test_listener_uses_display_id_for_default_ids() {
        let store = ConfigStore::new();
        let binding = Binding::new(
            entry("ds1/auth", "scott"),
            props([
                ("id", "dataSource[ds1]/containerAuthData[default-0]"),
                ("config.displayId", "dataSource[ds1]/containerAuthData"),
            ]),
        );
        store.on_added(&binding);
        assert!(store.get("dataSource[ds1]/containerAuthData").is_ok());
        assert!(!store.contains("dataSource[ds1]/containerAuthData[default-0]"));

        store.on_removed(&binding);
        assert!(store.is_empty());
    }

    #[test]
    fn test_listener_ignores_binding_without_ids() {
        let store = ConfigStore::new();
        store.on_added(&Binding::new(entry("x", "y"), props([("user", "y")])));
        assert!(store.is_empty());
    }

    #[test]
    fn test_aliases_sorted() {
        let store = ConfigStore::new();
        store.put("b", entry("b", "u"));
        store.put("a", entry("a", "u"));
        assert_eq!(store.aliases(), vec!["a".to_string(), "b".to_string()]);
    }
}
