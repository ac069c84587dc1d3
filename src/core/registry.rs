// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generic keyed registry with mutation hooks.
//!
//! [`NameRegistry`] is the building block for the codec table, the type
//! name index and the compaction table. It offers insert/remove/lookup over
//! unique keys, reports duplicates and absent keys as errors, and runs
//! optional hooks before and after every mutation.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use super::error::{Result, SerializerError};

/// Callback invoked around a registry mutation.
pub type RegistryHook<K, V> = Arc<dyn Fn(&K, &V) -> Result<()> + Send + Sync>;

/// Optional hooks run around [`NameRegistry::insert`] and
/// [`NameRegistry::remove`].
///
/// A failing `before_*` hook aborts the mutation. A failing `after_*` hook
/// is returned to the caller once the mutation has already been applied.
pub struct RegistryHooks<K, V> {
    /// Runs before a new entry is inserted
    pub before_insert: Option<RegistryHook<K, V>>,
    /// Runs after a new entry is inserted
    pub after_insert: Option<RegistryHook<K, V>>,
    /// Runs before an entry is removed
    pub before_remove: Option<RegistryHook<K, V>>,
    /// Runs after an entry is removed
    pub after_remove: Option<RegistryHook<K, V>>,
}

impl<K, V> Default for RegistryHooks<K, V> {
    fn default() -> Self {
        Self {
            before_insert: None,
            after_insert: None,
            before_remove: None,
            after_remove: None,
        }
    }
}

impl<K, V> Clone for RegistryHooks<K, V> {
    fn clone(&self) -> Self {
        Self {
            before_insert: self.before_insert.clone(),
            after_insert: self.after_insert.clone(),
            before_remove: self.before_remove.clone(),
            after_remove: self.after_remove.clone(),
        }
    }
}

impl<K, V> fmt::Debug for RegistryHooks<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryHooks")
            .field("before_insert", &self.before_insert.is_some())
            .field("after_insert", &self.after_insert.is_some())
            .field("before_remove", &self.before_remove.is_some())
            .field("after_remove", &self.after_remove.is_some())
            .finish()
    }
}

/// Thread-safe registry of unique keys.
///
/// Uses RwLock for concurrent read access with exclusive write access.
/// Hooks are always invoked with the lock released, so a hook may query or
/// mutate the same registry.
pub struct NameRegistry<K, V> {
    kind: &'static str,
    entries: RwLock<HashMap<K, V>>,
    hooks: RwLock<RegistryHooks<K, V>>,
}

impl<K, V> NameRegistry<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Clone,
{
    /// Create a new empty registry.
    ///
    /// `kind` names the entries in error messages (e.g. "type", "type name").
    pub fn new(kind: &'static str) -> Self {
        Self::with_hooks(kind, RegistryHooks::default())
    }

    /// Create a new empty registry with mutation hooks.
    pub fn with_hooks(kind: &'static str, hooks: RegistryHooks<K, V>) -> Self {
        Self {
            kind,
            entries: RwLock::new(HashMap::new()),
            hooks: RwLock::new(hooks),
        }
    }

    /// Replace the mutation hooks.
    pub fn set_hooks(&self, hooks: RegistryHooks<K, V>) {
        *self.hooks.write().unwrap_or_else(PoisonError::into_inner) = hooks;
    }

    fn hooks(&self) -> RegistryHooks<K, V> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Insert a new entry.
    ///
    /// # Errors
    ///
    /// Returns `SerializerError::Duplicate` if the key already exists, or
    /// the error of a failing hook.
    pub fn insert(&self, key: K, value: V) -> Result<()> {
        self.insert_with(key, value, |_, _| Ok(()))
    }

    /// Insert a new entry, running `commit` under the write lock just before
    /// the entry is stored.
    ///
    /// A failing `commit` leaves the registry unchanged. `commit` must not
    /// touch this registry; hooks run with no lock held and may.
    ///
    /// # Errors
    ///
    /// Returns `SerializerError::Duplicate` if the key already exists, or
    /// the error of `commit` or of a failing hook.
    pub fn insert_with(
        &self,
        key: K,
        value: V,
        commit: impl FnOnce(&K, &V) -> Result<()>,
    ) -> Result<()> {
        if self.has(&key) {
            return Err(SerializerError::duplicate(self.kind, key.to_string()));
        }

        let hooks = self.hooks();
        if let Some(hook) = &hooks.before_insert {
            hook(&key, &value)?;
        }

        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            if entries.contains_key(&key) {
                return Err(SerializerError::duplicate(self.kind, key.to_string()));
            }
            commit(&key, &value)?;
            entries.insert(key.clone(), value.clone());
        }

        if let Some(hook) = &hooks.after_insert {
            hook(&key, &value)?;
        }
        Ok(())
    }

    /// Remove an entry and return its value.
    ///
    /// # Errors
    ///
    /// Returns `SerializerError::NotFound` if the key is absent, or the
    /// error of a failing hook.
    pub fn remove(&self, key: &K) -> Result<V> {
        self.remove_with(key, |_, _| Ok(()))
    }

    /// Remove an entry, running `commit` under the write lock right after
    /// the entry is taken out.
    ///
    /// A failing `commit` puts the entry back. As with
    /// [`insert_with`](Self::insert_with), `commit` must not touch this
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns `SerializerError::NotFound` if the key is absent, or the
    /// error of `commit` or of a failing hook.
    pub fn remove_with(&self, key: &K, commit: impl FnOnce(&K, &V) -> Result<()>) -> Result<V> {
        let value = self.get(key)?;

        let hooks = self.hooks();
        if let Some(hook) = &hooks.before_remove {
            hook(key, &value)?;
        }

        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let removed = entries
                .remove(key)
                .ok_or_else(|| SerializerError::not_found(self.kind, key.to_string()))?;
            if let Err(e) = commit(key, &removed) {
                entries.insert(key.clone(), removed);
                return Err(e);
            }
            removed
        };

        if let Some(hook) = &hooks.after_remove {
            hook(key, &removed)?;
        }
        Ok(removed)
    }

    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `SerializerError::NotFound` if the key is absent.
    pub fn get(&self, key: &K) -> Result<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| SerializerError::not_found(self.kind, key.to_string()))
    }

    /// Get the value stored under `key`, or `default` if absent.
    pub fn get_or(&self, key: &K, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Check if a key is registered.
    pub fn has(&self, key: &K) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Get all registered keys.
    pub fn keys(&self) -> Vec<K> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Find the first entry matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&K, &V) -> bool) -> Option<(K, V)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(k, v)| predicate(k, v))
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Get the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> fmt::Debug for NameRegistry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self
            .entries
            .read()
            .map(|entries| entries.len())
            .unwrap_or_default();
        f.debug_struct("NameRegistry")
            .field("kind", &self.kind)
            .field("count", &count)
            .finish()
    }
}
