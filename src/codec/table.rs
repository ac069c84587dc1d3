// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Codec table: the registry of serializable types.
//!
//! The table maps [`TypeKey`]s to [`TypeDescriptor`]s and keeps a
//! [`TypeNameIndex`] in lock-step, so every registered type is reachable
//! both from a runtime value (by key) and from an envelope (by wire name).
//!
//! # Example
//!
//! ```
//! use envcodec::{CodecTable, TypeKey};
//!
//! # fn main() -> envcodec::Result<()> {
//! let table = CodecTable::with_builtins()?;
//! assert!(table.has(&TypeKey::INT));
//! assert_eq!(table.resolve_name("int")?, TypeKey::INT);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::core::{NameRegistry, RegistryHooks, Result, SerializerError, TypeKey};

use super::builtin::register_builtins;
use super::descriptor::TypeDescriptor;
use super::names::TypeNameIndex;

/// Hooks run around type registration and unregistration.
///
/// `before_insert`/`after_insert` fire on [`CodecTable::register`],
/// `before_remove`/`after_remove` on [`CodecTable::unregister`].
pub type TableHooks = RegistryHooks<TypeKey, Arc<TypeDescriptor>>;

/// Thread-safe registry of type descriptors.
///
/// Lookups may run concurrently. The wire name is mapped and unmapped
/// under the same write lock as the type entry, so the type map and the
/// name index never disagree. Hooks run with no lock held and may query,
/// register or unregister types (e.g. cascading cleanup of dependents).
#[derive(Debug)]
pub struct CodecTable {
    types: NameRegistry<TypeKey, Arc<TypeDescriptor>>,
    names: TypeNameIndex,
}

impl CodecTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            types: NameRegistry::new("type"),
            names: TypeNameIndex::new(),
        }
    }

    /// Create a table with every built-in primitive codec registered.
    pub fn with_builtins() -> Result<Self> {
        let table = Self::new();
        register_builtins(&table)?;
        Ok(table)
    }

    /// Replace the registration hooks.
    pub fn set_hooks(&self, hooks: TableHooks) {
        self.types.set_hooks(hooks);
    }

    /// Register a type.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the key or the wire name is already
    /// registered, or the error of a failing hook. A failing
    /// `after_insert` hook is reported after the type has been registered.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<Arc<TypeDescriptor>> {
        if self.names.has_name(descriptor.type_name()) {
            return Err(SerializerError::duplicate(
                "type name",
                descriptor.type_name(),
            ));
        }

        let key = descriptor.key().clone();
        let descriptor = Arc::new(descriptor);
        // An after-hook failure still leaves the type and its name registered.
        self.types
            .insert_with(key, descriptor.clone(), |key, descriptor| {
                self.names.map_name(descriptor.type_name(), key.clone())?;
                debug!(
                    "Registered type '{}' as '{}'",
                    key,
                    descriptor.type_name()
                );
                Ok(())
            })
            .map(|()| descriptor)
    }

    /// Unregister a type and its wire name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is not registered, or the error of a
    /// failing hook.
    pub fn unregister(&self, key: &TypeKey) -> Result<Arc<TypeDescriptor>> {
        self.types.remove_with(key, |key, descriptor| {
            self.names.unmap_name(descriptor.type_name())?;
            debug!(
                "Unregistered type '{}' ('{}')",
                key,
                descriptor.type_name()
            );
            Ok(())
        })
    }

    /// Get the descriptor registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the key is not registered.
    pub fn get(&self, key: &TypeKey) -> Result<Arc<TypeDescriptor>> {
        self.types.get(key)
    }

    /// Get the descriptor registered under a wire name.
    pub fn get_by_name(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        let key = self.names.resolve_name(name)?;
        self.types.get(&key)
    }

    pub fn has(&self, key: &TypeKey) -> bool {
        self.types.has(key)
    }

    /// Resolve a wire name to a type key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no registered type uses this name.
    pub fn resolve_name(&self, name: &str) -> Result<TypeKey> {
        self.names.resolve_name(name)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.has_name(name)
    }

    /// Get the wire name of a registered type.
    pub fn name_of(&self, key: &TypeKey) -> Result<String> {
        Ok(self.types.get(key)?.type_name().to_string())
    }

    pub fn name_index(&self) -> &TypeNameIndex {
        &self.names
    }

    pub fn keys(&self) -> Vec<TypeKey> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for CodecTable {
    fn default() -> Self {
        Self::new()
    }
}
