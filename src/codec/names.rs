// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire name to type key index.

use crate::core::{NameRegistry, Result, TypeKey};

/// Maps the type names used in envelopes back to registered type keys.
///
/// Owned by [`CodecTable`](super::CodecTable), which keeps it in lock-step
/// with type registration.
#[derive(Debug)]
pub struct TypeNameIndex {
    names: NameRegistry<String, TypeKey>,
}

impl TypeNameIndex {
    pub fn new() -> Self {
        Self {
            names: NameRegistry::new("type name"),
        }
    }

    /// Map `name` to `key`.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the name is already mapped.
    pub fn map_name(&self, name: impl Into<String>, key: TypeKey) -> Result<()> {
        self.names.insert(name.into(), key)
    }

    /// Remove the mapping for `name`.
    pub fn unmap_name(&self, name: &str) -> Result<TypeKey> {
        self.names.remove(&name.to_string())
    }

    /// Resolve a wire name to its type key.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the name is not mapped.
    pub fn resolve_name(&self, name: &str) -> Result<TypeKey> {
        self.names.get(&name.to_string())
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.has(&name.to_string())
    }

    /// Find the wire name mapped to `key`.
    pub fn name_of(&self, key: &TypeKey) -> Option<String> {
        self.names.find(|_, k| k == key).map(|(name, _)| name)
    }

    pub fn names(&self) -> Vec<String> {
        self.names.keys()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TypeNameIndex {
    fn default() -> Self {
        Self::new()
    }
}
