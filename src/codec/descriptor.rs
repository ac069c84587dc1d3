// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type descriptors and the codec capability trait.
//!
//! A [`TypeDescriptor`] bundles everything the serializer knows about one
//! registered type: its key, its wire name, how to construct an empty
//! instance, the [`Codec`] that encodes and decodes it, and for class types
//! the declared members and descriptor-level hooks.

use std::fmt;
use std::sync::Arc;

use crate::core::{Json, JsonMap, Object, Result, SerializerError, TypeKey, Value};
use crate::serializer::Session;

use super::class::ClassCodec;

/// Encoding/decoding capability for one registered type.
///
/// Both methods default to a `MissingCodec` error, so a codec that only
/// implements one direction fails loudly when used the other way.
pub trait Codec: Send + Sync {
    /// Encode `value` into its raw JSON form (without the `{type, value}`
    /// wrapper). Nested values are dumped through `session`.
    fn encode(
        &self,
        _session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        _value: &Value,
    ) -> Result<Json> {
        Err(SerializerError::missing_codec(
            descriptor.type_name(),
            "encoder",
        ))
    }

    /// Decode a raw JSON value back into a [`Value`].
    fn decode(
        &self,
        _session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        _raw: &Json,
    ) -> Result<Value> {
        Err(SerializerError::missing_codec(
            descriptor.type_name(),
            "decoder",
        ))
    }
}

/// Builds a fresh, empty instance of a registered type.
pub type Constructor = Arc<dyn Fn() -> Value + Send + Sync>;

/// Descriptor-level hook run around a class dump; may edit the accumulator,
/// e.g. inject extra entries dumped through the session.
pub type DumpHook = Arc<
    dyn Fn(&mut Session<'_>, &dyn Object, &TypeDescriptor, &mut JsonMap) -> Result<()>
        + Send
        + Sync,
>;

/// Descriptor-level hook run around a class load with the instance being
/// populated and the raw member map.
pub type LoadHook = Arc<
    dyn Fn(&mut Session<'_>, &Json, &TypeDescriptor, &mut dyn Object) -> Result<()>
        + Send
        + Sync,
>;

/// Optional hooks run by the generic class codec.
#[derive(Clone, Default)]
pub struct DescriptorHooks {
    pub before_dump: Option<DumpHook>,
    /// Runs last during dump; commonly used to rewrite the member map
    pub after_dump: Option<DumpHook>,
    pub before_load: Option<LoadHook>,
    /// Receives the fully populated instance
    pub after_load: Option<LoadHook>,
}

impl fmt::Debug for DescriptorHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorHooks")
            .field("before_dump", &self.before_dump.is_some())
            .field("after_dump", &self.after_dump.is_some())
            .field("before_load", &self.before_load.is_some())
            .field("after_load", &self.after_load.is_some())
            .finish()
    }
}

/// A declared class member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Member name, also the key in the dumped member map
    pub name: String,
    /// Wire type name to dump/load the member as; `None` infers it from the
    /// runtime value on dump and from the envelope on load
    pub type_hint: Option<String>,
}

impl Member {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
        }
    }

    pub fn with_hint(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: Some(type_hint.into()),
        }
    }
}

/// Registered description of a serializable type.
///
/// Descriptors are immutable once registered; to change one, unregister
/// the type and register a new descriptor.
#[derive(Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    type_name: String,
    constructor: Option<Constructor>,
    codec: Option<Arc<dyn Codec>>,
    members: Vec<Member>,
    hooks: DescriptorHooks,
}

impl TypeDescriptor {
    /// Start building a descriptor for `key`.
    pub fn builder(key: impl Into<TypeKey>) -> DescriptorBuilder {
        DescriptorBuilder::new(key.into())
    }

    /// Start building a class descriptor that uses the generic member-wise
    /// class codec.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use envcodec::{CodecTable, TypeDescriptor, Value};
    /// # fn point() -> Value { Value::Null }
    /// # fn main() -> envcodec::Result<()> {
    /// let table = CodecTable::with_builtins()?;
    /// table.register(
    ///     TypeDescriptor::class("Point", point)
    ///         .member("x")
    ///         .member_with_hint("y", "int")
    ///         .build(),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn class<F>(key: impl Into<TypeKey>, constructor: F) -> DescriptorBuilder
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DescriptorBuilder::new(key.into())
            .constructor(constructor)
            .codec(ClassCodec)
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Name used for this type in the wire envelope.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn hooks(&self) -> &DescriptorHooks {
        &self.hooks
    }

    pub fn codec(&self) -> Option<&Arc<dyn Codec>> {
        self.codec.as_ref()
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a fresh instance.
    ///
    /// # Errors
    ///
    /// Returns `MissingCodec` if no constructor was registered.
    pub fn construct(&self) -> Result<Value> {
        self.constructor
            .as_ref()
            .map(|constructor| constructor())
            .ok_or_else(|| SerializerError::missing_codec(&self.type_name, "constructor"))
    }

    pub(crate) fn encoder(&self) -> Result<&Arc<dyn Codec>> {
        self.codec
            .as_ref()
            .ok_or_else(|| SerializerError::missing_codec(&self.type_name, "encoder"))
    }

    pub(crate) fn decoder(&self) -> Result<&Arc<dyn Codec>> {
        self.codec
            .as_ref()
            .ok_or_else(|| SerializerError::missing_codec(&self.type_name, "decoder"))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .field("constructor", &self.constructor.is_some())
            .field("codec", &self.codec.is_some())
            .field("members", &self.members)
            .field("hooks", &self.hooks)
            .finish()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct DescriptorBuilder {
    descriptor: TypeDescriptor,
}

impl DescriptorBuilder {
    fn new(key: TypeKey) -> Self {
        let type_name = key.as_str().to_string();
        Self {
            descriptor: TypeDescriptor {
                key,
                type_name,
                constructor: None,
                codec: None,
                members: Vec::new(),
                hooks: DescriptorHooks::default(),
            },
        }
    }

    /// Override the wire name (defaults to the key string).
    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.type_name = name.into();
        self
    }

    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.descriptor.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.descriptor.codec = Some(Arc::new(codec));
        self
    }

    /// Declare a member whose type is inferred from its value.
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.descriptor.members.push(Member::new(name));
        self
    }

    /// Declare a member dumped and loaded as the given wire type.
    pub fn member_with_hint(mut self, name: impl Into<String>, hint: impl Into<String>) -> Self {
        self.descriptor.members.push(Member::with_hint(name, hint));
        self
    }

    pub fn before_dump<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Session<'_>, &dyn Object, &TypeDescriptor, &mut JsonMap) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.descriptor.hooks.before_dump = Some(Arc::new(hook));
        self
    }

    pub fn after_dump<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Session<'_>, &dyn Object, &TypeDescriptor, &mut JsonMap) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.descriptor.hooks.after_dump = Some(Arc::new(hook));
        self
    }

    pub fn before_load<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Session<'_>, &Json, &TypeDescriptor, &mut dyn Object) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.descriptor.hooks.before_load = Some(Arc::new(hook));
        self
    }

    pub fn after_load<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Session<'_>, &Json, &TypeDescriptor, &mut dyn Object) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.descriptor.hooks.after_load = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}
