// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! One dump or load call in progress.

use std::sync::Arc;

use tracing::trace;

use crate::codec::{CodecTable, TypeDescriptor};
use crate::core::{Envelope, Json, Result, SerializerError, Value};

use super::Serializer;
use super::context::SerializationContext;

/// State of a single top-level dump or load.
///
/// Codecs receive the session so they can dump and load nested values;
/// every nested call runs through the same context and filter pipeline.
pub struct Session<'a> {
    serializer: &'a Serializer,
    context: SerializationContext,
}

impl<'a> Session<'a> {
    pub(crate) fn new(serializer: &'a Serializer) -> Self {
        Self {
            serializer,
            context: SerializationContext::new(serializer.max_depth()),
        }
    }

    pub fn serializer(&self) -> &'a Serializer {
        self.serializer
    }

    pub fn table(&self) -> &'a CodecTable {
        self.serializer.table()
    }

    pub fn context(&self) -> &SerializationContext {
        &self.context
    }

    pub(crate) fn context_mut(&mut self) -> &mut SerializationContext {
        &mut self.context
    }

    /// Dump `value` into its envelope.
    ///
    /// The codec is chosen by `type_name` when given, else by the value's
    /// type key. The envelope has passed through every envelope-level
    /// filter stage.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an unknown type or name
    /// - `MissingCodec` if the type cannot be encoded
    /// - `DepthExceeded` if the graph nests deeper than the limit
    pub fn dump(&mut self, value: &Value, type_name: Option<&str>) -> Result<Json> {
        self.context.enter()?;
        let result = self.dump_entered(value, type_name);
        self.context.leave();
        result
    }

    fn dump_entered(&mut self, value: &Value, type_name: Option<&str>) -> Result<Json> {
        let descriptor = match type_name {
            Some(name) => self.table().get_by_name(name)?,
            None => self.table().get(&value.type_key())?,
        };
        trace!(
            type_name = descriptor.type_name(),
            depth = self.context.nesting(),
            "Dumping value"
        );

        let raw = self.encode(&descriptor, value)?;
        let envelope = Envelope::new(descriptor.type_name(), raw).into_json();
        self.serializer.pipeline().dump_envelope(envelope)
    }

    fn encode(&mut self, descriptor: &Arc<TypeDescriptor>, value: &Value) -> Result<Json> {
        let codec = descriptor.encoder()?.clone();
        codec.encode(self, descriptor, value)
    }

    /// Load a value from `data`.
    ///
    /// `data` is normally an envelope. When `type_name` is given and `data`
    /// is not envelope-shaped, `data` is taken as the bare raw value, which
    /// is how payloads with stripped type tags are loaded.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `data` is null or no type name can be found
    /// - `NotFound` for an unknown type name
    /// - `MissingCodec` if the type cannot be decoded
    /// - `DepthExceeded` if the data nests deeper than the limit
    pub fn load(&mut self, data: &Json, type_name: Option<&str>) -> Result<Value> {
        self.context.enter()?;
        let result = self.load_entered(data, type_name);
        self.context.leave();
        result
    }

    fn load_entered(&mut self, data: &Json, type_name: Option<&str>) -> Result<Value> {
        if data.is_null() {
            return Err(SerializerError::invalid_value(
                self.location(),
                "no data to load",
            ));
        }

        let data = self.serializer.pipeline().load_envelope(data.clone())?;
        let (name, raw) = match (type_name, Envelope::from_json(&data)) {
            // Stripped data can look like an envelope of another type.
            (Some(name), Some(envelope)) if envelope.type_name == name => {
                (name.to_string(), envelope.value)
            }
            (Some(name), _) => (name.to_string(), data),
            (None, Some(envelope)) => (envelope.type_name, envelope.value),
            (None, None) => {
                return Err(SerializerError::invalid_value(
                    self.location(),
                    format!("no type name for {data}"),
                ));
            }
        };

        let descriptor = self.table().get_by_name(&name)?;
        trace!(
            type_name = descriptor.type_name(),
            depth = self.context.nesting(),
            "Loading value"
        );

        let codec = descriptor.decoder()?.clone();
        codec.decode(self, &descriptor, &raw)
    }

    fn location(&self) -> String {
        let path = self.context.path();
        if path.is_empty() {
            "load".to_string()
        } else {
            path
        }
    }
}
