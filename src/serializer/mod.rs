// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dump/load orchestration.
//!
//! A [`Serializer`] combines a shared [`CodecTable`] with a
//! [`FilterPipeline`]. Each top-level [`dump`](Serializer::dump) or
//! [`load`](Serializer::load) opens a fresh [`Session`] with its own
//! [`SerializationContext`], so one serializer can be used from many
//! threads at once.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use envcodec::{CodecTable, Serializer, Value};
//! use serde_json::json;
//!
//! # fn main() -> envcodec::Result<()> {
//! let serializer = Serializer::new(Arc::new(CodecTable::with_builtins()?));
//!
//! let dumped = serializer.dump(&Value::Int(42), None)?;
//! assert_eq!(dumped, json!({"type": "int", "value": 42}));
//! assert_eq!(serializer.load(&dumped, None)?, Value::Int(42));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod file;
pub mod session;

pub use config::{CompressionConfig, FilterKind, SerializerConfig};
pub use context::{Frame, Phase, SerializationContext, DEFAULT_MAX_DEPTH};
pub use session::Session;

use std::sync::Arc;

use tracing::debug;

use crate::codec::CodecTable;
use crate::core::{Json, Payload, Result, Value};
use crate::filter::{
    FilterPipeline, FilterStage, PayloadCompressor, PrimitiveCompactor, TypeTagStripper,
};

/// Dumps values to tagged JSON envelopes and loads them back.
#[derive(Debug, Clone)]
pub struct Serializer {
    table: Arc<CodecTable>,
    pipeline: FilterPipeline,
    max_depth: usize,
    pretty: bool,
}

impl Serializer {
    /// Create a serializer without filter stages.
    pub fn new(table: Arc<CodecTable>) -> Self {
        Self::builder(table).build()
    }

    pub fn builder(table: Arc<CodecTable>) -> SerializerBuilder {
        SerializerBuilder::new(table)
    }

    /// Create a serializer from configuration.
    ///
    /// The `compact` filter uses the default built-in short codes.
    pub fn from_config(table: Arc<CodecTable>, config: &SerializerConfig) -> Result<Self> {
        let mut builder = Self::builder(table)
            .pretty(config.pretty)
            .max_depth(config.max_depth);

        for kind in &config.filters {
            builder = match kind {
                FilterKind::StripTypes => builder.filter(TypeTagStripper),
                FilterKind::Compact => builder.filter(PrimitiveCompactor::with_builtins()?),
                FilterKind::Compress => builder.filter(PayloadCompressor::new(
                    config.compression.method,
                    config.compression.level,
                )),
            };
        }
        Ok(builder.build())
    }

    pub fn table(&self) -> &Arc<CodecTable> {
        &self.table
    }

    pub fn pipeline(&self) -> &FilterPipeline {
        &self.pipeline
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether [`dumps`](Self::dumps) pretty-prints.
    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Open a session for a single call.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    /// Dump `value` into a JSON envelope.
    ///
    /// `type_name` forces the codec of a registered wire name instead of
    /// the one matching the value's type key.
    pub fn dump(&self, value: &Value, type_name: Option<&str>) -> Result<Json> {
        self.session().dump(value, type_name)
    }

    /// Load a value from a JSON envelope.
    ///
    /// `type_name` is required when the data carries no type tag.
    pub fn load(&self, data: &Json, type_name: Option<&str>) -> Result<Value> {
        self.session().load(data, type_name)
    }

    /// Serialize JSON to text and run the text-level filter stages.
    pub fn encode_to_text(&self, json: &Json, pretty: bool) -> Result<Payload> {
        let text = if pretty {
            serde_json::to_string_pretty(json)?
        } else {
            serde_json::to_string(json)?
        };
        self.pipeline.dump_text(Payload::Text(text))
    }

    /// Run the text-level filter stages and parse the JSON text.
    pub fn decode_from_text(&self, payload: impl Into<Payload>) -> Result<Json> {
        let text = self.pipeline.load_text(payload.into())?.into_text()?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Dump and encode in one step.
    pub fn dumps(&self, value: &Value, type_name: Option<&str>) -> Result<Payload> {
        let json = self.dump(value, type_name)?;
        self.encode_to_text(&json, self.pretty)
    }

    /// Decode and load in one step.
    pub fn loads(&self, payload: impl Into<Payload>, type_name: Option<&str>) -> Result<Value> {
        let json = self.decode_from_text(payload)?;
        self.load(&json, type_name)
    }
}

/// Builder for [`Serializer`].
#[derive(Debug)]
pub struct SerializerBuilder {
    table: Arc<CodecTable>,
    pipeline: FilterPipeline,
    max_depth: usize,
    pretty: bool,
}

impl SerializerBuilder {
    fn new(table: Arc<CodecTable>) -> Self {
        Self {
            table,
            pipeline: FilterPipeline::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }

    /// Append a filter stage; stages run in the order they are added.
    pub fn filter(mut self, stage: impl FilterStage + 'static) -> Self {
        self.pipeline.add_stage(stage);
        self
    }

    /// Replace the whole filter pipeline.
    pub fn pipeline(mut self, pipeline: FilterPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> Serializer {
        debug!(
            stages = ?self.pipeline.names(),
            max_depth = self.max_depth,
            "Built serializer"
        );
        Serializer {
            table: self.table,
            pipeline: self.pipeline,
            max_depth: self.max_depth,
            pretty: self.pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CompressionMethod;
    use serde_json::json;

    fn table() -> Arc<CodecTable> {
        Arc::new(CodecTable::with_builtins().unwrap())
    }

    #[test]
    fn test_dump_int_envelope() {
        let serializer = Serializer::new(table());
        assert_eq!(
            serializer.dump(&Value::Int(42), None).unwrap(),
            json!({"type": "int", "value": 42})
        );
    }

    #[test]
    fn test_explicit_type_name() {
        let serializer = Serializer::new(table());
        let dumped = serializer
            .dump(&Value::List(vec![Value::Int(1)]), Some("tuple"))
            .unwrap();
        assert_eq!(dumped["type"], json!("tuple"));
        assert_eq!(
            serializer.load(&dumped, None).unwrap(),
            Value::Tuple(vec![Value::Int(1)])
        );
    }

    #[test]
    fn test_unknown_explicit_name() {
        let serializer = Serializer::new(table());
        let err = serializer.dump(&Value::Int(1), Some("Ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_null_is_invalid() {
        let serializer = Serializer::new(table());
        assert!(serializer
            .load(&Json::Null, None)
            .unwrap_err()
            .is_invalid_value());
    }

    #[test]
    fn test_load_without_type_is_invalid() {
        let serializer = Serializer::new(table());
        assert!(serializer
            .load(&json!(42), None)
            .unwrap_err()
            .is_invalid_value());
        assert_eq!(serializer.load(&json!(42), Some("int")).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_from_config() {
        let config = SerializerConfig {
            pretty: true,
            max_depth: 8,
            filters: vec![FilterKind::Compact, FilterKind::Compress],
            compression: CompressionConfig {
                method: CompressionMethod::Lz4,
                level: 1,
            },
        };
        let serializer = Serializer::from_config(table(), &config).unwrap();

        assert!(serializer.pretty());
        assert_eq!(serializer.max_depth(), 8);
        assert_eq!(serializer.pipeline().names(), vec!["compact", "compress"]);

        let payload = serializer.dumps(&Value::from("hi"), None).unwrap();
        assert!(payload.is_binary());
        assert_eq!(serializer.loads(payload, None).unwrap(), Value::from("hi"));
    }

    #[test]
    fn test_text_round_trip_without_filters() {
        let serializer = Serializer::new(table());
        let json = json!({"type": "int", "value": 42});
        let payload = serializer.encode_to_text(&json, false).unwrap();
        assert_eq!(payload, Payload::from(r#"{"type":"int","value":42}"#));
        assert_eq!(serializer.decode_from_text(payload).unwrap(), json);
    }
}
