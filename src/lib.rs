// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Envcodec
//!
//! Object graph serialization to tagged JSON envelopes.
//!
//! Every dumped value has the wire form `{"type": "<name>", "value": <raw>}`.
//! Types are registered explicitly in a [`CodecTable`]; a [`Serializer`]
//! walks a [`Value`] graph, asks each type's [`Codec`] for the raw form and
//! runs the result through an ordered [`FilterPipeline`].
//!
//! ## Architecture
//!
//! - `core/` - Errors, the generic name registry, values and envelopes
//! - `codec/` - Type descriptors, the codec table and the built-in codecs
//! - `serializer/` - Dump/load orchestration, per-call context, config, files
//! - `filter/` - Filter stages (type stripping, compaction, compression)
//!
//! ## Example: Dumping a class
//!
//! ```rust
//! # fn main() -> envcodec::Result<()> {
//! use std::sync::Arc;
//! use envcodec::{CodecTable, Object, Serializer, TypeDescriptor, TypeKey, Value};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Pair {
//!     x: String,
//!     y: String,
//! }
//!
//! impl Object for Pair {
//!     fn type_key(&self) -> TypeKey {
//!         TypeKey::from_static("Pair")
//!     }
//!
//!     fn get_member(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "X" => Some(self.x.clone().into()),
//!             "Y" => Some(self.y.clone().into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_member(&mut self, name: &str, value: Value) -> envcodec::Result<()> {
//!         let text = value.as_str().unwrap_or_default().to_string();
//!         match name {
//!             "X" => self.x = text,
//!             _ => self.y = text,
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let table = Arc::new(CodecTable::with_builtins()?);
//! table.register(
//!     TypeDescriptor::class("Pair", || Value::object(Pair::default()))
//!         .member("X")
//!         .member("Y")
//!         .build(),
//! )?;
//!
//! let serializer = Serializer::new(table);
//! let pair = Value::object(Pair { x: "a".into(), y: "b".into() });
//! let dumped = serializer.dump(&pair, None)?;
//! assert_eq!(
//!     dumped,
//!     json!({"type": "Pair", "value": {
//!         "X": {"type": "string", "value": "a"},
//!         "Y": {"type": "string", "value": "b"},
//!     }})
//! );
//! assert_eq!(serializer.load(&dumped, None)?, pair);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{Envelope, Json, JsonMap, Object, Payload, Result, SerializerError, TypeKey, Value};

// Type registration and codecs
pub mod codec;

pub use codec::{Codec, CodecTable, Member, TypeDescriptor, TypeNameIndex};

// Filter stages
pub mod filter;

pub use filter::{
    CompactionTable, CompressionMethod, FilterPipeline, FilterStage, LiteralKind,
    PayloadCompressor, PrimitiveCompactor, TypeTagStripper,
};

// Dump/load orchestration
pub mod serializer;

pub use serializer::{
    FilterKind, SerializationContext, Serializer, SerializerBuilder, SerializerConfig, Session,
};
