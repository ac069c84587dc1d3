// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Filter stages applied to dumped envelopes and their text encoding.
//!
//! A [`FilterStage`] can act at two levels:
//!
//! - **Envelope level**: every `{type, value}` envelope produced by a dump
//!   (including nested ones) passes through `dump_envelope`, and every piece
//!   of data handed to a load passes through `load_envelope` first.
//! - **Text level**: the serialized JSON text passes through `dump_text`
//!   on [`Serializer::encode_to_text`](crate::Serializer::encode_to_text)
//!   and through `load_text` on
//!   [`Serializer::decode_from_text`](crate::Serializer::decode_from_text).
//!
//! # Ordering contract
//!
//! Stages run in the order they were added to the [`FilterPipeline`] for
//! BOTH directions. Load does not run them in reverse. A stage's load
//! transform must therefore undo its own dump transform without relying on
//! the stages after it having been undone first.
//!
//! Built-in stages:
//!
//! - [`TypeTagStripper`] - drops envelopes down to their bare value (one-way)
//! - [`PrimitiveCompactor`] - `{type, value}` to `"<code>::<literal>"`
//! - [`PayloadCompressor`] - `ZIP!` marker plus compressed text

pub mod compact;
pub mod compress;
pub mod pipeline;
pub mod strip;

pub use compact::{CompactCode, CompactionTable, LiteralKind, PrimitiveCompactor, CODE_SEPARATOR};
pub use compress::{CompressionMethod, PayloadCompressor, COMPRESSION_MARKER, DEFAULT_LEVEL};
pub use pipeline::FilterPipeline;
pub use strip::TypeTagStripper;

use crate::core::{Json, Payload, Result};

/// A unit of the filter pipeline.
///
/// Every transform is a pass-through by default; implement the ones the
/// stage needs.
pub trait FilterStage: Send + Sync {
    /// Stage name, for logging and diagnostics.
    fn name(&self) -> &str;

    /// Transform an envelope produced by a dump.
    fn dump_envelope(&self, envelope: Json) -> Result<Json> {
        Ok(envelope)
    }

    /// Transform data before it is loaded.
    fn load_envelope(&self, data: Json) -> Result<Json> {
        Ok(data)
    }

    /// Transform the encoded payload after JSON serialization.
    fn dump_text(&self, payload: Payload) -> Result<Payload> {
        Ok(payload)
    }

    /// Transform the encoded payload before JSON parsing.
    fn load_text(&self, payload: Payload) -> Result<Payload> {
        Ok(payload)
    }
}
