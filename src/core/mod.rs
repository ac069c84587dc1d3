// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout envcodec.
//!
//! This module provides the foundational types for the library:
//! - [`SerializerError`] - Error taxonomy shared by every component
//! - [`NameRegistry`] - Keyed registry with mutation hooks
//! - [`Value`] / [`Object`] - Dynamic object graph
//! - [`Envelope`] - Tagged `{type, value}` wire form
//! - [`Payload`] - Text or binary output of the text level

pub mod envelope;
pub mod error;
pub mod payload;
pub mod registry;
pub mod value;

pub use envelope::Envelope;
pub use error::{Result, SerializerError};
pub use payload::Payload;
pub use registry::{NameRegistry, RegistryHook, RegistryHooks};
pub use value::{AsAny, Json, JsonMap, Object, ObjectClone, ObjectEq, TypeKey, Value};
