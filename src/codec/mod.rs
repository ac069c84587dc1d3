// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type registration and codecs.
//!
//! - [`CodecTable`] registers [`TypeDescriptor`]s by [`TypeKey`](crate::TypeKey)
//! - [`TypeNameIndex`] resolves envelope type names back to keys
//! - [`Codec`] is the encode/decode capability each descriptor carries
//! - [`ClassCodec`] dumps user classes member by member
//! - [`builtin`] holds the primitive codecs

pub mod builtin;
pub mod class;
pub mod descriptor;
pub mod names;
pub mod table;

pub use builtin::{TIMESTAMP_FORMAT, register_builtins};
pub use class::ClassCodec;
pub use descriptor::{
    Codec, Constructor, DescriptorBuilder, DescriptorHooks, DumpHook, LoadHook, Member,
    TypeDescriptor,
};
pub use names::TypeNameIndex;
pub use table::{CodecTable, TableHooks};
