// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Serializer configuration loaded from TOML.
//!
//! ```toml
//! pretty = true
//! max_depth = 128
//! filters = ["compact", "compress"]
//!
//! [compression]
//! method = "lz4"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Result, SerializerError};
use crate::filter::{CompressionMethod, DEFAULT_LEVEL};

use super::context::DEFAULT_MAX_DEPTH;

/// A built-in filter stage selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    StripTypes,
    Compact,
    Compress,
}

/// Compression settings used by the `compress` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    pub method: CompressionMethod,
    pub level: i32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            method: CompressionMethod::default(),
            level: DEFAULT_LEVEL,
        }
    }
}

/// Configuration of a [`Serializer`](crate::Serializer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerializerConfig {
    /// Pretty-print encoded JSON text
    pub pretty: bool,
    /// Nesting limit for a single dump or load
    pub max_depth: usize,
    /// Filter stages, in application order
    pub filters: Vec<FilterKind>,
    pub compression: CompressionConfig,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            max_depth: DEFAULT_MAX_DEPTH,
            filters: Vec::new(),
            compression: CompressionConfig::default(),
        }
    }
}

impl SerializerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SerializerError::parse("config", e.to_string()))
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SerializerError::Io(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Render the configuration as TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SerializerError::parse("config", e.to_string()))
    }
}
