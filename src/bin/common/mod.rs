// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::Args;

use envcodec::codec::TIMESTAMP_FORMAT;
use envcodec::{
    CodecTable, CompressionMethod, FilterKind, Json, JsonMap, Serializer, SerializerConfig, Value,
};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Serializer options shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct SerializerArgs {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Filter stage to apply, in order (replaces the configured filters)
    #[arg(short, long = "filter", value_name = "STAGE", value_parser = parse_filter)]
    pub filters: Vec<FilterKind>,

    /// Compression method for the compress stage (zstd, lz4, bzip2, zlib)
    #[arg(long, value_name = "METHOD")]
    pub method: Option<CompressionMethod>,

    /// Compression level for the compress stage
    #[arg(long)]
    pub level: Option<i32>,
}

impl SerializerArgs {
    /// Resolve the effective configuration.
    pub fn config(&self) -> Result<SerializerConfig> {
        let mut config = match &self.config {
            Some(path) => SerializerConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SerializerConfig::default(),
        };
        if !self.filters.is_empty() {
            config.filters = self.filters.clone();
        }
        if let Some(method) = self.method {
            config.compression.method = method;
        }
        if let Some(level) = self.level {
            config.compression.level = level;
        }
        Ok(config)
    }

    /// Build a serializer over the built-in types.
    pub fn serializer(&self) -> Result<Serializer> {
        let table = Arc::new(CodecTable::with_builtins()?);
        Ok(Serializer::from_config(table, &self.config()?)?)
    }
}

fn parse_filter(s: &str) -> Result<FilterKind> {
    match s.to_lowercase().replace('-', "_").as_str() {
        "strip_types" | "strip" => Ok(FilterKind::StripTypes),
        "compact" => Ok(FilterKind::Compact),
        "compress" => Ok(FilterKind::Compress),
        other => bail!("unknown filter '{other}', expected strip_types, compact or compress"),
    }
}

/// Convert plain JSON into a value graph.
///
/// Objects become maps with string keys; numbers become ints when they fit.
pub fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::Str(s.clone()),
        Json::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (Value::Str(k.clone()), json_to_value(v)))
                .collect(),
        ),
    }
}

/// Convert a value graph back into plain JSON.
///
/// Non-string map keys are written as their plain JSON text.
pub fn value_to_json(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => Json::from(*f),
        Value::Str(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => Json::String(STANDARD.encode(bytes)),
        Value::Uuid(u) => Json::String(u.to_string()),
        Value::Timestamp(t) => Json::String(t.format(TIMESTAMP_FORMAT).to_string()),
        Value::Decimal(d) => Json::String(d.to_string()),
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
            Json::Array(items.iter().map(value_to_json).collect::<Result<_>>()?)
        }
        Value::Map(entries) => {
            let mut map = JsonMap::new();
            for (key, value) in entries {
                let key = match key {
                    Value::Str(s) => s.clone(),
                    other => value_to_json(other)?.to_string(),
                };
                map.insert(key, value_to_json(value)?);
            }
            Json::Object(map)
        }
        Value::Object(object) => {
            bail!("cannot convert class '{}' to plain JSON", object.type_key())
        }
    })
}

/// Format a byte count to a human-readable string.
pub fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;

    if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
