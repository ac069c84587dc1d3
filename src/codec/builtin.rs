// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in primitive codecs.
//!
//! | Type | Raw form |
//! |------|----------|
//! | `string` | JSON string |
//! | `bytes` | standard base64 string |
//! | `int` | JSON integer |
//! | `float` | JSON number |
//! | `bool` | JSON bool |
//! | `null` | `""` |
//! | `uuid` | hyphenated string |
//! | `timestamp` | `"%Y-%m-%d %H:%M:%S %6f"` string |
//! | `decimal` | decimal string |
//! | `list`, `tuple`, `set` | array of element envelopes |
//! | `map` | object keyed by the JSON text of each key envelope |

use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::core::{Json, JsonMap, Result, SerializerError, TypeKey, Value};
use crate::serializer::Session;

use super::descriptor::{Codec, TypeDescriptor};
use super::table::CodecTable;

/// Wire format of timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %6f";

fn unexpected_value(descriptor: &TypeDescriptor, value: &Value) -> SerializerError {
    SerializerError::invalid_value(
        descriptor.type_name(),
        format!("cannot encode a {} value", value.type_key()),
    )
}

fn unexpected_raw(descriptor: &TypeDescriptor, expected: &str, raw: &Json) -> SerializerError {
    SerializerError::invalid_value(
        descriptor.type_name(),
        format!("expected {expected}, got {raw}"),
    )
}

fn raw_str<'a>(descriptor: &TypeDescriptor, raw: &'a Json) -> Result<&'a str> {
    raw.as_str()
        .ok_or_else(|| unexpected_raw(descriptor, "a string", raw))
}

#[derive(Debug, Clone, Copy)]
pub struct StringCodec;

impl Codec for StringCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Str(s) => Ok(Json::String(s.clone())),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        raw_str(descriptor, raw).map(Value::from)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Bytes(bytes) => Ok(Json::String(STANDARD.encode(bytes))),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        let text = raw_str(descriptor, raw)?;
        STANDARD
            .decode(text)
            .map(Value::Bytes)
            .map_err(|e| SerializerError::parse("base64", e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntCodec;

impl Codec for IntCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Int(i) => Ok(Json::from(*i)),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        raw.as_i64()
            .map(Value::Int)
            .ok_or_else(|| unexpected_raw(descriptor, "an integer", raw))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FloatCodec;

impl Codec for FloatCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .ok_or_else(|| {
                    SerializerError::invalid_value(
                        descriptor.type_name(),
                        format!("{f} has no JSON representation"),
                    )
                }),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        raw.as_f64()
            .map(Value::Float)
            .ok_or_else(|| unexpected_raw(descriptor, "a number", raw))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoolCodec;

impl Codec for BoolCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Bool(b) => Ok(Json::Bool(*b)),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        raw.as_bool()
            .map(Value::Bool)
            .ok_or_else(|| unexpected_raw(descriptor, "a bool", raw))
    }
}

/// Null dumps as an empty string and loads from anything.
#[derive(Debug, Clone, Copy)]
pub struct NullCodec;

impl Codec for NullCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Null => Ok(Json::String(String::new())),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(&self, _: &mut Session<'_>, _: &TypeDescriptor, _: &Json) -> Result<Value> {
        Ok(Value::Null)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UuidCodec;

impl Codec for UuidCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Uuid(u) => Ok(Json::String(u.hyphenated().to_string())),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        Uuid::parse_str(raw_str(descriptor, raw)?)
            .map(Value::Uuid)
            .map_err(|e| SerializerError::parse("uuid", e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimestampCodec;

impl Codec for TimestampCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Timestamp(t) => Ok(Json::String(t.format(TIMESTAMP_FORMAT).to_string())),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        NaiveDateTime::parse_from_str(raw_str(descriptor, raw)?, TIMESTAMP_FORMAT)
            .map(Value::Timestamp)
            .map_err(|e| SerializerError::parse("timestamp", e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecimalCodec;

impl Codec for DecimalCodec {
    fn encode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        match value {
            Value::Decimal(d) => Ok(Json::String(d.to_string())),
            other => Err(unexpected_value(descriptor, other)),
        }
    }

    fn decode(
        &self,
        _: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        BigDecimal::from_str(raw_str(descriptor, raw)?)
            .map(Value::Decimal)
            .map_err(|e| SerializerError::parse("decimal", e.to_string()))
    }
}

/// Which sequence variant a [`SequenceCodec`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    List,
    Tuple,
    Set,
}

/// Element-wise codec for lists, tuples and sets.
#[derive(Debug, Clone, Copy)]
pub struct SequenceCodec(pub SequenceKind);

impl Codec for SequenceCodec {
    fn encode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        let elements = match (self.0, value) {
            (SequenceKind::List, Value::List(v))
            | (SequenceKind::Tuple, Value::Tuple(v))
            | (SequenceKind::Set, Value::Set(v)) => v,
            (_, other) => return Err(unexpected_value(descriptor, other)),
        };

        elements
            .iter()
            .map(|element| session.dump(element, None))
            .collect::<Result<Vec<_>>>()
            .map(Json::Array)
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        let items = raw
            .as_array()
            .ok_or_else(|| unexpected_raw(descriptor, "an array", raw))?;
        let elements = items
            .iter()
            .map(|item| session.load(item, None))
            .collect::<Result<Vec<_>>>()?;

        Ok(match self.0 {
            SequenceKind::List => Value::List(elements),
            SequenceKind::Tuple => Value::Tuple(elements),
            SequenceKind::Set => Value::set(elements),
        })
    }
}

/// Map codec. Keys are dumped like any value and stored as the JSON text
/// of their envelope, so non-string keys keep their type.
#[derive(Debug, Clone, Copy)]
pub struct MapCodec;

impl Codec for MapCodec {
    fn encode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        let Value::Map(entries) = value else {
            return Err(unexpected_value(descriptor, value));
        };

        let mut out = JsonMap::new();
        for (key, value) in entries {
            let key = serde_json::to_string(&session.dump(key, None)?)?;
            let value = session.dump(value, None)?;
            if out.insert(key.clone(), value).is_some() {
                return Err(SerializerError::invalid_value(
                    descriptor.type_name(),
                    format!("duplicate key {key}"),
                ));
            }
        }
        Ok(Json::Object(out))
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        let object = raw
            .as_object()
            .ok_or_else(|| unexpected_raw(descriptor, "an object", raw))?;

        let mut entries = Vec::with_capacity(object.len());
        for (key_text, value) in object {
            let key_data: Json = serde_json::from_str(key_text).map_err(|e| {
                SerializerError::parse("map key", format!("{key_text}: {e}"))
            })?;
            let key = session.load(&key_data, None)?;
            let value = session.load(value, None)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }
}

fn builtin(key: TypeKey, codec: impl Codec + 'static, empty: fn() -> Value) -> TypeDescriptor {
    TypeDescriptor::builder(key)
        .constructor(empty)
        .codec(codec)
        .build()
}

/// Register every built-in primitive codec into `table`.
///
/// # Errors
///
/// Returns `Duplicate` if any built-in type is already registered.
pub fn register_builtins(table: &CodecTable) -> Result<()> {
    let descriptors = [
        builtin(TypeKey::STRING, StringCodec, || Value::Str(String::new())),
        builtin(TypeKey::BYTES, BytesCodec, || Value::Bytes(Vec::new())),
        builtin(TypeKey::INT, IntCodec, || Value::Int(0)),
        builtin(TypeKey::FLOAT, FloatCodec, || Value::Float(0.0)),
        builtin(TypeKey::BOOL, BoolCodec, || Value::Bool(false)),
        builtin(TypeKey::NULL, NullCodec, || Value::Null),
        builtin(TypeKey::UUID, UuidCodec, || Value::Uuid(Uuid::nil())),
        builtin(TypeKey::TIMESTAMP, TimestampCodec, || {
            Value::Timestamp(NaiveDateTime::default())
        }),
        builtin(TypeKey::DECIMAL, DecimalCodec, || {
            Value::Decimal(BigDecimal::default())
        }),
        builtin(TypeKey::LIST, SequenceCodec(SequenceKind::List), || {
            Value::List(Vec::new())
        }),
        builtin(TypeKey::TUPLE, SequenceCodec(SequenceKind::Tuple), || {
            Value::Tuple(Vec::new())
        }),
        builtin(TypeKey::MAP, MapCodec, || Value::Map(Vec::new())),
        builtin(TypeKey::SET, SequenceCodec(SequenceKind::Set), || {
            Value::Set(Vec::new())
        }),
    ];

    for descriptor in descriptors {
        table.register(descriptor)?;
    }
    Ok(())
}
