// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dynamic value model.
//!
//! [`Value`] is the object graph the serializer dumps and loads. Built-in
//! variants cover the primitive codecs; [`Value::Object`] carries instances
//! of user classes through the [`Object`] trait.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use uuid::Uuid;

use super::error::Result;
use crate::codec::TypeDescriptor;
use crate::serializer::Session;

/// Raw JSON value produced by encoders and consumed by decoders.
pub type Json = serde_json::Value;

/// JSON object map used as the accumulator for class members.
pub type JsonMap = serde_json::Map<String, Json>;

/// Stable identity of a serializable type.
///
/// Keys are chosen explicitly at registration time rather than derived from
/// reflection, so payloads stay portable across builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    pub const STRING: TypeKey = TypeKey::from_static("string");
    pub const BYTES: TypeKey = TypeKey::from_static("bytes");
    pub const INT: TypeKey = TypeKey::from_static("int");
    pub const FLOAT: TypeKey = TypeKey::from_static("float");
    pub const BOOL: TypeKey = TypeKey::from_static("bool");
    pub const NULL: TypeKey = TypeKey::from_static("null");
    pub const UUID: TypeKey = TypeKey::from_static("uuid");
    pub const TIMESTAMP: TypeKey = TypeKey::from_static("timestamp");
    pub const DECIMAL: TypeKey = TypeKey::from_static("decimal");
    pub const LIST: TypeKey = TypeKey::from_static("list");
    pub const TUPLE: TypeKey = TypeKey::from_static("tuple");
    pub const MAP: TypeKey = TypeKey::from_static("map");
    pub const SET: TypeKey = TypeKey::from_static("set");

    /// Create a key from a static string.
    pub const fn from_static(key: &'static str) -> Self {
        TypeKey(Cow::Borrowed(key))
    }

    /// Create a key from an owned or borrowed string.
    pub fn new(key: impl Into<String>) -> Self {
        TypeKey(Cow::Owned(key.into()))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeKey {
    fn from(key: &'static str) -> Self {
        TypeKey::from_static(key)
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        TypeKey::new(key)
    }
}

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Boxed cloning for [`Object`]; implemented for every `Clone` object.
pub trait ObjectClone {
    fn clone_object(&self) -> Box<dyn Object>;
}

impl<T: Object + Clone> ObjectClone for T {
    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }
}

/// Dynamic equality for [`Object`]; implemented for every `PartialEq` object.
pub trait ObjectEq {
    fn eq_object(&self, other: &dyn Object) -> bool;
}

impl<T: Object + PartialEq> ObjectEq for T {
    fn eq_object(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A user class instance that can be dumped member by member.
///
/// Members are addressed by name; the list of members that get serialized
/// comes from the type's registered descriptor, not from the object.
///
/// The four lifecycle hooks are optional and do nothing by default. An
/// error returned from a hook aborts the current dump or load. Hooks get
/// the running [`Session`]: its context shows the enclosing instances, and
/// nested values can be dumped or loaded through the same pipeline.
///
/// # Example
///
/// ```
/// use envcodec::{Object, Result, SerializerError, TypeKey, Value};
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Object for Point {
///     fn type_key(&self) -> TypeKey {
///         TypeKey::from_static("Point")
///     }
///
///     fn get_member(&self, name: &str) -> Option<Value> {
///         match name {
///             "x" => Some(Value::Int(self.x)),
///             "y" => Some(Value::Int(self.y)),
///             _ => None,
///         }
///     }
///
///     fn set_member(&mut self, name: &str, value: Value) -> Result<()> {
///         let v = value
///             .as_i64()
///             .ok_or_else(|| SerializerError::invalid_value(name, "expected int"))?;
///         match name {
///             "x" => self.x = v,
///             "y" => self.y = v,
///             _ => return Err(SerializerError::not_found("member", name)),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Object: AsAny + ObjectClone + ObjectEq + Send + Sync + fmt::Debug + 'static {
    /// Key of the registered type this instance belongs to.
    fn type_key(&self) -> TypeKey;

    /// Read a member by name.
    fn get_member(&self, name: &str) -> Option<Value>;

    /// Assign a member by name.
    fn set_member(&mut self, name: &str, value: Value) -> Result<()>;

    fn on_before_class_dump(
        &self,
        _session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _accumulator: &mut JsonMap,
    ) -> Result<()> {
        Ok(())
    }

    fn on_after_class_dump(
        &self,
        _session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _accumulator: &mut JsonMap,
    ) -> Result<()> {
        Ok(())
    }

    fn on_before_class_load(
        &mut self,
        _session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _raw: &Json,
    ) -> Result<()> {
        Ok(())
    }

    fn on_after_class_load(
        &mut self,
        _session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _raw: &Json,
    ) -> Result<()> {
        Ok(())
    }
}

impl dyn Object {
    /// Downcast to a concrete object type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete object type.
    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        (**self).clone_object()
    }
}

impl PartialEq for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}

/// Dynamic value flowing through dump and load.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    /// Microsecond precision survives a round trip
    Timestamp(NaiveDateTime),
    Decimal(BigDecimal),
    List(Vec<Value>),
    /// Fixed-size sequence
    Tuple(Vec<Value>),
    /// Key/value pairs in insertion order; keys may be any value
    Map(Vec<(Value, Value)>),
    /// Unordered collection without duplicates
    Set(Vec<Value>),
    Object(Box<dyn Object>),
}

impl Value {
    /// Get the runtime type key used to find this value's codec.
    pub fn type_key(&self) -> TypeKey {
        match self {
            Value::Null => TypeKey::NULL,
            Value::Bool(_) => TypeKey::BOOL,
            Value::Int(_) => TypeKey::INT,
            Value::Float(_) => TypeKey::FLOAT,
            Value::Str(_) => TypeKey::STRING,
            Value::Bytes(_) => TypeKey::BYTES,
            Value::Uuid(_) => TypeKey::UUID,
            Value::Timestamp(_) => TypeKey::TIMESTAMP,
            Value::Decimal(_) => TypeKey::DECIMAL,
            Value::List(_) => TypeKey::LIST,
            Value::Tuple(_) => TypeKey::TUPLE,
            Value::Map(_) => TypeKey::MAP,
            Value::Set(_) => TypeKey::SET,
            Value::Object(object) => object.type_key(),
        }
    }

    /// Wrap a user object.
    pub fn object(object: impl Object) -> Self {
        Value::Object(Box::new(object))
    }

    /// Build a map from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a set, dropping duplicate elements.
    pub fn set<T: Into<Value>>(elements: impl IntoIterator<Item = T>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for element in elements {
            let element = element.into();
            if !unique.contains(&element) {
                unique.push(element);
            }
        }
        Value::Set(unique)
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get the elements of a list, tuple or set.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) | Value::Tuple(v) | Value::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&dyn Object> {
        match self {
            Value::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Downcast an object value to a concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_object().and_then(|object| object.downcast_ref::<T>())
    }

    /// Look up a map entry by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Get the number of elements or entries of a container.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::List(v) | Value::Tuple(v) | Value::Set(v) => Some(v.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

/// Order-insensitive comparison used for maps and sets.
/// Multiset equality: every element of `a` pairs with a distinct element of `b`.
fn same_elements<T, F>(a: &[T], b: &[T], eq: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        let matched = b
            .iter()
            .enumerate()
            .find(|(i, y)| !used[*i] && eq(x, y))
            .map(|(i, _)| i);
        match matched {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                same_elements(a, b, |(ka, va), (kb, vb)| ka == kb && va == vb)
            }
            (Value::Set(a), Value::Set(b)) => same_elements(a, b, |x, y| x == y),
            (Value::Object(a), Value::Object(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Timestamp(t)
    }
}

impl From<BigDecimal> for Value {
    fn from(d: BigDecimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
