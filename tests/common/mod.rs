// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use envcodec::{
    CodecTable, Json, JsonMap, Object, Result, SerializationContext, Serializer, SerializerError,
    Session, TypeDescriptor, TypeKey, Value,
};

// ============================================================================
// Temporary Files
// ============================================================================

/// Get a temporary directory for test files
pub fn temp_dir() -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let thread_id = format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>();
    std::env::temp_dir().join(format!(
        "envcodec_test_{}_{}_{}",
        std::process::id(),
        thread_id,
        random
    ))
}

/// Create a temporary file path with cleanup guard
pub fn temp_path(name: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir();
    fs::create_dir_all(&dir).ok();
    let path = dir.join(name);
    let guard = CleanupGuard(dir);
    (path, guard)
}

/// Cleanup guard for test temporary files
pub struct CleanupGuard(PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// ============================================================================
// Serializers
// ============================================================================

/// Codec table with the built-in types and the test classes registered.
pub fn test_table() -> Arc<CodecTable> {
    let table = CodecTable::with_builtins().unwrap();
    register_test_classes(&table);
    Arc::new(table)
}

pub fn plain_serializer() -> Serializer {
    Serializer::new(test_table())
}

pub fn register_test_classes(table: &CodecTable) {
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .member("Y")
                .build(),
        )
        .unwrap();
    table
        .register(
            TypeDescriptor::class("Node", || Value::object(Node::default()))
                .member("label")
                .member("child")
                .build(),
        )
        .unwrap();
    table
        .register(
            TypeDescriptor::class("Reading", || Value::object(Reading::default()))
                .member_with_hint("sensor", "string")
                .member_with_hint("value", "float")
                .member_with_hint("tags", "list")
                .build(),
        )
        .unwrap();
}

// ============================================================================
// Test Classes
// ============================================================================

fn expect_str(name: &str, value: Value) -> Result<String> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(SerializerError::invalid_value(
            name,
            format!("expected string, got {}", other.type_key()),
        )),
    }
}

/// Class with two string members `X` and `Y`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pair {
    pub x: String,
    pub y: String,
}

impl Pair {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

impl Object for Pair {
    fn type_key(&self) -> TypeKey {
        TypeKey::from_static("Pair")
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        match name {
            "X" => Some(Value::from(self.x.clone())),
            "Y" => Some(Value::from(self.y.clone())),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "X" => self.x = expect_str(name, value)?,
            "Y" => self.y = expect_str(name, value)?,
            _ => return Err(SerializerError::not_found("member", name)),
        }
        Ok(())
    }
}

/// Linked node; `child` is null or another node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub label: String,
    pub child: Option<Box<Node>>,
}

impl Node {
    /// Chain of `depth` nodes.
    pub fn chain(depth: usize) -> Self {
        let mut node = Node {
            label: "0".to_string(),
            child: None,
        };
        for i in 1..depth {
            node = Node {
                label: i.to_string(),
                child: Some(Box::new(node)),
            };
        }
        node
    }
}

impl Object for Node {
    fn type_key(&self) -> TypeKey {
        TypeKey::from_static("Node")
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        match name {
            "label" => Some(Value::from(self.label.clone())),
            "child" => Some(match &self.child {
                Some(child) => Value::object((**child).clone()),
                None => Value::Null,
            }),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: Value) -> Result<()> {
        match (name, value) {
            ("label", value) => self.label = expect_str(name, value)?,
            ("child", Value::Null) => self.child = None,
            ("child", value) => {
                let child = value.downcast_ref::<Node>().cloned().ok_or_else(|| {
                    SerializerError::invalid_value("child", "expected a Node")
                })?;
                self.child = Some(Box::new(child));
            }
            _ => return Err(SerializerError::not_found("member", name)),
        }
        Ok(())
    }
}

/// Class whose members all carry type hints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reading {
    pub sensor: String,
    pub value: f64,
    pub tags: Vec<String>,
}

impl Object for Reading {
    fn type_key(&self) -> TypeKey {
        TypeKey::from_static("Reading")
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        match name {
            "sensor" => Some(Value::from(self.sensor.clone())),
            "value" => Some(Value::Float(self.value)),
            "tags" => Some(Value::List(
                self.tags.iter().map(|t| Value::from(t.as_str())).collect(),
            )),
            _ => None,
        }
    }

    fn set_member(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "sensor" => self.sensor = expect_str(name, value)?,
            "value" => {
                self.value = value
                    .as_f64()
                    .ok_or_else(|| SerializerError::invalid_value(name, "expected float"))?
            }
            "tags" => {
                self.tags = value
                    .as_elements()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            }
            _ => return Err(SerializerError::not_found("member", name)),
        }
        Ok(())
    }
}

/// Shared log of lifecycle events.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Class that records its lifecycle hooks and can be told to fail one.
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    pub name: String,
    pub log: EventLog,
    pub fail_on: Option<&'static str>,
}

impl PartialEq for Tracer {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Tracer {
    fn record(&self, event: &'static str, context: &SerializationContext) -> Result<()> {
        let current = context
            .current()
            .map(|frame| frame.type_name.clone())
            .unwrap_or_default();
        self.log
            .lock()
            .unwrap()
            .push(format!("{event}@{current}"));
        if self.fail_on == Some(event) {
            return Err(SerializerError::hook(event, "tracer failure"));
        }
        Ok(())
    }
}

impl Object for Tracer {
    fn type_key(&self) -> TypeKey {
        TypeKey::from_static("Tracer")
    }

    fn get_member(&self, name: &str) -> Option<Value> {
        (name == "name").then(|| Value::from(self.name.clone()))
    }

    fn set_member(&mut self, name: &str, value: Value) -> Result<()> {
        self.log.lock().unwrap().push(format!("set:{name}"));
        self.name = expect_str(name, value)?;
        Ok(())
    }

    fn on_before_class_dump(
        &self,
        session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _accumulator: &mut JsonMap,
    ) -> Result<()> {
        self.record("before_dump", session.context())
    }

    fn on_after_class_dump(
        &self,
        session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        accumulator: &mut JsonMap,
    ) -> Result<()> {
        accumulator.insert("seen".to_string(), Json::Bool(true));
        self.record("after_dump", session.context())
    }

    fn on_before_class_load(
        &mut self,
        session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _raw: &Json,
    ) -> Result<()> {
        self.record("before_load", session.context())
    }

    fn on_after_class_load(
        &mut self,
        session: &mut Session<'_>,
        _descriptor: &TypeDescriptor,
        _raw: &Json,
    ) -> Result<()> {
        self.record("after_load", session.context())
    }
}

/// Register `Tracer` with a constructor sharing `log` and failing on `fail_on`.
pub fn register_tracer(table: &CodecTable, log: EventLog, fail_on: Option<&'static str>) {
    table
        .register(
            TypeDescriptor::class("Tracer", move || {
                Value::object(Tracer {
                    name: String::new(),
                    log: log.clone(),
                    fail_on,
                })
            })
            .member("name")
            .build(),
        )
        .unwrap();
}
