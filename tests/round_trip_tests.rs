// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Round-trip integration tests.
//!
//! Tests cover:
//! - Dumping and loading every built-in primitive type
//! - Class dumps with exact envelope output
//! - Maps with non-string keys
//! - Lifecycle and descriptor hooks
//! - Depth limit on deeply nested graphs

mod common;

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use common::{
    plain_serializer, register_tracer, test_table, EventLog, Node, Pair, Reading, Tracer,
};
use envcodec::{
    CodecTable, Json, Serializer, SerializerError, Session, TypeDescriptor, TypeKey, Value,
};

fn round_trip(serializer: &Serializer, value: Value) {
    let dumped = serializer.dump(&value, None).unwrap();
    let loaded = serializer.load(&dumped, None).unwrap();
    assert_eq!(loaded, value, "round trip of {dumped}");
}

// ============================================================================
// Primitives
// ============================================================================

#[test]
fn test_dump_int() {
    let serializer = plain_serializer();
    assert_eq!(
        serializer.dump(&Value::Int(42), None).unwrap(),
        json!({"type": "int", "value": 42})
    );
}

#[test]
fn test_primitive_round_trips() {
    let serializer = plain_serializer();
    let timestamp = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_micro_opt(13, 45, 7, 123_456)
        .unwrap();

    for value in [
        Value::from("hello"),
        Value::from(""),
        Value::Bytes(vec![0, 1, 2, 254, 255]),
        Value::Int(-7),
        Value::Int(i64::MAX),
        Value::Float(3.25),
        Value::Bool(true),
        Value::Bool(false),
        Value::Null,
        Value::Uuid(Uuid::new_v4()),
        Value::Timestamp(timestamp),
        Value::Decimal(BigDecimal::from_str("12345678901234567890.000123").unwrap()),
        Value::List(vec![Value::Int(1), Value::from("two"), Value::Null]),
        Value::Tuple(vec![Value::Bool(true), Value::Float(0.5)]),
        Value::set([1, 2, 3]),
        Value::map([("a", 1), ("b", 2)]),
    ] {
        round_trip(&serializer, value);
    }
}

#[test]
fn test_primitive_wire_forms() {
    let serializer = plain_serializer();
    let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_micro_opt(3, 4, 5, 6)
        .unwrap();

    assert_eq!(
        serializer.dump(&Value::Null, None).unwrap(),
        json!({"type": "null", "value": ""})
    );
    assert_eq!(
        serializer.dump(&Value::Bytes(b"hi".to_vec()), None).unwrap(),
        json!({"type": "bytes", "value": "aGk="})
    );
    assert_eq!(
        serializer.dump(&Value::Uuid(id), None).unwrap(),
        json!({"type": "uuid", "value": "67e55044-10b1-426f-9247-bb680e5fe0c8"})
    );
    assert_eq!(
        serializer.dump(&Value::Timestamp(timestamp), None).unwrap(),
        json!({"type": "timestamp", "value": "2024-01-02 03:04:05 000006"})
    );
    assert_eq!(
        serializer
            .dump(&Value::Decimal(BigDecimal::from_str("1.50").unwrap()), None)
            .unwrap(),
        json!({"type": "decimal", "value": "1.50"})
    );
    assert_eq!(
        serializer
            .dump(&Value::List(vec![Value::Int(1)]), None)
            .unwrap(),
        json!({"type": "list", "value": [{"type": "int", "value": 1}]})
    );
}

#[test]
fn test_float_nan_rejected() {
    let serializer = plain_serializer();
    let err = serializer.dump(&Value::Float(f64::NAN), None).unwrap_err();
    assert!(err.is_invalid_value());
}

#[test]
fn test_set_order_not_preserved() {
    let serializer = plain_serializer();
    let dumped = json!({"type": "set", "value": [
        {"type": "int", "value": 3},
        {"type": "int", "value": 1},
        {"type": "int", "value": 3},
    ]});
    assert_eq!(serializer.load(&dumped, None).unwrap(), Value::set([1, 3]));
}

// ============================================================================
// Maps
// ============================================================================

#[test]
fn test_map_with_int_key() {
    let serializer = plain_serializer();
    let value = Value::map([(Value::Int(1), Value::from("a"))]);

    let dumped = serializer.dump(&value, None).unwrap();
    assert_eq!(
        dumped,
        json!({"type": "map", "value": {
            r#"{"type":"int","value":1}"#: {"type": "string", "value": "a"}
        }})
    );

    let loaded = serializer.load(&dumped, None).unwrap();
    assert_eq!(loaded.get(&Value::Int(1)), Some(&Value::from("a")));
    assert_eq!(loaded.get(&Value::from("1")), None);
}

#[test]
fn test_map_with_mixed_keys() {
    let serializer = plain_serializer();
    round_trip(
        &serializer,
        Value::map([
            (Value::Int(1), Value::from("int")),
            (Value::from("1"), Value::from("string")),
            (Value::Bool(true), Value::from("bool")),
            (
                Value::Tuple(vec![Value::Int(1), Value::Int(2)]),
                Value::from("tuple"),
            ),
        ]),
    );
}

#[test]
fn test_map_bad_key_text() {
    let serializer = plain_serializer();
    let err = serializer
        .load(&json!({"type": "map", "value": {"not json": 1}}), None)
        .unwrap_err();
    assert!(matches!(err, SerializerError::Parse { .. }));
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_class_dump_exact() {
    let serializer = plain_serializer();
    let pair = Value::object(Pair::new("a", "b"));

    let dumped = serializer.dump(&pair, None).unwrap();
    assert_eq!(
        serializer.encode_to_text(&dumped, false).unwrap().into_text().unwrap(),
        concat!(
            r#"{"type":"Pair","value":{"#,
            r#""X":{"type":"string","value":"a"},"#,
            r#""Y":{"type":"string","value":"b"}}}"#
        )
    );

    let loaded = serializer.load(&dumped, None).unwrap();
    assert_eq!(loaded, pair);
    assert_eq!(loaded.downcast_ref::<Pair>(), Some(&Pair::new("a", "b")));
}

#[test]
fn test_nested_classes() {
    let serializer = plain_serializer();
    round_trip(&serializer, Value::object(Node::chain(5)));
    round_trip(
        &serializer,
        Value::List(vec![
            Value::object(Pair::new("1", "2")),
            Value::map([("k", Value::object(Pair::new("3", "4")))]),
        ]),
    );
}

#[test]
fn test_member_type_hints() {
    let serializer = plain_serializer();
    let reading = Reading {
        sensor: "t1".to_string(),
        value: 21.5,
        tags: vec!["room".to_string()],
    };
    round_trip(&serializer, Value::object(reading));
}

#[test]
fn test_member_hint_mismatch() {
    let serializer = plain_serializer();
    let dumped = json!({"type": "Reading", "value": {
        "sensor": {"type": "string", "value": "t1"},
        "value": "not a float",
        "tags": {"type": "list", "value": []},
    }});
    assert!(serializer.load(&dumped, None).unwrap_err().is_invalid_value());
}

#[test]
fn test_missing_member_on_load() {
    let serializer = plain_serializer();
    let dumped = json!({"type": "Pair", "value": {"X": {"type": "string", "value": "a"}}});
    assert!(serializer.load(&dumped, None).unwrap_err().is_invalid_value());
}

#[test]
fn test_missing_member_on_dump() {
    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .member("Z")
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let err = serializer
        .dump(&Value::object(Pair::new("a", "b")), None)
        .unwrap_err();
    assert!(matches!(
        err,
        SerializerError::NotFound { kind: "member", ref key } if key == "Pair.Z"
    ));
}

#[test]
fn test_unregistered_class() {
    let serializer = Serializer::new(Arc::new(CodecTable::with_builtins().unwrap()));
    let err = serializer
        .dump(&Value::object(Pair::new("a", "b")), None)
        .unwrap_err();
    assert!(err.is_not_found());

    let err = serializer
        .load(&json!({"type": "Pair", "value": {}}), None)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_descriptor_without_codec() {
    let table = CodecTable::new();
    table
        .register(TypeDescriptor::builder("Opaque").build())
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let err = serializer
        .dump(&Value::Int(1), Some("Opaque"))
        .unwrap_err();
    assert!(matches!(err, SerializerError::MissingCodec { part: "encoder", .. }));

    let err = serializer
        .load(&json!({"type": "Opaque", "value": 1}), None)
        .unwrap_err();
    assert!(matches!(err, SerializerError::MissingCodec { part: "decoder", .. }));
}

#[test]
fn test_class_without_constructor() {
    let table = CodecTable::new();
    table
        .register(
            TypeDescriptor::builder("Pair")
                .codec(envcodec::codec::ClassCodec)
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let err = serializer
        .load(&json!({"type": "Pair", "value": {}}), None)
        .unwrap_err();
    assert!(matches!(
        err,
        SerializerError::MissingCodec { part: "constructor", .. }
    ));
}

// ============================================================================
// Hooks
// ============================================================================

fn tracer_serializer(fail_on: Option<&'static str>) -> (Serializer, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let table = CodecTable::with_builtins().unwrap();
    register_tracer(&table, log.clone(), fail_on);
    (Serializer::new(Arc::new(table)), log)
}

fn tracer(log: &EventLog, fail_on: Option<&'static str>) -> Value {
    Value::object(Tracer {
        name: "p".to_string(),
        log: log.clone(),
        fail_on,
    })
}

#[test]
fn test_lifecycle_hook_order() {
    let (serializer, log) = tracer_serializer(None);

    let dumped = serializer.dump(&tracer(&log, None), None).unwrap();
    assert_eq!(dumped["value"]["seen"], json!(true));

    let loaded = serializer.load(&dumped, None).unwrap();
    assert_eq!(loaded.downcast_ref::<Tracer>().unwrap().name, "p");

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "before_dump@Tracer",
            "after_dump@Tracer",
            "before_load@Tracer",
            "set:name",
            "after_load@Tracer",
        ]
    );
}

#[test]
fn test_failing_lifecycle_hook_aborts_dump() {
    let (serializer, log) = tracer_serializer(None);
    let err = serializer
        .dump(&tracer(&log, Some("before_dump")), None)
        .unwrap_err();
    assert!(matches!(err, SerializerError::Hook { .. }));
    assert_eq!(*log.lock().unwrap(), vec!["before_dump@Tracer"]);
}

#[test]
fn test_failing_lifecycle_hook_aborts_load() {
    let (serializer, log) = tracer_serializer(Some("after_load"));
    let dumped = json!({"type": "Tracer", "value": {"name": {"type": "string", "value": "p"}}});

    let err = serializer.load(&dumped, None).unwrap_err();
    assert!(matches!(err, SerializerError::Hook { .. }));
    assert_eq!(log.lock().unwrap().last().unwrap(), "after_load@Tracer");
}

#[test]
fn test_descriptor_hooks() {
    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .member("Y")
                .after_dump(|session, _object, descriptor, accumulator| {
                    let current = session.context().current().unwrap();
                    assert_eq!(current.type_name, descriptor.type_name());
                    accumulator.remove("Y");
                    Ok(())
                })
                .before_load(|_session, raw, _descriptor, _object| {
                    assert!(raw.get("Y").is_none());
                    Ok(())
                })
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let dumped = serializer
        .dump(&Value::object(Pair::new("a", "b")), None)
        .unwrap();
    assert_eq!(
        dumped,
        json!({"type": "Pair", "value": {"X": {"type": "string", "value": "a"}}})
    );

    // "Y" is still a declared member
    assert!(serializer.load(&dumped, None).unwrap_err().is_invalid_value());
}

#[test]
fn test_descriptor_after_load_sees_instance() {
    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .after_load(|_session, _raw, _descriptor, object| {
                    let pair = object.downcast_mut::<Pair>().unwrap();
                    pair.y = format!("{}!", pair.x);
                    Ok(())
                })
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let dumped = json!({"type": "Pair", "value": {"X": {"type": "string", "value": "a"}}});
    let loaded = serializer.load(&dumped, None).unwrap();
    assert_eq!(loaded.downcast_ref::<Pair>(), Some(&Pair::new("a", "a!")));
}

#[test]
fn test_failing_descriptor_hook_aborts_dump() {
    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .before_dump(|_session, _object, _descriptor, _accumulator| {
                    Err(SerializerError::hook("before_dump", "refused"))
                })
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let err = serializer
        .dump(&Value::object(Pair::new("a", "b")), None)
        .unwrap_err();
    assert!(matches!(err, SerializerError::Hook { .. }));
}

#[test]
fn test_nested_hooks_see_parent_instance() {
    fn parent_label(session: &Session<'_>) -> Option<String> {
        let parent = session.context().parent()?;
        parent.downcast_ref::<Node>().map(|node| node.label.clone())
    }

    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Node", || Value::object(Node::default()))
                .member("label")
                .member("child")
                .after_dump(|session, _object, _descriptor, accumulator| {
                    if let Some(label) = parent_label(session) {
                        accumulator.insert("parent".to_string(), Json::String(label));
                    }
                    Ok(())
                })
                .after_load(|session, _raw, _descriptor, object| {
                    if let Some(label) = parent_label(session) {
                        let node = object.downcast_mut::<Node>().unwrap();
                        node.label = format!("{label}/{}", node.label);
                    }
                    Ok(())
                })
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let dumped = serializer.dump(&Value::object(Node::chain(2)), None).unwrap();
    assert_eq!(dumped["value"].get("parent"), None);
    assert_eq!(dumped["value"]["child"]["value"]["parent"], json!("1"));

    // The parent's label is assigned before its child member loads.
    let loaded = serializer.load(&dumped, None).unwrap();
    let root = loaded.downcast_ref::<Node>().unwrap();
    assert_eq!(root.label, "1");
    assert_eq!(root.child.as_ref().unwrap().label, "1/0");
}

#[test]
fn test_hooks_dump_and_load_through_session() {
    let table = CodecTable::with_builtins().unwrap();
    table
        .register(
            TypeDescriptor::class("Pair", || Value::object(Pair::default()))
                .member("X")
                .member("Y")
                .after_dump(|session, _object, _descriptor, accumulator| {
                    let count = Value::Int(accumulator.len() as i64);
                    let count = session.dump(&count, None)?;
                    accumulator.insert("count".to_string(), count);
                    Ok(())
                })
                .before_load(|session, raw, descriptor, _object| {
                    let count = session.load(&raw["count"], None)?;
                    if count != Value::Int(descriptor.members().len() as i64) {
                        return Err(SerializerError::hook("before_load", "member count"));
                    }
                    Ok(())
                })
                .build(),
        )
        .unwrap();
    let serializer = Serializer::new(Arc::new(table));

    let pair = Value::object(Pair::new("a", "b"));
    let dumped = serializer.dump(&pair, None).unwrap();
    assert_eq!(dumped["value"]["count"], json!({"type": "int", "value": 2}));
    assert_eq!(serializer.load(&dumped, None).unwrap(), pair);

    let mut tampered = dumped.clone();
    tampered["value"]["count"] = json!({"type": "int", "value": 3});
    let err = serializer.load(&tampered, None).unwrap_err();
    assert!(matches!(err, SerializerError::Hook { .. }));
}

// ============================================================================
// Depth Limit
// ============================================================================

#[test]
fn test_depth_limit_exceeded() {
    let serializer = Serializer::builder(test_table()).max_depth(16).build();
    let err = serializer
        .dump(&Value::object(Node::chain(40)), None)
        .unwrap_err();

    match err {
        SerializerError::DepthExceeded { limit, path } => {
            assert_eq!(limit, 16);
            assert!(path.starts_with("Node.child > Node.child"));
        }
        other => panic!("expected DepthExceeded, got {other}"),
    }
}

#[test]
fn test_depth_limit_on_load() {
    let deep = plain_serializer()
        .dump(&Value::object(Node::chain(40)), None)
        .unwrap();
    let serializer = Serializer::builder(test_table()).max_depth(16).build();
    assert!(matches!(
        serializer.load(&deep, None),
        Err(SerializerError::DepthExceeded { .. })
    ));
}

#[test]
fn test_serializer_usable_after_error() {
    let serializer = Serializer::builder(test_table()).max_depth(16).build();
    assert!(serializer
        .dump(&Value::object(Node::chain(40)), None)
        .is_err());
    round_trip(&serializer, Value::object(Node::chain(3)));
}

#[test]
fn test_shared_serializer_across_threads() {
    let serializer = Arc::new(plain_serializer());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let serializer = serializer.clone();
            std::thread::spawn(move || {
                for i in 0..20 {
                    let value = Value::object(Pair::new(&t.to_string(), &i.to_string()));
                    let dumped = serializer.dump(&value, None).unwrap();
                    assert_eq!(serializer.load(&dumped, None).unwrap(), value);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_explicit_type_overrides_runtime_type() {
    let serializer = plain_serializer();
    let err = serializer
        .dump(&Value::Int(5), Some(TypeKey::FLOAT.as_str()))
        .unwrap_err();
    assert!(err.is_invalid_value());

    let loaded = serializer.load(&Json::from(5), Some("float")).unwrap();
    assert_eq!(loaded, Value::Float(5.0));
}
