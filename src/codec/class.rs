// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generic member-wise codec for user classes.
//!
//! Dumping a class produces a JSON object with one entry per declared
//! member, each entry holding the member's own envelope. Loading constructs
//! a fresh instance and assigns each member from its envelope.
//!
//! Hook order on dump:
//! descriptor `before_dump`, object `on_before_class_dump`, members,
//! object `on_after_class_dump`, descriptor `after_dump`.
//!
//! Hook order on load:
//! descriptor `before_load`, object `on_before_class_load`, members,
//! object `on_after_class_load`, descriptor `after_load`.

use tracing::trace;

use crate::core::{Json, JsonMap, Object, Result, SerializerError, Value};
use crate::serializer::{Frame, Phase, Session};

use super::descriptor::{Codec, TypeDescriptor};

/// Codec installed by [`TypeDescriptor::class`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassCodec;

impl Codec for ClassCodec {
    fn encode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        value: &Value,
    ) -> Result<Json> {
        let Value::Object(object) = value else {
            return Err(SerializerError::invalid_value(
                descriptor.type_name(),
                format!("expected a class instance, got {}", value.type_key()),
            ));
        };

        session
            .context_mut()
            .push(descriptor.type_name(), Phase::Dump, object.clone());
        let result = dump_members(session, descriptor, object.as_ref());
        session.context_mut().pop();

        result.map(Json::Object)
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        descriptor: &TypeDescriptor,
        raw: &Json,
    ) -> Result<Value> {
        let Value::Object(object) = descriptor.construct()? else {
            return Err(SerializerError::invalid_value(
                descriptor.type_name(),
                "constructor did not return a class instance",
            ));
        };

        if !raw.is_object() {
            return Err(SerializerError::invalid_value(
                descriptor.type_name(),
                format!("expected a member map, got {raw}"),
            ));
        }

        // The frame owns the instance while its members load, so nested
        // classes can reach it as their parent.
        session
            .context_mut()
            .push(descriptor.type_name(), Phase::Load, object);
        let result = load_members(session, descriptor, raw);
        let object = session.context_mut().pop().and_then(Frame::into_object);

        result?;
        object.map(Value::Object).ok_or_else(|| {
            SerializerError::invalid_value(descriptor.type_name(), "instance lost during load")
        })
    }
}

fn dump_members(
    session: &mut Session<'_>,
    descriptor: &TypeDescriptor,
    object: &dyn Object,
) -> Result<JsonMap> {
    let mut accumulator = JsonMap::new();

    if let Some(hook) = &descriptor.hooks().before_dump {
        hook(session, object, descriptor, &mut accumulator)?;
    }
    object.on_before_class_dump(session, descriptor, &mut accumulator)?;

    for member in descriptor.members() {
        session.context_mut().set_member(&member.name);
        let value = object.get_member(&member.name).ok_or_else(|| {
            SerializerError::not_found(
                "member",
                format!("{}.{}", descriptor.type_name(), member.name),
            )
        })?;
        let dumped = session.dump(&value, member.type_hint.as_deref())?;
        accumulator.insert(member.name.clone(), dumped);
    }

    object.on_after_class_dump(session, descriptor, &mut accumulator)?;
    if let Some(hook) = &descriptor.hooks().after_dump {
        hook(session, object, descriptor, &mut accumulator)?;
    }

    trace!(
        type_name = descriptor.type_name(),
        members = accumulator.len(),
        "Dumped class"
    );
    Ok(accumulator)
}

fn load_members(
    session: &mut Session<'_>,
    descriptor: &TypeDescriptor,
    raw: &Json,
) -> Result<()> {
    if let Some(hook) = &descriptor.hooks().before_load {
        with_instance(session, |session, object| {
            hook(session, raw, descriptor, object)
        })?;
    }
    with_instance(session, |session, object| {
        object.on_before_class_load(session, descriptor, raw)
    })?;

    for member in descriptor.members() {
        session.context_mut().set_member(&member.name);
        let data = raw.get(&member.name).unwrap_or(&Json::Null);
        let value = session.load(data, member.type_hint.as_deref())?;
        with_instance(session, |_, object| object.set_member(&member.name, value))?;
    }

    with_instance(session, |session, object| {
        object.on_after_class_load(session, descriptor, raw)
    })?;
    if let Some(hook) = &descriptor.hooks().after_load {
        with_instance(session, |session, object| {
            hook(session, raw, descriptor, object)
        })?;
    }

    trace!(type_name = descriptor.type_name(), "Loaded class");
    Ok(())
}

/// Lend the instance of the current frame to `f` next to the session.
fn with_instance<'a, T>(
    session: &mut Session<'a>,
    f: impl FnOnce(&mut Session<'a>, &mut dyn Object) -> Result<T>,
) -> Result<T> {
    let mut object = session.context_mut().take_object().ok_or_else(|| {
        SerializerError::invalid_value(session.context().path(), "no instance in progress")
    })?;
    let result = f(session, object.as_mut());
    session.context_mut().restore_object(object);
    result
}
