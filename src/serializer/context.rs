// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-call serialization context.
//!
//! Every top-level dump or load owns one [`SerializationContext`]. It records
//! the class instances currently being encoded or decoded, innermost first,
//! and the overall nesting depth so runaway (e.g. cyclic) graphs fail fast.
//!
//! On dump a frame holds a snapshot of the object being written. On load it
//! holds the instance being populated, with every member assigned so far.

use std::fmt;

use crate::core::{Object, Result, SerializerError};

/// Default nesting limit for one dump or load.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Direction of the call a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Dump,
    Load,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Dump => write!(f, "dump"),
            Phase::Load => write!(f, "load"),
        }
    }
}

/// One class in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Wire name of the class
    pub type_name: String,
    /// Member currently being processed, if any
    pub member: Option<String>,
    pub phase: Phase,
    object: Option<Box<dyn Object>>,
}

impl Frame {
    /// The instance of this frame.
    ///
    /// `None` only while the instance itself is being handed to one of its
    /// own load hooks or `set_member`.
    pub fn object(&self) -> Option<&dyn Object> {
        self.object.as_deref()
    }

    /// The instance of this frame as a concrete type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.object()?.downcast_ref::<T>()
    }

    pub(crate) fn into_object(self) -> Option<Box<dyn Object>> {
        self.object
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}.{}", self.type_name, member),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// Stack of in-progress classes for a single dump or load call.
#[derive(Debug, Clone)]
pub struct SerializationContext {
    frames: Vec<Frame>,
    nesting: usize,
    max_depth: usize,
}

impl SerializationContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            nesting: 0,
            max_depth,
        }
    }

    /// The class currently being processed.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// The class that contains the current one.
    pub fn parent(&self) -> Option<&Frame> {
        self.get(1)
    }

    /// Get a frame by distance from the innermost (0 = current, 1 = parent).
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.iter().rev().nth(index)
    }

    /// Number of class frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of nested dump/load calls in progress, classes or not.
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.nesting == 0
    }

    /// Frames joined outermost first, e.g. `Order.lines > Line.price`.
    pub fn path(&self) -> String {
        self.frames
            .iter()
            .map(Frame::to_string)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    pub(crate) fn push(&mut self, type_name: &str, phase: Phase, object: Box<dyn Object>) {
        self.frames.push(Frame {
            type_name: type_name.to_string(),
            member: None,
            phase,
            object: Some(object),
        });
    }

    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Take the current frame's instance out so it can be borrowed mutably
    /// next to the session.
    pub(crate) fn take_object(&mut self) -> Option<Box<dyn Object>> {
        self.frames.last_mut()?.object.take()
    }

    pub(crate) fn restore_object(&mut self, object: Box<dyn Object>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.object = Some(object);
        }
    }

    pub(crate) fn set_member(&mut self, member: &str) {
        if let Some(frame) = self.frames.last_mut() {
            frame.member = Some(member.to_string());
        }
    }

    /// Enter one nested dump/load call.
    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.nesting >= self.max_depth {
            return Err(SerializerError::DepthExceeded {
                limit: self.max_depth,
                path: self.path(),
            });
        }
        self.nesting += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
