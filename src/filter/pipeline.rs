// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Ordered list of filter stages.

use std::fmt;
use std::sync::Arc;

use crate::core::{Json, Payload, Result};

use super::FilterStage;

/// Filter stages applied in sequence.
///
/// Stages are applied in the order they were added, for dumps and loads
/// alike. Each stage receives the output of the previous one.
///
/// # Example
///
/// ```
/// use envcodec::filter::{FilterPipeline, PayloadCompressor, TypeTagStripper};
///
/// let mut pipeline = FilterPipeline::new();
/// pipeline.add_stage(TypeTagStripper);
/// pipeline.add_stage(PayloadCompressor::default());
/// assert_eq!(pipeline.names(), vec!["strip_types", "compress"]);
/// ```
#[derive(Clone, Default)]
pub struct FilterPipeline {
    stages: Vec<Arc<dyn FilterStage>>,
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("stages", &self.names())
            .finish()
    }
}

impl FilterPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    pub fn add_stage(&mut self, stage: impl FilterStage + 'static) {
        self.stages.push(Arc::new(stage));
    }

    /// Append an already shared stage.
    pub fn add_shared(&mut self, stage: Arc<dyn FilterStage>) {
        self.stages.push(stage);
    }

    /// Get the number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn dump_envelope(&self, envelope: Json) -> Result<Json> {
        self.stages
            .iter()
            .try_fold(envelope, |current, stage| stage.dump_envelope(current))
    }

    pub fn load_envelope(&self, data: Json) -> Result<Json> {
        self.stages
            .iter()
            .try_fold(data, |current, stage| stage.load_envelope(current))
    }

    pub fn dump_text(&self, payload: Payload) -> Result<Payload> {
        self.stages
            .iter()
            .try_fold(payload, |current, stage| stage.dump_text(current))
    }

    pub fn load_text(&self, payload: Payload) -> Result<Payload> {
        self.stages
            .iter()
            .try_fold(payload, |current, stage| stage.load_text(current))
    }
}
