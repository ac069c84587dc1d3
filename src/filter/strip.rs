// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Type-tag stripping stage.

use crate::core::{Envelope, Json, Result};

use super::FilterStage;

/// Replaces every `{type, value}` envelope with its bare value.
///
/// The type tag cannot be restored, so loading stripped data needs an
/// explicit type name at the top level and type hints on class members.
///
/// A stripped value that is itself an object with exactly the keys `type`
/// and `value` (a class with members of those names, or a map) still looks
/// like an envelope. Loading with an explicit type name unwraps it only
/// when its `type` equals that name; otherwise it is the bare value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeTagStripper;

impl FilterStage for TypeTagStripper {
    fn name(&self) -> &str {
        "strip_types"
    }

    fn dump_envelope(&self, envelope: Json) -> Result<Json> {
        Ok(match Envelope::from_json(&envelope) {
            Some(envelope) => envelope.value,
            None => envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_envelope() {
        let stripped = TypeTagStripper
            .dump_envelope(json!({"type": "int", "value": 42}))
            .unwrap();
        assert_eq!(stripped, json!(42));
    }

    #[test]
    fn test_leaves_other_data() {
        assert_eq!(
            TypeTagStripper.dump_envelope(json!("I::42")).unwrap(),
            json!("I::42")
        );
        assert_eq!(
            TypeTagStripper.load_envelope(json!(42)).unwrap(),
            json!(42)
        );
    }
}
