// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tagged `{type, value}` envelope.

use serde::{Deserialize, Serialize};

use super::value::{Json, JsonMap};

/// Envelope key holding the wire type name.
pub const TYPE_FIELD: &str = "type";

/// Envelope key holding the raw value.
pub const VALUE_FIELD: &str = "value";

/// Wire form of one dumped value: `{"type": "<type_name>", "value": <raw>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: Json,
}

impl Envelope {
    pub fn new(type_name: impl Into<String>, value: Json) -> Self {
        Self {
            type_name: type_name.into(),
            value,
        }
    }

    /// Convert to a JSON object.
    pub fn into_json(self) -> Json {
        let mut map = JsonMap::new();
        map.insert(TYPE_FIELD.to_string(), Json::String(self.type_name));
        map.insert(VALUE_FIELD.to_string(), self.value);
        Json::Object(map)
    }

    /// Split `data` into an envelope if it has exactly the envelope shape:
    /// an object with a string `type` and a `value`, and no other keys.
    pub fn from_json(data: &Json) -> Option<Self> {
        let map = data.as_object()?;
        if map.len() != 2 {
            return None;
        }
        let type_name = map.get(TYPE_FIELD)?.as_str()?;
        let value = map.get(VALUE_FIELD)?;
        Some(Self::new(type_name, value.clone()))
    }

    /// Check for the envelope shape without cloning.
    pub fn is_envelope(data: &Json) -> bool {
        data.as_object().is_some_and(|map| {
            map.len() == 2
                && map.get(TYPE_FIELD).is_some_and(Json::is_string)
                && map.contains_key(VALUE_FIELD)
        })
    }
}

impl From<Envelope> for Json {
    fn from(envelope: Envelope) -> Self {
        envelope.into_json()
    }
}
