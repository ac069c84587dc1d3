// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Primitive compaction stage.
//!
//! Envelopes whose type has a registered short code are replaced by a
//! single string `"<code>::<literal>"`, e.g. `{"type":"bool","value":true}`
//! becomes `"B::T"`. Types without a code pass through unchanged.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::core::{Envelope, Json, NameRegistry, Result, SerializerError};

use super::FilterStage;

/// Separator between short code and literal.
pub const CODE_SEPARATOR: &str = "::";

/// How a raw value is written after its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// JSON string, written verbatim
    Text,
    /// JSON number text
    Number,
    /// `T` or `F`
    Flag,
    /// Nothing; restores the empty string
    Empty,
    /// Compact JSON text of the raw value
    Json,
}

impl LiteralKind {
    /// Render `raw` as a literal, or `None` if it does not fit this kind.
    pub fn render(&self, raw: &Json) -> Option<String> {
        match (self, raw) {
            (LiteralKind::Text, Json::String(s)) => Some(s.clone()),
            (LiteralKind::Number, Json::Number(n)) => Some(n.to_string()),
            (LiteralKind::Flag, Json::Bool(true)) => Some("T".to_string()),
            (LiteralKind::Flag, Json::Bool(false)) => Some("F".to_string()),
            (LiteralKind::Empty, Json::String(s)) if s.is_empty() => Some(String::new()),
            (LiteralKind::Json, raw) => Some(raw.to_string()),
            _ => None,
        }
    }

    /// Parse a literal back into the raw value.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the literal is malformed for this kind.
    pub fn parse(&self, literal: &str) -> Result<Json> {
        match self {
            LiteralKind::Text => Ok(Json::String(literal.to_string())),
            LiteralKind::Number => match serde_json::from_str::<Json>(literal) {
                Ok(number @ Json::Number(_)) => Ok(number),
                _ => Err(SerializerError::parse(
                    "compacted number",
                    format!("'{literal}' is not a number"),
                )),
            },
            LiteralKind::Flag => match literal {
                "T" => Ok(Json::Bool(true)),
                "F" => Ok(Json::Bool(false)),
                other => Err(SerializerError::parse(
                    "compacted flag",
                    format!("expected 'T' or 'F', got '{other}'"),
                )),
            },
            LiteralKind::Empty => Ok(Json::String(String::new())),
            LiteralKind::Json => serde_json::from_str(literal)
                .map_err(|e| SerializerError::parse("compacted literal", e.to_string())),
        }
    }
}

/// Short code registered for one type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactCode {
    pub code: String,
    pub literal: LiteralKind,
}

/// Registry of short codes, keyed by wire type name.
///
/// Separate from the codec table: a type can be serialized without having
/// a short code. Codes are unique.
pub struct CompactionTable {
    by_type: NameRegistry<String, CompactCode>,
    by_code: NameRegistry<String, String>,
}

impl fmt::Debug for CompactionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactionTable")
            .field("count", &self.by_type.len())
            .finish()
    }
}

impl Default for CompactionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CompactionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            by_type: NameRegistry::new("compacted type"),
            by_code: NameRegistry::new("compaction code"),
        }
    }

    /// Create a table with the default codes for the built-in types.
    pub fn with_builtins() -> Result<Self> {
        let table = Self::new();
        for (type_name, code, literal) in [
            ("string", "S", LiteralKind::Text),
            ("int", "I", LiteralKind::Number),
            ("float", "F", LiteralKind::Number),
            ("bool", "B", LiteralKind::Flag),
            ("null", "N", LiteralKind::Empty),
            ("uuid", "U", LiteralKind::Text),
            ("decimal", "D", LiteralKind::Text),
            ("timestamp", "T", LiteralKind::Text),
            ("list", "LI", LiteralKind::Json),
            ("tuple", "TU", LiteralKind::Json),
            ("map", "DI", LiteralKind::Json),
            ("set", "SE", LiteralKind::Json),
        ] {
            table.register(type_name, code, literal)?;
        }
        Ok(table)
    }

    /// Register a short code for `type_name`.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if the code is empty or contains `::`
    /// - `Duplicate` if the type or the code is already registered
    pub fn register(&self, type_name: &str, code: &str, literal: LiteralKind) -> Result<()> {
        if code.is_empty() || code.contains(CODE_SEPARATOR) {
            return Err(SerializerError::invalid_value(
                "compaction code",
                format!("'{code}' must be non-empty and must not contain '{CODE_SEPARATOR}'"),
            ));
        }

        let entry = CompactCode {
            code: code.to_string(),
            literal,
        };
        self.by_type
            .insert_with(type_name.to_string(), entry, |type_name, entry| {
                self.by_code.insert(entry.code.clone(), type_name.clone())
            })?;
        debug!("Registered compaction code '{}' for '{}'", code, type_name);
        Ok(())
    }

    /// Remove the short code of `type_name`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the type has no code.
    pub fn unregister(&self, type_name: &str) -> Result<CompactCode> {
        let removed = self
            .by_type
            .remove_with(&type_name.to_string(), |_, entry| {
                self.by_code.remove(&entry.code).map(drop)
            })?;
        debug!("Unregistered compaction code '{}'", removed.code);
        Ok(removed)
    }

    /// Short code registered for a type name.
    pub fn code_for(&self, type_name: &str) -> Option<CompactCode> {
        self.by_type.get(&type_name.to_string()).ok()
    }

    /// Type name and literal kind registered under a code.
    pub fn type_for(&self, code: &str) -> Option<(String, LiteralKind)> {
        let type_name = self.by_code.get(&code.to_string()).ok()?;
        let entry = self.by_type.get(&type_name).ok()?;
        Some((type_name, entry.literal))
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Filter stage compacting envelopes of registered types.
#[derive(Debug, Clone)]
pub struct PrimitiveCompactor {
    table: Arc<CompactionTable>,
}

impl PrimitiveCompactor {
    pub fn new(table: Arc<CompactionTable>) -> Self {
        Self { table }
    }

    /// Compactor using the default built-in codes.
    pub fn with_builtins() -> Result<Self> {
        Ok(Self::new(Arc::new(CompactionTable::with_builtins()?)))
    }

    pub fn table(&self) -> &Arc<CompactionTable> {
        &self.table
    }
}

impl FilterStage for PrimitiveCompactor {
    fn name(&self) -> &str {
        "compact"
    }

    fn dump_envelope(&self, envelope: Json) -> Result<Json> {
        let Some(parts) = Envelope::from_json(&envelope) else {
            return Ok(envelope);
        };
        let Some(entry) = self.table.code_for(&parts.type_name) else {
            return Ok(envelope);
        };
        Ok(match entry.literal.render(&parts.value) {
            Some(literal) => Json::String(format!("{}{CODE_SEPARATOR}{literal}", entry.code)),
            None => envelope,
        })
    }

    fn load_envelope(&self, data: Json) -> Result<Json> {
        let Json::String(text) = &data else {
            return Ok(data);
        };
        let Some((code, literal)) = text.split_once(CODE_SEPARATOR) else {
            return Ok(data);
        };
        let Some((type_name, kind)) = self.table.type_for(code) else {
            return Ok(data);
        };
        Ok(Envelope::new(type_name, kind.parse(literal)?).into_json())
    }
}
