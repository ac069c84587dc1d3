// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for envcodec.
//!
//! One error enum covers the whole engine:
//! - Registry lookups and mutations (`NotFound`, `Duplicate`)
//! - Malformed or absent dumped data (`InvalidValue`, `Parse`)
//! - Incomplete type descriptors (`MissingCodec`)
//! - Filter stages and user hooks (`Compression`, `Hook`)
//! - Runaway recursion (`DepthExceeded`)

/// Errors that can occur while registering, dumping or loading values.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SerializerError {
    /// Key, type or name not present in a registry
    #[error("{kind} not found: '{key}'")]
    NotFound {
        /// What kind of entry was looked up (e.g. "type", "type name")
        kind: &'static str,
        /// The missing key
        key: String,
    },

    /// Key already present in a registry
    #[error("{kind} already registered: '{key}'")]
    Duplicate {
        /// What kind of entry was inserted
        kind: &'static str,
        /// The duplicated key
        key: String,
    },

    /// Dumped data is absent, malformed or of the wrong shape
    #[error("Invalid value in {context}: {message}")]
    InvalidValue {
        /// Where the bad value was encountered
        context: String,
        /// Error message
        message: String,
    },

    /// A descriptor lacks the constructor, encoder or decoder a call needs
    #[error("Type '{type_name}' has no {part}")]
    MissingCodec {
        /// Wire name of the incomplete type
        type_name: String,
        /// Which part is missing ("constructor", "encoder", "decoder")
        part: &'static str,
    },

    /// Text could not be parsed (JSON, literals, timestamps, ...)
    #[error("Parse error in {context}: {message}")]
    Parse {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Payload compression or decompression failed
    #[error("{method} compression error: {message}")]
    Compression {
        /// Compression method name
        method: String,
        /// Error message
        message: String,
    },

    /// A registry or lifecycle hook returned an error
    #[error("Hook '{hook}' failed: {message}")]
    Hook {
        /// Hook name
        hook: String,
        /// Error message
        message: String,
    },

    /// Object graph nested deeper than the configured limit
    #[error("Nesting depth limit {limit} exceeded at '{path}'")]
    DepthExceeded {
        /// Configured limit
        limit: usize,
        /// Type path of the context stack, outermost first
        path: String,
    },

    /// I/O failure while reading or writing a payload
    #[error("IO error: {0}")]
    Io(String),
}

impl SerializerError {
    /// Create a "not found" error.
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        SerializerError::NotFound {
            kind,
            key: key.into(),
        }
    }

    /// Create a "duplicate" error.
    pub fn duplicate(kind: &'static str, key: impl Into<String>) -> Self {
        SerializerError::Duplicate {
            kind,
            key: key.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(context: impl Into<String>, message: impl Into<String>) -> Self {
        SerializerError::InvalidValue {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a missing codec part error.
    pub fn missing_codec(type_name: impl Into<String>, part: &'static str) -> Self {
        SerializerError::MissingCodec {
            type_name: type_name.into(),
            part,
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        SerializerError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a compression error.
    pub fn compression(method: impl Into<String>, message: impl Into<String>) -> Self {
        SerializerError::Compression {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create a hook failure error.
    pub fn hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        SerializerError::Hook {
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SerializerError::NotFound { .. })
    }

    /// Check if this is a "duplicate" error.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, SerializerError::Duplicate { .. })
    }

    /// Check if this is a value-class error (absent or malformed data).
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, SerializerError::InvalidValue { .. })
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            SerializerError::NotFound { kind, key } | SerializerError::Duplicate { kind, key } => {
                vec![("kind", kind.to_string()), ("key", key.clone())]
            }
            SerializerError::InvalidValue { context, message }
            | SerializerError::Parse { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            SerializerError::MissingCodec { type_name, part } => {
                vec![("type", type_name.clone()), ("part", part.to_string())]
            }
            SerializerError::Compression { method, message } => {
                vec![("method", method.clone()), ("message", message.clone())]
            }
            SerializerError::Hook { hook, message } => {
                vec![("hook", hook.clone()), ("message", message.clone())]
            }
            SerializerError::DepthExceeded { limit, path } => {
                vec![("limit", limit.to_string()), ("path", path.clone())]
            }
            SerializerError::Io(msg) => vec![("message", msg.clone())],
        }
    }
}

impl From<std::io::Error> for SerializerError {
    fn from(err: std::io::Error) -> Self {
        SerializerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SerializerError {
    fn from(err: serde_json::Error) -> Self {
        SerializerError::parse("json", err.to_string())
    }
}

/// Result type for envcodec operations.
pub type Result<T> = std::result::Result<T, SerializerError>;
