// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoded payload passed through text-level filter stages.

use super::error::{Result, SerializerError};

/// Serialized output: JSON text, or raw bytes once a stage has turned it
/// into a binary form (e.g. compression).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    /// Wrap bytes as text when they are valid UTF-8, else as binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Payload::Text(text),
            Err(e) => Payload::Binary(e.into_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.into_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    /// Get the payload as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if a binary payload is not valid UTF-8.
    pub fn into_text(self) -> Result<String> {
        match self {
            Payload::Text(text) => Ok(text),
            Payload::Binary(bytes) => String::from_utf8(bytes)
                .map_err(|e| SerializerError::parse("payload", e.to_string())),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Payload::Binary(_))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Binary(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Binary(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_to_text() {
        let payload = Payload::from(b"{}".to_vec());
        assert!(payload.is_binary());
        assert_eq!(payload.into_text().unwrap(), "{}");

        let invalid = Payload::Binary(vec![0xff, 0xfe]);
        assert!(matches!(
            invalid.into_text(),
            Err(SerializerError::Parse { .. })
        ));
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(Payload::from_bytes(b"[1]".to_vec()), Payload::Text("[1]".into()));
        assert_eq!(
            Payload::from_bytes(vec![b'Z', 0xff]),
            Payload::Binary(vec![b'Z', 0xff])
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(Payload::from("abc").len(), 3);
        assert!(Payload::Binary(Vec::new()).is_empty());
    }
}
