// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File-level dump and load.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::core::{Json, Payload, Result, SerializerError};

use super::Serializer;

fn io_error(action: &str, path: &Path, e: std::io::Error) -> SerializerError {
    SerializerError::Io(format!("failed to {action} {}: {e}", path.display()))
}

impl Serializer {
    /// Encode `json` and write it to `path`.
    ///
    /// Text payloads are written as UTF-8; payloads turned binary by a
    /// filter stage (e.g. compression) are written as raw bytes.
    pub fn dump_to_file(&self, json: &Json, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let payload = self.encode_to_text(json, pretty)?;

        let mut file = File::create(path).map_err(|e| io_error("create", path, e))?;
        file.write_all(payload.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| io_error("write", path, e))?;

        debug!(
            path = %path.display(),
            bytes = payload.len(),
            binary = payload.is_binary(),
            "Wrote payload"
        );
        Ok(())
    }

    /// Read `path` and decode its payload.
    ///
    /// The file is read as text first. If that fails, or the text does not
    /// decode, it is re-read as raw bytes and decoded from those.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<Json> {
        let path = path.as_ref();

        let text_attempt = std::fs::read_to_string(path)
            .map_err(|e| io_error("read", path, e))
            .and_then(|text| self.decode_from_text(Payload::Text(text)));

        match text_attempt {
            Ok(json) => Ok(json),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Text load failed, retrying in binary mode"
                );
                let mut bytes = Vec::new();
                File::open(path)
                    .and_then(|mut file| file.read_to_end(&mut bytes))
                    .map_err(|e| io_error("read", path, e))?;
                self.decode_from_text(Payload::Binary(bytes))
            }
        }
    }
}
