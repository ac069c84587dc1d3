// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Payload compression stage.
//!
//! Compressed payloads are the 4-byte marker `ZIP!` followed by the
//! compressed text. The marker does not record the method, so the dumping
//! and loading side must be configured with the same one.

use std::io::Read;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Payload, Result, SerializerError};

use super::FilterStage;

/// Prefix of every compressed payload.
pub const COMPRESSION_MARKER: &[u8; 4] = b"ZIP!";

/// Default zstd compression level.
pub const DEFAULT_LEVEL: i32 = 3;

/// Compression algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    #[default]
    Zstd,
    Lz4,
    Bzip2,
    Zlib,
}

impl CompressionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMethod::Zstd => "zstd",
            CompressionMethod::Lz4 => "lz4",
            CompressionMethod::Bzip2 => "bzip2",
            CompressionMethod::Zlib => "zlib",
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionMethod {
    type Err = SerializerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zstd" | "zst" => Ok(CompressionMethod::Zstd),
            "lz4" => Ok(CompressionMethod::Lz4),
            "bzip2" | "bz2" => Ok(CompressionMethod::Bzip2),
            "zlib" => Ok(CompressionMethod::Zlib),
            other => Err(SerializerError::invalid_value(
                "compression method",
                format!("unknown method '{other}', expected 'zstd', 'lz4', 'bzip2' or 'zlib'"),
            )),
        }
    }
}

/// Compresses the encoded text behind the `ZIP!` marker.
#[derive(Debug, Clone, Copy)]
pub struct PayloadCompressor {
    method: CompressionMethod,
    level: i32,
}

impl Default for PayloadCompressor {
    fn default() -> Self {
        Self::new(CompressionMethod::default(), DEFAULT_LEVEL)
    }
}

impl PayloadCompressor {
    /// `level` applies to zstd (1..=22), bzip2 (clamped to 1..=9) and zlib
    /// (clamped to 0..=9); lz4 ignores it.
    pub fn new(method: CompressionMethod, level: i32) -> Self {
        Self { method, level }
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    fn error(&self, e: impl std::fmt::Display) -> SerializerError {
        SerializerError::compression(self.method.as_str(), e.to_string())
    }

    /// Compress raw bytes (without marker).
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.method {
            CompressionMethod::Zstd => {
                zstd::bulk::compress(data, self.level).map_err(|e| self.error(e))
            }
            CompressionMethod::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
            CompressionMethod::Bzip2 => {
                use bzip2::Compression;
                use bzip2::read::BzEncoder;

                let level = self.level.clamp(1, 9) as u32;
                let mut encoder = BzEncoder::new(data, Compression::new(level));
                let mut out = Vec::new();
                encoder.read_to_end(&mut out).map_err(|e| self.error(e))?;
                Ok(out)
            }
            CompressionMethod::Zlib => {
                use flate2::Compression;
                use flate2::read::ZlibEncoder;

                let level = self.level.clamp(0, 9) as u32;
                let mut encoder = ZlibEncoder::new(data, Compression::new(level));
                let mut out = Vec::new();
                encoder.read_to_end(&mut out).map_err(|e| self.error(e))?;
                Ok(out)
            }
        }
    }

    /// Decompress raw bytes (without marker).
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self.method {
            CompressionMethod::Zstd => zstd::stream::decode_all(data).map_err(|e| self.error(e)),
            CompressionMethod::Lz4 => {
                lz4_flex::decompress_size_prepended(data).map_err(|e| self.error(e))
            }
            CompressionMethod::Bzip2 => {
                use bzip2::read::BzDecoder;

                let mut decoder = BzDecoder::new(data);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(|e| self.error(e))?;
                Ok(out)
            }
            CompressionMethod::Zlib => {
                use flate2::read::ZlibDecoder;

                let mut decoder = ZlibDecoder::new(data);
                let mut out = Vec::new();
                decoder.read_to_end(&mut out).map_err(|e| self.error(e))?;
                Ok(out)
            }
        }
    }
}

impl FilterStage for PayloadCompressor {
    fn name(&self) -> &str {
        "compress"
    }

    fn dump_text(&self, payload: Payload) -> Result<Payload> {
        let input = payload.as_bytes();
        let compressed = self.compress(input)?;
        trace!(
            method = self.method.as_str(),
            original = input.len(),
            compressed = compressed.len(),
            "Compressed payload"
        );

        let mut out = Vec::with_capacity(COMPRESSION_MARKER.len() + compressed.len());
        out.extend_from_slice(COMPRESSION_MARKER);
        out.extend_from_slice(&compressed);
        Ok(Payload::Binary(out))
    }

    fn load_text(&self, payload: Payload) -> Result<Payload> {
        if !payload.as_bytes().starts_with(COMPRESSION_MARKER) {
            return Ok(payload);
        }
        let decompressed = self.decompress(&payload.as_bytes()[COMPRESSION_MARKER.len()..])?;
        Ok(Payload::from_bytes(decompressed))
    }
}
