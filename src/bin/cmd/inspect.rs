// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show payload information and stored envelopes.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Subcommand;

use envcodec::filter::COMPRESSION_MARKER;
use envcodec::{Payload, Value};

use crate::common::{format_size, Result, SerializerArgs};

/// Inspect an envelope file.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show payload size, compression and a histogram of value types
    Info {
        /// Envelope file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Type name of the top-level value, required for stripped payloads
        #[arg(short = 't', long = "type", value_name = "NAME")]
        type_name: Option<String>,

        #[command(flatten)]
        serializer: SerializerArgs,
    },

    /// Print the stored envelope JSON after text-level decoding
    Envelope {
        /// Envelope file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        serializer: SerializerArgs,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info {
                input,
                type_name,
                serializer,
            } => cmd_info(input, type_name, serializer),
            InspectCmd::Envelope { input, serializer } => cmd_envelope(input, serializer),
        }
    }
}

/// Cmd: Show payload info
fn cmd_info(input: PathBuf, type_name: Option<String>, args: SerializerArgs) -> Result<()> {
    let serializer = args.serializer()?;
    let bytes = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
    let compressed = bytes.starts_with(COMPRESSION_MARKER);

    println!("=== {} ===", input.display());
    println!("Size: {}", format_size(bytes.len()));
    println!("Compressed: {}", if compressed { "yes" } else { "no" });

    let data = serializer.decode_from_text(Payload::from_bytes(bytes))?;
    if compressed {
        let text_len = serde_json::to_string(&data)?.len();
        println!("Decoded size: {}", format_size(text_len));
    }

    let value = serializer
        .load(&data, type_name.as_deref())
        .with_context(|| format!("loading {}", input.display()))?;
    println!("Top-level type: {}", value.type_key());

    let mut histogram = BTreeMap::new();
    count_types(&value, &mut histogram);

    println!();
    println!("Types:");
    for (name, count) in &histogram {
        println!("  {name}: {count}");
    }

    Ok(())
}

/// Cmd: Print stored envelope
fn cmd_envelope(input: PathBuf, args: SerializerArgs) -> Result<()> {
    let serializer = args.serializer()?;
    let data = serializer
        .load_from_file(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn count_types(value: &Value, histogram: &mut BTreeMap<String, usize>) {
    *histogram.entry(value.type_key().to_string()).or_default() += 1;
    match value {
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
            for item in items {
                count_types(item, histogram);
            }
        }
        Value::Map(entries) => {
            for (key, value) in entries {
                count_types(key, histogram);
                count_types(value, histogram);
            }
        }
        _ => {}
    }
}
