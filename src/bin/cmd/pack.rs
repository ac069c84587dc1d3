// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pack command - dump plain JSON into an envelope file.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use envcodec::Json;

use crate::common::{format_size, json_to_value, Result, SerializerArgs};

/// Dump a plain JSON file into an envelope file.
#[derive(Args, Clone, Debug)]
pub struct PackCmd {
    /// Plain JSON input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Envelope output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pretty-print the JSON text (before any compression)
    #[arg(long)]
    pretty: bool,

    #[command(flatten)]
    serializer: SerializerArgs,
}

impl PackCmd {
    pub fn run(self) -> Result<()> {
        let serializer = self.serializer.serializer()?;

        let text = std::fs::read_to_string(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))?;
        let plain: Json = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", self.input.display()))?;

        let envelope = serializer.dump(&json_to_value(&plain), None)?;
        let pretty = self.pretty || serializer.pretty();
        serializer
            .dump_to_file(&envelope, &self.output, pretty)
            .with_context(|| format!("writing {}", self.output.display()))?;

        let written = std::fs::metadata(&self.output).map(|m| m.len()).unwrap_or(0);
        println!(
            "Packed {} -> {} ({}, filters: {})",
            self.input.display(),
            self.output.display(),
            format_size(written as usize),
            describe_filters(&serializer.pipeline().names()),
        );
        Ok(())
    }
}

fn describe_filters(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
