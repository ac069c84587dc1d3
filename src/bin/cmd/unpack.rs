// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Unpack command - load an envelope file back into plain JSON.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::common::{value_to_json, Result, SerializerArgs};

/// Load an envelope file and print it as plain JSON.
#[derive(Args, Clone, Debug)]
pub struct UnpackCmd {
    /// Envelope input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write plain JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Type name of the top-level value, required for stripped payloads
    #[arg(short = 't', long = "type", value_name = "NAME")]
    type_name: Option<String>,

    #[command(flatten)]
    serializer: SerializerArgs,
}

impl UnpackCmd {
    pub fn run(self) -> Result<()> {
        let serializer = self.serializer.serializer()?;

        let data = serializer
            .load_from_file(&self.input)
            .with_context(|| format!("reading {}", self.input.display()))?;
        let value = serializer
            .load(&data, self.type_name.as_deref())
            .with_context(|| format!("loading {}", self.input.display()))?;
        let text = serde_json::to_string_pretty(&value_to_json(&value)?)?;

        match self.output {
            Some(path) => std::fs::write(&path, text + "\n")
                .with_context(|| format!("writing {}", path.display()))?,
            None => println!("{text}"),
        }
        Ok(())
    }
}
