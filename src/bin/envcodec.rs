// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Envcodec CLI
//!
//! Command-line tool for packing plain JSON into tagged envelopes and back.
//!
//! ## Usage
//!
//! ```sh
//! # Pack plain JSON into a compressed envelope file
//! envcodec pack data.json data.env --filter compact --filter compress
//!
//! # Unpack it again (same filters)
//! envcodec unpack data.env --filter compact --filter compress
//!
//! # Show payload information and a type histogram
//! envcodec inspect info data.env -f compact -f compress
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{InspectCmd, PackCmd, UnpackCmd};
use common::Result;

/// Envcodec - tagged JSON envelope toolkit
///
/// Pack plain JSON into `{type, value}` envelopes with optional type
/// stripping, compaction and compression, and unpack them again.
#[derive(Parser, Clone)]
#[command(name = "envcodec")]
#[command(about = "Tagged JSON envelope serialization toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Dump a plain JSON file into an envelope file
    Pack(PackCmd),

    /// Load an envelope file and print it as plain JSON
    Unpack(UnpackCmd),

    /// Inspect an envelope file (info, envelope)
    #[command(subcommand)]
    Inspect(InspectCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pack(cmd) => cmd.run(),
        Commands::Unpack(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
