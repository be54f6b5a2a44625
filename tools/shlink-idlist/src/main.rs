// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! shlink-idlist - Encode, decode and size shell item ID list fragments
//!
//! # Examples
//!
//! ```bash
//! # Two items, the second empty
//! shlink-idlist encode 0102 -
//!
//! # Inspect a fragment
//! shlink-idlist decode 02000200010200000000
//! shlink-idlist decode --input fragment.bin
//!
//! # Check a list against the 65535-byte limit
//! shlink-idlist size 1f50 2f433a5c
//! ```

mod hexfmt;

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use shlink::{IdList, StreamBuffer, MAX_ENCODED_SIZE};
use shlink_com::LogLevel;

/// Shell item ID list fragment tool
#[derive(Parser, Debug)]
#[command(name = "shlink-idlist")]
#[command(about = "Encode, decode and size shell item ID list fragments")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format for byte strings
    #[arg(short, long, value_enum, default_value = "plain", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode items into a fragment
    Encode {
        /// Items as hex, `-` for an empty item
        #[arg(value_name = "HEX_ITEM")]
        items: Vec<String>,
    },

    /// Decode a fragment and list its items
    Decode {
        /// Fragment as hex
        #[arg(value_name = "HEX", required_unless_present = "input")]
        fragment: Option<String>,

        /// Read the raw fragment from a file instead
        #[arg(short, long, value_name = "FILE", conflicts_with = "fragment")]
        input: Option<PathBuf>,
    },

    /// Print the encoded size of a list
    Size {
        /// Items as hex, `-` for an empty item
        #[arg(value_name = "HEX_ITEM")]
        items: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Plain,
    Hexdump,
}

fn main() {
    let cli = Cli::parse();
    let _ = shlink_com::logging::init_env(LogLevel::Warn.raised(cli.verbose));

    if let Err(e) = run(&cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Encode { items } => cmd_encode(&parse_items(items)?, cli.format),
        Commands::Decode { fragment, input } => {
            let bytes = match (fragment, input) {
                (_, Some(path)) => std::fs::read(path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                (Some(text), None) => hexfmt::parse(text)?,
                (None, None) => anyhow::bail!("no fragment given"),
            };
            cmd_decode(&bytes, cli.format)
        }
        Commands::Size { items } => cmd_size(&parse_items(items)?),
    }
}

fn parse_items(items: &[String]) -> anyhow::Result<IdList> {
    items
        .iter()
        .enumerate()
        .map(|(i, text)| hexfmt::parse(text).with_context(|| format!("item {}", i + 1)))
        .collect()
}

fn cmd_encode(list: &IdList, format: OutputFormat) -> anyhow::Result<()> {
    let fragment = list.encode().context("cannot encode list")?;
    log::debug!("encoded {} items into {} bytes", list.len(), fragment.len());

    // Same path a persisting object takes: chunked writes into a stream buffer
    let mut stream = StreamBuffer::with_capacity(fragment.len());
    stream.write_all(&fragment)?;
    let bytes = stream.into_bytes();

    print_bytes(&bytes, format);
    Ok(())
}

fn cmd_decode(bytes: &[u8], format: OutputFormat) -> anyhow::Result<()> {
    let (list, used) = IdList::decode(bytes).context("cannot decode fragment")?;

    println!("{} {}", "items:".bold(), list.len());
    for (i, item) in list.iter().enumerate() {
        println!("  [{}] {} bytes", i, item.len());
        if !item.is_empty() {
            match format {
                OutputFormat::Plain => println!("      {}", hexfmt::encode(item)),
                OutputFormat::Hexdump => {
                    for line in hexfmt::dump(item).lines() {
                        println!("      {line}");
                    }
                }
            }
        }
    }

    if used < bytes.len() {
        println!(
            "{}",
            format!("{} trailing bytes after terminator", bytes.len() - used).yellow()
        );
    }
    Ok(())
}

fn cmd_size(list: &IdList) -> anyhow::Result<()> {
    let size = list.size();
    if size <= MAX_ENCODED_SIZE {
        println!("{} {} bytes ({} items)", "[OK]".green().bold(), size, list.len());
    } else {
        println!(
            "{} {} bytes ({} items), limit is {}",
            "[TOO LARGE]".red().bold(),
            size,
            list.len(),
            MAX_ENCODED_SIZE
        );
    }
    Ok(())
}

fn print_bytes(bytes: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Plain => println!("{}", hexfmt::encode(bytes)),
        OutputFormat::Hexdump => print!("{}", hexfmt::dump(bytes)),
    }
}
