//! Export and import commands

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tbr_core::codec::export_filename;
use tbr_core::{Codec, Format, StoreConfig};
use tracing::info;

use super::open_store;

/// Export command arguments
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Format: txt, json, yaml or burp
    pub format: String,

    /// Output file, `-` for stdout (default: timestamped file in the working directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Import command arguments
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Format: txt, json or yaml
    pub format: String,

    /// File to import
    pub file: PathBuf,
}

fn parse_format(name: &str) -> Result<Format> {
    name.parse::<Format>().with_context(|| {
        let names: Vec<_> = Format::ALL.iter().map(|f| f.name()).collect();
        format!("Expected one of: {}", names.join(", "))
    })
}

/// Execute export command
pub fn export(args: ExportArgs, config: &StoreConfig) -> Result<()> {
    let format = parse_format(&args.format)?;
    let store = open_store(config)?;
    let content = Codec::new(&store)
        .export(format)
        .with_context(|| format!("Failed to export {}", format.description()))?;

    match args.output {
        Some(ref path) if path.as_os_str() == "-" => {
            print!("{}", content);
        }
        output => {
            let path = output.unwrap_or_else(|| PathBuf::from(export_filename(format)));
            std::fs::write(&path, &content)
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            info!("Exported {} to {:?}", format, path);
            println!(
                "{} Exported {} to {}",
                "✓".green(),
                format.description(),
                path.display().to_string().cyan()
            );
        }
    }

    Ok(())
}

/// Execute import command
pub fn import(args: ImportArgs, config: &StoreConfig) -> Result<()> {
    let format = parse_format(&args.format)?;
    if !format.can_import() {
        anyhow::bail!("{} is export-only", format.description());
    }

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {:?}", args.file))?;

    let store = open_store(config)?;
    let summary = Codec::new(&store)
        .import(format, &content)
        .with_context(|| format!("Failed to import {:?}", args.file))?;

    println!("{} {}", "✓".green(), summary);
    Ok(())
}
