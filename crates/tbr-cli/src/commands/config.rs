//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tbr_core::StoreConfig;
use tracing::info;

use crate::settings::{self, Settings};

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Generate {
        /// Output file path
        #[arg(short, long, default_value = settings::LOCAL_CONFIG)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },

    /// Show config file locations
    Paths,
}

/// Execute config command
///
/// `settings` is only resolved by the actions that report the active
/// configuration, so a broken config file can still be regenerated or checked.
pub fn execute(args: ConfigArgs, settings: impl FnOnce() -> Result<Settings>) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(&settings()?),
        ConfigAction::Generate { output, force } => generate_config(output, force),
        ConfigAction::Validate { file } => validate_config(file),
        ConfigAction::Paths => show_paths(settings()),
    }
}

fn show_config(settings: &Settings) -> Result<()> {
    match settings.source {
        Some(ref path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in defaults"),
    }

    let toml_str = settings
        .store
        .to_toml()
        .context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

fn generate_config(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!("{:?} already exists, pass --force to overwrite", output);
    }

    let toml_str = StoreConfig::default()
        .to_toml()
        .context("Failed to serialize config")?;

    let content = format!(
        "# TLS bypass rule manager configuration\n\
         # Relative paths are resolved from the working directory\n\n\
         {}",
        toml_str
    );

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    info!("Generated config file: {:?}", output);
    println!("Configuration file generated: {}", output.display());
    Ok(())
}

fn validate_config(file: PathBuf) -> Result<()> {
    let config = StoreConfig::load(&file)
        .with_context(|| format!("Failed to load config from {:?}", file))?;

    config.validate().context("Configuration validation failed")?;

    println!("{} Configuration is valid", "✓".green());
    println!("  Rule file: {}", config.rule_file.display());
    println!("  Sync file: {}", config.sync_file.display());
    println!("  Backup dir: {}", config.backup_dir.display());
    println!("  Backup retention: {}", config.backup_retention);
    Ok(())
}

fn show_paths(settings: Result<Settings>) -> Result<()> {
    println!("Configuration file search paths:");
    println!();
    for (i, path) in settings::candidates().iter().enumerate() {
        let marker = if path.exists() { " (found)".green() } else { "".normal() };
        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    println!();
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            println!("{} Active configuration unavailable: {:#}", "✗".red(), e);
            return Ok(());
        }
    };
    println!("Active files:");
    println!();
    println!("  Rule file:  {}", settings.store.rule_file.display());
    println!("  Sync file:  {}", settings.store.sync_file.display());
    println!("  Backup dir: {}", settings.store.backup_dir.display());
    Ok(())
}
