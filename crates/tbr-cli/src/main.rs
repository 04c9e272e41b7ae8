//! TLS bypass rule manager CLI
//!
//! Command-line front end over `tbr-core`.

mod args;
mod commands;
mod logging;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use args::Args;
use commands::Command;
use settings::Settings;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let Args {
        config,
        rule_file,
        command,
        ..
    } = args;

    // Resolved on demand so commands that need no store work with a broken config
    let settings = || -> Result<Settings> {
        let settings = settings::resolve(config.as_deref(), rule_file.as_deref())?;
        debug!("Using rule file {:?}", settings.store.rule_file);
        Ok(settings)
    };

    match command {
        Command::Init => commands::rules::init(&settings()?.store),
        Command::List(list_args) => commands::rules::list(list_args, &settings()?.store),
        Command::Stats => commands::rules::stats(&settings()?.store),
        Command::Add(add_args) => commands::rules::add(add_args, &settings()?.store),
        Command::Remove(pattern_args) => commands::rules::remove(pattern_args, &settings()?.store),
        Command::Toggle(pattern_args) => commands::rules::toggle(pattern_args, &settings()?.store),
        Command::Reset(reset_args) => commands::rules::reset(reset_args, &settings()?.store),
        Command::Template(template_args) => {
            commands::template::execute(template_args, &settings()?.store)
        }
        Command::Test(test_args) => commands::test::execute(test_args),
        Command::Export(export_args) => commands::transfer::export(export_args, &settings()?.store),
        Command::Import(import_args) => commands::transfer::import(import_args, &settings()?.store),
        Command::Conflicts(conflict_args) => {
            commands::conflicts::execute(conflict_args, &settings()?.store)
        }
        Command::Backups(backup_args) => {
            commands::backups::execute(backup_args, &settings()?.store)
        }
        Command::Config(config_args) => commands::config::execute(config_args, settings),
        Command::Completions(comp_args) => commands::completions::execute(comp_args),
    }
}
