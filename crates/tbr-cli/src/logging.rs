//! Logging initialization
//!
//! Log output goes to stderr so command output on stdout stays pipeable.

use anyhow::{Context, Result};
use std::io;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::{Args, LogFormat};

/// Log level selected by `-q` and `-v`
pub fn level(quiet: bool, verbose: u8) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize logging based on CLI arguments
pub fn init(args: &Args) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level(args.quiet, args.verbose).into())
        .from_env_lossy();

    let file = match args.log_file {
        Some(ref log_file) => Some(Mutex::new(
            std::fs::File::create(log_file)
                .with_context(|| format!("Failed to create log file: {}", log_file))?,
        )),
        None => None,
    };

    match args.log_format {
        LogFormat::Text => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(args.verbose >= 2)
                    .with_file(args.verbose >= 3)
                    .with_line_number(args.verbose >= 3),
            );

            if let Some(file) = file {
                subscriber
                    .with(fmt::layer().with_ansi(false).with_writer(file))
                    .init();
            } else {
                subscriber.init();
            }
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(io::stderr));

            if let Some(file) = file {
                subscriber
                    .with(fmt::layer().json().with_writer(file))
                    .init();
            } else {
                subscriber.init();
            }
        }
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_writer(io::stderr));

            if let Some(file) = file {
                subscriber
                    .with(fmt::layer().compact().with_ansi(false).with_writer(file))
                    .init();
            } else {
                subscriber.init();
            }
        }
    }

    Ok(())
}
