//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::commands::Command;

/// TLS bypass rule manager
///
/// Maintains the host and regex exclusion lists used during authorized TLS
/// interception testing. This tool edits rule files only; it does not
/// intercept or bypass any traffic itself.
#[derive(Parser, Debug)]
#[command(name = "tbr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true, env = "TBR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rule file path (sync file and backups are kept beside it)
    #[arg(short = 'r', long, value_name = "FILE", global = true, env = "TBR_RULE_FILE")]
    pub rule_file: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Log file path
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<String>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::rules::RuleKindArg;

    #[test]
    fn test_verbose() {
        let args = Args::parse_from(["tbr", "list", "-v"]);
        assert_eq!(args.verbose, 1);

        let args = Args::parse_from(["tbr", "-vvv", "stats"]);
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn test_add_defaults() {
        let args = Args::parse_from(["tbr", "add", "api.test.com"]);
        match args.command {
            Command::Add(add) => {
                assert_eq!(add.pattern, "api.test.com");
                assert!(matches!(add.kind, RuleKindArg::Regex));
                assert!(!add.disabled);
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_rule_file() {
        let args = Args::parse_from(["tbr", "toggle", "foo.com", "--rule-file", "/tmp/r.txt"]);
        assert_eq!(args.rule_file, Some(PathBuf::from("/tmp/r.txt")));
    }

    #[test]
    fn test_export_output() {
        let args = Args::parse_from(["tbr", "export", "json", "-o", "-"]);
        match args.command {
            Command::Export(export) => {
                assert_eq!(export.format, "json");
                assert_eq!(export.output, Some(PathBuf::from("-")));
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
