//! Command-line interface definitions.
//!
//! Defines the CLI structure for the referee application using `clap`.
//! The CLI runs the detector, validates configuration and shows the
//! persisted opportunity history.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::config::ModeConfig;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Cross-exchange arbitrage opportunity detector
#[derive(Parser, Debug)]
#[command(name = "referee")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the referee CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the detector until interrupted
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Show recently persisted opportunities
    History(HistoryArgs),
}

/// Subcommands for `referee check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override detection mode (event, polling).
    #[arg(long)]
    pub mode: Option<ModeConfig>,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Override the SQLite database path.
    #[arg(long)]
    pub database: Option<PathBuf>,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Path to the configuration file (for the database path).
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Read this database instead of the configured one.
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Number of rows to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["referee", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.mode.is_none());
        assert!(!args.json_logs);
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "referee",
            "run",
            "--config",
            "custom.toml",
            "--mode",
            "polling",
            "--log-level",
            "debug",
            "--json-logs",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("custom.toml"));
        assert_eq!(args.mode, Some(ModeConfig::Polling));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_logs);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["referee", "run", "--mode", "sometimes"]).is_err());
    }

    #[test]
    fn history_limit_parses() {
        let cli = Cli::try_parse_from(["referee", "history", "-n", "5"]).unwrap();
        let Commands::History(args) = cli.command else {
            panic!("expected history");
        };
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn check_config_parses() {
        let cli =
            Cli::try_parse_from(["referee", "--json", "check", "config", "-c", "x.toml"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Check(CheckCommand::Config(_))));
    }
}
