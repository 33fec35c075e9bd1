//! CLI module graph.

pub mod check;
pub mod command;
pub mod history;
pub mod output;
pub mod run;

use command::{CheckCommand, Cli, Commands};
use output::OutputConfig;

use crate::error::Result;

/// Apply global flags and run the selected subcommand.
pub async fn dispatch(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
        Commands::History(args) => history::execute(&args),
    }
}
