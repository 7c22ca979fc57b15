//! Emarch CLI - Command-line utility for packing and unpacking archives
//! with the archiving tools installed on the system.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.verbose, cli.quiet);
    let config = cli.tool_config();

    let result = match &cli.command {
        cli::Commands::Pack(args) => commands::pack::execute(args, config, &*formatter),
        cli::Commands::Unpack(args) => commands::unpack::execute(args, config, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::from(error::exit_code(&err))
        }
    }
}
