use clap::Parser;
use knobs_common::ErrorChain;
use std::process;

mod cli;
mod commands;
mod error;
mod exit_codes;
mod logging;

use cli::{Cli, Commands};
use exit_codes::EXIT_SUCCESS;

fn main() {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose, cli.debug, cli.quiet);

    let result = match &cli.command {
        Commands::Check(args) => commands::check::handle_command(args),
        Commands::Run(args) => commands::run::handle_command(args),
    };

    let exit_code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let source: &(dyn std::error::Error + 'static) = e.as_ref();
            eprint!("{}", ErrorChain::new(source));
            error::exit_code_for(&e)
        }
    };
    process::exit(exit_code);
}
