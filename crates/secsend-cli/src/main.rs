//! secsend CLI - reference client for the zero-knowledge file relay

#![forbid(unsafe_code)]

mod cli;
mod client;
mod commands;
mod exit_codes;
mod logging;
mod output;

use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if let Err(e) = secsend_crypto::init() {
        tracing::warn!("memory hardening unavailable: {}", e);
    }

    let result = match cli.command {
        cli::Commands::Send(args) => commands::send::execute(args).await,
        cli::Commands::Receive(args) => commands::receive::execute(args).await,
        cli::Commands::Delete(args) => commands::delete::execute(args).await,
        cli::Commands::Config(args) => commands::config_cmd::execute(args).await,
    };

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            output::color::error(&format!("{e:#}"));
            std::process::exit(exit_codes::ERROR);
        }
    }
}
