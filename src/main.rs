//! channelsync - subscription and catalog reconciliation
//!
//! Installs and logs in the package client on application hosts, subscribes
//! them to a channel, and converges the delivery group's published-app
//! catalog to what the subscription installed or removed.

use std::process::ExitCode;

use clap::Parser;

mod bootstrap;
mod catalog;
mod cli;
mod client;
mod commands;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod process;
mod progress;
mod reconcile;
mod remote;
mod session;
mod shortcut;
mod temp;
#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Subscribe(args) => commands::reconcile::run_subscribe(config, args),
        Commands::Unsubscribe(args) => commands::reconcile::run_unsubscribe(config, args),
        Commands::Bootstrap(args) => commands::bootstrap::run(config, args).map(success),
        Commands::Login(args) => commands::login::run(config, args).map(success),
        Commands::Catalog(args) => commands::catalog::run(config, args).map(success),
        Commands::Canonicalize(args) => commands::canonicalize::run(args).map(success),
        Commands::Agent => commands::agent::run(config).map(success),
        Commands::Version => commands::version::run().map(success),
        Commands::Completions(args) => commands::completions::run(args).map(success),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn success(_: ()) -> ExitCode {
    ExitCode::SUCCESS
}
