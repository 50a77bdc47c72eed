//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - reconcile: subscribe and unsubscribe arguments, shared scope and auth flags
//! - host: bootstrap and login arguments
//! - catalog: catalog inspection arguments
//! - completions: completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod catalog;
pub mod completions;
pub mod host;
pub mod reconcile;

pub use catalog::{CatalogArgs, CatalogCommand, CatalogListArgs};
pub use completions::CompletionsArgs;
pub use host::{BootstrapArgs, LoginArgs};
pub use reconcile::{AuthArgs, ReconcileArgs, ScopeArgs, SubscribeArgs};

/// channelsync - subscription and catalog reconciliation
#[derive(Parser, Debug)]
#[command(
    name = "channelsync",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Subscribe application hosts to package channels and keep the published-app catalog in step",
    long_about = "channelsync makes sure the package client is installed and logged in on each \
                  target host, subscribes or unsubscribes the host, and publishes or unpublishes \
                  the resulting applications in the delivery group's catalog. Runs are idempotent.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  channelsync subscribe office --group \"Office Apps\"   \x1b[90m# Every host of a group\x1b[0m\n   \
                  channelsync subscribe office --host app01 --delivery-group \"Office Apps\"\n   \
                  channelsync unsubscribe office --group \"Office Apps\" --dry-run\n   \
                  channelsync catalog list --group \"Office Apps\""
)]
pub struct Cli {
    /// Configuration file (defaults to $CHANNELSYNC_CONFIG, then the user config directory)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Subscribe hosts to a channel and publish what it installed
    Subscribe(SubscribeArgs),

    /// Unsubscribe hosts from a channel and unpublish what it removed
    Unsubscribe(ReconcileArgs),

    /// Install the package client on a host if it is missing
    Bootstrap(BootstrapArgs),

    /// Log a host's package client in
    Login(LoginArgs),

    /// Inspect the published-application catalog
    Catalog(CatalogArgs),

    /// Print the catalog name derived from application names
    Canonicalize(CanonicalizeArgs),

    /// Serve one host-side request from stdin (used over SSH)
    #[command(hide = true)]
    Agent,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the canonicalize command
#[derive(Parser, Debug)]
pub struct CanonicalizeArgs {
    /// Application names as reported by the package client
    #[arg(required = true)]
    pub names: Vec<String>,
}
