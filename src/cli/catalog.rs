use clap::{Parser, Subcommand};

/// Arguments for the catalog command
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// List published applications
    List(CatalogListArgs),
}

#[derive(Parser, Debug)]
pub struct CatalogListArgs {
    /// Only entries of this delivery group
    #[arg(long)]
    pub group: Option<String>,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,
}
