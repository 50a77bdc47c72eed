use clap::{Args, Parser};

/// Which hosts a run addresses
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Single target host
    #[arg(long, conflicts_with = "group", required_unless_present = "group")]
    pub host: Option<String>,

    /// Delivery group whose member hosts are targeted
    #[arg(long)]
    pub group: Option<String>,

    /// Catalog scope; required to touch the catalog when using --host
    #[arg(long)]
    pub delivery_group: Option<String>,
}

/// How hosts log in to the package registry
#[derive(Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// Registry identity to log in as
    #[arg(long)]
    pub user: Option<String>,

    /// Name of the environment variable holding an API key
    #[arg(long, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Never prompt; a missing or rejected password fails the host
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments shared by subscribe and unsubscribe
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Every host of a delivery group:\n    channelsync unsubscribe office --group \"Office Apps\"\n\n\
                   One host, catalog scoped to a group:\n    channelsync unsubscribe office --host app01 --delivery-group \"Office Apps\"\n\n\
                   Preview catalog changes:\n    channelsync unsubscribe office --group \"Office Apps\" --dry-run")]
pub struct ReconcileArgs {
    /// Subscription (channel) name
    pub name: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Compute catalog changes without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the subscribe command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Subscribe a delivery group and warm caches:\n    channelsync subscribe office --group \"Office Apps\" --cache\n\n\
                   Unattended, with an API key:\n    channelsync subscribe office --group \"Office Apps\" --api-key-env APP_KEY --non-interactive")]
pub struct SubscribeArgs {
    #[command(flatten)]
    pub common: ReconcileArgs,

    /// Pre-download the subscription's content on each host
    #[arg(long)]
    pub cache: bool,
}
