use clap::Parser;

use super::reconcile::AuthArgs;

/// Arguments for the bootstrap command
#[derive(Parser, Debug)]
pub struct BootstrapArgs {
    /// Target host
    #[arg(long, default_value = "localhost")]
    pub host: String,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Target host
    #[arg(long, default_value = "localhost")]
    pub host: String,

    #[command(flatten)]
    pub auth: AuthArgs,
}
