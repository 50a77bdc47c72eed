//! Login command implementation

use std::path::Path;

use console::Style;

use super::helpers::{self, Services};
use crate::cli::LoginArgs;
use crate::domain::TargetHost;
use crate::error::Result;
use crate::session::SessionOrigin;

/// Make sure one host's package client holds a session
pub fn run(config_path: Option<&Path>, args: LoginArgs) -> Result<()> {
    let credentials = helpers::credentials(&args.auth)?;
    let services = Services::load(config_path)?;
    let host = TargetHost::new(args.host.trim());
    let prompt = helpers::prompt(&args.auth, None);

    let session = services.engine(prompt.as_ref()).login(&host, &credentials)?;

    let identity = session.identity.as_deref().unwrap_or("API key");
    let how = match session.origin {
        SessionOrigin::Existing => "already logged in".to_string(),
        SessionOrigin::ApiKey => "logged in with API key".to_string(),
        SessionOrigin::Password => format!("logged in after {} attempt(s)", session.attempts),
    };
    println!(
        "{} {}: {} as {}",
        Style::new().green().bold().apply_to("✓"),
        Style::new().bold().apply_to(&host),
        how,
        Style::new().cyan().apply_to(identity)
    );
    Ok(())
}
