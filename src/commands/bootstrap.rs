//! Bootstrap command implementation

use std::path::Path;

use console::Style;

use super::helpers::Services;
use crate::cli::BootstrapArgs;
use crate::domain::TargetHost;
use crate::error::Result;
use crate::session::NonInteractivePrompt;

/// Install the package client on one host if it is missing
pub fn run(config_path: Option<&Path>, args: BootstrapArgs) -> Result<()> {
    let services = Services::load(config_path)?;
    let host = TargetHost::new(args.host.trim());

    let runtime = services.engine(&NonInteractivePrompt).bootstrap(&host)?;

    println!(
        "{} package client ready on {}: {}",
        Style::new().green().bold().apply_to("✓"),
        Style::new().bold().apply_to(&host),
        runtime.display()
    );
    Ok(())
}
