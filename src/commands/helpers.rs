//! Command helper utilities

use std::env;
use std::path::Path;

use serde::Serialize;

use crate::catalog::{self, CatalogClient, ScopeLocker};
use crate::cli::AuthArgs;
use crate::config::Config;
use crate::domain::{Credentials, Secret};
use crate::engine::Engine;
use crate::error::{Result, config as config_error};
use crate::progress::ProgressDisplay;
use crate::remote::RoutingExecutor;
use crate::session::{CredentialPrompt, InteractivePrompt, NonInteractivePrompt};

/// Environment variable holding the login password for unattended runs
pub const SECRET_ENV: &str = "CHANNELSYNC_SECRET";

/// Everything a controller-side command needs, built from the configuration
pub struct Services {
    pub config: Config,
    pub catalog: Box<dyn CatalogClient>,
    locker: ScopeLocker,
    executor: RoutingExecutor,
}

impl Services {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let catalog = catalog::open(&config.catalog, config.timeouts.command());
        let locker = ScopeLocker::new(config.catalog.lock_dir.clone());
        let executor = RoutingExecutor::from_config(&config);
        Ok(Self {
            config,
            catalog,
            locker,
            executor,
        })
    }

    pub fn engine<'a>(&'a self, prompt: &'a dyn CredentialPrompt) -> Engine<'a> {
        Engine::new(&self.executor, self.catalog.as_ref(), &self.locker, prompt)
            .with_max_login_attempts(self.config.auth.max_attempts)
            .stop_on_host_failure(self.config.engine.stop_on_host_failure)
    }
}

/// Collect credentials from flags and the environment; secrets never come from argv
pub fn credentials(auth: &AuthArgs) -> Result<Credentials> {
    let api_key = match &auth.api_key_env {
        Some(var) => match env::var(var) {
            Ok(key) if !key.trim().is_empty() => Some(Secret::new(key.trim())),
            _ => {
                return Err(config_error::invalid(format!(
                    "environment variable {var} does not hold an API key"
                )));
            }
        },
        None => None,
    };

    let secret = env::var(SECRET_ENV)
        .ok()
        .filter(|s| !s.is_empty())
        .map(Secret::new);

    Ok(Credentials {
        identity: auth.user.clone(),
        secret,
        api_key,
    })
}

/// Prompt matching the auth flags; interactive prompts hide `progress` while asking
pub fn prompt(auth: &AuthArgs, progress: Option<&ProgressDisplay>) -> Box<dyn CredentialPrompt> {
    if auth.non_interactive {
        return Box::new(NonInteractivePrompt);
    }
    match progress {
        Some(progress) => Box::new(InteractivePrompt::with_progress(progress.bar())),
        None => Box::new(InteractivePrompt::default()),
    }
}

/// Progress display for a run; hidden for JSON output or when stderr is not a terminal
pub fn progress(json: bool) -> ProgressDisplay {
    if json || !console::Term::stderr().is_term() {
        ProgressDisplay::hidden()
    } else {
        ProgressDisplay::new()
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
