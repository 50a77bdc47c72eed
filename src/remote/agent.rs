//! Host-side request handler

use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use super::protocol::{AgentError, AgentRequest, AgentResponse};
use crate::bootstrap::{
    Bootstrapper, HttpDownloader, ProcessInstallerRunner, RuntimeProvisioner,
};
use crate::client::{CommandPackageClient, PackageClient};
use crate::config::Config;
use crate::error::{Result, bootstrap, remote};
use crate::shortcut::{CommandShortcutInspector, ShortcutInspector};

/// Executes agent requests against the machine it runs on
pub struct HostAgent {
    bootstrapper: Bootstrapper,
    inspector: Box<dyn ShortcutInspector>,
    command_timeout: Duration,
}

impl HostAgent {
    pub fn new(
        bootstrapper: Bootstrapper,
        inspector: Box<dyn ShortcutInspector>,
        command_timeout: Duration,
    ) -> Self {
        Self {
            bootstrapper,
            inspector,
            command_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let timeouts = &config.timeouts;
        let bootstrapper = Bootstrapper::new(
            config.bootstrap.clone(),
            Box::new(HttpDownloader::new(timeouts.install())),
            Box::new(ProcessInstallerRunner::new(timeouts.install())),
        );
        let inspector =
            CommandShortcutInspector::new(config.shortcuts.command.clone(), timeouts.command());
        Self::new(bootstrapper, Box::new(inspector), timeouts.command())
    }

    /// Handle one request; failures are returned as [`AgentResponse::Failed`]
    pub fn handle(&self, request: &AgentRequest) -> AgentResponse {
        tracing::debug!(op = request.op(), "agent request");
        match self.dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(op = request.op(), error = %e, "agent request failed");
                AgentResponse::Failed {
                    error: AgentError::from_error(&e),
                }
            }
        }
    }

    fn dispatch(&self, request: &AgentRequest) -> Result<AgentResponse> {
        Ok(match request {
            AgentRequest::EnsureRuntime => AgentResponse::Runtime {
                path: self.bootstrapper.ensure_runtime()?,
            },
            AgentRequest::CurrentIdentity => AgentResponse::Identity {
                identity: self.client()?.current_identity()?,
            },
            AgentRequest::Login { login } => {
                self.client()?.login(login)?;
                AgentResponse::Done
            }
            AgentRequest::Subscribe { name } => AgentResponse::Report {
                report: self.client()?.subscribe(name)?,
            },
            AgentRequest::Unsubscribe { name } => AgentResponse::Report {
                report: self.client()?.unsubscribe(name)?,
            },
            AgentRequest::CacheWarm { name } => {
                self.client()?.cache_warm(name)?;
                AgentResponse::Done
            }
            AgentRequest::ResolveShortcut { name } => AgentResponse::Shortcut {
                info: self.inspector.resolve(name)?,
            },
        })
    }

    /// Client for the installed runtime; never installs
    fn client(&self) -> Result<CommandPackageClient> {
        let program: PathBuf = self.bootstrapper.locate().ok_or_else(|| {
            bootstrap::install_failed("the package client is not installed on this host")
        })?;
        Ok(CommandPackageClient::new(program, self.command_timeout))
    }
}

/// Read one request from `input` and write the response to `output`
pub fn serve(agent: &HostAgent, mut input: impl Read, mut output: impl Write) -> Result<()> {
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;

    let response = match serde_json::from_str::<AgentRequest>(raw.trim()) {
        Ok(request) => agent.handle(&request),
        Err(e) => AgentResponse::Failed {
            error: AgentError::from_error(&remote::protocol(e.to_string())),
        },
    };

    serde_json::to_writer(&mut output, &response)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
